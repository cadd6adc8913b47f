//! Console Event Sink
//!
//! Human-readable progress lines. Writes to stderr so stdout stays reserved
//! for the final production/preview lines.

use std::io::{self, Write};
use std::sync::Mutex;

use crossterm::style::Color;

use crate::domain::ports::{DeployEvent, DeployEventSink};
use crate::domain::value_objects::Phase;
use crate::ui::theme::{self, colors, Icon};

const KIB: f64 = 1024.0;

pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    color: bool,
    unicode: bool,
    verbose: bool,
}

impl ConsoleEventSink {
    pub fn stderr(color: bool, unicode: bool) -> Self {
        Self::with_writer(io::stderr(), color, unicode)
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, color: bool, unicode: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            color,
            unicode,
            verbose: true,
        }
    }

    /// Hide per-resource stack events
    pub fn quiet_resources(mut self) -> Self {
        self.verbose = false;
        self
    }

    fn paint(&self, text: &str, color: Color) -> String {
        theme::paint(text, color, self.color)
    }

    fn icon(&self, icon: Icon) -> String {
        icon.colored(self.color, self.unicode)
    }

    fn line(&self, text: String) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", text);
            let _ = writer.flush();
        }
    }
}

fn human_size(bytes: usize) -> String {
    let b = bytes as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < KIB * KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{:.1} MiB", b / (KIB * KIB))
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        match event {
            DeployEvent::Started {
                operation,
                namespace,
                stack_name,
            } => self.line(format!(
                "{} {} {} ({})",
                self.icon(Icon::Progress),
                operation.as_str(),
                namespace,
                self.paint(&stack_name, colors::DIM)
            )),

            DeployEvent::PhaseChanged { phase } => {
                if !phase.is_terminal() && phase != Phase::Start {
                    self.line(format!(
                        "  {} {}",
                        self.icon(Icon::Arrow),
                        self.paint(phase.as_str(), colors::DIM)
                    ));
                }
            }

            DeployEvent::Archived {
                key,
                entry_count,
                size,
                ..
            } => self.line(format!(
                "  {} archived {} ({} files, {})",
                self.icon(Icon::Success),
                key,
                entry_count,
                human_size(size)
            )),

            DeployEvent::Uploaded { bucket, key, .. } => {
                self.line(format!("  {} uploaded s3://{}/{}", self.icon(Icon::Success), bucket, key))
            }

            DeployEvent::Synthesized {
                stack_name,
                parameter_count,
                mode,
            } => self.line(format!(
                "  {} synthesized {} ({} parameters, {} update)",
                self.icon(Icon::Success),
                stack_name,
                parameter_count,
                mode.as_str()
            )),

            DeployEvent::StackProgress {
                timestamp,
                logical_id,
                resource_type,
                status,
                reason,
            } => {
                let mut text = format!(
                    "    {} {} {} {}",
                    self.paint(&timestamp, colors::DIM),
                    self.paint(&status, theme::status_color(&status)),
                    logical_id,
                    self.paint(&resource_type, colors::DIM)
                );
                if let Some(reason) = reason {
                    text.push_str(&format!(" - {}", reason));
                }
                self.line(text);
            }

            DeployEvent::Completed {
                operation, change, ..
            } => {
                let suffix = change.map(|c| format!(" ({c})")).unwrap_or_default();
                self.line(format!(
                    "{} {} complete{}",
                    self.icon(Icon::Success),
                    operation.as_str(),
                    suffix
                ));
            }

            // The caller prints the error itself
            DeployEvent::Failed { kind, .. } => self.line(format!(
                "{} {} failed",
                self.icon(Icon::Error),
                kind
            )),
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.verbose
    }
}
