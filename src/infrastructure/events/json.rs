//! JSON Event Sink
//!
//! Outputs deploy and destroy events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        let json = match event {
            DeployEvent::Started {
                operation,
                namespace,
                stack_name,
            } => {
                serde_json::json!({
                    "event": "start",
                    "command": operation.as_str(),
                    "namespace": namespace,
                    "stack": stack_name,
                })
            }

            DeployEvent::PhaseChanged { phase } => {
                serde_json::json!({
                    "event": "phase",
                    "phase": phase,
                })
            }

            DeployEvent::Archived {
                key,
                entry_count,
                size,
                sha256,
            } => {
                serde_json::json!({
                    "event": "archived",
                    "key": key,
                    "entries": entry_count,
                    "size": size,
                    "sha256": sha256,
                })
            }

            DeployEvent::Uploaded { bucket, key, size } => {
                serde_json::json!({
                    "event": "uploaded",
                    "bucket": bucket,
                    "key": key,
                    "size": size,
                })
            }

            DeployEvent::Synthesized {
                stack_name,
                parameter_count,
                mode,
            } => {
                serde_json::json!({
                    "event": "synthesized",
                    "stack": stack_name,
                    "parameters": parameter_count,
                    "mode": mode.as_str(),
                })
            }

            DeployEvent::StackProgress {
                timestamp,
                logical_id,
                resource_type,
                status,
                reason,
            } => {
                serde_json::json!({
                    "event": "stack_event",
                    "timestamp": timestamp,
                    "logical_id": logical_id,
                    "resource_type": resource_type,
                    "status": status,
                    "reason": reason,
                })
            }

            DeployEvent::Completed {
                operation,
                stack_name,
                production_url,
                preview_url,
                change,
            } => {
                let mut json = serde_json::json!({
                    "event": "complete",
                    "command": operation.as_str(),
                    "status": "success",
                    "stack": stack_name,
                });
                if let Some(map) = json.as_object_mut() {
                    if let Some(url) = production_url {
                        map.insert("production".into(), url.into());
                    }
                    if let Some(url) = preview_url {
                        map.insert("preview".into(), url.into());
                    }
                    if let Some(change) = change {
                        map.insert("change".into(), change.into());
                    }
                }
                json
            }

            DeployEvent::Failed { kind, message } => {
                serde_json::json!({
                    "event": "error",
                    "status": "failed",
                    "kind": kind,
                    "message": message,
                })
            }
        };

        self.write_event(json);
    }

    fn wants_detailed_events(&self) -> bool {
        true // JSON mode wants all events
    }
}
