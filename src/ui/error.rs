//! Error rendering for the CLI

use crate::error::{ArchiveError, ConfigError, DeployError, OrchestrationError};
use crate::ui::terminal::TerminalCapabilities;
use crate::ui::theme::{self, colors, Icon};

/// Follow-up advice for errors the operator can fix locally
fn hint(err: &anyhow::Error) -> Option<String> {
    let config = err.downcast_ref::<ConfigError>().or_else(|| {
        err.downcast_ref::<DeployError>().and_then(|e| match e {
            DeployError::Config(c) => Some(c),
            _ => None,
        })
    });
    if let Some(config) = config {
        return match config {
            ConfigError::MissingKeys { .. } => Some(
                "set the environment variables, or add the keys to yippie.toml".to_string(),
            ),
            ConfigError::AccountMismatch { .. } => {
                Some("check AWS_PROFILE or the credentials in your environment".to_string())
            }
            _ => None,
        };
    }

    match err.downcast_ref::<DeployError>() {
        Some(DeployError::Archive(ArchiveError::MissingFolder { .. })) => {
            Some("pass the site folder with --folder <path>".to_string())
        }
        Some(DeployError::Orchestration(OrchestrationError::StackNotFound { .. })) => {
            Some("nothing is deployed under this namespace".to_string())
        }
        Some(DeployError::Orchestration(OrchestrationError::Unrecoverable { .. })) => {
            Some("delete the stack with `yippie destroy`, then deploy again".to_string())
        }
        _ => None,
    }
}

pub fn format_error(err: &anyhow::Error, supports_color: bool, supports_unicode: bool) -> String {
    let mut out = format!(
        "{} {}\n",
        Icon::Error.colored(supports_color, supports_unicode),
        theme::paint(&format!("Error: {}", err), colors::ERROR, supports_color)
    );
    for cause in err.chain().skip(1) {
        out.push_str(&format!("  caused by: {}\n", cause));
    }
    if let Some(hint) = hint(err) {
        out.push_str(&format!(
            "  {} {}\n",
            Icon::Arrow.colored(supports_color, supports_unicode),
            theme::paint(&hint, colors::INFO, supports_color)
        ));
    }
    out
}

/// `::error` workflow command for GitHub Actions logs
pub fn github_actions_annotation(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error title=yippie::{}", escaped)
}

/// Report `err` once. In JSON mode, coordinator failures were already
/// emitted by the event sink.
pub fn print_error(err: &anyhow::Error, json: bool, caps: &TerminalCapabilities) {
    if json {
        if err.downcast_ref::<DeployError>().is_none() {
            let _ = crate::ui::json::emit(serde_json::json!({
                "event": "error",
                "status": "failed",
                "kind": "config",
                "message": err.to_string(),
            }));
        }
        return;
    }

    if caps.is_github_actions {
        println!("{}", github_actions_annotation(&err.to_string()));
    }
    eprint!(
        "{}",
        format_error(err, caps.supports_color, caps.supports_unicode)
    );
}
