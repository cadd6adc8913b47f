//! yippie CLI - static-site deployment coordinator
//!
//! Usage: yippie [deploy|destroy] [-f <folder>] [-c <config>] [--json] [-q | -v...]
//!
//! Commands:
//!   deploy   Archive the site, upload it and deploy the stack (default)
//!   destroy  Delete the namespace stack

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use yippie::application::{DeploymentCoordinator, RunOutcome, StackTemplate};
use yippie::config::{self, LoadOptions};
use yippie::domain::ports::{DeployEventSink, SystemClock};
use yippie::infrastructure::{AwsContext, ConsoleEventSink, JsonEventSink, ZipArchiveBuilder};
use yippie::ui::error::print_error;
use yippie::ui::terminal::{detect_capabilities, TerminalCapabilities};
use yippie::ui::views::deploy::{render_deploy_summary, render_stack_outputs};

use cli::Cli;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not failures
            let failed = e.use_stderr();
            let _ = e.print();
            return if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(cli.verbose);
    let caps = detect_capabilities();

    match run(&cli, &caps) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            print_error(&err, cli.json, &caps);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises yippie's own level
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,yippie={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli, caps: &TerminalCapabilities) -> Result<()> {
    let options = LoadOptions {
        config_path: cli.config.clone(),
        folder: cli.folder.clone(),
    };
    let (config, _warnings) = config::load(&options)?;
    let template = StackTemplate::load(config.template.as_deref())?;

    let aws = AwsContext::connect(&config.region)?;
    aws.verify_account(&config.account)?;

    let events: Arc<dyn DeployEventSink> = if cli.json {
        Arc::new(JsonEventSink::stdout())
    } else {
        let sink = ConsoleEventSink::stderr(caps.supports_color, caps.supports_unicode);
        if cli.quiet {
            Arc::new(sink.quiet_resources())
        } else {
            Arc::new(sink)
        }
    };

    let coordinator = DeploymentCoordinator::new(
        config.clone(),
        template,
        ZipArchiveBuilder::new(),
        aws.artifact_store(),
        aws.orchestrator(config.poll_interval),
        SystemClock,
    );

    let outcome = coordinator.run(cli.operation(), events)?;
    if let RunOutcome::Deployed(summary) = &outcome {
        if !cli.json {
            print!("{}", render_deploy_summary(summary));
            if cli.verbose > 0 {
                eprint!("{}", render_stack_outputs(summary));
            }
        }
    }
    Ok(())
}
