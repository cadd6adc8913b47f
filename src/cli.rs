use std::path::PathBuf;

use clap::{Parser, Subcommand};
use yippie::config::DEFAULT_FOLDER;
use yippie::domain::ports::Operation;

/// yippie - zip a static site, upload it and deploy its CloudFormation stack
#[derive(Parser, Debug)]
#[command(name = "yippie")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Configuration comes from the environment (NAMESPACE, DOMAINNAME, AWS_*) or yippie.toml.")]
pub struct Cli {
    /// Static site folder to archive
    #[arg(short, long, global = true, default_value = DEFAULT_FOLDER)]
    pub folder: PathBuf,

    /// Config file (defaults to ./yippie.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit NDJSON events on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Hide per-resource stack events in console output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Archive, upload and deploy the site (default)
    Deploy,

    /// Delete the namespace stack
    Destroy,
}

impl Cli {
    pub fn operation(&self) -> Operation {
        match self.command {
            None | Some(Commands::Deploy) => Operation::Deploy,
            Some(Commands::Destroy) => Operation::Destroy,
        }
    }
}
