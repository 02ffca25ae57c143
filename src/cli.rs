use clap::{ArgAction, Args, Parser, Subcommand};
use photo_import_session::Timestamp;
use std::path::PathBuf;

/// Copy new photos off removable media into the library, one scenario at a time.
#[derive(Debug, Parser)]
#[command(name = "photo-import", version, about, long_about = None)]
pub struct Cli {
    /// Application settings file (defaults to the platform configuration directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More output: -v info, -vv debug, -vvv trace. Overridden by PHOTO_IMPORT_LOG.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan a scenario's source, confirm, copy and record the session.
    Import(ImportArgs),
    /// List configured scenarios.
    Scenarios,
    /// Show the recorded sessions of a scenario, oldest first.
    History {
        scenario: String,
    },
    /// List mounted devices that can serve as a source root.
    Devices,
    /// Show the resolved settings and import configuration.
    Config,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Name of the scenario to import.
    pub scenario: String,

    /// Only import files modified at or after this time (YYYY-MM-DD[THH:MM:SS]).
    #[arg(short, long, value_name = "TIMESTAMP")]
    pub from: Option<Timestamp>,

    /// Only import files modified at or before this time (YYYY-MM-DD[THH:MM:SS]).
    #[arg(short, long, value_name = "TIMESTAMP")]
    pub to: Option<Timestamp>,

    /// Ask rclone to report what it would copy without copying anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Directory the scenario source is relative to; prompts for a device when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub source_root: Option<PathBuf>,

    /// Answer yes to both confirmations.
    #[arg(short, long)]
    pub yes: bool,
}
