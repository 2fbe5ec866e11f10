use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Calendar-centric daily task tracker.
/// Data lives in ~/.vestigium unless --dir or VESTIGIUM_HOME says otherwise.
#[derive(Parser)]
#[command(name = "vestigium", version, about = "Daily tasks, streaks and a calendar in your terminal")]
pub struct Cli {
    /// Data directory holding the JSON snapshots and config.toml.
    #[arg(long, global = true, env = "VESTIGIUM_HOME")]
    pub dir: Option<PathBuf>,

    /// Log target: off | stderr | <file>. Defaults to a file in the data directory for `ui`,
    /// and to warnings on stderr for every other command.
    #[arg(long, global = true)]
    pub log: Option<String>,

    /// Log at debug level.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
