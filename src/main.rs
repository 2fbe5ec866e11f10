//! # Vestigium - daily tasks on a calendar
//!
//! A calendar-centric task tracker: plan a short list of tasks per day, tick them off,
//! and keep a streak of fully completed days going.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the terminal UI
//! vestigium ui
//!
//! # Add a task for today, or another day
//! vestigium add "Read 10 pages"
//! vestigium add "Gym" --date tomorrow
//!
//! # See how today is going
//! vestigium list
//! vestigium streak
//! ```
//!
//! ## Key Commands
//!
//! - `vestigium ui` - Calendar, day editor, notes, rewards and settings in one screen
//! - `vestigium add | toggle | edit | delete` - Task changes for one day
//! - `vestigium calendar` - Month grid, or `--json` for the projected events
//! - `vestigium export` - Dump every day as JSON
//!
//! Data is stored locally in `~/.vestigium/` as one JSON file per entity. Point `--dir` or
//! `VESTIGIUM_HOME` somewhere else to keep several independent vaults.

use clap::Parser;
use tracing::{debug, Level};

pub mod auth;
pub mod calendar;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod date_key;
pub mod error;
pub mod fields;
pub mod logging;
pub mod rewards;
pub mod settings;
pub mod storage;
pub mod store;
pub mod streak;
pub mod task;
pub mod vault;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod render;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;
use date_key::DateKey;
use logging::LogTarget;
use storage::FileStore;
use store::DailyTaskStore;
use vault::Vault;

fn main() {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return;
    }

    let data_dir = cli.dir.clone().unwrap_or_else(config::default_data_dir);
    // One-shot commands print warnings to stderr so a lost write is never silent.
    let (log_target, level) = match (&cli.log, &cli.command) {
        (Some(target), _) => (LogTarget::parse(target), Level::INFO),
        (None, Commands::Ui) => (LogTarget::File(config::log_path(&data_dir)), Level::INFO),
        (None, _) => (LogTarget::Stderr, Level::WARN),
    };
    let level = if cli.verbose { Level::DEBUG } else { level };
    if let Err(e) = logging::init(&log_target, level) {
        eprintln!("Failed to set up logging: {e}");
        std::process::exit(1);
    }

    let config = Config::load(Some(data_dir));
    let backend = match FileStore::open(&config.data_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open data directory {}: {}", config.data_dir.display(), e);
            std::process::exit(1);
        }
    };
    let vault = Vault::new(backend);
    let today = DateKey::today();
    debug!(%today, dir = %config.data_dir.display(), "vault ready");

    let result = match cli.command {
        Commands::Ui => cmd_ui(config, vault),
        Commands::Add { text, date } => cmd_add(&mut DailyTaskStore::load(vault), text, date, today),
        Commands::List { date } => cmd_list(&DailyTaskStore::load(vault), date, today),
        Commands::Toggle { id, date } => cmd_toggle(&mut DailyTaskStore::load(vault), id, date, today),
        Commands::Edit { id, text, date } => {
            cmd_edit(&mut DailyTaskStore::load(vault), id, text, date, today)
        }
        Commands::Delete { id, date } => cmd_delete(&mut DailyTaskStore::load(vault), id, date, today),
        Commands::Streak => cmd_streak(&DailyTaskStore::load(vault), today),
        Commands::Calendar { month, json } => {
            cmd_calendar(&DailyTaskStore::load(vault), month, json, today)
        }
        Commands::Rewards => cmd_rewards(&DailyTaskStore::load(vault), config.reward_interval, today),
        Commands::Notes { action } => cmd_notes(&vault, action),
        Commands::Settings { action } => cmd_settings(&vault, action),
        Commands::Friends { action } => cmd_friends(&vault, action, today),
        Commands::Plan { action } => cmd_plan(&vault, action),
        Commands::Export { output } => cmd_export(&DailyTaskStore::load(vault), output),
        Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
