//! Command implementations for the CLI interface.
//!
//! Each subcommand maps to one `cmd_*` function. They print to stdout and return
//! [`Result`]; `main` reports errors and sets the exit code.

use std::fs;
use std::io::{self, Write};

use clap::Subcommand;
use clap_complete::{generate, Shell};
use tracing::info;

use crate::calendar;
use crate::config::Config;
use crate::date_key::{parse_day_input, parse_month, DateKey};
use crate::error::{Result, VestigiumError};
use crate::fields::{format_plan, format_sound, Plan, Sound};
use crate::rewards::{Milestone, RewardTree};
use crate::store::DailyTaskStore;
use crate::streak;
use crate::tui::run::run_tui;
use crate::vault::Vault;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive terminal UI.
    Ui,

    /// Add a task to a day.
    Add {
        /// Task text.
        text: String,
        /// Day: YYYY-MM-DD, "today", "tomorrow", "in Nd" or a weekday. Defaults to today.
        #[arg(long, short)]
        date: Option<String>,
    },

    /// List the tasks of a day with progress.
    List {
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Flip a task between done and not done.
    Toggle {
        id: u64,
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Replace the text of a task.
    Edit {
        id: u64,
        text: String,
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Delete a task.
    Delete {
        id: u64,
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Show the current and longest streak.
    Streak,

    /// Month grid with completion markers.
    Calendar {
        /// Month to show: YYYY-MM. Defaults to the current month.
        #[arg(long, short)]
        month: Option<String>,
        /// Print the projected calendar events as JSON instead.
        #[arg(long)]
        json: bool,
    },

    /// Show the reward tree.
    Rewards,

    /// Read or change the notes pad.
    Notes {
        #[command(subcommand)]
        action: NotesAction,
    },

    /// Read or change sound settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Manage the friends list.
    Friends {
        #[command(subcommand)]
        action: FriendsAction,
    },

    /// Show or change the current plan.
    Plan {
        #[command(subcommand)]
        action: PlanAction,
    },

    /// Dump the daily task snapshot as JSON.
    Export {
        /// Output file path (default: stdout).
        #[arg(long, short)]
        output: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell type: bash, zsh, fish, powershell, elvish
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum NotesAction {
    /// Print the notes.
    Show,
    /// Replace the notes.
    Set { text: String },
    /// Append a line.
    Append { line: String },
    /// Erase the notes.
    Clear,
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the sound settings.
    Show,
    /// Change one or more sound settings.
    Set {
        #[arg(long, value_enum)]
        sound: Option<Sound>,
        /// Volume, 0 to 100.
        #[arg(long)]
        volume: Option<u16>,
        #[arg(long, conflicts_with = "unmute")]
        mute: bool,
        #[arg(long)]
        unmute: bool,
    },
}

#[derive(Subcommand)]
pub enum FriendsAction {
    /// List friends.
    List,
    /// Add a friend.
    Add { name: String },
    /// Remove a friend (case-insensitive).
    Remove { name: String },
}

#[derive(Subcommand)]
pub enum PlanAction {
    /// Print the current plan.
    Show,
    /// Switch plan.
    Set {
        #[arg(value_enum)]
        plan: Plan,
    },
}

/// A one-shot command has no later chance to retry, so a lost write is an error.
fn ensure_saved(saved: bool, what: &'static str) -> Result<()> {
    if saved {
        Ok(())
    } else {
        Err(VestigiumError::NotSaved(what))
    }
}

fn resolve_date(date: Option<String>, today: DateKey) -> Result<DateKey> {
    match date {
        Some(s) => parse_day_input(&s, today),
        None => Ok(today),
    }
}

pub fn cmd_ui(config: Config, vault: Vault) -> Result<()> {
    info!(dir = %config.data_dir.display(), "starting ui");
    run_tui(config, vault)?;
    Ok(())
}

pub fn cmd_add(store: &mut DailyTaskStore, text: String, date: Option<String>, today: DateKey) -> Result<()> {
    let date = resolve_date(date, today)?;
    let (id, text) = {
        let task = store.add_task(date, &text, today)?;
        (task.id, task.text.clone())
    };
    ensure_saved(store.persisted(), "the task list")?;
    println!("Added task {id} on {date}: {text}");
    Ok(())
}

pub fn cmd_list(store: &DailyTaskStore, date: Option<String>, today: DateKey) -> Result<()> {
    let date = resolve_date(date, today)?;
    let tasks = store.tasks(date);
    if tasks.is_empty() {
        println!("No tasks for {date}.");
        return Ok(());
    }

    let (done, total) = store.progress(date);
    let suffix = if store.is_completed(date) { "  (completed)" } else { "" };
    println!("{date}  {done}/{total}{suffix}");
    println!("{:<15} {:<4} TEXT", "ID", "DONE");
    for t in tasks {
        println!("{:<15} {:<4} {}", t.id, if t.completed { "[x]" } else { "[ ]" }, t.text);
    }
    Ok(())
}

pub fn cmd_toggle(store: &mut DailyTaskStore, id: u64, date: Option<String>, today: DateKey) -> Result<()> {
    let date = resolve_date(date, today)?;
    let completed = store.toggle_task(date, id)?;
    ensure_saved(store.persisted(), "the task list")?;
    println!("Task {id} marked {}.", if completed { "done" } else { "not done" });
    if store.is_completed(date) {
        println!("All tasks for {date} are done. Streak: {}", streak::current_streak(store.days(), today));
    }
    Ok(())
}

pub fn cmd_edit(
    store: &mut DailyTaskStore,
    id: u64,
    text: String,
    date: Option<String>,
    today: DateKey,
) -> Result<()> {
    let date = resolve_date(date, today)?;
    store.edit_task(date, id, &text)?;
    ensure_saved(store.persisted(), "the task list")?;
    println!("Updated task {id}.");
    Ok(())
}

pub fn cmd_delete(store: &mut DailyTaskStore, id: u64, date: Option<String>, today: DateKey) -> Result<()> {
    let date = resolve_date(date, today)?;
    let task = store.delete_task(date, id)?;
    ensure_saved(store.persisted(), "the task list")?;
    println!("Deleted task {}: {}", task.id, task.text);
    Ok(())
}

pub fn cmd_streak(store: &DailyTaskStore, today: DateKey) -> Result<()> {
    println!("Current streak: {}", streak::current_streak(store.days(), today));
    println!("Longest streak: {}", streak::longest_streak(store.days()));
    Ok(())
}

pub fn cmd_calendar(store: &DailyTaskStore, month: Option<String>, json: bool, today: DateKey) -> Result<()> {
    if json {
        let events = calendar::project(store.days());
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    let first = match month {
        Some(m) => parse_month(&m)?,
        None => today.first_of_month(),
    };
    println!("{}", first.date().format("%B %Y"));
    println!(" Mo   Tu   We   Th   Fr   Sa   Su");
    for week in calendar::month_grid(first.year(), first.month()) {
        let line: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                None => "    ".to_string(),
                Some(date) => {
                    let marker = if store.is_completed(*date) {
                        '*'
                    } else if !store.tasks(*date).is_empty() {
                        '+'
                    } else if *date == today {
                        '<'
                    } else {
                        ' '
                    };
                    format!("{:>3}{marker}", date.day())
                }
            })
            .collect();
        println!("{}", line.join(" ").trim_end());
    }
    println!("* completed  + has tasks");
    Ok(())
}

pub fn cmd_rewards(store: &DailyTaskStore, interval: u32, today: DateKey) -> Result<()> {
    let tree = RewardTree::from_streak(streak::current_streak(store.days(), today), interval);
    println!("Streak: {} days, {} of {} gifts unlocked", tree.streak, tree.unlocked, tree.tiers.len());
    for tier in tree.tiers.iter().rev() {
        let mark = if tier.unlocked { "*" } else { "o" };
        println!("  {mark} Gift {:>2}  {:>4} days", tier.level, tier.streak_required);
    }
    if tree.milestone() != Milestone::Summit {
        println!("Next gift in {} days ({:.0}%)", tree.days_to_next(), tree.progress_percent());
    }
    println!("{}", tree.message());
    Ok(())
}

pub fn cmd_notes(vault: &Vault, action: NotesAction) -> Result<()> {
    match action {
        NotesAction::Show => {
            let notes = vault.load_notes();
            if notes.is_empty() {
                println!("(no notes)");
            } else {
                println!("{notes}");
            }
        }
        NotesAction::Set { text } => {
            ensure_saved(vault.save_notes(&text), "the notes")?;
            println!("Notes saved.");
        }
        NotesAction::Append { line } => {
            let mut notes = vault.load_notes();
            if !notes.is_empty() {
                notes.push('\n');
            }
            notes.push_str(&line);
            ensure_saved(vault.save_notes(&notes), "the notes")?;
            println!("Notes saved.");
        }
        NotesAction::Clear => {
            ensure_saved(vault.save_notes(""), "the notes")?;
            println!("Notes cleared.");
        }
    }
    Ok(())
}

pub fn cmd_settings(vault: &Vault, action: SettingsAction) -> Result<()> {
    let mut settings = vault.load_settings();
    if let SettingsAction::Set { sound, volume, mute, unmute } = action {
        if let Some(sound) = sound {
            settings.sound = sound;
        }
        if let Some(volume) = volume {
            settings.set_volume(volume)?;
        }
        if mute {
            settings.muted = true;
        }
        if unmute {
            settings.muted = false;
        }
        ensure_saved(vault.save_settings(&settings), "the sound settings")?;
    }
    println!("Sound:   {}", format_sound(settings.sound));
    println!("Volume:  {}", settings.volume);
    println!("Playing: {}", settings.effective_volume());
    println!("Muted:   {}", if settings.muted { "yes" } else { "no" });
    Ok(())
}

pub fn cmd_friends(vault: &Vault, action: FriendsAction, today: DateKey) -> Result<()> {
    let mut friends = vault.load_friends();
    match action {
        FriendsAction::List => {
            if friends.is_empty() {
                println!("No friends yet.");
            }
            for f in friends.iter() {
                println!("{:<24} since {}", f.name, f.since);
            }
        }
        FriendsAction::Add { name } => {
            let added = friends.add(&name, today)?.name.clone();
            ensure_saved(vault.save_friends(&friends), "the friends list")?;
            println!("Added {added}.");
        }
        FriendsAction::Remove { name } => {
            let removed = friends.remove(&name)?;
            ensure_saved(vault.save_friends(&friends), "the friends list")?;
            println!("Removed {}.", removed.name);
        }
    }
    Ok(())
}

pub fn cmd_plan(vault: &Vault, action: PlanAction) -> Result<()> {
    let plan = match action {
        PlanAction::Show => vault.load_plan(),
        PlanAction::Set { plan } => {
            ensure_saved(vault.save_plan(plan), "the plan")?;
            plan
        }
    };
    println!("Current plan: {}", format_plan(plan));
    Ok(())
}

pub fn cmd_export(store: &DailyTaskStore, output: Option<String>) -> Result<()> {
    let json = serde_json::to_string_pretty(store.days())?;
    match output {
        Some(path) => {
            fs::write(&path, json)?;
            println!("Exported {} days to {}", store.days().len(), path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}
