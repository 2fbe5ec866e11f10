//! Task and per-day record data structures.
//!
//! A [`DayRecord`] owns the ordered tasks for one calendar day together with the derived
//! `isCompleted` flag. Field names are serialized in camelCase, matching the persisted
//! `dailyTasks` snapshot layout.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VestigiumError};

/// A single to-do item belonging to one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create an open task, trimming `text` and rejecting it when empty.
    pub fn new(id: u64, text: &str) -> Result<Self> {
        Ok(Task {
            id,
            text: normalise_text(text)?,
            completed: false,
        })
    }
}

/// Trim task text, rejecting blank input.
pub fn normalise_text(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(VestigiumError::EmptyTaskText);
    }
    Ok(trimmed.to_string())
}

/// All tasks for one day plus the derived completion flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub is_completed: bool,
}

impl DayRecord {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let mut record = DayRecord { tasks, is_completed: false };
        record.recompute();
        record
    }

    /// Re-derive `is_completed` from the task list.
    pub fn recompute(&mut self) {
        self.is_completed = all_done(&self.tasks);
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Completion as a percentage in `0.0..=100.0`; zero for an empty day.
    pub fn progress_percent(&self) -> f64 {
        if self.tasks.is_empty() {
            0.0
        } else {
            self.completed_count() as f64 / self.tasks.len() as f64 * 100.0
        }
    }
}

/// True when there is at least one task and every task is completed.
pub fn all_done(tasks: &[Task]) -> bool {
    !tasks.is_empty() && tasks.iter().all(|t| t.completed)
}
