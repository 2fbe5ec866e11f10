//! The daily task store.
//!
//! [`DailyTaskStore`] owns the [`DayRecord`] of every day that was ever touched and keeps
//! each record's `is_completed` flag consistent with its tasks. Every mutation writes the
//! whole map through the [`Vault`]; write failures are logged there and the in-memory map
//! stays authoritative for the rest of the session.

use chrono::Utc;
use tracing::debug;

use crate::date_key::DateKey;
use crate::error::{Result, VestigiumError};
use crate::task::{normalise_text, DayRecord, Task};
use crate::vault::{DailyTasks, Vault};

pub struct DailyTaskStore {
    days: DailyTasks,
    vault: Vault,
    last_id: u64,
    persisted: bool,
}

impl DailyTaskStore {
    /// Load the persisted snapshot, or start empty.
    pub fn load(vault: Vault) -> Self {
        let days = vault.load_daily_tasks();
        Self::from_days(days, vault)
    }

    /// Build a store around an existing map without writing it.
    pub fn from_days(days: DailyTasks, vault: Vault) -> Self {
        let last_id = days
            .values()
            .flat_map(|d| d.tasks.iter().map(|t| t.id))
            .max()
            .unwrap_or(0);
        DailyTaskStore { days, vault, last_id, persisted: true }
    }

    /// Tasks for `date`, empty when the day has no record.
    pub fn tasks(&self, date: DateKey) -> &[Task] {
        self.days.get(&date).map(|d| d.tasks.as_slice()).unwrap_or(&[])
    }

    pub fn day(&self, date: DateKey) -> Option<&DayRecord> {
        self.days.get(&date)
    }

    pub fn days(&self) -> &DailyTasks {
        &self.days
    }

    /// Whether the most recent write-through reached the backend.
    pub fn persisted(&self) -> bool {
        self.persisted
    }

    pub fn is_completed(&self, date: DateKey) -> bool {
        self.days.get(&date).is_some_and(|d| d.is_completed)
    }

    /// `(completed, total)` for `date`.
    pub fn progress(&self, date: DateKey) -> (usize, usize) {
        self.days
            .get(&date)
            .map(|d| (d.completed_count(), d.tasks.len()))
            .unwrap_or((0, 0))
    }

    /// Replace the day's tasks wholesale and persist.
    pub fn set_tasks(&mut self, date: DateKey, tasks: Vec<Task>) {
        let record = self.days.entry(date).or_default();
        record.tasks = tasks;
        record.recompute();
        debug!(%date, tasks = record.tasks.len(), completed = record.is_completed, "day updated");
        self.persist();
    }

    /// Set the completion flag without touching the task list.
    ///
    /// Returns `false`, and writes nothing, when the flag already has that value.
    pub fn set_completed_flag(&mut self, date: DateKey, is_completed: bool) -> bool {
        if self.is_completed(date) == is_completed {
            return false;
        }
        self.days.entry(date).or_default().is_completed = is_completed;
        debug!(%date, is_completed, "completion flag updated");
        self.persist();
        true
    }

    /// Append a new task. Past days are closed for new tasks.
    pub fn add_task(&mut self, date: DateKey, text: &str, today: DateKey) -> Result<&Task> {
        if date < today {
            return Err(VestigiumError::PastDate(date));
        }
        let task = Task::new(self.next_id()?, text)?;
        let id = task.id;
        let mut tasks = self.tasks(date).to_vec();
        tasks.push(task);
        self.set_tasks(date, tasks);
        self.tasks(date)
            .last()
            .ok_or(VestigiumError::TaskNotFound { date, id })
    }

    /// Flip a task's completion, returning the new value.
    pub fn toggle_task(&mut self, date: DateKey, id: u64) -> Result<bool> {
        let mut tasks = self.tasks(date).to_vec();
        let task = find_mut(&mut tasks, date, id)?;
        task.completed = !task.completed;
        let completed = task.completed;
        self.set_tasks(date, tasks);
        Ok(completed)
    }

    pub fn edit_task(&mut self, date: DateKey, id: u64, text: &str) -> Result<()> {
        let text = normalise_text(text)?;
        let mut tasks = self.tasks(date).to_vec();
        find_mut(&mut tasks, date, id)?.text = text;
        self.set_tasks(date, tasks);
        Ok(())
    }

    pub fn delete_task(&mut self, date: DateKey, id: u64) -> Result<Task> {
        let mut tasks = self.tasks(date).to_vec();
        let idx = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(VestigiumError::TaskNotFound { date, id })?;
        let removed = tasks.remove(idx);
        self.set_tasks(date, tasks);
        Ok(removed)
    }

    /// Creation timestamp in milliseconds, bumped past the last id handed out.
    fn next_id(&mut self) -> Result<u64> {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let next = self.last_id.checked_add(1).ok_or(VestigiumError::IdsExhausted)?;
        self.last_id = now.max(next);
        Ok(self.last_id)
    }

    fn persist(&mut self) {
        self.persisted = self.vault.save_daily_tasks(&self.days);
    }
}

fn find_mut(tasks: &mut [Task], date: DateKey, id: u64) -> Result<&mut Task> {
    tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(VestigiumError::TaskNotFound { date, id })
}
