//! Calendar event projection and calendar interaction rules.
//!
//! [`project`] turns the daily task map into the markers a calendar renders: one marker
//! per task, plus a background marker for every fully completed day. The `on_*`
//! functions decide what a click or a range change means for the day editor.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::date_key::DateKey;
use crate::fields::CalendarView;
use crate::vault::DailyTasks;

pub const DAY_COMPLETED_TITLE: &str = "Day completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Background,
    Auto,
}

/// What a marker refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EventTag {
    DayCompleted { date: DateKey },
    Task { date: DateKey, task_id: u64 },
}

impl EventTag {
    /// Recover a task tag from an identifier such as `2024-01-05-1704412800000`.
    ///
    /// The date part is the fixed-width prefix; splitting on the first `-` would cut
    /// inside the date.
    pub fn parse(identifier: &str) -> Option<EventTag> {
        let date = identifier.get(..10)?;
        let task_id = identifier.get(10..)?.strip_prefix('-')?.parse().ok()?;
        Some(EventTag::Task { date: date.parse().ok()?, task_id })
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTag::DayCompleted { date } => write!(f, "{date}-completed"),
            EventTag::Task { date, task_id } => write!(f, "{date}-{task_id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateKey>,
    pub all_day: bool,
    pub display: DisplayMode,
    pub completed: bool,
    pub tag: EventTag,
}

impl CalendarEvent {
    fn task(date: DateKey, task_id: u64, title: &str, completed: bool) -> Self {
        let tag = EventTag::Task { date, task_id };
        CalendarEvent {
            id: tag.to_string(),
            title: title.to_string(),
            start: date,
            end: None,
            all_day: true,
            display: DisplayMode::Auto,
            completed,
            tag,
        }
    }

    fn day_completed(date: DateKey) -> Self {
        let tag = EventTag::DayCompleted { date };
        CalendarEvent {
            id: tag.to_string(),
            title: DAY_COMPLETED_TITLE.to_string(),
            start: date,
            end: None,
            all_day: true,
            display: DisplayMode::Background,
            completed: true,
            tag,
        }
    }

    pub fn is_background(&self) -> bool {
        self.display == DisplayMode::Background
    }
}

/// All calendar markers for the map: task markers first, then completed-day markers.
pub fn project(days: &DailyTasks) -> Vec<CalendarEvent> {
    let tasks = days.iter().flat_map(|(&date, record)| {
        record
            .tasks
            .iter()
            .map(move |t| CalendarEvent::task(date, t.id, &t.text, t.completed))
    });
    let completed = days
        .iter()
        .filter(|(_, record)| record.is_completed)
        .map(|(&date, _)| CalendarEvent::day_completed(date));
    tasks.chain(completed).collect()
}

/// Day editor target produced by a calendar interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub date: DateKey,
    pub task_id: Option<u64>,
}

/// A clicked day opens the editor only for today or later.
pub fn on_date_click(date: DateKey, today: DateKey) -> Option<DateKey> {
    (date >= today).then_some(date)
}

/// A clicked marker opens its day, preselecting the task for task markers.
pub fn on_event_click(event: &CalendarEvent) -> Selection {
    match event.tag {
        EventTag::Task { date, task_id } => Selection { date, task_id: Some(task_id) },
        EventTag::DayCompleted { date } => Selection { date, task_id: None },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub view: CalendarView,
    pub focus: Option<DateKey>,
}

/// Only the day view keeps a focused date.
pub fn on_visible_range_change(view: CalendarView, range_start: DateKey) -> VisibleRange {
    let focus = match view {
        CalendarView::Day => Some(range_start),
        CalendarView::Week | CalendarView::Month => None,
    };
    VisibleRange { view, focus }
}

/// Weeks of the month, Monday first; cells outside the month are `None`.
pub fn month_grid(year: i32, month: u32) -> Vec<[Option<DateKey>; 7]> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut date = first;
    while date.month() == month {
        let col = date.weekday().num_days_from_monday() as usize;
        week[col] = Some(DateKey::new(date));
        if col == 6 {
            weeks.push(week);
            week = [None; 7];
        }
        date += Duration::days(1);
    }
    if week.iter().any(Option::is_some) {
        weeks.push(week);
    }
    weeks
}

/// The Monday-to-Sunday week containing `date`.
pub fn week_of(date: DateKey) -> [DateKey; 7] {
    let offset = date.weekday().num_days_from_monday() as i64;
    let start = date.add_days(-offset).unwrap_or(date);
    std::array::from_fn(|i| start.add_days(i as i64).unwrap_or(start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{DayRecord, Task};

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn task(id: u64, text: &str, completed: bool) -> Task {
        Task { id, text: text.into(), completed }
    }

    fn count(events: &[CalendarEvent]) -> (usize, usize) {
        let bg = events.iter().filter(|e| e.is_background()).count();
        (events.len() - bg, bg)
    }

    #[test]
    fn test_projection_tracks_completion() {
        let d = key("2024-01-05");
        let mut days = DailyTasks::new();
        days.insert(d, DayRecord::with_tasks(vec![task(1, "a", true), task(2, "b", false)]));
        assert_eq!(count(&project(&days)), (2, 0));

        days.insert(d, DayRecord::with_tasks(vec![task(1, "a", true), task(2, "b", true)]));
        let events = project(&days);
        assert_eq!(count(&events), (2, 1));
        let bg = events.iter().find(|e| e.is_background()).unwrap();
        assert_eq!(bg.start, d);
        assert_eq!(bg.title, DAY_COMPLETED_TITLE);
        assert!(bg.all_day);
    }

    #[test]
    fn test_task_marker_fields() {
        let mut days = DailyTasks::new();
        days.insert(key("2024-02-01"), DayRecord::with_tasks(vec![task(99, "gym", true)]));
        let events = project(&days);
        let marker = &events[0];
        assert_eq!(marker.id, "2024-02-01-99");
        assert_eq!(marker.title, "gym");
        assert_eq!(marker.display, DisplayMode::Auto);
        assert!(marker.completed);
        assert_eq!(marker.tag, EventTag::Task { date: key("2024-02-01"), task_id: 99 });
    }

    #[test]
    fn test_event_tag_parse_round_trip() {
        let tag = EventTag::Task { date: key("2024-12-31"), task_id: 1704412800000 };
        assert_eq!(EventTag::parse(&tag.to_string()), Some(tag));
        assert_eq!(EventTag::parse("2024-12-31-completed"), None);
        assert_eq!(EventTag::parse("2024-12-31"), None);
        assert_eq!(EventTag::parse("short"), None);
    }

    #[test]
    fn test_date_click_only_opens_today_or_later() {
        let today = key("2024-06-15");
        assert_eq!(on_date_click(key("2024-06-14"), today), None);
        assert_eq!(on_date_click(today, today), Some(today));
        assert_eq!(on_date_click(key("2024-07-01"), today), Some(key("2024-07-01")));
    }

    #[test]
    fn test_event_click_preselects_task() {
        let mut days = DailyTasks::new();
        days.insert(key("2024-03-03"), DayRecord::with_tasks(vec![task(5, "x", true)]));
        let events = project(&days);
        let task_marker = events.iter().find(|e| !e.is_background()).unwrap();
        let day_marker = events.iter().find(|e| e.is_background()).unwrap();
        assert_eq!(on_event_click(task_marker), Selection { date: key("2024-03-03"), task_id: Some(5) });
        assert_eq!(on_event_click(day_marker), Selection { date: key("2024-03-03"), task_id: None });
    }

    #[test]
    fn test_visible_range_focus_only_for_day_view() {
        let d = key("2024-03-03");
        assert_eq!(on_visible_range_change(CalendarView::Day, d).focus, Some(d));
        assert_eq!(on_visible_range_change(CalendarView::Month, d).focus, None);
        assert_eq!(on_visible_range_change(CalendarView::Week, d).focus, None);
    }

    #[test]
    fn test_month_grid_layout() {
        // February 2024 starts on a Thursday and has 29 days.
        let grid = month_grid(2024, 2);
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0][3], Some(key("2024-02-01")));
        assert_eq!(grid[0][2], None);
        assert_eq!(grid[4][3], Some(key("2024-02-29")));
        let cells = grid.iter().flatten().filter(|c| c.is_some()).count();
        assert_eq!(cells, 29);
        assert!(month_grid(2024, 13).is_empty());
    }

    #[test]
    fn test_week_of() {
        let week = week_of(key("2024-01-03"));
        assert_eq!(week[0], key("2024-01-01"));
        assert_eq!(week[6], key("2024-01-07"));
    }
}
