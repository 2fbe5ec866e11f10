//! Enumerations for user-facing settings and calendar views.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Notification sound choice. Only the selection is stored; nothing is synthesized.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Sound {
    #[default]
    Bell,
    Chime,
    Digital,
    Nature,
    None,
}

impl Sound {
    pub const ALL: [Sound; 5] = [Sound::Bell, Sound::Chime, Sound::Digital, Sound::Nature, Sound::None];
}

/// Subscription plan.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Plan {
    #[default]
    Free,
    Plus,
    Pro,
}

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::Free, Plan::Plus, Plan::Pro];
}

/// Calendar layout.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
}

impl CalendarView {
    /// Cycle Month -> Week -> Day -> Month.
    pub fn next(self) -> Self {
        match self {
            CalendarView::Month => CalendarView::Week,
            CalendarView::Week => CalendarView::Day,
            CalendarView::Day => CalendarView::Month,
        }
    }
}

/// Format a sound for display.
pub fn format_sound(s: Sound) -> &'static str {
    match s {
        Sound::Bell => "Bell",
        Sound::Chime => "Chime",
        Sound::Digital => "Digital",
        Sound::Nature => "Nature",
        Sound::None => "None",
    }
}

/// Format a plan for display.
pub fn format_plan(p: Plan) -> &'static str {
    match p {
        Plan::Free => "Free",
        Plan::Plus => "Plus",
        Plan::Pro => "Pro",
    }
}

/// Format a calendar view for display.
pub fn format_view(v: CalendarView) -> &'static str {
    match v {
        CalendarView::Month => "Month",
        CalendarView::Week => "Week",
        CalendarView::Day => "Day",
    }
}
