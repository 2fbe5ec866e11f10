//! Canonical local-day keys.
//!
//! A [`DateKey`] identifies one calendar day in the observer's local time zone and always
//! renders as `YYYY-MM-DD`. It never goes through UTC, so the same wall-clock day yields
//! the same key whatever the time of day or the offset of the zone it was observed in.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, VestigiumError};

const FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        DateKey(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(DateKey)
    }

    /// Today's key according to the system's local zone.
    pub fn today() -> Self {
        Self::from_local(&Local::now())
    }

    /// Key for the calendar day `instant` falls on in its own zone.
    pub fn from_local<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        DateKey(instant.date_naive())
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    /// The previous calendar day, `None` only at the lower bound of the calendar.
    pub fn pred(self) -> Option<Self> {
        self.0.checked_sub_days(Days::new(1)).map(DateKey)
    }

    /// The next calendar day, `None` only at the upper bound of the calendar.
    pub fn succ(self) -> Option<Self> {
        self.0.checked_add_days(Days::new(1)).map(DateKey)
    }

    pub fn add_days(self, days: i64) -> Option<Self> {
        if days >= 0 {
            self.0.checked_add_days(Days::new(days as u64)).map(DateKey)
        } else {
            self.0
                .checked_sub_days(Days::new(days.unsigned_abs()))
                .map(DateKey)
        }
    }

    /// First day of the month this key falls in.
    pub fn first_of_month(self) -> Self {
        DateKey(self.0.with_day(1).unwrap_or(self.0))
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = VestigiumError;

    /// Accepts only the canonical zero-padded form.
    fn from_str(s: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(s, FORMAT)
            .map_err(|_| VestigiumError::InvalidDateKey(s.to_string()))?;
        let key = DateKey(date);
        if key.to_string() != s {
            return Err(VestigiumError::InvalidDateKey(s.to_string()));
        }
        Ok(key)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Parse human-friendly day input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - weekday names ("monday", "fri", "next tuesday")
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD"
pub fn parse_day_input(s: &str, today: DateKey) -> Result<DateKey> {
    let input = s.trim().to_lowercase();
    let invalid = || VestigiumError::InvalidDateKey(s.to_string());

    match input.as_str() {
        "today" => return Ok(today),
        "tomorrow" => return today.succ().ok_or_else(invalid),
        "yesterday" => return today.pred().ok_or_else(invalid),
        _ => {}
    }

    if let Some(rest) = input.strip_prefix("in ") {
        let rest = rest.trim();
        if let Some(n) = rest.strip_suffix('d') {
            if let Ok(days) = n.trim().parse::<i64>() {
                return today.add_days(days).ok_or_else(invalid);
            }
        }
        if let Some(n) = rest.strip_suffix('w') {
            if let Ok(weeks) = n.trim().parse::<i64>() {
                return weeks
                    .checked_mul(7)
                    .and_then(|days| today.add_days(days))
                    .ok_or_else(invalid);
            }
        }
        return Err(invalid());
    }

    let weekdays = [
        ("monday", Weekday::Mon), ("tuesday", Weekday::Tue), ("wednesday", Weekday::Wed),
        ("thursday", Weekday::Thu), ("friday", Weekday::Fri), ("saturday", Weekday::Sat),
        ("sunday", Weekday::Sun),
        ("mon", Weekday::Mon), ("tue", Weekday::Tue), ("wed", Weekday::Wed),
        ("thu", Weekday::Thu), ("fri", Weekday::Fri), ("sat", Weekday::Sat),
        ("sun", Weekday::Sun),
    ];

    for (name, target) in weekdays {
        let current = today.weekday().num_days_from_monday() as i64;
        let ahead = (target.num_days_from_monday() as i64 + 7 - current) % 7;
        if input == name {
            return today.add_days(ahead).ok_or_else(invalid);
        }
        if input == format!("next {name}") {
            let days = if ahead == 0 { 7 } else { ahead + 7 };
            return today.add_days(days).ok_or_else(invalid);
        }
    }

    input.parse()
}

/// Parse a `YYYY-MM` month into the key of its first day.
pub fn parse_month(s: &str) -> Result<DateKey> {
    let invalid = || VestigiumError::InvalidMonth(s.to_string());
    let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
    if month.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    DateKey::from_ymd(year, month, 1).ok_or_else(invalid)
}
