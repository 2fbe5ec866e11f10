//! Streak calculation over the daily task map.
//!
//! Streaks are derived on every read and never stored. The walk goes backward one
//! calendar day at a time, so it does not depend on map ordering and a missing day is
//! simply an incomplete one.

use crate::date_key::DateKey;
use crate::vault::DailyTasks;

fn completed(days: &DailyTasks, date: DateKey) -> bool {
    days.get(&date).is_some_and(|d| d.is_completed)
}

/// Consecutive completed days ending today, or ending yesterday while today is still open.
pub fn current_streak(days: &DailyTasks, today: DateKey) -> u32 {
    if !days.values().any(|d| d.is_completed) {
        return 0;
    }

    let mut cursor = if completed(days, today) {
        today
    } else {
        match today.pred() {
            Some(yesterday) if completed(days, yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 1;
    while let Some(prev) = cursor.pred() {
        if !completed(days, prev) {
            break;
        }
        streak += 1;
        cursor = prev;
    }
    streak
}

/// Longest run of consecutive completed days anywhere in the history.
pub fn longest_streak(days: &DailyTasks) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<DateKey> = None;

    // BTreeMap iterates in date order.
    for (&date, _) in days.iter().filter(|(_, d)| d.is_completed) {
        run = match previous {
            Some(p) if p.succ() == Some(date) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(date);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::DayRecord;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn days(completed: &[&str], open: &[&str]) -> DailyTasks {
        let mut map = DailyTasks::new();
        for d in completed {
            map.insert(key(d), DayRecord { tasks: vec![], is_completed: true });
        }
        for d in open {
            map.insert(key(d), DayRecord { tasks: vec![], is_completed: false });
        }
        map
    }

    #[test]
    fn test_empty_store_has_no_streak() {
        assert_eq!(current_streak(&DailyTasks::new(), key("2024-01-05")), 0);
        assert_eq!(longest_streak(&DailyTasks::new()), 0);
    }

    #[test]
    fn test_yesterday_seeds_streak_when_today_absent() {
        let map = days(&["2024-01-04"], &[]);
        assert_eq!(current_streak(&map, key("2024-01-05")), 1);
    }

    #[test]
    fn test_broken_when_today_and_yesterday_incomplete() {
        let map = days(&["2024-01-02", "2024-01-03"], &["2024-01-04"]);
        assert_eq!(current_streak(&map, key("2024-01-05")), 0);
    }

    #[test]
    fn test_five_consecutive_days() {
        let map = days(
            &["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"],
            &[],
        );
        assert_eq!(current_streak(&map, key("2024-01-05")), 5);
    }

    #[test]
    fn test_gap_stops_the_walk() {
        let map = days(
            &["2024-01-01", "2024-01-02", "2024-01-04", "2024-01-05"],
            &["2024-01-03"],
        );
        assert_eq!(current_streak(&map, key("2024-01-05")), 2);
    }

    #[test]
    fn test_missing_key_is_a_gap() {
        let map = days(&["2024-01-01", "2024-01-02", "2024-01-04", "2024-01-05"], &[]);
        assert_eq!(current_streak(&map, key("2024-01-05")), 2);
    }

    #[test]
    fn test_open_today_keeps_yesterdays_run() {
        let map = days(&["2024-02-27", "2024-02-28", "2024-02-29"], &["2024-03-01"]);
        assert_eq!(current_streak(&map, key("2024-03-01")), 3);
    }

    #[test]
    fn test_future_completions_do_not_count() {
        let map = days(&["2024-01-10"], &[]);
        assert_eq!(current_streak(&map, key("2024-01-05")), 0);
    }

    #[test]
    fn test_longest_streak() {
        let map = days(
            &["2023-12-30", "2023-12-31", "2024-01-01", "2024-01-05", "2024-01-06"],
            &["2024-01-02"],
        );
        assert_eq!(longest_streak(&map), 3);
    }
}
