//! Reward tree derived from the current streak.

pub const TIER_COUNT: u32 = 10;
pub const DEFAULT_INTERVAL: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardTier {
    pub level: u32,
    pub streak_required: u32,
    pub unlocked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    Start,
    Climbing { remaining: u32 },
    Summit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RewardTree {
    pub streak: u32,
    pub interval: u32,
    pub unlocked: u32,
    pub tiers: Vec<RewardTier>,
}

impl RewardTree {
    /// One gift every `interval` streak days, ten gifts in total.
    pub fn from_streak(streak: u32, interval: u32) -> Self {
        let interval = interval.max(1);
        let unlocked = (streak / interval).min(TIER_COUNT);
        let tiers = (1..=TIER_COUNT)
            .map(|level| RewardTier {
                level,
                streak_required: level * interval,
                unlocked: unlocked >= level,
            })
            .collect();
        RewardTree { streak, interval, unlocked, tiers }
    }

    /// Progress toward the next gift, `0.0..100.0`.
    pub fn progress_percent(&self) -> f64 {
        (self.streak % self.interval) as f64 / self.interval as f64 * 100.0
    }

    pub fn days_to_next(&self) -> u32 {
        self.interval - self.streak % self.interval
    }

    pub fn milestone(&self) -> Milestone {
        match self.unlocked {
            0 => Milestone::Start,
            n if n >= TIER_COUNT => Milestone::Summit,
            n => Milestone::Climbing { remaining: TIER_COUNT - n },
        }
    }

    pub fn message(&self) -> String {
        match self.milestone() {
            Milestone::Start => format!(
                "Start your climb! Complete {} days in a row to unlock the first gift.",
                self.interval
            ),
            Milestone::Climbing { remaining } => {
                format!("Going strong! {remaining} more gifts to reach the top.")
            }
            Milestone::Summit => "Congratulations! You reached the top of the tree.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_streak() {
        let tree = RewardTree::from_streak(0, DEFAULT_INTERVAL);
        assert_eq!(tree.unlocked, 0);
        assert_eq!(tree.days_to_next(), 10);
        assert_eq!(tree.progress_percent(), 0.0);
        assert_eq!(tree.milestone(), Milestone::Start);
        assert!(tree.tiers.iter().all(|t| !t.unlocked));
    }

    #[test]
    fn test_partial_progress() {
        let tree = RewardTree::from_streak(23, DEFAULT_INTERVAL);
        assert_eq!(tree.unlocked, 2);
        assert_eq!(tree.days_to_next(), 7);
        assert!((tree.progress_percent() - 30.0).abs() < f64::EPSILON);
        assert_eq!(tree.milestone(), Milestone::Climbing { remaining: 8 });
        assert!(tree.tiers[1].unlocked);
        assert!(!tree.tiers[2].unlocked);
        assert_eq!(tree.tiers[2].streak_required, 30);
    }

    #[test]
    fn test_summit_caps_unlocks() {
        let tree = RewardTree::from_streak(250, DEFAULT_INTERVAL);
        assert_eq!(tree.unlocked, TIER_COUNT);
        assert_eq!(tree.milestone(), Milestone::Summit);
    }

    #[test]
    fn test_custom_interval() {
        let tree = RewardTree::from_streak(9, 3);
        assert_eq!(tree.unlocked, 3);
        assert_eq!(tree.tiers[0].streak_required, 3);
        // A zero interval is treated as one day per gift.
        assert_eq!(RewardTree::from_streak(4, 0).unlocked, 4);
    }
}
