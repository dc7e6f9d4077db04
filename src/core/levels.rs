//! Level table and XP lookups.
//!
//! The table is an ordered schedule of experience thresholds. Level is
//! always derived from cumulative experience; nothing here mutates state.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::core::cosmetics::{Accessory, Environment};
use crate::error::{GatorError, Result};

/// Cosmetics granted when a level is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Unlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessory: Option<Accessory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
}

impl Unlock {
    pub const fn accessory(accessory: Accessory) -> Self {
        Self {
            accessory: Some(accessory),
            environment: None,
        }
    }

    pub const fn environment(environment: Environment) -> Self {
        Self {
            accessory: None,
            environment: Some(environment),
        }
    }

    /// True when the payload grants nothing.
    pub fn is_empty(&self) -> bool {
        self.accessory.is_none() && self.environment.is_none()
    }
}

/// One row of the level schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelThreshold {
    pub level: u32,
    pub experience_required: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock: Option<Unlock>,
}

impl LevelThreshold {
    pub const fn new(level: u32, experience_required: u32) -> Self {
        Self {
            level,
            experience_required,
            unlock: None,
        }
    }

    pub const fn with_unlock(mut self, unlock: Unlock) -> Self {
        self.unlock = Some(unlock);
        self
    }
}

const fn at(level: u32, xp: u32) -> LevelThreshold {
    LevelThreshold::new(level, xp)
}

/// The product's level schedule.
pub static STANDARD_LEVELS: &[LevelThreshold] = &[
    at(1, 0),
    at(2, 100),
    at(3, 250).with_unlock(Unlock::accessory(Accessory::Bow)),
    at(4, 450),
    at(5, 700).with_unlock(Unlock::environment(Environment::Garden)),
    at(6, 1000).with_unlock(Unlock::accessory(Accessory::Hat)),
    at(7, 1350),
    at(8, 1750).with_unlock(Unlock::accessory(Accessory::Glasses)),
    at(9, 2200),
    at(10, 2700).with_unlock(Unlock::environment(Environment::Beach)),
    at(11, 3250).with_unlock(Unlock::accessory(Accessory::Scarf)),
    at(12, 3850),
    at(13, 4500).with_unlock(Unlock::accessory(Accessory::Flower)),
    at(14, 5200),
    at(15, 6000).with_unlock(Unlock::environment(Environment::Forest)),
    at(16, 6850).with_unlock(Unlock::accessory(Accessory::Headphones)),
    at(17, 7750),
    at(18, 8700),
    at(19, 9700).with_unlock(Unlock::environment(Environment::CozyRoom)),
    at(20, 10800).with_unlock(Unlock::accessory(Accessory::Crown)),
    at(21, 12000),
    at(22, 13300),
    at(23, 14700),
    at(24, 16200),
    at(25, 17800).with_unlock(Unlock::environment(Environment::StarryNight)),
];

/// Where a given experience total sits inside its level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// Experience earned since the level's threshold.
    pub into_level: u32,
    /// Experience between this level's threshold and the next one.
    pub needed_for_level: u32,
    /// `into_level / needed_for_level`, clamped to `[0, 1]`.
    pub fraction: f64,
}

/// Validated, ordered level schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTable {
    thresholds: Vec<LevelThreshold>,
}

impl LevelTable {
    /// Build a table, checking that levels start at 1 with 0 XP and that
    /// both level and XP strictly increase row to row.
    pub fn new(thresholds: Vec<LevelThreshold>) -> Result<Self> {
        let first = thresholds
            .first()
            .ok_or_else(|| GatorError::invalid_table("table is empty"))?;

        if first.level != 1 || first.experience_required != 0 {
            return Err(GatorError::invalid_table(format!(
                "first entry must be level 1 at 0 XP, got level {} at {} XP",
                first.level, first.experience_required
            )));
        }

        for pair in thresholds.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.level != prev.level + 1 {
                return Err(GatorError::invalid_table(format!(
                    "level {} follows level {}",
                    next.level, prev.level
                )));
            }
            if next.experience_required <= prev.experience_required {
                return Err(GatorError::invalid_table(format!(
                    "level {} requires {} XP, not more than level {} ({} XP)",
                    next.level, next.experience_required, prev.level, prev.experience_required
                )));
            }
        }

        Ok(Self { thresholds })
    }

    /// The shared standard table.
    pub fn standard() -> &'static LevelTable {
        static TABLE: OnceLock<LevelTable> = OnceLock::new();
        TABLE.get_or_init(|| Self {
            thresholds: STANDARD_LEVELS.to_vec(),
        })
    }

    pub fn thresholds(&self) -> &[LevelThreshold] {
        &self.thresholds
    }

    /// Highest defined level.
    pub fn max_level(&self) -> u32 {
        self.thresholds.last().map(|t| t.level).unwrap_or(1)
    }

    pub fn is_max_level(&self, level: u32) -> bool {
        level >= self.max_level()
    }

    fn entry(&self, level: u32) -> Option<&LevelThreshold> {
        self.thresholds.iter().find(|t| t.level == level)
    }

    /// Highest level whose threshold is at or below `xp`.
    pub fn level_for_experience(&self, xp: u32) -> u32 {
        self.thresholds
            .iter()
            .rev()
            .find(|t| xp >= t.experience_required)
            .map(|t| t.level)
            .unwrap_or(1)
    }

    /// Threshold of `level`, or 0 when the level is not in the table.
    pub fn experience_for_level(&self, level: u32) -> u32 {
        self.entry(level).map(|t| t.experience_required).unwrap_or(0)
    }

    /// Threshold of the level after `level`. Plateaus at the last entry.
    pub fn experience_for_next_level(&self, level: u32) -> u32 {
        match self.entry(level.saturating_add(1)) {
            Some(next) => next.experience_required,
            None => self
                .thresholds
                .last()
                .map(|t| t.experience_required)
                .unwrap_or(0),
        }
    }

    /// Progress of `xp` measured against a fixed `level`.
    ///
    /// `fraction` is 0 at the level's own threshold and 1 at (or past) the
    /// next level's threshold.
    pub fn progress_at_level(&self, level: u32, xp: u32) -> LevelProgress {
        let current = self.experience_for_level(level);
        let next = self.experience_for_next_level(level);

        let into_level = xp.saturating_sub(current);
        let needed_for_level = next.saturating_sub(current);
        let fraction = if needed_for_level == 0 {
            1.0
        } else {
            (into_level as f64 / needed_for_level as f64).clamp(0.0, 1.0)
        };

        LevelProgress {
            into_level,
            needed_for_level,
            fraction,
        }
    }

    /// Progress of `xp` within the level it has reached.
    pub fn progress_within_level(&self, xp: u32) -> LevelProgress {
        self.progress_at_level(self.level_for_experience(xp), xp)
    }

    /// Unlock payload attached to exactly `level`, if any.
    pub fn unlocks_for_level(&self, level: u32) -> Option<Unlock> {
        self.entry(level).and_then(|t| t.unlock)
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::standard().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_table() -> LevelTable {
        LevelTable::new(vec![
            at(1, 0),
            at(2, 100),
            at(3, 250).with_unlock(Unlock::accessory(Accessory::Bow)),
        ])
        .unwrap()
    }

    #[test]
    fn test_standard_table_is_valid() {
        let table = LevelTable::new(STANDARD_LEVELS.to_vec()).unwrap();
        assert_eq!(table.max_level(), 25);
        assert_eq!(&table, LevelTable::standard());
    }

    #[test]
    fn test_level_for_experience() {
        let table = LevelTable::standard();
        assert_eq!(table.level_for_experience(0), 1);
        assert_eq!(table.level_for_experience(99), 1);
        assert_eq!(table.level_for_experience(100), 2);
        assert_eq!(table.level_for_experience(249), 2);
        assert_eq!(table.level_for_experience(250), 3);
        assert_eq!(table.level_for_experience(17800), 25);
        assert_eq!(table.level_for_experience(u32::MAX), 25);
    }

    #[test]
    fn test_experience_for_level() {
        let table = LevelTable::standard();
        assert_eq!(table.experience_for_level(1), 0);
        assert_eq!(table.experience_for_level(6), 1000);
        assert_eq!(table.experience_for_level(0), 0);
        assert_eq!(table.experience_for_level(99), 0);
    }

    #[test]
    fn test_experience_for_next_level_plateaus() {
        let table = LevelTable::standard();
        assert_eq!(table.experience_for_next_level(1), 100);
        assert_eq!(table.experience_for_next_level(24), 17800);
        assert_eq!(table.experience_for_next_level(25), 17800);
    }

    #[test]
    fn test_progress_within_level() {
        let table = small_table();
        let progress = table.progress_within_level(175);
        assert_eq!(progress.into_level, 75);
        assert_eq!(progress.needed_for_level, 150);
        assert!((progress.fraction - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_is_zero_at_lower_threshold() {
        let table = LevelTable::standard();
        for t in table.thresholds().iter().filter(|t| !table.is_max_level(t.level)) {
            let progress = table.progress_within_level(t.experience_required);
            assert_eq!(progress.into_level, 0);
            assert_eq!(progress.fraction, 0.0);
        }
    }

    #[test]
    fn test_progress_is_one_at_upper_threshold() {
        let table = LevelTable::standard();
        let progress = table.progress_at_level(2, 250);
        assert_eq!(progress.fraction, 1.0);
        let progress = table.progress_at_level(2, 100);
        assert_eq!(progress.fraction, 0.0);
    }

    #[test]
    fn test_progress_at_max_level_is_full() {
        let table = small_table();
        let progress = table.progress_within_level(10_000);
        assert_eq!(progress.needed_for_level, 0);
        assert_eq!(progress.fraction, 1.0);
    }

    #[test]
    fn test_unlocks_for_level() {
        let table = LevelTable::standard();
        assert_eq!(
            table.unlocks_for_level(3),
            Some(Unlock::accessory(Accessory::Bow))
        );
        assert_eq!(
            table.unlocks_for_level(5),
            Some(Unlock::environment(Environment::Garden))
        );
        assert_eq!(table.unlocks_for_level(4), None);
        assert_eq!(table.unlocks_for_level(0), None);
        assert_eq!(table.unlocks_for_level(400), None);
    }

    #[test]
    fn test_rejects_empty_table() {
        assert!(LevelTable::new(Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_bad_first_entry() {
        assert!(LevelTable::new(vec![at(1, 10)]).is_err());
        assert!(LevelTable::new(vec![at(2, 0)]).is_err());
    }

    #[test]
    fn test_rejects_non_increasing_rows() {
        assert!(LevelTable::new(vec![at(1, 0), at(2, 0)]).is_err());
        assert!(LevelTable::new(vec![at(1, 0), at(3, 100)]).is_err());
        assert!(LevelTable::new(vec![at(1, 0), at(2, 100), at(3, 50)]).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Property: level never decreases as experience grows
            #[test]
            fn prop_level_is_monotonic(a in 0u32..30_000, b in 0u32..30_000) {
                let table = LevelTable::standard();
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(table.level_for_experience(lo) <= table.level_for_experience(hi));
            }

            // Property: fraction always stays within [0, 1]
            #[test]
            fn prop_fraction_in_range(xp in 0u32..30_000) {
                let progress = LevelTable::standard().progress_within_level(xp);
                prop_assert!((0.0..=1.0).contains(&progress.fraction));
            }

            // Property: reached level's threshold is never above the experience
            #[test]
            fn prop_threshold_not_above_xp(xp in 0u32..30_000) {
                let table = LevelTable::standard();
                let level = table.level_for_experience(xp);
                prop_assert!(table.experience_for_level(level) <= xp);
            }
        }
    }
}
