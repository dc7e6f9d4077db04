//! The gator companion and its progression engine.
//!
//! Experience only ever grows. Level is a cached projection of experience
//! through the level table, and level-ups are the only automatic way the
//! unlocked cosmetic sets grow.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::cosmetics::{Accessory, Environment};
use crate::core::levels::{LevelTable, Unlock};
use crate::error::{GatorError, Result};

/// Facial expression shown by the gator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GatorExpression {
    #[default]
    Happy,
    Excited,
    Sleepy,
    Encouraging,
    Neutral,
    Proud,
}

impl GatorExpression {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Excited => "excited",
            Self::Sleepy => "sleepy",
            Self::Encouraging => "encouraging",
            Self::Neutral => "neutral",
            Self::Proud => "proud",
        }
    }
}

/// A single cosmetic granted by progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum UnlockedItem {
    Accessory(Accessory),
    Environment(Environment),
}

/// Outcome of one `add_experience` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceGain {
    /// Experience actually added.
    pub amount: u32,
    pub previous_level: u32,
    pub new_level: u32,
    pub leveled_up: bool,
    /// Cosmetics newly added to the unlocked sets, in level order.
    pub unlocked: Vec<UnlockedItem>,
}

impl ExperienceGain {
    fn none(level: u32) -> Self {
        Self {
            amount: 0,
            previous_level: level,
            new_level: level,
            leveled_up: false,
            unlocked: Vec::new(),
        }
    }
}

/// Progression and cosmetic state of the companion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gator {
    pub name: String,
    pub level: u32,
    pub experience: u32,
    #[serde(default)]
    pub expression: GatorExpression,
    pub accessory: Accessory,
    pub environment: Environment,
    pub unlocked_accessories: BTreeSet<Accessory>,
    pub unlocked_environments: BTreeSet<Environment>,
}

impl Default for Gator {
    fn default() -> Self {
        Self {
            name: "Gator".to_string(),
            level: 1,
            experience: 0,
            expression: GatorExpression::Happy,
            accessory: Accessory::None,
            environment: Environment::Pond,
            unlocked_accessories: BTreeSet::from([Accessory::None]),
            unlocked_environments: BTreeSet::from([Environment::Pond]),
        }
    }
}

impl Gator {
    /// Create a fresh gator with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add experience, recompute level and grant every unlock between the
    /// old and new level (inclusive of the new one).
    pub fn add_experience(&mut self, table: &LevelTable, amount: u32) -> ExperienceGain {
        if amount == 0 {
            return ExperienceGain::none(self.level);
        }

        let previous_level = self.level;
        let previous_experience = self.experience;
        let new_experience = previous_experience.saturating_add(amount);
        let new_level = table.level_for_experience(new_experience);

        let mut unlocked = Vec::new();
        if new_level > previous_level {
            for level in (previous_level + 1)..=new_level {
                if let Some(unlock) = table.unlocks_for_level(level) {
                    unlocked.extend(self.grant(unlock));
                }
            }
        }

        let leveled_up = new_level > previous_level;
        self.experience = new_experience;
        self.level = new_level;
        if leveled_up {
            self.expression = GatorExpression::Excited;
            tracing::info!(
                from = previous_level,
                to = new_level,
                unlocked = unlocked.len(),
                "gator leveled up"
            );
        }

        ExperienceGain {
            amount: new_experience - previous_experience,
            previous_level,
            new_level,
            leveled_up,
            unlocked,
        }
    }

    /// Merge an unlock payload into the unlocked sets. Returns what was new.
    fn grant(&mut self, unlock: Unlock) -> Vec<UnlockedItem> {
        let mut granted = Vec::new();
        if let Some(accessory) = unlock.accessory {
            if self.unlocked_accessories.insert(accessory) {
                granted.push(UnlockedItem::Accessory(accessory));
            }
        }
        if let Some(environment) = unlock.environment {
            if self.unlocked_environments.insert(environment) {
                granted.push(UnlockedItem::Environment(environment));
            }
        }
        granted
    }

    /// Wear an accessory. Fails when it has not been unlocked.
    pub fn select_accessory(&mut self, accessory: Accessory) -> Result<()> {
        if !self.unlocked_accessories.contains(&accessory) {
            return Err(GatorError::not_unlocked("accessory", accessory.as_str()));
        }
        self.accessory = accessory;
        Ok(())
    }

    /// Move to an environment. Fails when it has not been unlocked.
    pub fn select_environment(&mut self, environment: Environment) -> Result<()> {
        if !self.unlocked_environments.contains(&environment) {
            return Err(GatorError::not_unlocked(
                "environment",
                environment.as_str(),
            ));
        }
        self.environment = environment;
        Ok(())
    }

    /// Manually unlock an accessory. Returns true if it was newly added.
    pub fn unlock_accessory(&mut self, accessory: Accessory) -> bool {
        self.unlocked_accessories.insert(accessory)
    }

    /// Manually unlock an environment. Returns true if it was newly added.
    pub fn unlock_environment(&mut self, environment: Environment) -> bool {
        self.unlocked_environments.insert(environment)
    }

    /// Rename the gator. Surrounding whitespace is dropped.
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(GatorError::invalid_input("gator name cannot be empty"));
        }
        self.name = trimmed.to_string();
        Ok(())
    }

    /// Restore invariants on a snapshot read from storage: sentinels present,
    /// level derived from experience, reached unlocks owned, selections
    /// unlocked.
    pub fn normalize(&mut self, table: &LevelTable) {
        self.unlocked_accessories.insert(Accessory::None);
        self.unlocked_environments.insert(Environment::Pond);

        let level = table.level_for_experience(self.experience);
        if level != self.level {
            tracing::warn!(
                stored = self.level,
                derived = level,
                "stored level disagrees with experience, using derived level"
            );
            self.level = level;
        }
        for reached in 1..=level {
            if let Some(unlock) = table.unlocks_for_level(reached) {
                self.grant(unlock);
            }
        }

        if !self.unlocked_accessories.contains(&self.accessory) {
            self.accessory = Accessory::None;
        }
        if !self.unlocked_environments.contains(&self.environment) {
            self.environment = Environment::Pond;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::levels::{LevelThreshold, STANDARD_LEVELS};

    fn example_table() -> LevelTable {
        LevelTable::new(vec![
            LevelThreshold::new(1, 0),
            LevelThreshold::new(2, 100),
            LevelThreshold::new(3, 250).with_unlock(Unlock::accessory(Accessory::Bow)),
        ])
        .unwrap()
    }

    #[test]
    fn test_default_gator() {
        let gator = Gator::default();
        assert_eq!(gator.level, 1);
        assert_eq!(gator.experience, 0);
        assert!(gator.unlocked_accessories.contains(&Accessory::None));
        assert!(gator.unlocked_environments.contains(&Environment::Pond));
    }

    #[test]
    fn test_add_experience_example() {
        let table = example_table();
        let mut gator = Gator::default();

        let gain = gator.add_experience(&table, 260);

        assert_eq!(gator.experience, 260);
        assert_eq!(gator.level, 3);
        assert!(gator.unlocked_accessories.contains(&Accessory::Bow));
        assert!(gain.leveled_up);
        assert_eq!(gain.previous_level, 1);
        assert_eq!(gain.new_level, 3);
        assert_eq!(gain.unlocked, vec![UnlockedItem::Accessory(Accessory::Bow)]);
        assert_eq!(gator.expression, GatorExpression::Excited);
    }

    #[test]
    fn test_add_experience_without_level_up() {
        let mut gator = Gator::default();
        let gain = gator.add_experience(LevelTable::standard(), 50);

        assert_eq!(gator.experience, 50);
        assert_eq!(gator.level, 1);
        assert!(!gain.leveled_up);
        assert!(gain.unlocked.is_empty());
        assert_eq!(gator.expression, GatorExpression::Happy);
    }

    #[test]
    fn test_zero_experience_is_noop() {
        let mut gator = Gator::default();
        let before = gator.clone();
        let gain = gator.add_experience(LevelTable::standard(), 0);
        assert_eq!(gain.amount, 0);
        assert_eq!(gator, before);
    }

    #[test]
    fn test_multi_level_jump_grants_all_intermediate_unlocks() {
        let table = LevelTable::standard();
        let mut gator = Gator::default();
        gator.add_experience(table, 100);
        assert_eq!(gator.level, 2);

        // 100 -> 1000 jumps from level 2 to level 6
        let gain = gator.add_experience(table, 900);

        assert_eq!(gator.level, 6);
        assert_eq!(
            gain.unlocked,
            vec![
                UnlockedItem::Accessory(Accessory::Bow),
                UnlockedItem::Environment(Environment::Garden),
                UnlockedItem::Accessory(Accessory::Hat),
            ]
        );
        assert!(gator.unlocked_accessories.contains(&Accessory::Bow));
        assert!(gator.unlocked_accessories.contains(&Accessory::Hat));
        assert!(gator.unlocked_environments.contains(&Environment::Garden));
    }

    #[test]
    fn test_unlock_already_owned_is_not_reported() {
        let table = example_table();
        let mut gator = Gator::default();
        gator.unlock_accessory(Accessory::Bow);

        let gain = gator.add_experience(&table, 300);

        assert!(gain.leveled_up);
        assert!(gain.unlocked.is_empty());
        assert_eq!(gator.unlocked_accessories.len(), 2);
    }

    #[test]
    fn test_experience_saturates() {
        let mut gator = Gator::default();
        gator.add_experience(LevelTable::standard(), u32::MAX - 5);
        gator.add_experience(LevelTable::standard(), 100);
        assert_eq!(gator.experience, u32::MAX);
        assert_eq!(gator.level, 25);
    }

    #[test]
    fn test_select_locked_accessory_fails() {
        let mut gator = Gator::default();
        let err = gator.select_accessory(Accessory::Crown).unwrap_err();
        assert!(matches!(err, GatorError::NotUnlocked { .. }));
        assert_eq!(gator.accessory, Accessory::None);
    }

    #[test]
    fn test_select_unlocked_accessory() {
        let mut gator = Gator::default();
        gator.unlock_accessory(Accessory::Crown);
        gator.select_accessory(Accessory::Crown).unwrap();
        assert_eq!(gator.accessory, Accessory::Crown);
    }

    #[test]
    fn test_select_environment() {
        let mut gator = Gator::default();
        assert!(gator.select_environment(Environment::Beach).is_err());
        assert_eq!(gator.environment, Environment::Pond);

        assert!(gator.unlock_environment(Environment::Beach));
        assert!(!gator.unlock_environment(Environment::Beach));
        gator.select_environment(Environment::Beach).unwrap();
        assert_eq!(gator.environment, Environment::Beach);
    }

    #[test]
    fn test_set_name() {
        let mut gator = Gator::default();
        gator.set_name("  Chomp ").unwrap();
        assert_eq!(gator.name, "Chomp");
        assert!(gator.set_name("   ").is_err());
        assert_eq!(gator.name, "Chomp");
    }

    #[test]
    fn test_normalize_repairs_snapshot() {
        let mut gator = Gator {
            level: 9,
            experience: 260,
            accessory: Accessory::Crown,
            unlocked_accessories: BTreeSet::new(),
            unlocked_environments: BTreeSet::new(),
            ..Gator::default()
        };

        gator.normalize(LevelTable::standard());

        assert_eq!(gator.level, 3);
        assert!(gator.unlocked_accessories.contains(&Accessory::Bow));
        assert_eq!(gator.accessory, Accessory::None);
        assert!(gator.unlocked_accessories.contains(&Accessory::None));
        assert!(gator.unlocked_environments.contains(&Environment::Pond));
    }

    #[test]
    fn test_serde_uses_snake_case_ids() {
        let mut gator = Gator::default();
        gator.unlock_environment(Environment::CozyRoom);
        let json = serde_json::to_string(&gator).unwrap();
        assert!(json.contains("\"cozy_room\""));
        let back: Gator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, gator);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn unlock_count(level: u32) -> usize {
            STANDARD_LEVELS
                .iter()
                .filter(|t| t.level <= level)
                .filter_map(|t| t.unlock)
                .map(|u| usize::from(u.accessory.is_some()) + usize::from(u.environment.is_some()))
                .sum()
        }

        proptest! {
            // Property: two grants land in the same place as one combined grant
            #[test]
            fn prop_add_experience_is_associative(a in 1u32..10_000, b in 1u32..10_000) {
                let table = LevelTable::standard();

                let mut split = Gator::default();
                split.add_experience(table, a);
                split.add_experience(table, b);

                let mut combined = Gator::default();
                combined.add_experience(table, a + b);

                prop_assert_eq!(split.experience, combined.experience);
                prop_assert_eq!(split.level, combined.level);
                prop_assert_eq!(&split.unlocked_accessories, &combined.unlocked_accessories);
                prop_assert_eq!(&split.unlocked_environments, &combined.unlocked_environments);
            }

            // Property: level is always the projection of experience
            #[test]
            fn prop_level_tracks_experience(grants in prop::collection::vec(1u32..3_000, 1..20)) {
                let table = LevelTable::standard();
                let mut gator = Gator::default();
                for amount in grants {
                    gator.add_experience(table, amount);
                    prop_assert_eq!(gator.level, table.level_for_experience(gator.experience));
                }
            }

            // Property: every unlock at or below the reached level is owned
            #[test]
            fn prop_unlocks_complete(xp in 1u32..20_000) {
                let table = LevelTable::standard();
                let mut gator = Gator::default();
                gator.add_experience(table, xp);

                let owned = gator.unlocked_accessories.len() - 1
                    + gator.unlocked_environments.len() - 1;
                prop_assert_eq!(owned, unlock_count(gator.level));
            }
        }
    }
}
