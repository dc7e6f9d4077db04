//! Habit definitions and the seed catalogue.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GatorError, Result};

/// Habit grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitCategory {
    Hydration,
    Movement,
    Mindfulness,
    Social,
    Rest,
    Creativity,
}

impl HabitCategory {
    pub fn all() -> &'static [HabitCategory] {
        &[
            Self::Hydration,
            Self::Movement,
            Self::Mindfulness,
            Self::Social,
            Self::Rest,
            Self::Creativity,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hydration => "hydration",
            Self::Movement => "movement",
            Self::Mindfulness => "mindfulness",
            Self::Social => "social",
            Self::Rest => "rest",
            Self::Creativity => "creativity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hydration => "Hydration",
            Self::Movement => "Movement",
            Self::Mindfulness => "Mindfulness",
            Self::Social => "Social",
            Self::Rest => "Rest",
            Self::Creativity => "Creativity",
        }
    }
}

impl fmt::Display for HabitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitCategory {
    type Err = GatorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| GatorError::invalid_input(format!("unknown habit category '{}'", s)))
    }
}

/// A trackable habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub category: HabitCategory,
    pub experience_reward: u32,
    pub is_default: bool,
    pub is_active: bool,
}

/// A habit before it has been assigned an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHabit {
    pub name: String,
    pub icon: String,
    pub category: HabitCategory,
    pub experience_reward: u32,
    pub is_default: bool,
    pub is_active: bool,
}

impl NewHabit {
    /// A user-created habit, active by default.
    pub fn custom(
        name: impl Into<String>,
        icon: impl Into<String>,
        category: HabitCategory,
        experience_reward: u32,
    ) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            category,
            experience_reward,
            is_default: false,
            is_active: true,
        }
    }

    /// Check the fields a user can get wrong.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(GatorError::invalid_input("habit name cannot be empty"));
        }
        if self.experience_reward == 0 {
            return Err(GatorError::invalid_input(
                "habit experience reward must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Attach an id.
    pub fn into_habit(self, id: impl Into<String>) -> Habit {
        Habit {
            id: id.into(),
            name: self.name.trim().to_string(),
            icon: self.icon,
            category: self.category,
            experience_reward: self.experience_reward,
            is_default: self.is_default,
            is_active: self.is_active,
        }
    }
}

fn seed(
    name: &str,
    icon: &str,
    category: HabitCategory,
    experience_reward: u32,
    is_active: bool,
) -> NewHabit {
    NewHabit {
        name: name.to_string(),
        icon: icon.to_string(),
        category,
        experience_reward,
        is_default: true,
        is_active,
    }
}

/// The built-in habits, with ids `default-<index>`.
pub fn default_habits() -> Vec<Habit> {
    use HabitCategory::*;

    [
        seed("Drink water", "💧", Hydration, 10, true),
        seed("Drink herbal tea", "🍵", Hydration, 10, false),
        seed("Take a walk", "🚶", Movement, 20, true),
        seed("Stretch", "🧘", Movement, 15, true),
        seed("Exercise", "💪", Movement, 25, false),
        seed("Dance", "💃", Movement, 20, false),
        seed("Deep breathing", "🌬️", Mindfulness, 15, true),
        seed("Meditate", "🧘‍♀️", Mindfulness, 20, false),
        seed("Mindful moment", "🌸", Mindfulness, 10, false),
        seed("Text a friend", "💬", Social, 15, false),
        seed("Call someone", "📞", Social, 20, false),
        seed("Spend time with loved ones", "❤️", Social, 25, false),
        seed("Take a nap", "😴", Rest, 15, false),
        seed("Go to bed on time", "🌙", Rest, 20, true),
        seed("Screen-free time", "📵", Rest, 15, false),
        seed("Journal", "📝", Creativity, 20, true),
        seed("Draw or doodle", "🎨", Creativity, 15, false),
        seed("Read", "📚", Creativity, 15, false),
        seed("Listen to music", "🎵", Creativity, 10, false),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, habit)| habit.into_habit(format!("default-{}", index)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_habits() {
        let habits = default_habits();
        assert_eq!(habits.len(), 19);
        assert_eq!(habits[0].id, "default-0");
        assert_eq!(habits[0].name, "Drink water");
        assert!(habits.iter().all(|h| h.is_default));
        assert!(habits.iter().all(|h| h.experience_reward > 0));
        assert_eq!(habits.iter().filter(|h| h.is_active).count(), 6);
    }

    #[test]
    fn test_new_habit_validation() {
        let ok = NewHabit::custom("Floss", "🦷", HabitCategory::Rest, 5);
        assert!(ok.validate().is_ok());

        let blank = NewHabit::custom("  ", "🦷", HabitCategory::Rest, 5);
        assert!(blank.validate().is_err());

        let free = NewHabit::custom("Floss", "🦷", HabitCategory::Rest, 0);
        assert!(free.validate().is_err());
    }

    #[test]
    fn test_into_habit_trims_name() {
        let habit = NewHabit::custom(" Floss ", "🦷", HabitCategory::Rest, 5).into_habit("h1");
        assert_eq!(habit.id, "h1");
        assert_eq!(habit.name, "Floss");
        assert!(!habit.is_default);
        assert!(habit.is_active);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            "mindfulness".parse::<HabitCategory>().unwrap(),
            HabitCategory::Mindfulness
        );
        assert!("sleep".parse::<HabitCategory>().is_err());
        assert_eq!(HabitCategory::Social.label(), "Social");
    }
}
