//! Habit completion ledger.
//!
//! Append-only record of which habit was completed on which calendar day.
//! At most one completion exists per (habit, day), so re-tapping a habit
//! never earns experience twice. The ledger reports the reward; crediting
//! it to the gator is the caller's job.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::habits::Habit;
use crate::util::generate_id;

/// One completion fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitCompletion {
    pub id: String,
    pub habit_id: String,
    pub date: NaiveDate,
    pub completed_at: DateTime<Utc>,
}

/// Result of a `complete` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// The appended fact, or `None` when the habit was already done that day.
    pub completion: Option<HabitCompletion>,
    pub experience_granted: u32,
}

impl CompletionOutcome {
    pub fn is_duplicate(&self) -> bool {
        self.completion.is_none()
    }
}

/// Ordered list of completion facts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionLedger {
    completions: Vec<HabitCompletion>,
}

impl CompletionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `habit` as done on `today`.
    pub fn complete(
        &mut self,
        habit: &Habit,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> CompletionOutcome {
        if self.is_completed_on(&habit.id, today) {
            tracing::debug!(habit_id = %habit.id, %today, "habit already completed today");
            return CompletionOutcome {
                completion: None,
                experience_granted: 0,
            };
        }

        let completion = HabitCompletion {
            id: generate_id("done", now),
            habit_id: habit.id.clone(),
            date: today,
            completed_at: now,
        };
        self.completions.push(completion.clone());

        CompletionOutcome {
            completion: Some(completion),
            experience_granted: habit.experience_reward,
        }
    }

    pub fn is_completed_on(&self, habit_id: &str, date: NaiveDate) -> bool {
        self.completions
            .iter()
            .any(|c| c.habit_id == habit_id && c.date == date)
    }

    /// All completions recorded for `date`, in insertion order.
    pub fn completions_on(&self, date: NaiveDate) -> Vec<&HabitCompletion> {
        self.completions.iter().filter(|c| c.date == date).collect()
    }

    /// Number of days `habit_id` has been completed.
    pub fn count_for_habit(&self, habit_id: &str) -> usize {
        self.completions
            .iter()
            .filter(|c| c.habit_id == habit_id)
            .count()
    }

    /// Distinct days with at least one completion.
    pub fn completion_dates(&self) -> BTreeSet<NaiveDate> {
        self.completions.iter().map(|c| c.date).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HabitCompletion> {
        self.completions.iter()
    }

    pub fn len(&self) -> usize {
        self.completions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completions.is_empty()
    }

    /// Drop duplicate (habit, day) facts from a loaded snapshot, keeping the
    /// earliest. Returns how many were removed.
    pub fn dedup(&mut self) -> usize {
        let before = self.completions.len();
        let mut seen = BTreeSet::new();
        self.completions
            .retain(|c| seen.insert((c.habit_id.clone(), c.date)));
        before - self.completions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::habits::{HabitCategory, NewHabit};

    fn habit(id: &str, reward: u32) -> Habit {
        NewHabit::custom("Test", "✅", HabitCategory::Rest, reward).into_habit(id)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_complete_grants_reward() {
        let mut ledger = CompletionLedger::new();
        let outcome = ledger.complete(&habit("h1", 20), date(1), Utc::now());

        assert_eq!(outcome.experience_granted, 20);
        assert!(!outcome.is_duplicate());
        assert_eq!(ledger.len(), 1);
        assert!(ledger.is_completed_on("h1", date(1)));
    }

    #[test]
    fn test_duplicate_same_day_is_noop() {
        let mut ledger = CompletionLedger::new();
        let h = habit("h1", 20);
        ledger.complete(&h, date(1), Utc::now());

        let again = ledger.complete(&h, date(1), Utc::now());

        assert_eq!(again.experience_granted, 0);
        assert!(again.is_duplicate());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_same_habit_next_day_counts() {
        let mut ledger = CompletionLedger::new();
        let h = habit("h1", 20);
        ledger.complete(&h, date(1), Utc::now());
        let next = ledger.complete(&h, date(2), Utc::now());

        assert_eq!(next.experience_granted, 20);
        assert_eq!(ledger.count_for_habit("h1"), 2);
        assert!(!ledger.is_completed_on("h1", date(3)));
    }

    #[test]
    fn test_completions_on() {
        let mut ledger = CompletionLedger::new();
        ledger.complete(&habit("h1", 10), date(1), Utc::now());
        ledger.complete(&habit("h2", 10), date(1), Utc::now());
        ledger.complete(&habit("h1", 10), date(2), Utc::now());

        let day_one = ledger.completions_on(date(1));
        assert_eq!(day_one.len(), 2);
        assert!(day_one.iter().all(|c| c.date == date(1)));
        assert!(ledger.completions_on(date(9)).is_empty());
    }

    #[test]
    fn test_completion_dates() {
        let mut ledger = CompletionLedger::new();
        ledger.complete(&habit("h1", 10), date(1), Utc::now());
        ledger.complete(&habit("h2", 10), date(1), Utc::now());
        ledger.complete(&habit("h1", 10), date(3), Utc::now());

        let dates: Vec<_> = ledger.completion_dates().into_iter().collect();
        assert_eq!(dates, vec![date(1), date(3)]);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let first = HabitCompletion {
            id: "a".to_string(),
            habit_id: "h1".to_string(),
            date: date(1),
            completed_at: Utc::now(),
        };
        let second = HabitCompletion {
            id: "b".to_string(),
            ..first.clone()
        };
        let mut ledger: CompletionLedger =
            serde_json::from_value(serde_json::to_value(vec![first, second]).unwrap()).unwrap();

        assert_eq!(ledger.dedup(), 1);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.iter().next().unwrap().id, "a");
    }

    #[test]
    fn test_serializes_as_list() {
        let mut ledger = CompletionLedger::new();
        ledger.complete(&habit("h1", 10), date(1), Utc::now());
        let json = serde_json::to_value(&ledger).unwrap();
        assert!(json.is_array());
    }
}
