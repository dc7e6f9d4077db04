//! Derived "today" views: daily progress and the gator's expression.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::gator::GatorExpression;
use crate::core::habits::Habit;
use crate::core::journal::{JournalEntry, MoodEntry, MoodLevel};
use crate::core::ledger::CompletionLedger;

/// Weight of habit completion in the overall score.
pub const HABIT_WEIGHT: f64 = 0.7;
/// Weight of a mood check-in.
pub const MOOD_WEIGHT: f64 = 0.15;
/// Weight of a journal entry.
pub const JOURNAL_WEIGHT: f64 = 0.15;

/// Summary of what has been done today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub habits_completed: usize,
    pub habits_total: usize,
    pub habit_fraction: f64,
    pub has_mood_entry: bool,
    pub has_journal_entry: bool,
    pub overall: f64,
}

impl DailyProgress {
    /// Compute today's progress over the active habits.
    pub fn compute<'a>(
        active_habits: impl IntoIterator<Item = &'a Habit>,
        ledger: &CompletionLedger,
        moods: &[MoodEntry],
        journal: &[JournalEntry],
        today: NaiveDate,
    ) -> Self {
        let (habits_total, habits_completed) =
            active_habits
                .into_iter()
                .fold((0, 0), |(total, done), habit| {
                    let completed = ledger.is_completed_on(&habit.id, today);
                    (total + 1, done + usize::from(completed))
                });

        let habit_fraction = if habits_total > 0 {
            habits_completed as f64 / habits_total as f64
        } else {
            0.0
        };
        let has_mood_entry = moods.iter().any(|m| m.date == today);
        let has_journal_entry = journal.iter().any(|e| e.date == today);

        let mut overall = habit_fraction * HABIT_WEIGHT;
        if has_mood_entry {
            overall += MOOD_WEIGHT;
        }
        if has_journal_entry {
            overall += JOURNAL_WEIGHT;
        }

        Self {
            habits_completed,
            habits_total,
            habit_fraction,
            has_mood_entry,
            has_journal_entry,
            overall,
        }
    }

    /// Every active habit done (and at least one exists).
    pub fn all_habits_done(&self) -> bool {
        self.habits_total > 0 && self.habits_completed == self.habits_total
    }
}

/// Pick the gator's expression from today's activity and the local hour.
pub fn expression_for(
    progress: &DailyProgress,
    latest_mood_today: Option<MoodLevel>,
    hour: u32,
) -> GatorExpression {
    if hour >= 22 || hour < 6 {
        return GatorExpression::Sleepy;
    }

    if progress.all_habits_done() {
        return GatorExpression::Proud;
    }

    if let Some(mood) = latest_mood_today {
        if mood.value() >= 4 {
            return GatorExpression::Happy;
        }
        if mood.value() <= 2 {
            return GatorExpression::Encouraging;
        }
    }

    if progress.habits_completed > 0 {
        return GatorExpression::Happy;
    }

    GatorExpression::Neutral
}
