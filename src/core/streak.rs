//! Daily activity streaks.
//!
//! A streak counts consecutive calendar days with at least one recorded
//! activity. Dates are compared as `NaiveDate`, so "one day apart" is a
//! whole-calendar-day difference regardless of DST or time of day.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Streak lengths worth celebrating.
pub const STREAK_MILESTONES: &[u32] = &[7, 14, 21, 30, 60, 90, 100, 180, 365];

/// Persisted streak counters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakData {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_active_date: Option<NaiveDate>,
}

/// What a `record_activity` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakTransition {
    /// First activity ever.
    Started,
    /// Activity already recorded for that day.
    Unchanged,
    /// Consecutive day: streak grew.
    Extended,
    /// A day or more was missed: streak restarted at 1.
    Reset,
    /// Event dated before the last recorded activity: ignored.
    Stale,
}

impl StreakTransition {
    /// Whether the counters changed.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Started | Self::Extended | Self::Reset)
    }
}

/// Streak health as seen from a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakStatus {
    /// Activity recorded today.
    Active,
    /// Last activity was yesterday; today's activity would extend it.
    Pending,
    /// No activity yesterday or today.
    Broken,
}

impl StreakStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Broken => "broken",
        }
    }
}

impl StreakData {
    /// Record an activity on `date`.
    pub fn record_activity(&mut self, date: NaiveDate) -> StreakTransition {
        let Some(last) = self.last_active_date else {
            self.current_streak = 1;
            self.longest_streak = self.longest_streak.max(1);
            self.last_active_date = Some(date);
            return StreakTransition::Started;
        };

        let days = (date - last).num_days();
        let transition = match days {
            d if d < 0 => StreakTransition::Stale,
            0 => StreakTransition::Unchanged,
            1 => {
                self.current_streak = self.current_streak.saturating_add(1);
                self.longest_streak = self.longest_streak.max(self.current_streak);
                self.last_active_date = Some(date);
                StreakTransition::Extended
            }
            _ => {
                self.current_streak = 1;
                self.longest_streak = self.longest_streak.max(1);
                self.last_active_date = Some(date);
                StreakTransition::Reset
            }
        };

        match transition {
            StreakTransition::Stale => tracing::debug!(
                %date,
                last_active = %last,
                "ignoring activity dated before the last active day"
            ),
            StreakTransition::Extended | StreakTransition::Reset => tracing::info!(
                current = self.current_streak,
                longest = self.longest_streak,
                ?transition,
                "streak updated"
            ),
            _ => {}
        }

        transition
    }

    /// Zero the current streak when more than one whole day has passed since
    /// the last activity. Longest streak and last active date are kept.
    ///
    /// Returns true if the streak was broken by this call.
    pub fn check_decay(&mut self, today: NaiveDate) -> bool {
        let Some(last) = self.last_active_date else {
            return false;
        };

        if (today - last).num_days() > 1 && self.current_streak > 0 {
            tracing::info!(
                lost = self.current_streak,
                last_active = %last,
                "streak broken by inactivity"
            );
            self.current_streak = 0;
            return true;
        }

        false
    }

    /// Streak health relative to `today`.
    pub fn status(&self, today: NaiveDate) -> StreakStatus {
        match self.last_active_date.map(|last| (today - last).num_days()) {
            Some(0) => StreakStatus::Active,
            Some(1) => StreakStatus::Pending,
            _ => StreakStatus::Broken,
        }
    }
}

/// Whether `streak` is one of the celebrated lengths.
pub fn is_milestone(streak: u32) -> bool {
    STREAK_MILESTONES.contains(&streak)
}

/// Streak rebuilt from raw activity dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current_streak: u32,
    /// True when the run includes today.
    pub is_active: bool,
}

/// Rebuild the current streak from a set of activity dates.
///
/// The run must end today or yesterday to count; anything older is a broken
/// streak. Dates after `today` are ignored.
pub fn streak_from_dates<I>(dates: I, today: NaiveDate) -> StreakSummary
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = dates.into_iter().filter(|d| *d <= today).collect();

    let Some(&latest) = days.iter().next_back() else {
        return StreakSummary {
            current_streak: 0,
            is_active: false,
        };
    };

    let gap = (today - latest).num_days();
    if gap > 1 {
        return StreakSummary {
            current_streak: 0,
            is_active: false,
        };
    }

    let mut streak = 1;
    let mut cursor = latest;
    for &day in days.iter().rev().skip(1) {
        if (cursor - day).num_days() == 1 {
            streak += 1;
            cursor = day;
        } else {
            break;
        }
    }

    StreakSummary {
        current_streak: streak,
        is_active: gap == 0,
    }
}
