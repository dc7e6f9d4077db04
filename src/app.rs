//! The application state store.
//!
//! `AppStore` owns the one `AppState` snapshot and is the only thing that
//! mutates it. Every operation reads "today" from the clock once, runs its
//! engine transitions synchronously, then persists. A failed save never
//! rolls the logical action back: the store logs it, keeps the in-memory
//! state and reports unsaved changes until `persist` succeeds.

use std::io;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::clock::Clock;
use crate::config::Config;
use crate::core::{
    expression_for, streak_from_dates, Accessory, AppState, DailyProgress, Environment, ExperienceGain, Gator,
    GatorExpression, Habit, HabitCompletion, JournalEntry, JournalUpdate, LevelProgress,
    LevelTable, MoodEntry, MoodLevel, NewHabit, StreakData, StreakStatus, StreakSummary,
    StreakTransition, Unlock, UserProfile,
};
use crate::error::{GatorError, Result};
use crate::storage::StateStore;
use crate::util::generate_id;

/// What completing a habit did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitCompletionReport {
    pub habit_id: String,
    /// False when the habit was already done today.
    pub newly_completed: bool,
    pub experience_granted: u32,
    pub gain: ExperienceGain,
    /// Set when habit completions count toward the streak.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<StreakTransition>,
}

/// What a mood check-in or journal entry did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInReport<T> {
    pub record: T,
    pub gain: ExperienceGain,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<StreakTransition>,
}

/// Single owner of the application state.
#[derive(Debug)]
pub struct AppStore<S: StateStore, C: Clock> {
    state: AppState,
    store: S,
    clock: C,
    config: Config,
    table: LevelTable,
    dirty: bool,
    /// Set when an unreadable snapshot is still in place.
    save_blocked: bool,
}

impl<S: StateStore, C: Clock> AppStore<S, C> {
    /// Load the stored snapshot, or start fresh when there is none or it
    /// cannot be read.
    ///
    /// An unreadable snapshot is moved aside before anything is saved over
    /// it. If that fails too, saving stays disabled for this store.
    pub fn open(store: S, clock: C, config: Config) -> Self {
        Self::open_with_table(store, clock, config, LevelTable::standard().clone())
    }

    /// Like `open`, with a custom level table.
    pub fn open_with_table(store: S, clock: C, config: Config, table: LevelTable) -> Self {
        let mut save_blocked = false;
        let mut state = match store.load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                tracing::debug!("no stored state, starting fresh");
                AppState::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored state is unreadable; starting fresh");
                match store.quarantine() {
                    Ok(Some(path)) => {
                        tracing::warn!(path = %path.display(), "moved unreadable state aside")
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            "could not move unreadable state aside; saving disabled"
                        );
                        save_blocked = true;
                    }
                }
                AppState::new()
            }
        };
        state.normalize(&table);

        Self {
            state,
            store,
            clock,
            config,
            table,
            dirty: false,
            save_blocked,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn gator(&self) -> &Gator {
        &self.state.gator
    }

    pub fn habits(&self) -> &[Habit] {
        &self.state.habits
    }

    pub fn streak(&self) -> &StreakData {
        &self.state.streak
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.state.user.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn level_table(&self) -> &LevelTable {
        &self.table
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Save the snapshot. On failure the state is kept and stays dirty so a
    /// later call can retry.
    pub fn persist(&mut self) -> Result<()> {
        if self.save_blocked {
            self.dirty = true;
            return Err(GatorError::storage(
                "<state>",
                io::Error::other("stored state is unreadable; refusing to overwrite it"),
            ));
        }

        match self.store.save(&self.state) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                tracing::warn!(error = %e, "failed to persist state; keeping changes in memory");
                Err(e)
            }
        }
    }

    /// Retry a failed save, if any.
    pub fn flush(&mut self) -> Result<()> {
        if self.dirty {
            self.persist()
        } else {
            Ok(())
        }
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Throw everything away and clear storage.
    pub fn reset(&mut self) -> Result<()> {
        self.state = AppState::new();
        self.dirty = false;
        self.store.clear()?;
        self.save_blocked = false;
        Ok(())
    }

    /// Persist after a mutation. Failures are logged and left for `flush`.
    fn commit(&mut self) {
        self.dirty = true;
        let _ = self.persist();
    }

    // =========================================================================
    // Progression
    // =========================================================================

    pub fn add_experience(&mut self, amount: u32) -> ExperienceGain {
        let gain = self.state.gator.add_experience(&self.table, amount);
        if gain.amount > 0 {
            self.commit();
        }
        gain
    }

    /// Wear an accessory. Locked accessories are ignored; returns whether
    /// the selection took effect.
    pub fn select_accessory(&mut self, accessory: Accessory) -> bool {
        match self.state.gator.select_accessory(accessory) {
            Ok(()) => {
                self.commit();
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "ignoring accessory selection");
                false
            }
        }
    }

    /// Move to an environment. Locked environments are ignored.
    pub fn select_environment(&mut self, environment: Environment) -> bool {
        match self.state.gator.select_environment(environment) {
            Ok(()) => {
                self.commit();
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "ignoring environment selection");
                false
            }
        }
    }

    pub fn unlock_accessory(&mut self, accessory: Accessory) -> bool {
        let added = self.state.gator.unlock_accessory(accessory);
        if added {
            self.commit();
        }
        added
    }

    pub fn unlock_environment(&mut self, environment: Environment) -> bool {
        let added = self.state.gator.unlock_environment(environment);
        if added {
            self.commit();
        }
        added
    }

    pub fn set_gator_name(&mut self, name: &str) -> Result<()> {
        self.state.gator.set_name(name)?;
        self.commit();
        Ok(())
    }

    pub fn set_expression(&mut self, expression: GatorExpression) {
        if self.state.gator.expression != expression {
            self.state.gator.expression = expression;
            self.commit();
        }
    }

    // =========================================================================
    // Habits
    // =========================================================================

    /// Mark a habit done for today and credit its reward once.
    pub fn complete_habit(&mut self, habit_id: &str) -> Result<HabitCompletionReport> {
        let today = self.clock.today();
        let now = self.clock.now();

        let habit = self
            .state
            .habit(habit_id)
            .cloned()
            .ok_or_else(|| GatorError::habit_not_found(habit_id))?;

        let outcome = self.state.completions.complete(&habit, today, now);
        if outcome.is_duplicate() {
            return Ok(HabitCompletionReport {
                habit_id: habit.id,
                newly_completed: false,
                experience_granted: 0,
                gain: self.state.gator.add_experience(&self.table, 0),
                streak: None,
            });
        }

        let gain = self
            .state
            .gator
            .add_experience(&self.table, outcome.experience_granted);
        let streak = self
            .config
            .streak
            .count_habit_completions
            .then(|| self.state.streak.record_activity(today));

        tracing::debug!(habit_id = %habit.id, xp = gain.amount, "habit completed");
        self.commit();

        Ok(HabitCompletionReport {
            habit_id: habit.id,
            newly_completed: true,
            experience_granted: outcome.experience_granted,
            gain,
            streak,
        })
    }

    pub fn is_habit_completed_today(&self, habit_id: &str) -> bool {
        self.state
            .completions
            .is_completed_on(habit_id, self.clock.today())
    }

    /// Flip a habit's active flag. Returns the new value.
    pub fn toggle_habit_active(&mut self, habit_id: &str) -> Result<bool> {
        let habit = self
            .state
            .habit_mut(habit_id)
            .ok_or_else(|| GatorError::habit_not_found(habit_id))?;
        habit.is_active = !habit.is_active;
        let active = habit.is_active;
        self.commit();
        Ok(active)
    }

    /// Add a custom habit.
    pub fn add_habit(&mut self, new_habit: NewHabit) -> Result<Habit> {
        new_habit.validate()?;
        let habit = new_habit.into_habit(generate_id("habit", self.clock.now()));
        self.state.habits.push(habit.clone());
        self.commit();
        Ok(habit)
    }

    pub fn completions_for_date(&self, date: NaiveDate) -> Vec<&HabitCompletion> {
        self.state.completions.completions_on(date)
    }

    pub fn active_habits(&self) -> Vec<&Habit> {
        self.state.active_habits().collect()
    }

    /// All-time number of days `habit_id` was completed.
    pub fn habit_completion_count(&self, habit_id: &str) -> usize {
        self.state.completions.count_for_habit(habit_id)
    }

    // =========================================================================
    // Streak
    // =========================================================================

    /// Record activity for today.
    pub fn update_streak(&mut self) -> StreakTransition {
        let transition = self.state.streak.record_activity(self.clock.today());
        if transition.changed() {
            self.commit();
        }
        transition
    }

    /// Decay check run once at launch. Returns whether the streak was reset.
    pub fn check_and_update_streak(&mut self) -> bool {
        let reset = self.state.streak.check_decay(self.clock.today());
        if reset {
            self.commit();
        }
        reset
    }

    pub fn streak_status(&self) -> StreakStatus {
        self.state.streak.status(self.clock.today())
    }

    /// Consecutive days, ending today or yesterday, with at least one habit
    /// completed. Rebuilt from the ledger, independent of `StreakData`.
    pub fn habit_streak(&self) -> StreakSummary {
        streak_from_dates(self.state.completions.completion_dates(), self.clock.today())
    }

    // =========================================================================
    // Mood and journal
    // =========================================================================

    /// Log a mood. Counts as streak activity and earns the mood reward.
    pub fn add_mood_entry(
        &mut self,
        level: MoodLevel,
        note: Option<String>,
    ) -> CheckInReport<MoodEntry> {
        let today = self.clock.today();
        let entry = MoodEntry::new(level, note, today, self.clock.now());
        self.state.mood_entries.push(entry.clone());

        let streak = self.state.streak.record_activity(today);
        let gain = self
            .state
            .gator
            .add_experience(&self.table, self.config.rewards.mood_check_in);
        self.commit();

        CheckInReport {
            record: entry,
            gain,
            streak: Some(streak),
        }
    }

    pub fn mood_entries_for_date(&self, date: NaiveDate) -> Vec<&MoodEntry> {
        self.state
            .mood_entries
            .iter()
            .filter(|m| m.date == date)
            .collect()
    }

    /// Moods dated from `today - days` through today, newest first.
    ///
    /// `recent_moods(0)` is today's moods; `recent_moods(7)` spans eight
    /// calendar days.
    pub fn recent_moods(&self, days: u32) -> Vec<&MoodEntry> {
        let today = self.clock.today();
        let since = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);

        let mut moods: Vec<&MoodEntry> = self
            .state
            .mood_entries
            .iter()
            .filter(|m| m.date >= since && m.date <= today)
            .collect();
        moods.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        moods
    }

    /// Write a journal entry and earn the journal reward.
    pub fn add_journal_entry(
        &mut self,
        content: &str,
        prompt: Option<String>,
        mood: Option<MoodLevel>,
    ) -> Result<CheckInReport<JournalEntry>> {
        let entry = JournalEntry::new(content, prompt, mood, self.clock.today(), self.clock.now())?;
        self.state.journal_entries.push(entry.clone());

        let gain = self
            .state
            .gator
            .add_experience(&self.table, self.config.rewards.journal_entry);
        self.commit();

        Ok(CheckInReport {
            record: entry,
            gain,
            streak: None,
        })
    }

    pub fn update_journal_entry(
        &mut self,
        entry_id: &str,
        update: JournalUpdate,
    ) -> Result<JournalEntry> {
        let now = self.clock.now();
        let entry = self
            .state
            .journal_entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| GatorError::journal_entry_not_found(entry_id))?;
        entry.apply(update, now)?;
        let updated = entry.clone();
        self.commit();
        Ok(updated)
    }

    /// Delete a journal entry. Earned experience is kept.
    pub fn delete_journal_entry(&mut self, entry_id: &str) -> Result<JournalEntry> {
        let index = self
            .state
            .journal_entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or_else(|| GatorError::journal_entry_not_found(entry_id))?;
        let removed = self.state.journal_entries.remove(index);
        self.commit();
        Ok(removed)
    }

    pub fn journal_entry(&self, entry_id: &str) -> Option<&JournalEntry> {
        self.state.journal_entries.iter().find(|e| e.id == entry_id)
    }

    /// All journal entries, newest first.
    pub fn journal_entries(&self) -> Vec<&JournalEntry> {
        let mut entries: Vec<&JournalEntry> = self.state.journal_entries.iter().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }

    // =========================================================================
    // User
    // =========================================================================

    pub fn set_user(&mut self, user: UserProfile) {
        self.state.user = Some(user);
        self.commit();
    }

    /// Mark onboarding done, creating the profile on first use.
    pub fn complete_onboarding(&mut self) -> UserProfile {
        let now = self.clock.now();
        let user = self
            .state
            .user
            .get_or_insert_with(|| UserProfile::new(now));
        user.has_completed_onboarding = true;
        let user = user.clone();
        self.commit();
        user
    }

    /// Update reminder settings. A no-op without a profile.
    pub fn update_reminder(&mut self, enabled: bool, time: Option<NaiveTime>) -> bool {
        let Some(user) = self.state.user.as_mut() else {
            tracing::debug!("no user profile; ignoring reminder update");
            return false;
        };
        user.notifications_enabled = enabled;
        user.reminder_time = time;
        self.commit();
        true
    }

    // =========================================================================
    // Projections
    // =========================================================================

    pub fn level_progress(&self, experience: u32) -> LevelProgress {
        self.table.progress_within_level(experience)
    }

    /// Progress of the gator within its current level.
    pub fn current_level_progress(&self) -> LevelProgress {
        let gator = &self.state.gator;
        self.table.progress_at_level(gator.level, gator.experience)
    }

    pub fn unlocks_for_level(&self, level: u32) -> Option<Unlock> {
        self.table.unlocks_for_level(level)
    }

    pub fn daily_progress(&self) -> DailyProgress {
        self.daily_progress_on(self.clock.today())
    }

    fn daily_progress_on(&self, today: NaiveDate) -> DailyProgress {
        DailyProgress::compute(
            self.state.active_habits(),
            &self.state.completions,
            &self.state.mood_entries,
            &self.state.journal_entries,
            today,
        )
    }

    /// Expression derived from today's activity and the hour.
    pub fn expression(&self) -> GatorExpression {
        let today = self.clock.today();
        let latest_mood = self
            .state
            .mood_entries
            .iter()
            .filter(|m| m.date == today)
            .max_by_key(|m| m.created_at)
            .map(|m| m.level);
        expression_for(&self.daily_progress_on(today), latest_mood, self.clock.hour())
    }

    /// Timestamp from the store's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
