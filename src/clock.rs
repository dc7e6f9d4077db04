//! Source of "today" and "now".
//!
//! The engines never read the wall clock themselves. `AppStore` asks its
//! clock once per operation so every step of a transition sees the same day.

use std::sync::RwLock;

use chrono::{DateTime, Local, NaiveDate, Timelike, Utc};

/// Provides the current calendar date, instant and local hour.
pub trait Clock: Send + Sync {
    /// The user's current calendar date.
    fn today(&self) -> NaiveDate;

    /// The current instant, used for record timestamps.
    fn now(&self) -> DateTime<Utc>;

    /// The user's current local hour (0..=23).
    fn hour(&self) -> u32;
}

/// Wall clock in the machine's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// A settable clock for tests.
#[derive(Debug)]
pub struct FixedClock {
    inner: RwLock<(NaiveDate, u32)>,
}

impl FixedClock {
    /// A clock frozen at noon on `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self::at(today, 12)
    }

    pub fn at(today: NaiveDate, hour: u32) -> Self {
        Self {
            inner: RwLock::new((today, hour.min(23))),
        }
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.inner.write().unwrap().0 = today;
    }

    pub fn set_hour(&self, hour: u32) {
        self.inner.write().unwrap().1 = hour.min(23);
    }

    /// Move the clock forward by `days` calendar days.
    pub fn advance_days(&self, days: u64) {
        let mut inner = self.inner.write().unwrap();
        inner.0 = inner.0 + chrono::Days::new(days);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.inner.read().unwrap().0
    }

    fn now(&self) -> DateTime<Utc> {
        let (today, hour) = *self.inner.read().unwrap();
        today
            .and_hms_opt(hour, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now)
    }

    fn hour(&self) -> u32 {
        self.inner.read().unwrap().1
    }
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn hour(&self) -> u32 {
        (**self).hour()
    }
}
