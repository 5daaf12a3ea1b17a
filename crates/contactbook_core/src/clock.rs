//! Calendar-date source for "today" queries.

use chrono::{Local, NaiveDate};

/// Supplies the current local date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// `Clock` backed by the host's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// `Clock` pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
