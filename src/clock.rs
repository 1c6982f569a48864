use crate::prelude::*;

/// Source of "now" for streak and timestamp bookkeeping.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime;

  fn today(&self) -> Date {
    self.now().date()
  }
}

/// Wall clock in UTC; calendar days roll over at UTC midnight.
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime {
    Utc::now().naive_utc()
  }
}

#[cfg(test)]
pub use fixed::FixedClock;

#[cfg(test)]
mod fixed {
  use std::sync::Mutex;

  use super::*;

  pub struct FixedClock(Mutex<DateTime>);

  impl FixedClock {
    pub fn at(date: Date) -> Self {
      Self(Mutex::new(date.and_hms_opt(12, 0, 0).unwrap()))
    }

    pub fn advance_days(&self, days: i64) {
      *self.0.lock().unwrap() += TimeDelta::days(days);
    }
  }

  impl Clock for FixedClock {
    fn now(&self) -> DateTime {
      *self.0.lock().unwrap()
    }
  }
}
