use chrono::Weekday;
use serde::Serialize;

use crate::prelude::*;

/// Counts calendar days, not elapsed hours: yesterday 23:59 followed by
/// today 00:01 is a consecutive day.
pub fn apply_streak(last_activity: Date, today: Date, current: i32) -> i32 {
  match (today - last_activity).num_days() {
    0 => current,
    1 => current + 1,
    // gap or a backdated record
    _ => 1,
  }
}

/// Whether the streak can still be continued today.
pub fn is_alive(last_activity: Date, today: Date) -> bool {
  matches!((today - last_activity).num_days(), 0 | 1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
  pub date: Date,
  pub label: &'static str,
  pub is_today: bool,
  pub active: bool,
}

fn label(day: Weekday) -> &'static str {
  match day {
    Weekday::Mon => "L",
    Weekday::Tue => "M",
    Weekday::Wed => "X",
    Weekday::Thu => "J",
    Weekday::Fri => "V",
    Weekday::Sat => "S",
    Weekday::Sun => "D",
  }
}

/// The seven days ending `today`, oldest first. A day is active when it
/// falls inside the streak window that ends on `last_activity`.
pub fn streak_calendar(
  last_activity: Date,
  streak_days: i32,
  today: Date,
) -> [CalendarDay; 7] {
  let window = i64::from(streak_days.max(0));
  let first_active = last_activity - TimeDelta::days(window - 1);

  std::array::from_fn(|slot| {
    let date = today - TimeDelta::days(6 - slot as i64);
    CalendarDay {
      date,
      label: label(date.weekday()),
      is_today: date == today,
      active: window > 0 && date >= first_active && date <= last_activity,
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn test_same_day_keeps_streak() {
    let today = date(2026, 3, 10);
    for streak in [1, 2, 7, 365] {
      assert_eq!(apply_streak(today, today, streak), streak);
    }
  }

  #[test]
  fn test_next_day_increments() {
    for streak in [1, 4, 30] {
      assert_eq!(
        apply_streak(date(2026, 3, 9), date(2026, 3, 10), streak),
        streak + 1
      );
    }
    // across month and year boundaries
    assert_eq!(apply_streak(date(2026, 2, 28), date(2026, 3, 1), 3), 4);
    assert_eq!(apply_streak(date(2025, 12, 31), date(2026, 1, 1), 9), 10);
  }

  #[test]
  fn test_gap_resets() {
    for gap in [2, 3, 10, 400] {
      let today = date(2026, 3, 10);
      let last = today - TimeDelta::days(gap);
      assert_eq!(apply_streak(last, today, 7), 1);
    }
  }

  #[test]
  fn test_backdated_resets() {
    assert_eq!(apply_streak(date(2026, 3, 11), date(2026, 3, 10), 7), 1);
    assert_eq!(apply_streak(date(2027, 1, 1), date(2026, 3, 10), 2), 1);
  }

  #[test]
  fn test_alive() {
    let today = date(2026, 3, 10);

    assert!(is_alive(today, today));
    assert!(is_alive(date(2026, 3, 9), today));
    assert!(!is_alive(date(2026, 3, 8), today));
  }

  #[test]
  fn test_calendar_ongoing_streak() {
    // 2026-03-10 is a Tuesday
    let today = date(2026, 3, 10);
    let days = streak_calendar(today, 3, today);

    assert_eq!(days[0].date, date(2026, 3, 4));
    assert_eq!(days[6].date, today);
    assert!(days[6].is_today);
    assert_eq!(
      days.iter().map(|d| d.label).collect::<Vec<_>>(),
      ["X", "J", "V", "S", "D", "L", "M"]
    );
    assert_eq!(
      days.iter().map(|d| d.active).collect::<Vec<_>>(),
      [false, false, false, false, true, true, true]
    );
  }

  #[test]
  fn test_calendar_long_streak_fills_week() {
    let today = date(2026, 3, 10);
    let days = streak_calendar(date(2026, 3, 9), 30, today);

    assert!(days[..6].iter().all(|d| d.active));
    assert!(!days[6].active);
  }

  #[test]
  fn test_calendar_broken_streak_keeps_history() {
    let today = date(2026, 3, 10);
    let days = streak_calendar(date(2026, 3, 6), 2, today);

    let active: Vec<_> =
      days.iter().filter(|d| d.active).map(|d| d.date).collect();
    assert_eq!(active, [date(2026, 3, 5), date(2026, 3, 6)]);
  }
}
