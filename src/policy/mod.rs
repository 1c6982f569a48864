//! Pure leveling and streak rules.
//!
//! Nothing in here touches the database or the clock; callers pass
//! "today" and the ledger values in and persist whatever comes back.

pub mod level;
pub mod streak;

pub use level::{Level, LevelTable, apply_leveling, xp_progress_percent};
pub use streak::{CalendarDay, apply_streak, streak_calendar};
