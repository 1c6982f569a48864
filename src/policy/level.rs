use serde::Serialize;

use crate::{entity::level, prelude::*};

pub type LevelId = i32;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Level {
  pub id: LevelId,
  pub number: i32,
  pub xp_required: i64,
  pub title: String,
  pub emoji: String,
  pub badge: Option<String>,
}

impl From<level::Model> for Level {
  fn from(model: level::Model) -> Self {
    Self {
      id: model.id,
      number: model.level_number,
      xp_required: model.xp_required,
      title: model.title,
      emoji: model.emoji,
      badge: model.badge,
    }
  }
}

/// Validated, ordered level table.
///
/// Levels are numbered `1..=N` without gaps, level 1 starts at 0 XP and
/// thresholds never decrease, so every level but the last has a next one.
#[derive(Debug, Clone)]
pub struct LevelTable {
  levels: Vec<Level>,
}

impl LevelTable {
  pub fn new(mut levels: Vec<Level>) -> Result<Self> {
    levels.sort_by_key(|level| level.number);

    let Some(first) = levels.first() else {
      return Err(Error::configuration("level table is empty"));
    };
    if first.number != 1 {
      return Err(Error::configuration(format!(
        "level table must start at level 1, found level {}",
        first.number
      )));
    }
    if first.xp_required != 0 {
      return Err(Error::configuration(format!(
        "level 1 must require 0 XP, found {}",
        first.xp_required
      )));
    }

    for pair in levels.windows(2) {
      let (prev, next) = (&pair[0], &pair[1]);
      if next.number != prev.number + 1 {
        return Err(Error::configuration(format!(
          "level numbers are not contiguous: {} is followed by {}",
          prev.number, next.number
        )));
      }
      if next.xp_required < prev.xp_required {
        return Err(Error::configuration(format!(
          "level {} requires less XP ({}) than level {} ({})",
          next.number, next.xp_required, prev.number, prev.xp_required
        )));
      }
    }

    Ok(Self { levels })
  }

  pub fn first(&self) -> &Level {
    &self.levels[0]
  }

  pub fn by_id(&self, id: LevelId) -> Option<&Level> {
    self.levels.iter().find(|level| level.id == id)
  }

  pub fn next(&self, level: &Level) -> Option<&Level> {
    // numbers are contiguous from 1, so the next level sits at `number`
    self.levels.get(level.number as usize)
  }

  pub fn all(&self) -> &[Level] {
    &self.levels
  }
}

/// Advances one level at a time while `xp_total` meets the next
/// threshold, stopping at the last level.
pub fn apply_leveling(
  table: &LevelTable,
  current: LevelId,
  xp_total: i64,
) -> Result<(LevelId, bool)> {
  if xp_total < 0 {
    return Err(Error::configuration(format!(
      "negative xp total {xp_total}"
    )));
  }

  let mut level = table.by_id(current).ok_or_else(|| {
    Error::configuration(format!("unknown level id {current}"))
  })?;
  let mut leveled_up = false;

  while let Some(next) = table.next(level)
    && xp_total >= next.xp_required
  {
    level = next;
    leveled_up = true;
  }

  Ok((level.id, leveled_up))
}

/// Share of the way from the current level's threshold to the next one,
/// `0..=100`. A user on the last level is always at 100.
pub fn xp_progress_percent(
  xp_total: i64,
  current: &Level,
  next: Option<&Level>,
) -> f64 {
  let Some(next) = next else {
    return 100.0;
  };

  let span = next.xp_required - current.xp_required;
  if span <= 0 {
    return 100.0;
  }

  let earned = (xp_total - current.xp_required) as f64;
  (earned / span as f64 * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn level(id: LevelId, number: i32, xp_required: i64) -> Level {
    Level {
      id,
      number,
      xp_required,
      title: format!("Nivel {number}"),
      emoji: "⭐".into(),
      badge: None,
    }
  }

  /// ids deliberately differ from level numbers
  fn table() -> LevelTable {
    LevelTable::new(vec![
      level(10, 1, 0),
      level(20, 2, 100),
      level(30, 3, 250),
      level(40, 4, 500),
    ])
    .unwrap()
  }

  #[test]
  fn test_below_threshold_keeps_level() {
    let table = table();

    for xp in [0, 1, 50, 99] {
      assert_eq!(apply_leveling(&table, 10, xp).unwrap(), (10, false));
    }
    assert_eq!(apply_leveling(&table, 20, 249).unwrap(), (20, false));
  }

  #[test]
  fn test_exact_threshold_levels_up() {
    let table = table();
    assert_eq!(apply_leveling(&table, 10, 100).unwrap(), (20, true));
  }

  #[test]
  fn test_multi_threshold_jump() {
    let table = table();

    assert_eq!(apply_leveling(&table, 10, 250).unwrap(), (30, true));
    assert_eq!(apply_leveling(&table, 10, 499).unwrap(), (30, true));
    assert_eq!(apply_leveling(&table, 20, 500).unwrap(), (40, true));
  }

  #[test]
  fn test_never_past_last_level() {
    let table = table();

    assert_eq!(apply_leveling(&table, 10, 1_000_000).unwrap(), (40, true));
    assert_eq!(apply_leveling(&table, 40, 1_000_000).unwrap(), (40, false));
  }

  #[test]
  fn test_equal_thresholds_are_both_passed() {
    let table = LevelTable::new(vec![
      level(1, 1, 0),
      level(2, 2, 100),
      level(3, 3, 100),
    ])
    .unwrap();

    assert_eq!(apply_leveling(&table, 1, 100).unwrap(), (3, true));
  }

  #[test]
  fn test_negative_xp_is_configuration_error() {
    let table = table();
    assert!(matches!(
      apply_leveling(&table, 10, -1),
      Err(Error::Configuration(_))
    ));
  }

  #[test]
  fn test_unknown_level_id_is_configuration_error() {
    let table = table();
    assert!(matches!(
      apply_leveling(&table, 99, 10),
      Err(Error::Configuration(_))
    ));
  }

  #[test]
  fn test_invalid_tables_rejected() {
    assert!(LevelTable::new(vec![]).is_err());
    assert!(LevelTable::new(vec![level(1, 2, 0)]).is_err());
    assert!(LevelTable::new(vec![level(1, 1, 10)]).is_err());
    assert!(LevelTable::new(vec![level(1, 1, 0), level(2, 3, 10)]).is_err());
    assert!(
      LevelTable::new(vec![level(1, 1, 0), level(2, 2, 50), level(3, 3, 20)])
        .is_err()
    );
  }

  #[test]
  fn test_unsorted_input_is_ordered() {
    let table =
      LevelTable::new(vec![level(2, 2, 100), level(1, 1, 0)]).unwrap();

    assert_eq!(table.first().id, 1);
    assert_eq!(table.next(table.first()).map(|l| l.id), Some(2));
  }

  #[test]
  fn test_progress_percent() {
    let table = table();
    let first = table.first();
    let second = table.next(first);

    assert_eq!(xp_progress_percent(0, first, second), 0.0);
    assert_eq!(xp_progress_percent(50, first, second), 50.0);

    let last = table.by_id(40).unwrap();
    assert_eq!(xp_progress_percent(9999, last, None), 100.0);

    // stale level row below its own threshold clamps at zero
    let third = table.by_id(30).unwrap();
    assert_eq!(xp_progress_percent(10, third, table.next(third)), 0.0);
  }
}
