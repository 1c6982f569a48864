//! Activity reports: one unit of learning activity and its reward.

use json::Value;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Kind specific part of a report, tagged by `activity_kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "activity_kind", rename_all = "snake_case")]
pub enum Activity {
  Lesson {
    lesson_id: i64,
    /// Clamped into `0..=100` when stored
    progress_percentage: i32,
  },
  Vocabulary {
    word_id: i64,
  },
  Exercise {
    exercise_id: i64,
    score: i32,
  },
  Game {
    game_id: String,
    score: i64,
    #[serde(default)]
    data: Option<Value>,
  },
  /// Conversation messages, camera exercises and anything else that only
  /// earns XP
  Generic,
}

impl Activity {
  pub fn kind(&self) -> &'static str {
    match self {
      Activity::Lesson { .. } => "lesson",
      Activity::Vocabulary { .. } => "vocabulary",
      Activity::Exercise { .. } => "exercise",
      Activity::Game { .. } => "game",
      Activity::Generic => "generic",
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityReport {
  pub user_id: i64,
  pub xp_earned: i64,
  /// seconds
  pub study_time_delta: i64,
  pub activity: Activity,
}

impl ActivityReport {
  #[allow(dead_code)]
  pub fn generic(user_id: i64, xp_earned: i64, study_time_delta: i64) -> Self {
    Self { user_id, xp_earned, study_time_delta, activity: Activity::Generic }
  }

  /// Rejects reports that must never reach the store.
  pub fn validate(&self) -> Result<()> {
    if self.xp_earned < 0 {
      return Err(Error::validation(format!(
        "xp_earned must not be negative, got {}",
        self.xp_earned
      )));
    }
    if self.study_time_delta < 0 {
      return Err(Error::validation(format!(
        "study_time_delta must not be negative, got {}",
        self.study_time_delta
      )));
    }

    match &self.activity {
      Activity::Exercise { score, .. } if *score < 0 => {
        Err(Error::validation("exercise score must not be negative"))
      }
      Activity::Game { score, .. } if *score < 0 => {
        Err(Error::validation("game score must not be negative"))
      }
      Activity::Game { game_id, .. } if game_id.trim().is_empty() => {
        Err(Error::validation("game_id must not be empty"))
      }
      _ => Ok(()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn report(activity: Activity) -> ActivityReport {
    ActivityReport { user_id: 1, xp_earned: 10, study_time_delta: 60, activity }
  }

  #[test]
  fn test_deserialize_tagged() {
    let activity: Activity = json::from_value(json::json!({
      "activity_kind": "lesson",
      "lesson_id": 3,
      "progress_percentage": 40,
    }))
    .unwrap();
    assert_eq!(
      activity,
      Activity::Lesson { lesson_id: 3, progress_percentage: 40 }
    );

    let activity: Activity =
      json::from_value(json::json!({ "activity_kind": "generic" })).unwrap();
    assert_eq!(activity, Activity::Generic);
  }

  #[test]
  fn test_unknown_kind_or_missing_field_rejected() {
    assert!(
      json::from_value::<Activity>(json::json!({ "activity_kind": "dance" }))
        .is_err()
    );
    assert!(
      json::from_value::<Activity>(json::json!({
        "activity_kind": "exercise",
        "exercise_id": 1,
      }))
      .is_err()
    );
  }

  #[test]
  fn test_validate() {
    assert!(report(Activity::Generic).validate().is_ok());

    let mut negative = report(Activity::Generic);
    negative.xp_earned = -5;
    assert!(matches!(negative.validate(), Err(Error::Validation(_))));

    let mut negative = report(Activity::Generic);
    negative.study_time_delta = -1;
    assert!(matches!(negative.validate(), Err(Error::Validation(_))));

    let bad_score = report(Activity::Exercise { exercise_id: 1, score: -1 });
    assert!(matches!(bad_score.validate(), Err(Error::Validation(_))));

    let no_game = report(Activity::Game {
      game_id: " ".into(),
      score: 10,
      data: None,
    });
    assert!(matches!(no_game.validate(), Err(Error::Validation(_))));

    // out of range percentages are clamped on write, not rejected
    let lesson =
      report(Activity::Lesson { lesson_id: 1, progress_percentage: 140 });
    assert!(lesson.validate().is_ok());
  }
}
