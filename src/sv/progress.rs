use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::{
  entity::{exercise_progress, game_play, lesson_progress, word_progress},
  prelude::*,
  report::{Activity, ActivityReport},
};

pub const MAX_MASTERY: i32 = 5;

/// Upserts the per-item row for `report`. Runs inside the ledger
/// transaction, so a failure here takes the XP credit down with it.
pub async fn record_item<C: ConnectionTrait>(
  conn: &C,
  report: &ActivityReport,
  now: DateTime,
) -> Result<()> {
  let user_id = report.user_id;

  match &report.activity {
    Activity::Lesson { lesson_id, progress_percentage } => {
      record_lesson(conn, user_id, *lesson_id, *progress_percentage, now).await
    }
    Activity::Vocabulary { word_id } => {
      record_word(conn, user_id, *word_id, now).await
    }
    Activity::Exercise { exercise_id, score } => {
      record_exercise(conn, user_id, *exercise_id, *score, now).await
    }
    Activity::Game { game_id, score, data } => {
      game_play::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        game_id: Set(game_id.clone()),
        score: Set(*score),
        xp_earned: Set(report.xp_earned),
        data: Set(data.clone()),
        played_at: Set(now),
      }
      .insert(conn)
      .await?;
      Ok(())
    }
    Activity::Generic => Ok(()),
  }
}

/// Latest report wins, clamped into range. `completed_at` is stamped the
/// first time the lesson reaches 100 and kept afterwards.
async fn record_lesson<C: ConnectionTrait>(
  conn: &C,
  user_id: i64,
  lesson_id: i64,
  percentage: i32,
  now: DateTime,
) -> Result<()> {
  let percentage = percentage.clamp(0, 100);
  let finished = (percentage == 100).then_some(now);

  match lesson_progress::Entity::find_by_id((user_id, lesson_id))
    .one(conn)
    .await?
  {
    Some(row) => {
      let completed_at = row.completed_at.or(finished);
      lesson_progress::ActiveModel {
        progress_percentage: Set(percentage),
        completed_at: Set(completed_at),
        updated_at: Set(now),
        ..row.into()
      }
      .update(conn)
      .await?;
    }
    None => {
      lesson_progress::ActiveModel {
        user_id: Set(user_id),
        lesson_id: Set(lesson_id),
        progress_percentage: Set(percentage),
        completed_at: Set(finished),
        updated_at: Set(now),
      }
      .insert(conn)
      .await?;
    }
  }

  Ok(())
}

async fn record_word<C: ConnectionTrait>(
  conn: &C,
  user_id: i64,
  word_id: i64,
  now: DateTime,
) -> Result<()> {
  match word_progress::Entity::find_by_id((user_id, word_id)).one(conn).await?
  {
    Some(row) => {
      let times_reviewed = row.times_reviewed + 1;
      let mastery_level = (row.mastery_level + 1).min(MAX_MASTERY);
      word_progress::ActiveModel {
        times_reviewed: Set(times_reviewed),
        mastery_level: Set(mastery_level),
        last_reviewed: Set(now),
        ..row.into()
      }
      .update(conn)
      .await?;
    }
    None => {
      word_progress::ActiveModel {
        user_id: Set(user_id),
        word_id: Set(word_id),
        times_reviewed: Set(1),
        mastery_level: Set(1),
        last_reviewed: Set(now),
      }
      .insert(conn)
      .await?;
    }
  }

  Ok(())
}

/// Best score wins; every report counts as an attempt.
async fn record_exercise<C: ConnectionTrait>(
  conn: &C,
  user_id: i64,
  exercise_id: i64,
  score: i32,
  now: DateTime,
) -> Result<()> {
  match exercise_progress::Entity::find_by_id((user_id, exercise_id))
    .one(conn)
    .await?
  {
    Some(row) => {
      let best = row.score.max(score);
      let attempts = row.attempts + 1;
      exercise_progress::ActiveModel {
        score: Set(best),
        attempts: Set(attempts),
        updated_at: Set(now),
        ..row.into()
      }
      .update(conn)
      .await?;
    }
    None => {
      exercise_progress::ActiveModel {
        user_id: Set(user_id),
        exercise_id: Set(exercise_id),
        score: Set(score),
        attempts: Set(1),
        updated_at: Set(now),
      }
      .insert(conn)
      .await?;
    }
  }

  Ok(())
}

/// Read side of the per-item tables for the dashboard.
pub struct Progress<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Progress<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn lessons(
    &self,
    user_id: i64,
  ) -> Result<Vec<lesson_progress::Model>> {
    Ok(
      lesson_progress::Entity::find()
        .filter(lesson_progress::Column::UserId.eq(user_id))
        .order_by_asc(lesson_progress::Column::LessonId)
        .all(self.db)
        .await?,
    )
  }

  #[allow(dead_code)]
  pub async fn lesson(
    &self,
    user_id: i64,
    lesson_id: i64,
  ) -> Result<Option<lesson_progress::Model>> {
    Ok(
      lesson_progress::Entity::find_by_id((user_id, lesson_id))
        .one(self.db)
        .await?,
    )
  }

  pub async fn words(&self, user_id: i64) -> Result<Vec<word_progress::Model>> {
    Ok(
      word_progress::Entity::find()
        .filter(word_progress::Column::UserId.eq(user_id))
        .order_by_asc(word_progress::Column::WordId)
        .all(self.db)
        .await?,
    )
  }

  #[allow(dead_code)]
  pub async fn word(
    &self,
    user_id: i64,
    word_id: i64,
  ) -> Result<Option<word_progress::Model>> {
    Ok(
      word_progress::Entity::find_by_id((user_id, word_id))
        .one(self.db)
        .await?,
    )
  }

  pub async fn exercises(
    &self,
    user_id: i64,
  ) -> Result<Vec<exercise_progress::Model>> {
    Ok(
      exercise_progress::Entity::find()
        .filter(exercise_progress::Column::UserId.eq(user_id))
        .order_by_asc(exercise_progress::Column::ExerciseId)
        .all(self.db)
        .await?,
    )
  }

  #[allow(dead_code)]
  pub async fn exercise(
    &self,
    user_id: i64,
    exercise_id: i64,
  ) -> Result<Option<exercise_progress::Model>> {
    Ok(
      exercise_progress::Entity::find_by_id((user_id, exercise_id))
        .one(self.db)
        .await?,
    )
  }

  /// Most recent plays first.
  pub async fn games(
    &self,
    user_id: i64,
    limit: u64,
  ) -> Result<Vec<game_play::Model>> {
    Ok(
      game_play::Entity::find()
        .filter(game_play::Column::UserId.eq(user_id))
        .order_by_desc(game_play::Column::PlayedAt)
        .limit(limit)
        .all(self.db)
        .await?,
    )
  }
}
