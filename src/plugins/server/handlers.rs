use std::sync::Arc;

use axum::{
  Json,
  extract::{
    FromRequestParts, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::request::Parts,
};
use serde::{Deserialize, Serialize};

use crate::{
  entity::{exercise_progress, game_play, lesson_progress, word_progress},
  policy::Level,
  prelude::*,
  report::{Activity, ActivityReport},
  state::AppState,
  sv::ledger::LedgerView,
};

/// Set by the session layer in front of this service once the caller is
/// authenticated; trusted as is.
pub const USER_HEADER: &str = "x-user-id";

pub struct Learner(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for Learner {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    parts
      .headers
      .get(USER_HEADER)
      .and_then(|value| value.to_str().ok())
      .and_then(|value| value.trim().parse().ok())
      .map(Learner)
      .ok_or(Error::Unauthenticated)
  }
}

#[derive(Debug, Deserialize)]
pub struct ActivityReq {
  pub xp_earned: i64,
  /// seconds
  #[serde(default)]
  pub study_time_delta: i64,
  #[serde(flatten)]
  pub activity: Activity,
}

impl ActivityReq {
  pub fn into_report(self, user_id: i64) -> ActivityReport {
    ActivityReport {
      user_id,
      xp_earned: self.xp_earned,
      study_time_delta: self.study_time_delta,
      activity: self.activity,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ActivityRes {
  pub success: bool,
  pub xp_earned: i64,
  pub new_xp_total: i64,
  pub leveled_up: bool,
  pub new_level: i32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub new_level_name: Option<String>,
  pub new_streak: i32,
}

pub async fn record_activity(
  State(app): State<Arc<AppState>>,
  Learner(user_id): Learner,
  payload: std::result::Result<Json<ActivityReq>, JsonRejection>,
) -> Result<Json<ActivityRes>> {
  let Json(req) = payload.map_err(|err| Error::validation(err.body_text()))?;
  let snapshot = app.sv().ledger.record(&req.into_report(user_id)).await?;

  let new_level_name = snapshot.leveled_up.then(|| {
    format!("{} {}", snapshot.new_level.emoji, snapshot.new_level.title)
  });

  Ok(Json(ActivityRes {
    success: true,
    xp_earned: snapshot.xp_earned,
    new_xp_total: snapshot.new_xp_total,
    leveled_up: snapshot.leveled_up,
    new_level: snapshot.new_level.number,
    new_level_name,
    new_streak: snapshot.new_streak,
  }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
  /// Open an empty ledger instead of answering 404
  #[serde(default)]
  pub create: bool,
}

pub async fn ledger_view(
  State(app): State<Arc<AppState>>,
  Learner(user_id): Learner,
  query: std::result::Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<LedgerView>> {
  let Query(query) = query.map_err(|err| Error::validation(err.body_text()))?;
  Ok(Json(app.sv().ledger.view(user_id, query.create).await?))
}

pub async fn levels(State(app): State<Arc<AppState>>) -> Json<Vec<Level>> {
  Json(app.levels.all().to_vec())
}

pub async fn lessons(
  State(app): State<Arc<AppState>>,
  Learner(user_id): Learner,
) -> Result<Json<Vec<lesson_progress::Model>>> {
  Ok(Json(app.sv().progress.lessons(user_id).await?))
}

pub async fn words(
  State(app): State<Arc<AppState>>,
  Learner(user_id): Learner,
) -> Result<Json<Vec<word_progress::Model>>> {
  Ok(Json(app.sv().progress.words(user_id).await?))
}

pub async fn exercises(
  State(app): State<Arc<AppState>>,
  Learner(user_id): Learner,
) -> Result<Json<Vec<exercise_progress::Model>>> {
  Ok(Json(app.sv().progress.exercises(user_id).await?))
}

const MAX_GAMES: u64 = 100;

#[derive(Debug, Deserialize)]
pub struct GamesQuery {
  pub limit: Option<u64>,
}

pub async fn games(
  State(app): State<Arc<AppState>>,
  Learner(user_id): Learner,
  query: std::result::Result<Query<GamesQuery>, QueryRejection>,
) -> Result<Json<Vec<game_play::Model>>> {
  let Query(query) = query.map_err(|err| Error::validation(err.body_text()))?;
  let limit = query.limit.unwrap_or(20).clamp(1, MAX_GAMES);
  Ok(Json(app.sv().progress.games(user_id, limit).await?))
}

pub async fn health() -> &'static str {
  "OK"
}
