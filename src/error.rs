use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use sea_orm::DbErr;

use crate::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum Persistence {
  #[error("database error: {0}")]
  Db(#[from] DbErr),
  #[error("ledger update timed out after {}", humantime::format_duration(*.0))]
  Timeout(Duration),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// Level table is unusable; needs an operator, not a retry
  #[error("configuration error: {0}")]
  Configuration(String),

  #[error("invalid request: {0}")]
  Validation(String),

  #[error(transparent)]
  Persistence(#[from] Persistence),

  #[error("no progress recorded yet")]
  NotFound,

  #[error("missing or malformed caller identity")]
  Unauthenticated,
}

impl From<DbErr> for Error {
  fn from(err: DbErr) -> Self {
    Self::Persistence(Persistence::Db(err))
  }
}

impl Error {
  pub fn validation(message: impl Into<String>) -> Self {
    Self::Validation(message.into())
  }

  pub fn configuration(message: impl Into<String>) -> Self {
    Self::Configuration(message.into())
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::Validation(_) => StatusCode::BAD_REQUEST,
      Error::Unauthenticated => StatusCode::UNAUTHORIZED,
      Error::NotFound => StatusCode::NOT_FOUND,
      Error::Persistence(_) => StatusCode::SERVICE_UNAVAILABLE,
      Error::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    // operators get the details, callers get a stable message
    let message = match &self {
      Error::Persistence(err) => {
        error!("Ledger persistence failure: {err}");
        "Progress could not be saved, retry later".to_string()
      }
      Error::Configuration(err) => {
        error!("Ledger misconfigured: {err}");
        "Internal error".to_string()
      }
      other => other.to_string(),
    };

    let body = json::json!({
      "success": false,
      "error": message,
    });

    (status, Json(body)).into_response()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
