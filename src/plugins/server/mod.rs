mod handlers;

use std::{net::SocketAddr, sync::Arc};

use async_trait::async_trait;
use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

use crate::{prelude::*, state::AppState};

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/health", get(handlers::health))
    .route("/api/levels", get(handlers::levels))
    .route(
      "/api/progress",
      get(handlers::ledger_view).post(handlers::record_activity),
    )
    .route("/api/progress/lessons", get(handlers::lessons))
    .route("/api/progress/words", get(handlers::words))
    .route("/api/progress/exercises", get(handlers::exercises))
    .route("/api/progress/games", get(handlers::games))
}

pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  fn name(&self) -> &'static str {
    "http"
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let governor_conf = Arc::new(
      GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(100)
        .finish()
        .context("Failed to build rate limiter config")?,
    );

    let limiter = governor_conf.limiter().clone();

    let router = routes()
      .layer(
        ServiceBuilder::new()
          .layer(TraceLayer::new_for_http())
          .layer(GovernorLayer::new(governor_conf))
          .layer(
            CorsLayer::new()
              .allow_origin(Any)
              .allow_methods(Any)
              .allow_headers(Any),
          ),
      )
      .with_state(app)
      .into_make_service_with_connect_info::<SocketAddr>();

    let port: u16 =
      std::env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
      .await
      .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP Server listening on {addr}");

    let limiter = async {
      loop {
        time::sleep(Duration::from_secs(60)).await;
        limiter.retain_recent();
      }
    };

    let server = async {
      axum::serve(listener, router).await.context("Axum server error")
    };

    tokio::select! {
      result = server => {
        match &result {
          Ok(_) => info!("Server stopped gracefully"),
          Err(err) => error!("Server stopped with error: {err}"),
        }
        result
      }
      _ = limiter => {
        error!("Rate limiter cleaner stopped unexpectedly!");
        Ok(())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
  };
  use tower::ServiceExt;

  use super::*;
  use crate::{clock::FixedClock, state::tests::test_app};

  async fn app() -> Arc<AppState> {
    let clock = FixedClock::at(Date::from_ymd_opt(2026, 3, 10).unwrap());
    Arc::new(test_app(Arc::new(clock)).await)
  }

  fn request(
    method: Method,
    uri: &str,
    user: Option<i64>,
    body: Option<json::Value>,
  ) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
      builder = builder.header(handlers::USER_HEADER, user.to_string());
    }
    match body {
      Some(body) => builder
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    }
  }

  async fn call(
    app: &Arc<AppState>,
    req: Request<Body>,
  ) -> (StatusCode, json::Value) {
    let res = routes().with_state(app.clone()).oneshot(req).await.unwrap();
    let status = res.status();
    let bytes =
      axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, json::from_slice(&bytes).unwrap_or(json::Value::Null))
  }

  #[tokio::test]
  async fn test_record_requires_caller() {
    let app = app().await;
    let body = json::json!({ "activity_kind": "generic", "xp_earned": 5 });

    let (status, body) =
      call(&app, request(Method::POST, "/api/progress", None, Some(body)))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
  }

  #[tokio::test]
  async fn test_record_and_level_up() {
    let app = app().await;

    let first = json::json!({
      "activity_kind": "generic",
      "xp_earned": 90,
      "study_time_delta": 120,
    });
    let (status, body) =
      call(&app, request(Method::POST, "/api/progress", Some(4), Some(first)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["new_xp_total"], 90);
    assert_eq!(body["leveled_up"], false);
    assert!(body.get("new_level_name").is_none());

    let second = json::json!({
      "activity_kind": "vocabulary",
      "word_id": 12,
      "xp_earned": 20,
    });
    let (status, body) = call(
      &app,
      request(Method::POST, "/api/progress", Some(4), Some(second)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["xp_earned"], 20);
    assert_eq!(body["new_xp_total"], 110);
    assert_eq!(body["leveled_up"], true);
    assert_eq!(body["new_level"], 2);
    assert_eq!(body["new_level_name"], "🧭 Explorador");

    let (status, body) =
      call(&app, request(Method::GET, "/api/progress/words", Some(4), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["word_id"], 12);
    assert_eq!(body[0]["times_reviewed"], 1);
  }

  #[tokio::test]
  async fn test_malformed_reports_are_bad_requests() {
    let app = app().await;

    for body in [
      json::json!({ "activity_kind": "dance", "xp_earned": 5 }),
      json::json!({ "activity_kind": "lesson", "xp_earned": 5 }),
      json::json!({ "activity_kind": "generic", "xp_earned": -5 }),
    ] {
      let (status, body) =
        call(&app, request(Method::POST, "/api/progress", Some(1), Some(body)))
          .await;
      assert_eq!(status, StatusCode::BAD_REQUEST);
      assert_eq!(body["success"], false);
    }

    let (status, _) =
      call(&app, request(Method::GET, "/api/progress", Some(1), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn test_view_not_found_then_created() {
    let app = app().await;

    let (status, body) =
      call(&app, request(Method::GET, "/api/progress", Some(9), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, body) = call(
      &app,
      request(Method::GET, "/api/progress?create=true", Some(9), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["xp_total"], 0);
    assert_eq!(body["level"]["number"], 1);
    assert_eq!(body["xp_progress_percent"], 0.0);
    assert_eq!(body["streak_calendar"].as_array().map(Vec::len), Some(7));
  }

  #[tokio::test]
  async fn test_bad_query_strings_get_json_errors() {
    let app = app().await;

    for uri in ["/api/progress?create=maybe", "/api/progress/games?limit=-3"] {
      let (status, body) =
        call(&app, request(Method::GET, uri, Some(1), None)).await;
      assert_eq!(status, StatusCode::BAD_REQUEST);
      assert_eq!(body["success"], false);
      assert!(body["error"].as_str().is_some());
    }
  }

  #[tokio::test]
  async fn test_levels_listed() {
    let app = app().await;

    let (status, body) =
      call(&app, request(Method::GET, "/api/levels", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(8));
    assert_eq!(body[1]["xp_required"], 100);
  }
}
