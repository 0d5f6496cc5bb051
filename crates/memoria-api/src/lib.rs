//! JSON REST API for the Memoria GEDCOM import pipeline.
//!
//! Exposes an axum [`Router`] backed by any
//! [`memoria_core::store::MemorialStore`]. Three endpoints: a stateless
//! parse preview, the import itself, and batch progress lookup. All of
//! them require a bearer token.

pub mod auth;
pub mod error;
pub mod gedcom;
pub mod imports;

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use memoria_core::store::MemorialStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use auth::AuthConfig;
pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:        String,
  pub port:        u16,
  pub store_path:  PathBuf,
  /// Accepted bearer tokens, keyed by token value.
  pub auth_tokens: HashMap<String, Uuid>,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S: MemorialStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// Manual impl so `S` itself need not be `Clone`.
impl<S: MemorialStore> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      auth:  Arc::clone(&self.auth),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the import API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: MemorialStore + 'static,
{
  Router::new()
    .route("/gedcom/parse", post(gedcom::parse::<S>))
    .route("/gedcom/import", post(gedcom::import::<S>))
    .route("/imports/{id}", get(imports::get::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use memoria_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  const SMITHS: &str = "\
0 HEAD
0 @I1@ INDI
1 NAME John /Smith/
1 SEX M
1 BIRT
2 DATE 4 MAR 1920
1 DEAT
2 DATE 1 JAN 1995
2 PLAC Springfield
1 FAMS @F1@
0 @I2@ INDI
1 NAME Jane /Smith/
1 SEX F
1 DEAT
2 DATE 2001
1 FAMS @F1@
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
0 TRLR
";

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      store: Arc::new(store),
      auth:  Arc::new(AuthConfig::new([(
        "sesame".to_string(),
        Uuid::new_v4(),
      )])),
    }
  }

  async fn oneshot_json(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn parse_body() -> Value {
    json!({ "gedcomText": SMITHS, "fileName": "smiths.ged" })
  }

  // ── Auth ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unauthenticated_requests_return_401() {
    let state = make_state().await;
    let req = Request::builder()
      .method("POST")
      .uri("/gedcom/parse")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(parse_body().to_string()))
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  // ── Parse ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn parse_returns_stats_and_candidates() {
    let state = make_state().await;
    let (status, body) = oneshot_json(
      state,
      "POST",
      "/gedcom/parse",
      Some("sesame"),
      Some(parse_body()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["totalIndividuals"], 2);
    assert_eq!(body["stats"]["deceasedIndividuals"], 2);
    assert_eq!(body["stats"]["livingIndividuals"], 0);
    assert_eq!(body["stats"]["families"], 1);

    let all = body["allMemorials"].as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["sourceId"], "I1");
    assert_eq!(all[0]["name"], "John Smith");
    assert_eq!(all[0]["birthDate"], "1920-03-04");
    assert_eq!(all[0]["relationships"][0]["kind"], "spouse");
    assert_eq!(all[0]["relationships"][0]["targetId"], "I2");
  }

  // ── Import ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn import_selected_subset_then_fetch_batch() {
    let state = make_state().await;
    let (_, parsed) = oneshot_json(
      state.clone(),
      "POST",
      "/gedcom/parse",
      Some("sesame"),
      Some(parse_body()),
    )
    .await;

    let (status, outcome) = oneshot_json(
      state.clone(),
      "POST",
      "/gedcom/import",
      Some("sesame"),
      Some(json!({
        "fileName":    "smiths.ged",
        "memorials":   parsed["allMemorials"],
        "selectedIds": ["I1"],
      })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["stats"]["requested"], 1);
    assert_eq!(outcome["stats"]["created"], 1);
    // Jane was not selected, so John's spouse edge has no target.
    assert_eq!(outcome["stats"]["connections"], 0);
    assert_eq!(outcome["stats"]["errors"], 0);
    assert!(outcome.get("errors").is_none());
    assert_eq!(outcome["memorials"][0]["name"], "John Smith");

    let import_id = outcome["importId"].as_str().unwrap().to_string();
    let (status, batch) = oneshot_json(
      state,
      "GET",
      &format!("/imports/{import_id}"),
      Some("sesame"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(batch["status"], "completed");
    assert_eq!(batch["individualsParsed"], 2);
    assert_eq!(batch["memorialsCreated"], 1);
    assert_eq!(batch["connectionsCreated"], 0);
  }

  #[tokio::test]
  async fn import_both_spouses_links_them() {
    let state = make_state().await;
    let (_, parsed) = oneshot_json(
      state.clone(),
      "POST",
      "/gedcom/parse",
      Some("sesame"),
      Some(parse_body()),
    )
    .await;

    let (status, outcome) = oneshot_json(
      state,
      "POST",
      "/gedcom/import",
      Some("sesame"),
      Some(json!({
        "fileName":  "smiths.ged",
        "memorials": parsed["allMemorials"],
      })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["stats"]["created"], 2);
    assert_eq!(outcome["stats"]["connections"], 2);
  }

  #[tokio::test]
  async fn import_with_no_candidates_is_400() {
    let state = make_state().await;
    let (status, body) = oneshot_json(
      state,
      "POST",
      "/gedcom/import",
      Some("sesame"),
      Some(json!({ "fileName": "empty.ged", "memorials": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("no candidates"));
  }

  #[tokio::test]
  async fn unknown_import_batch_is_404() {
    let state = make_state().await;
    let (status, _) = oneshot_json(
      state,
      "GET",
      &format!("/imports/{}", Uuid::new_v4()),
      Some("sesame"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
