//! Handlers for the GEDCOM endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/gedcom/parse`  | Parse + transform; nothing is persisted |
//! | `POST` | `/gedcom/import` | Materialise selected candidates |

use axum::{Json, extract::State};
use memoria_core::{candidate::Candidate, store::MemorialStore};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  auth::CurrentUser,
  error::ApiError,
};

/// How many candidates the parse response previews inline; the client gets
/// the full set in `allMemorials` either way.
const PREVIEW_LIMIT: usize = 50;

// ─── Parse ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseBody {
  pub gedcom_text: String,
  pub file_name:   String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseStats {
  pub total_individuals:    u32,
  pub deceased_individuals: u32,
  pub living_individuals:   u32,
  pub families:             u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
  pub stats:         ParseStats,
  pub preview:       Vec<Candidate>,
  pub all_memorials: Vec<Candidate>,
}

/// `POST /gedcom/parse` — body: `{"gedcomText": …, "fileName": …}`.
///
/// Pure preview: parses and transforms without touching the store. Parsing
/// never fails, so the only error paths are auth and malformed JSON.
pub async fn parse<S>(
  State(_state): State<AppState<S>>,
  _user: CurrentUser,
  Json(body): Json<ParseBody>,
) -> Result<Json<ParseResponse>, ApiError>
where
  S: MemorialStore + 'static,
{
  let parsed = memoria_gedcom::parse(&body.gedcom_text);
  let outcome = memoria_gedcom::transform(&parsed);

  tracing::info!(
    file_name = %body.file_name,
    individuals = outcome.total,
    deceased = outcome.deceased,
    "gedcom file parsed"
  );

  let preview = outcome
    .memorials
    .iter()
    .take(PREVIEW_LIMIT)
    .cloned()
    .collect();

  Ok(Json(ParseResponse {
    stats: ParseStats {
      total_individuals:    outcome.total,
      deceased_individuals: outcome.deceased,
      living_individuals:   outcome.living,
      families:             outcome.families,
    },
    preview,
    all_memorials: outcome.memorials,
  }))
}

// ─── Import ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBody {
  pub file_name:    String,
  pub memorials:    Vec<Candidate>,
  #[serde(default)]
  pub selected_ids: Option<Vec<String>>,
}

/// `POST /gedcom/import` — materialise candidates for the authenticated
/// user.
///
/// Row-level persistence failures ride inside the 200 response; only the
/// two validation errors (nothing supplied, nothing selected) become 400s.
pub async fn import<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<ImportBody>,
) -> Result<Json<memoria_import::ImportOutcome>, ApiError>
where
  S: MemorialStore + 'static,
{
  let outcome = memoria_import::materialize(
    state.store.as_ref(),
    &body.file_name,
    &body.memorials,
    body.selected_ids.as_deref(),
    user.0,
  )
  .await
  .map_err(|e| match e {
    memoria_import::Error::EmptyCandidateList
    | memoria_import::Error::NoIndividualsSelected => {
      ApiError::BadRequest(e.to_string())
    }
    memoria_import::Error::Batch(inner) => ApiError::Store(inner),
  })?;

  Ok(Json(outcome))
}
