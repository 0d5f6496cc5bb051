//! Read side of import batches: `GET /imports/{id}`.

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::{DateTime, Utc};
use memoria_core::{import::ImportStatus, store::MemorialStore};
use serde::Serialize;
use uuid::Uuid;

use crate::{AppState, auth::CurrentUser, error::ApiError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBatchResponse {
  pub import_id:           Uuid,
  pub file_name:           String,
  pub status:              ImportStatus,
  pub individuals_parsed:  u32,
  pub memorials_created:   u32,
  pub connections_created: u32,
  pub created_by:          Uuid,
  pub created_at:          DateTime<Utc>,
  pub completed_at:        Option<DateTime<Utc>>,
}

/// Fetch a single import batch by id. 404 when unknown.
pub async fn get<S>(
  State(state): State<AppState<S>>,
  _user: CurrentUser,
  Path(import_id): Path<Uuid>,
) -> Result<Json<ImportBatchResponse>, ApiError>
where
  S: MemorialStore + 'static,
{
  let batch = state
    .store
    .get_import_batch(import_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("import batch {import_id} not found"))
    })?;

  Ok(Json(ImportBatchResponse {
    import_id:           batch.import_id,
    file_name:           batch.file_name,
    status:              batch.status,
    individuals_parsed:  batch.individuals_parsed,
    memorials_created:   batch.memorials_created,
    connections_created: batch.connections_created,
    created_by:          batch.created_by,
    created_at:          batch.created_at,
    completed_at:        batch.completed_at,
  }))
}
