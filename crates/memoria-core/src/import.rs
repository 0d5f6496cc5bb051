//! Import batch records — audit trail for one materializer invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of an import batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
  Processing,
  Completed,
  /// Finished, but one or more candidates failed to materialise.
  Partial,
}

/// One row per materializer invocation; exists purely for audit/progress
/// display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
  pub import_id:           Uuid,
  pub file_name:           String,
  pub individuals_parsed:  u32,
  pub memorials_created:   u32,
  pub connections_created: u32,
  pub status:              ImportStatus,
  pub created_by:          Uuid,
  pub created_at:          DateTime<Utc>,
  pub completed_at:        Option<DateTime<Utc>>,
}

/// Input for opening a batch; counts are zero until finalisation.
#[derive(Debug, Clone)]
pub struct NewImportBatch {
  pub file_name:          String,
  pub individuals_parsed: u32,
  pub created_by:         Uuid,
}
