//! Connections — directed relationship edges between two memorials.
//!
//! One row per edge. The storage layer enforces uniqueness over
//! `(from, to, kind)`; both A→B and B→A variants of a relation may be
//! recorded independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::candidate::RelationKind;

/// A persisted relationship edge between two memorials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
  pub connection_id:    Uuid,
  pub from_memorial_id: String,
  pub to_memorial_id:   String,
  pub kind:             RelationKind,
  /// Human-readable disambiguation, e.g. `Father` / `Mother`.
  pub label:            Option<String>,
  pub created_by:       Uuid,
  pub created_at:       DateTime<Utc>,
}

/// Input for creating a connection; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewConnection {
  pub from_memorial_id: String,
  pub to_memorial_id:   String,
  pub kind:             RelationKind,
  pub label:            Option<String>,
  pub created_by:       Uuid,
}
