//! Memorial — the persisted unit the import pipeline creates.
//!
//! A memorial created by the importer always starts as a `Draft` with
//! `source = Gedcom`; curator editing and scout-mode flows mutate it later
//! through surfaces outside this repository. It is never deleted here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication state of a memorial page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemorialStatus {
  Draft,
  Published,
}

/// Provenance of a memorial record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemorialSource {
  Manual,
  Gedcom,
}

/// A persisted memorial record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memorial {
  /// Slug-style identifier derived from the name plus a short suffix,
  /// e.g. `john-smith-i1`. Unique across all memorials.
  pub memorial_id:    String,
  pub name:           String,
  pub birth_date:     Option<NaiveDate>,
  pub death_date:     Option<NaiveDate>,
  /// Best-effort: burial place, falling back to death place.
  pub cemetery_name:  Option<String>,
  pub status:         MemorialStatus,
  pub source:         MemorialSource,
  /// The import batch that created this memorial, if imported.
  pub import_id:      Option<Uuid>,
  /// The gravesite still needs a map pin (crowdsourced later).
  pub needs_location: bool,
  /// No burial place was known at import time.
  pub needs_cemetery: bool,
  /// The importing user becomes the sole initial curator.
  pub owner_id:       Uuid,
  pub created_at:     DateTime<Utc>,
}

/// Input for creating a memorial; the store assigns `created_at`.
#[derive(Debug, Clone)]
pub struct NewMemorial {
  pub memorial_id:    String,
  pub name:           String,
  pub birth_date:     Option<NaiveDate>,
  pub death_date:     Option<NaiveDate>,
  pub cemetery_name:  Option<String>,
  pub status:         MemorialStatus,
  pub source:         MemorialSource,
  pub import_id:      Option<Uuid>,
  pub needs_location: bool,
  pub needs_cemetery: bool,
  pub owner_id:       Uuid,
}
