//! Memorial candidates — transformed, not-yet-persisted prospective
//! memorials.
//!
//! A candidate is produced by the genealogy transformer from one parsed
//! individual and round-trips the HTTP boundary as JSON (parse preview →
//! client selection → import request), hence the camelCase serde names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Relationship edges ──────────────────────────────────────────────────────

/// The kind of a relationship edge between two candidates (and, once
/// materialised, between two memorials).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
  Spouse,
  Child,
  Parent,
}

impl RelationKind {
  /// The discriminant string stored in the `kind` column.
  pub fn as_str(&self) -> &'static str {
    match self {
      RelationKind::Spouse => "spouse",
      RelationKind::Child => "child",
      RelationKind::Parent => "parent",
    }
  }
}

/// One directed relationship from the owning candidate to `target_id`.
///
/// `target_name` is denormalised so the import preview can render a
/// human-readable edge without resolving the target again.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEdge {
  pub kind:        RelationKind,
  /// Only parent edges carry a label (`Father` / `Mother`).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label:       Option<String>,
  pub target_id:   String,
  pub target_name: String,
}

// ─── Candidate ───────────────────────────────────────────────────────────────

/// A prospective memorial assembled from one GEDCOM individual.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
  /// Identifier carried from the source file (xref id, `@` stripped).
  pub source_id:     String,
  pub name:          String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub sex:           Option<String>,
  /// Normalised to ISO; month/day default to 01 for partial dates.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub birth_date:    Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub birth_place:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub death_date:    Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub death_place:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub burial_place:  Option<String>,
  #[serde(default)]
  pub relationships: Vec<RelationshipEdge>,
}

impl Candidate {
  /// A candidate is importable iff any death evidence is present: a death
  /// date, a death place, or a burial place. Everyone else is classified
  /// living and excluded from the importable set.
  pub fn is_deceased(&self) -> bool {
    self.death_date.is_some()
      || self.death_place.is_some()
      || self.burial_place.is_some()
  }
}
