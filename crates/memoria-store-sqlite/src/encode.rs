//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings, calendar dates as
//! `YYYY-MM-DD`, UUIDs as hyphenated lowercase strings, and enums as their
//! lowercase discriminants.

use chrono::{DateTime, NaiveDate, Utc};
use memoria_core::{
  candidate::RelationKind,
  connection::Connection,
  import::{ImportBatch, ImportStatus},
  memorial::{Memorial, MemorialSource, MemorialStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String {
  id.hyphenated().to_string()
}

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Ok(Uuid::parse_str(s)?)
}

// ─── DateTime<Utc> / NaiveDate ───────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String {
  d.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enum discriminants ──────────────────────────────────────────────────────

pub fn encode_memorial_status(s: MemorialStatus) -> &'static str {
  match s {
    MemorialStatus::Draft => "draft",
    MemorialStatus::Published => "published",
  }
}

pub fn decode_memorial_status(s: &str) -> Result<MemorialStatus> {
  match s {
    "draft" => Ok(MemorialStatus::Draft),
    "published" => Ok(MemorialStatus::Published),
    other => Err(memoria_core::Error::UnknownMemorialStatus(other.to_owned()).into()),
  }
}

pub fn encode_memorial_source(s: MemorialSource) -> &'static str {
  match s {
    MemorialSource::Manual => "manual",
    MemorialSource::Gedcom => "gedcom",
  }
}

pub fn decode_memorial_source(s: &str) -> Result<MemorialSource> {
  match s {
    "manual" => Ok(MemorialSource::Manual),
    "gedcom" => Ok(MemorialSource::Gedcom),
    other => Err(memoria_core::Error::UnknownMemorialSource(other.to_owned()).into()),
  }
}

pub fn decode_relation_kind(s: &str) -> Result<RelationKind> {
  match s {
    "spouse" => Ok(RelationKind::Spouse),
    "child" => Ok(RelationKind::Child),
    "parent" => Ok(RelationKind::Parent),
    other => Err(memoria_core::Error::UnknownRelationKind(other.to_owned()).into()),
  }
}

pub fn encode_import_status(s: ImportStatus) -> &'static str {
  match s {
    ImportStatus::Processing => "processing",
    ImportStatus::Completed => "completed",
    ImportStatus::Partial => "partial",
  }
}

pub fn decode_import_status(s: &str) -> Result<ImportStatus> {
  match s {
    "processing" => Ok(ImportStatus::Processing),
    "completed" => Ok(ImportStatus::Completed),
    "partial" => Ok(ImportStatus::Partial),
    other => Err(memoria_core::Error::UnknownImportStatus(other.to_owned()).into()),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `memorials` row.
pub struct RawMemorial {
  pub memorial_id:    String,
  pub name:           String,
  pub birth_date:     Option<String>,
  pub death_date:     Option<String>,
  pub cemetery_name:  Option<String>,
  pub status:         String,
  pub source:         String,
  pub import_id:      Option<String>,
  pub needs_location: bool,
  pub needs_cemetery: bool,
  pub owner_id:       String,
  pub created_at:     String,
}

impl RawMemorial {
  pub fn into_memorial(self) -> Result<Memorial> {
    Ok(Memorial {
      memorial_id:    self.memorial_id,
      name:           self.name,
      birth_date:     self.birth_date.as_deref().map(decode_date).transpose()?,
      death_date:     self.death_date.as_deref().map(decode_date).transpose()?,
      cemetery_name:  self.cemetery_name,
      status:         decode_memorial_status(&self.status)?,
      source:         decode_memorial_source(&self.source)?,
      import_id:      self.import_id.as_deref().map(decode_uuid).transpose()?,
      needs_location: self.needs_location,
      needs_cemetery: self.needs_cemetery,
      owner_id:       decode_uuid(&self.owner_id)?,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `connections` row.
pub struct RawConnection {
  pub connection_id:    String,
  pub from_memorial_id: String,
  pub to_memorial_id:   String,
  pub kind:             String,
  pub label:            Option<String>,
  pub created_by:       String,
  pub created_at:       String,
}

impl RawConnection {
  pub fn into_connection(self) -> Result<Connection> {
    Ok(Connection {
      connection_id:    decode_uuid(&self.connection_id)?,
      from_memorial_id: self.from_memorial_id,
      to_memorial_id:   self.to_memorial_id,
      kind:             decode_relation_kind(&self.kind)?,
      label:            self.label,
      created_by:       decode_uuid(&self.created_by)?,
      created_at:       decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `import_batches` row.
pub struct RawImportBatch {
  pub import_id:           String,
  pub file_name:           String,
  pub individuals_parsed:  u32,
  pub memorials_created:   u32,
  pub connections_created: u32,
  pub status:              String,
  pub created_by:          String,
  pub created_at:          String,
  pub completed_at:        Option<String>,
}

impl RawImportBatch {
  pub fn into_batch(self) -> Result<ImportBatch> {
    Ok(ImportBatch {
      import_id:           decode_uuid(&self.import_id)?,
      file_name:           self.file_name,
      individuals_parsed:  self.individuals_parsed,
      memorials_created:   self.memorials_created,
      connections_created: self.connections_created,
      status:              decode_import_status(&self.status)?,
      created_by:          decode_uuid(&self.created_by)?,
      created_at:          decode_dt(&self.created_at)?,
      completed_at:        self
        .completed_at
        .as_deref()
        .map(decode_dt)
        .transpose()?,
    })
  }
}
