//! Error types for `memoria-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("memorial not found: {0}")]
  MemorialNotFound(String),

  #[error("import batch not found: {0}")]
  ImportBatchNotFound(Uuid),

  #[error("unknown relation kind: {0:?}")]
  UnknownRelationKind(String),

  #[error("unknown memorial status: {0:?}")]
  UnknownMemorialStatus(String),

  #[error("unknown memorial source: {0:?}")]
  UnknownMemorialSource(String),

  #[error("unknown import status: {0:?}")]
  UnknownImportStatus(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
