//! Error types for `memoria-import`.
//!
//! Only the two validation variants abort a batch; every per-row
//! persistence failure is demoted to a [`RowError`](crate::RowError) inside
//! the returned outcome.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no candidates supplied for import")]
  EmptyCandidateList,

  #[error("no individuals selected for import")]
  NoIndividualsSelected,

  /// The audit batch record itself could not be opened or finalised.
  #[error("import batch bookkeeping failed: {0}")]
  Batch(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
