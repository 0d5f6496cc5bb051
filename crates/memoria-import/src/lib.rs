//! The import materializer — persists selected memorial candidates.
//!
//! Pipeline position: [`memoria_gedcom`] produces candidates, a human
//! selects a subset, and [`materialize`] turns the selection into durable
//! memorial and connection records against any
//! [`memoria_core::store::MemorialStore`].
//!
//! Two passes, sequential and in input order: memorials first (building a
//! source-id → memorial-id map), then connections resolved through that
//! map. The ordering guarantee "memorials before the connections that
//! reference them" is structural; no store transaction is involved.

pub mod error;
mod materialize;
mod slug;

pub use error::{Error, Result};
pub use materialize::{
  CreatedMemorial, ImportOutcome, ImportStats, RowError, materialize,
};
pub use slug::{memorial_id_for, slugify};

#[cfg(test)]
mod tests;
