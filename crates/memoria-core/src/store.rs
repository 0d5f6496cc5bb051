//! The `MemorialStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g.
//! `memoria-store-sqlite`). Higher layers (`memoria-import`, `memoria-api`)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  connection::{Connection, NewConnection},
  import::{ImportBatch, ImportStatus, NewImportBatch},
  memorial::{Memorial, NewMemorial},
};

// ─── Error classification ────────────────────────────────────────────────────

/// Lets callers recognise an identifier-collision rejection without knowing
/// the backend. The importer's retry-once rule depends on this distinction;
/// every other failure is opaque.
pub trait DuplicateKey {
  fn is_duplicate_key(&self) -> bool;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Memoria storage backend.
///
/// Writes are independent single-row operations with no transaction
/// spanning them; the importer enforces "memorials before the connections
/// that reference them" structurally, not through the store.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait MemorialStore: Send + Sync {
  type Error: std::error::Error + DuplicateKey + Send + Sync + 'static;

  // ── Memorials ─────────────────────────────────────────────────────────

  /// Persist a new memorial. Fails with a duplicate-key error (detectable
  /// via [`DuplicateKey`]) when `memorial_id` is already taken.
  fn create_memorial(
    &self,
    input: NewMemorial,
  ) -> impl Future<Output = Result<Memorial, Self::Error>> + Send + '_;

  /// Retrieve a memorial by id. Returns `None` if not found.
  fn get_memorial<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Memorial>, Self::Error>> + Send + 'a;

  /// List all memorials created by `import_id`, in creation order.
  fn list_memorials_for_import(
    &self,
    import_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Memorial>, Self::Error>> + Send + '_;

  // ── Connections ───────────────────────────────────────────────────────

  /// Persist a relationship edge. Fails with a duplicate-key error when an
  /// identical `(from, to, kind)` edge already exists.
  fn create_connection(
    &self,
    input: NewConnection,
  ) -> impl Future<Output = Result<Connection, Self::Error>> + Send + '_;

  /// List all edges whose source is `memorial_id`, in creation order.
  fn list_connections_from<'a>(
    &'a self,
    memorial_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Connection>, Self::Error>> + Send + 'a;

  // ── Import batches ────────────────────────────────────────────────────

  /// Open a batch with status `Processing`.
  fn create_import_batch(
    &self,
    input: NewImportBatch,
  ) -> impl Future<Output = Result<ImportBatch, Self::Error>> + Send + '_;

  /// Finalise a batch: record counts, the terminal status, and the
  /// completion timestamp.
  fn complete_import_batch(
    &self,
    import_id: Uuid,
    memorials_created: u32,
    connections_created: u32,
    status: ImportStatus,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve a batch by id. Returns `None` if not found.
  fn get_import_batch(
    &self,
    import_id: Uuid,
  ) -> impl Future<Output = Result<Option<ImportBatch>, Self::Error>> + Send + '_;
}
