//! [`SqliteStore`] — the SQLite implementation of [`MemorialStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use memoria_core::{
  connection::{Connection, NewConnection},
  import::{ImportBatch, ImportStatus, NewImportBatch},
  memorial::{Memorial, NewMemorial},
  store::MemorialStore,
};

use crate::{
  Error, Result,
  encode::{
    RawConnection, RawImportBatch, RawMemorial, encode_date, encode_dt,
    encode_import_status, encode_memorial_source, encode_memorial_status,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Memoria store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── MemorialStore impl ──────────────────────────────────────────────────────

impl MemorialStore for SqliteStore {
  type Error = Error;

  // ── Memorials ─────────────────────────────────────────────────────────────

  async fn create_memorial(&self, input: NewMemorial) -> Result<Memorial> {
    let memorial = Memorial {
      memorial_id:    input.memorial_id,
      name:           input.name,
      birth_date:     input.birth_date,
      death_date:     input.death_date,
      cemetery_name:  input.cemetery_name,
      status:         input.status,
      source:         input.source,
      import_id:      input.import_id,
      needs_location: input.needs_location,
      needs_cemetery: input.needs_cemetery,
      owner_id:       input.owner_id,
      created_at:     Utc::now(),
    };

    let id            = memorial.memorial_id.clone();
    let name          = memorial.name.clone();
    let birth_str     = memorial.birth_date.map(encode_date);
    let death_str     = memorial.death_date.map(encode_date);
    let cemetery      = memorial.cemetery_name.clone();
    let status_str    = encode_memorial_status(memorial.status).to_owned();
    let source_str    = encode_memorial_source(memorial.source).to_owned();
    let import_id_str = memorial.import_id.map(encode_uuid);
    let needs_loc     = memorial.needs_location;
    let needs_cem     = memorial.needs_cemetery;
    let owner_str     = encode_uuid(memorial.owner_id);
    let at_str        = encode_dt(memorial.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO memorials (
             memorial_id, name, birth_date, death_date, cemetery_name,
             status, source, import_id, needs_location, needs_cemetery,
             owner_id, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          rusqlite::params![
            id,
            name,
            birth_str,
            death_str,
            cemetery,
            status_str,
            source_str,
            import_id_str,
            needs_loc,
            needs_cem,
            owner_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(memorial)
  }

  async fn get_memorial(&self, id: &str) -> Result<Option<Memorial>> {
    let id = id.to_owned();

    let raw: Option<RawMemorial> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT memorial_id, name, birth_date, death_date,
                      cemetery_name, status, source, import_id,
                      needs_location, needs_cemetery, owner_id, created_at
               FROM memorials WHERE memorial_id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(RawMemorial {
                  memorial_id:    row.get(0)?,
                  name:           row.get(1)?,
                  birth_date:     row.get(2)?,
                  death_date:     row.get(3)?,
                  cemetery_name:  row.get(4)?,
                  status:         row.get(5)?,
                  source:         row.get(6)?,
                  import_id:      row.get(7)?,
                  needs_location: row.get(8)?,
                  needs_cemetery: row.get(9)?,
                  owner_id:       row.get(10)?,
                  created_at:     row.get(11)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMemorial::into_memorial).transpose()
  }

  async fn list_memorials_for_import(
    &self,
    import_id: Uuid,
  ) -> Result<Vec<Memorial>> {
    let import_id_str = encode_uuid(import_id);

    let raws: Vec<RawMemorial> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT memorial_id, name, birth_date, death_date,
                  cemetery_name, status, source, import_id,
                  needs_location, needs_cemetery, owner_id, created_at
           FROM memorials WHERE import_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![import_id_str], |row| {
            Ok(RawMemorial {
              memorial_id:    row.get(0)?,
              name:           row.get(1)?,
              birth_date:     row.get(2)?,
              death_date:     row.get(3)?,
              cemetery_name:  row.get(4)?,
              status:         row.get(5)?,
              source:         row.get(6)?,
              import_id:      row.get(7)?,
              needs_location: row.get(8)?,
              needs_cemetery: row.get(9)?,
              owner_id:       row.get(10)?,
              created_at:     row.get(11)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMemorial::into_memorial).collect()
  }

  // ── Connections ───────────────────────────────────────────────────────────

  async fn create_connection(&self, input: NewConnection) -> Result<Connection> {
    let connection = Connection {
      connection_id:    Uuid::new_v4(),
      from_memorial_id: input.from_memorial_id,
      to_memorial_id:   input.to_memorial_id,
      kind:             input.kind,
      label:            input.label,
      created_by:       input.created_by,
      created_at:       Utc::now(),
    };

    let id_str     = encode_uuid(connection.connection_id);
    let from_id    = connection.from_memorial_id.clone();
    let to_id      = connection.to_memorial_id.clone();
    let kind_str   = connection.kind.as_str().to_owned();
    let label      = connection.label.clone();
    let by_str     = encode_uuid(connection.created_by);
    let at_str     = encode_dt(connection.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO connections (
             connection_id, from_memorial_id, to_memorial_id,
             kind, label, created_by, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![id_str, from_id, to_id, kind_str, label, by_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(connection)
  }

  async fn list_connections_from(
    &self,
    memorial_id: &str,
  ) -> Result<Vec<Connection>> {
    let memorial_id = memorial_id.to_owned();

    let raws: Vec<RawConnection> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT connection_id, from_memorial_id, to_memorial_id,
                  kind, label, created_by, created_at
           FROM connections WHERE from_memorial_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![memorial_id], |row| {
            Ok(RawConnection {
              connection_id:    row.get(0)?,
              from_memorial_id: row.get(1)?,
              to_memorial_id:   row.get(2)?,
              kind:             row.get(3)?,
              label:            row.get(4)?,
              created_by:       row.get(5)?,
              created_at:       row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawConnection::into_connection)
      .collect()
  }

  // ── Import batches ────────────────────────────────────────────────────────

  async fn create_import_batch(
    &self,
    input: NewImportBatch,
  ) -> Result<ImportBatch> {
    let batch = ImportBatch {
      import_id:           Uuid::new_v4(),
      file_name:           input.file_name,
      individuals_parsed:  input.individuals_parsed,
      memorials_created:   0,
      connections_created: 0,
      status:              ImportStatus::Processing,
      created_by:          input.created_by,
      created_at:          Utc::now(),
      completed_at:        None,
    };

    let id_str     = encode_uuid(batch.import_id);
    let file_name  = batch.file_name.clone();
    let parsed     = batch.individuals_parsed;
    let status_str = encode_import_status(batch.status).to_owned();
    let by_str     = encode_uuid(batch.created_by);
    let at_str     = encode_dt(batch.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO import_batches (
             import_id, file_name, individuals_parsed, status,
             created_by, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, file_name, parsed, status_str, by_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(batch)
  }

  async fn complete_import_batch(
    &self,
    import_id: Uuid,
    memorials_created: u32,
    connections_created: u32,
    status: ImportStatus,
  ) -> Result<()> {
    let id_str     = encode_uuid(import_id);
    let status_str = encode_import_status(status).to_owned();
    let at_str     = encode_dt(Utc::now());

    let updated: usize = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE import_batches
           SET memorials_created = ?2, connections_created = ?3,
               status = ?4, completed_at = ?5
           WHERE import_id = ?1",
          rusqlite::params![
            id_str,
            memorials_created,
            connections_created,
            status_str,
            at_str,
          ],
        )?;
        Ok(n)
      })
      .await?;

    if updated == 0 {
      return Err(Error::BatchNotFound(import_id));
    }
    Ok(())
  }

  async fn get_import_batch(
    &self,
    import_id: Uuid,
  ) -> Result<Option<ImportBatch>> {
    let id_str = encode_uuid(import_id);

    let raw: Option<RawImportBatch> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT import_id, file_name, individuals_parsed,
                      memorials_created, connections_created, status,
                      created_by, created_at, completed_at
               FROM import_batches WHERE import_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawImportBatch {
                  import_id:           row.get(0)?,
                  file_name:           row.get(1)?,
                  individuals_parsed:  row.get(2)?,
                  memorials_created:   row.get(3)?,
                  connections_created: row.get(4)?,
                  status:              row.get(5)?,
                  created_by:          row.get(6)?,
                  created_at:          row.get(7)?,
                  completed_at:        row.get(8)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawImportBatch::into_batch).transpose()
  }
}
