//! Materializer tests against an in-memory mock store.
//!
//! The mock lets individual rows be engineered to fail — a duplicate-key
//! rejection for configured names, pre-seeded taken ids for collision
//! tests, and a switch that fails every connection insert.

use std::{
  collections::{HashMap, HashSet},
  sync::Mutex,
};

use chrono::Utc;
use memoria_core::{
  candidate::{Candidate, RelationKind, RelationshipEdge},
  connection::{Connection, NewConnection},
  import::{ImportBatch, ImportStatus, NewImportBatch},
  memorial::{Memorial, NewMemorial},
  store::{DuplicateKey, MemorialStore},
};
use uuid::Uuid;

use crate::{Error, materialize};

// ─── Mock store ──────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
enum MockError {
  #[error("duplicate key")]
  Duplicate,
  #[error("backend unavailable")]
  Backend,
}

impl DuplicateKey for MockError {
  fn is_duplicate_key(&self) -> bool {
    matches!(self, MockError::Duplicate)
  }
}

#[derive(Default)]
struct MockStore {
  memorials:   Mutex<HashMap<String, Memorial>>,
  connections: Mutex<Vec<Connection>>,
  batches:     Mutex<HashMap<Uuid, ImportBatch>>,
  /// Names whose create always reports a duplicate key (both attempts).
  cursed_names:     HashSet<String>,
  /// When set, every connection insert fails.
  fail_connections: bool,
}

impl MockStore {
  fn with_taken_id(self, id: &str) -> Self {
    let memorial = Memorial {
      memorial_id:    id.to_string(),
      name:           "Occupant".to_string(),
      birth_date:     None,
      death_date:     None,
      cemetery_name:  None,
      status:         memoria_core::memorial::MemorialStatus::Draft,
      source:         memoria_core::memorial::MemorialSource::Manual,
      import_id:      None,
      needs_location: false,
      needs_cemetery: false,
      owner_id:       Uuid::new_v4(),
      created_at:     Utc::now(),
    };
    self
      .memorials
      .lock()
      .unwrap()
      .insert(id.to_string(), memorial);
    self
  }
}

impl MemorialStore for MockStore {
  type Error = MockError;

  async fn create_memorial(
    &self,
    input: NewMemorial,
  ) -> Result<Memorial, MockError> {
    if self.cursed_names.contains(&input.name) {
      return Err(MockError::Duplicate);
    }
    let mut memorials = self.memorials.lock().unwrap();
    if memorials.contains_key(&input.memorial_id) {
      return Err(MockError::Duplicate);
    }
    let memorial = Memorial {
      memorial_id:    input.memorial_id.clone(),
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
    memorials.insert(input.memorial_id, memorial.clone());
    Ok(memorial)
  }

  async fn get_memorial(&self, id: &str) -> Result<Option<Memorial>, MockError> {
    Ok(self.memorials.lock().unwrap().get(id).cloned())
  }

  async fn list_memorials_for_import(
    &self,
    import_id: Uuid,
  ) -> Result<Vec<Memorial>, MockError> {
    Ok(
      self
        .memorials
        .lock()
        .unwrap()
        .values()
        .filter(|m| m.import_id == Some(import_id))
        .cloned()
        .collect(),
    )
  }

  async fn create_connection(
    &self,
    input: NewConnection,
  ) -> Result<Connection, MockError> {
    if self.fail_connections {
      return Err(MockError::Backend);
    }
    let mut connections = self.connections.lock().unwrap();
    let exists = connections.iter().any(|c| {
      c.from_memorial_id == input.from_memorial_id
        && c.to_memorial_id == input.to_memorial_id
        && c.kind == input.kind
    });
    if exists {
      return Err(MockError::Duplicate);
    }
    let connection = Connection {
      connection_id:    Uuid::new_v4(),
      from_memorial_id: input.from_memorial_id,
      to_memorial_id:   input.to_memorial_id,
      kind:             input.kind,
      label:            input.label,
      created_by:       input.created_by,
      created_at:       Utc::now(),
    };
    connections.push(connection.clone());
    Ok(connection)
  }

  async fn list_connections_from(
    &self,
    memorial_id: &str,
  ) -> Result<Vec<Connection>, MockError> {
    Ok(
      self
        .connections
        .lock()
        .unwrap()
        .iter()
        .filter(|c| c.from_memorial_id == memorial_id)
        .cloned()
        .collect(),
    )
  }

  async fn create_import_batch(
    &self,
    input: NewImportBatch,
  ) -> Result<ImportBatch, MockError> {
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
    self
      .batches
      .lock()
      .unwrap()
      .insert(batch.import_id, batch.clone());
    Ok(batch)
  }

  async fn complete_import_batch(
    &self,
    import_id: Uuid,
    memorials_created: u32,
    connections_created: u32,
    status: ImportStatus,
  ) -> Result<(), MockError> {
    let mut batches = self.batches.lock().unwrap();
    let batch = batches.get_mut(&import_id).ok_or(MockError::Backend)?;
    batch.memorials_created = memorials_created;
    batch.connections_created = connections_created;
    batch.status = status;
    batch.completed_at = Some(Utc::now());
    Ok(())
  }

  async fn get_import_batch(
    &self,
    import_id: Uuid,
  ) -> Result<Option<ImportBatch>, MockError> {
    Ok(self.batches.lock().unwrap().get(&import_id).cloned())
  }
}

// ─── Candidate builders ──────────────────────────────────────────────────────

fn candidate(source_id: &str, name: &str) -> Candidate {
  Candidate {
    source_id:     source_id.to_string(),
    name:          name.to_string(),
    sex:           None,
    birth_date:    None,
    death_date:    chrono::NaiveDate::from_ymd_opt(1990, 1, 1),
    birth_place:   None,
    death_place:   None,
    burial_place:  None,
    relationships: vec![],
  }
}

fn spouse_edge(target_id: &str, target_name: &str) -> RelationshipEdge {
  RelationshipEdge {
    kind:        RelationKind::Spouse,
    label:       None,
    target_id:   target_id.to_string(),
    target_name: target_name.to_string(),
  }
}

fn importer() -> Uuid {
  Uuid::new_v4()
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_candidate_list_is_rejected() {
  let store = MockStore::default();
  let result = materialize(&store, "empty.ged", &[], None, importer()).await;
  assert!(matches!(result, Err(Error::EmptyCandidateList)));
}

#[tokio::test]
async fn empty_selection_after_filtering_is_rejected() {
  let store = MockStore::default();
  let candidates = vec![candidate("I1", "John Smith")];
  let selected = vec!["I999".to_string()];
  let result =
    materialize(&store, "f.ged", &candidates, Some(&selected), importer())
      .await;
  assert!(matches!(result, Err(Error::NoIndividualsSelected)));
}

// ─── Happy path ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn creates_memorials_and_connections() {
  let store = MockStore::default();
  let mut john = candidate("I1", "John Smith");
  john.relationships.push(spouse_edge("I2", "Jane Smith"));
  let mut jane = candidate("I2", "Jane Smith");
  jane.relationships.push(spouse_edge("I1", "John Smith"));

  let outcome =
    materialize(&store, "smiths.ged", &[john, jane], None, importer())
      .await
      .unwrap();

  assert_eq!(outcome.stats.requested, 2);
  assert_eq!(outcome.stats.created, 2);
  assert_eq!(outcome.stats.connections, 2);
  assert_eq!(outcome.stats.errors, 0);
  assert!(outcome.errors.is_empty());

  let batch = store
    .get_import_batch(outcome.import_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(batch.status, ImportStatus::Completed);
  assert_eq!(batch.memorials_created, 2);
  assert_eq!(batch.connections_created, 2);
  assert!(batch.completed_at.is_some());
}

#[tokio::test]
async fn connections_only_reference_created_memorials() {
  // Two-pass ordering invariant: every persisted edge's endpoints are in
  // the set of ids created by this batch.
  let store = MockStore::default();
  let mut john = candidate("I1", "John Smith");
  john.relationships.push(spouse_edge("I2", "Jane Smith"));
  let mut jane = candidate("I2", "Jane Smith");
  jane.relationships.push(spouse_edge("I1", "John Smith"));

  let outcome =
    materialize(&store, "smiths.ged", &[john, jane], None, importer())
      .await
      .unwrap();

  let created: HashSet<&str> =
    outcome.memorials.iter().map(|m| m.id.as_str()).collect();
  let connections = store.connections.lock().unwrap();
  for c in connections.iter() {
    assert!(created.contains(c.from_memorial_id.as_str()));
    assert!(created.contains(c.to_memorial_id.as_str()));
  }
}

#[tokio::test]
async fn edge_to_unmaterialized_target_is_skipped() {
  // John selected alone; his spouse edge points at Jane, who was never
  // materialised. Zero connections, zero errors.
  let store = MockStore::default();
  let mut john = candidate("I1", "John Smith");
  john.relationships.push(spouse_edge("I2", "Jane Smith"));
  let jane = candidate("I2", "Jane Smith");

  let selected = vec!["I1".to_string()];
  let outcome = materialize(
    &store,
    "smiths.ged",
    &[john, jane],
    Some(&selected),
    importer(),
  )
  .await
  .unwrap();

  assert_eq!(outcome.stats.requested, 1);
  assert_eq!(outcome.stats.created, 1);
  assert_eq!(outcome.stats.connections, 0);
  assert_eq!(outcome.stats.errors, 0);
}

// ─── Needs flags and cemetery fallback ───────────────────────────────────────

#[tokio::test]
async fn needs_flags_and_cemetery_fallback() {
  let store = MockStore::default();

  let mut buried = candidate("I1", "John Smith");
  buried.burial_place = Some("Oak Hill Cemetery".to_string());
  let mut unburied = candidate("I2", "Jane Doe");
  unburied.death_place = Some("Springfield".to_string());

  let outcome =
    materialize(&store, "f.ged", &[buried, unburied], None, importer())
      .await
      .unwrap();

  let john = &outcome.memorials[0];
  assert!(john.needs_location, "every import needs a map pin");
  assert!(!john.needs_cemetery);
  let stored = store.get_memorial(&john.id).await.unwrap().unwrap();
  assert_eq!(stored.cemetery_name, Some("Oak Hill Cemetery".to_string()));

  let jane = &outcome.memorials[1];
  assert!(jane.needs_location);
  assert!(jane.needs_cemetery);
  let stored = store.get_memorial(&jane.id).await.unwrap().unwrap();
  // No burial place: cemetery falls back to the death place.
  assert_eq!(stored.cemetery_name, Some("Springfield".to_string()));
}

// ─── Collision retry ─────────────────────────────────────────────────────────

#[tokio::test]
async fn id_collision_is_retried_once_and_succeeds() {
  let store = MockStore::default().with_taken_id("john-smith-i1");
  let outcome = materialize(
    &store,
    "f.ged",
    &[candidate("I1", "John Smith")],
    None,
    importer(),
  )
  .await
  .unwrap();

  assert_eq!(outcome.stats.created, 1);
  assert_eq!(outcome.stats.errors, 0);
  let id = &outcome.memorials[0].id;
  assert_ne!(id, "john-smith-i1");
  assert!(id.starts_with("john-smith-"));
}

#[tokio::test]
async fn double_collision_becomes_row_error_and_batch_continues() {
  let mut store = MockStore::default();
  store.cursed_names.insert("Cursed Person".to_string());

  let candidates = vec![
    candidate("I1", "John Smith"),
    candidate("I2", "Cursed Person"),
    candidate("I3", "Jane Doe"),
  ];
  let outcome = materialize(&store, "f.ged", &candidates, None, importer())
    .await
    .unwrap();

  assert_eq!(outcome.stats.requested, 3);
  assert_eq!(outcome.stats.created, 2);
  assert_eq!(outcome.errors.len(), 1);
  assert_eq!(outcome.errors[0].source_id, "I2");
  assert_eq!(outcome.errors[0].name, "Cursed Person");

  let batch = store
    .get_import_batch(outcome.import_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(batch.status, ImportStatus::Partial);
}

#[tokio::test]
async fn failed_candidate_never_appears_in_connections() {
  let mut store = MockStore::default();
  store.cursed_names.insert("Cursed Person".to_string());

  let mut john = candidate("I1", "John Smith");
  john.relationships.push(spouse_edge("I2", "Cursed Person"));
  let mut cursed = candidate("I2", "Cursed Person");
  cursed.relationships.push(spouse_edge("I1", "John Smith"));

  let outcome = materialize(&store, "f.ged", &[john, cursed], None, importer())
    .await
    .unwrap();

  // The cursed candidate never entered the id map, so both its outgoing
  // edge and John's edge towards it resolve to nothing.
  assert_eq!(outcome.stats.created, 1);
  assert_eq!(outcome.stats.connections, 0);
  assert!(store.connections.lock().unwrap().is_empty());
}

// ─── Connection failure tolerance ────────────────────────────────────────────

#[tokio::test]
async fn connection_failures_are_swallowed() {
  let mut store = MockStore::default();
  store.fail_connections = true;

  let mut john = candidate("I1", "John Smith");
  john.relationships.push(spouse_edge("I2", "Jane Smith"));
  let jane = candidate("I2", "Jane Smith");

  let outcome = materialize(&store, "f.ged", &[john, jane], None, importer())
    .await
    .unwrap();

  assert_eq!(outcome.stats.created, 2);
  assert_eq!(outcome.stats.connections, 0);
  assert_eq!(outcome.stats.errors, 0);

  let batch = store
    .get_import_batch(outcome.import_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(batch.status, ImportStatus::Completed);
}
