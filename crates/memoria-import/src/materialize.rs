//! Two-pass materialization of memorial candidates.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use memoria_core::{
  candidate::Candidate,
  connection::NewConnection,
  import::{ImportStatus, NewImportBatch},
  memorial::{Memorial, MemorialSource, MemorialStatus, NewMemorial},
  store::{DuplicateKey, MemorialStore},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  error::{Error, Result},
  slug::{memorial_id_for, retry_memorial_id},
};

// ─── Outcome types ───────────────────────────────────────────────────────────

/// A per-candidate persistence failure. Never aborts the batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
  pub source_id: String,
  pub name:      String,
  pub detail:    String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
  /// Candidates remaining after `selected_ids` filtering.
  pub requested:   u32,
  pub created:     u32,
  pub connections: u32,
  pub errors:      u32,
}

/// What the caller needs to know about each created memorial — the two
/// `needs` flags signal that follow-up geodata collection is required.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedMemorial {
  pub id:             String,
  pub name:           String,
  pub needs_location: bool,
  pub needs_cemetery: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
  pub import_id: Uuid,
  pub stats:     ImportStats,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub errors:    Vec<RowError>,
  pub memorials: Vec<CreatedMemorial>,
}

// ─── Pass 1 helper ───────────────────────────────────────────────────────────

/// One candidate's create attempt. At most one retry, and only for a
/// duplicate-key rejection; the tagged shape keeps that contract explicit.
enum CreateAttempt {
  Created(Memorial),
  CollisionRetried(Memorial),
  Failed(String),
}

fn new_memorial(
  candidate: &Candidate,
  memorial_id: String,
  import_id: Uuid,
  owner_id: Uuid,
) -> NewMemorial {
  NewMemorial {
    memorial_id,
    name: candidate.name.clone(),
    birth_date: candidate.birth_date,
    death_date: candidate.death_date,
    // Best-effort cemetery: burial place, falling back to death place.
    cemetery_name: candidate
      .burial_place
      .clone()
      .or_else(|| candidate.death_place.clone()),
    status: MemorialStatus::Draft,
    source: MemorialSource::Gedcom,
    import_id: Some(import_id),
    // Geolocation is never known from GEDCOM data: every import needs a
    // map pin, and a missing burial place needs a cemetery too.
    needs_location: true,
    needs_cemetery: candidate.burial_place.is_none(),
    owner_id,
  }
}

async fn create_with_retry<M: MemorialStore>(
  store: &M,
  candidate: &Candidate,
  import_id: Uuid,
  owner_id: Uuid,
) -> CreateAttempt {
  let id = memorial_id_for(&candidate.name, &candidate.source_id);
  let input = new_memorial(candidate, id, import_id, owner_id);

  let first_error = match store.create_memorial(input).await {
    Ok(memorial) => return CreateAttempt::Created(memorial),
    Err(e) if e.is_duplicate_key() => e,
    Err(e) => return CreateAttempt::Failed(e.to_string()),
  };

  tracing::debug!(
    source_id = %candidate.source_id,
    "memorial id collision, retrying with derived suffix"
  );

  let retry_id = retry_memorial_id(
    &candidate.name,
    &candidate.source_id,
    Utc::now().timestamp_millis(),
  );
  let input = new_memorial(candidate, retry_id, import_id, owner_id);

  match store.create_memorial(input).await {
    Ok(memorial) => CreateAttempt::CollisionRetried(memorial),
    // Second failure for any reason ends this candidate's pipeline.
    Err(e) => CreateAttempt::Failed(format!(
      "retry after collision failed: {e} (first: {first_error})"
    )),
  }
}

// ─── Materializer ────────────────────────────────────────────────────────────

/// Materialise `candidates` (optionally filtered to `selected_ids`) as
/// memorial and connection records owned by `importer`.
///
/// Hard failures are limited to validation: an empty candidate list, or an
/// empty selection after filtering. All per-row persistence failures are
/// accumulated into the outcome's `errors` and the batch continues —
/// partial success is an expected, reported state, never a crash.
pub async fn materialize<M: MemorialStore>(
  store: &M,
  file_name: &str,
  candidates: &[Candidate],
  selected_ids: Option<&[String]>,
  importer: Uuid,
) -> Result<ImportOutcome> {
  if candidates.is_empty() {
    return Err(Error::EmptyCandidateList);
  }

  let selected: Vec<&Candidate> = match selected_ids {
    Some(ids) => {
      let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
      candidates
        .iter()
        .filter(|c| wanted.contains(c.source_id.as_str()))
        .collect()
    }
    None => candidates.iter().collect(),
  };
  if selected.is_empty() {
    return Err(Error::NoIndividualsSelected);
  }

  let batch = store
    .create_import_batch(NewImportBatch {
      file_name:          file_name.to_string(),
      individuals_parsed: candidates.len() as u32,
      created_by:         importer,
    })
    .await
    .map_err(|e| Error::Batch(Box::new(e)))?;
  let import_id = batch.import_id;

  tracing::info!(
    %import_id,
    file_name,
    requested = selected.len(),
    "import batch opened"
  );

  // Pass 1 — memorials, one candidate at a time, in input order. The map
  // from source id to persisted id is what pass 2 resolves edges through;
  // a candidate that fails here never enters it.
  let mut id_map: HashMap<&str, String> = HashMap::new();
  let mut errors: Vec<RowError> = Vec::new();
  let mut memorials: Vec<CreatedMemorial> = Vec::new();

  for candidate in &selected {
    match create_with_retry(store, candidate, import_id, importer).await {
      CreateAttempt::Created(m) | CreateAttempt::CollisionRetried(m) => {
        id_map.insert(candidate.source_id.as_str(), m.memorial_id.clone());
        memorials.push(CreatedMemorial {
          id:             m.memorial_id,
          name:           m.name,
          needs_location: m.needs_location,
          needs_cemetery: m.needs_cemetery,
        });
      }
      CreateAttempt::Failed(detail) => {
        tracing::warn!(
          source_id = %candidate.source_id,
          %detail,
          "memorial create failed"
        );
        errors.push(RowError {
          source_id: candidate.source_id.clone(),
          name:      candidate.name.clone(),
          detail,
        });
      }
    }
  }

  // Pass 2 — connections. An edge is persisted only when both endpoints
  // materialised in this batch; everything else is skipped. Persistence
  // failures here are swallowed: both A→B and B→A variants of a relation
  // may be emitted independently, so a uniqueness rejection is expected
  // and harmless.
  let mut connections = 0u32;

  for candidate in &selected {
    if candidate.relationships.is_empty() {
      continue;
    }
    let Some(from_id) = id_map.get(candidate.source_id.as_str()) else {
      continue;
    };

    for edge in &candidate.relationships {
      let Some(to_id) = id_map.get(edge.target_id.as_str()) else {
        continue;
      };

      let result = store
        .create_connection(NewConnection {
          from_memorial_id: from_id.clone(),
          to_memorial_id:   to_id.clone(),
          kind:             edge.kind,
          label:            edge.label.clone(),
          created_by:       importer,
        })
        .await;
      if result.is_ok() {
        connections += 1;
      }
    }
  }

  let status = if errors.is_empty() {
    ImportStatus::Completed
  } else {
    ImportStatus::Partial
  };
  store
    .complete_import_batch(import_id, memorials.len() as u32, connections, status)
    .await
    .map_err(|e| Error::Batch(Box::new(e)))?;

  tracing::info!(
    %import_id,
    created = memorials.len(),
    connections,
    errors = errors.len(),
    "import batch finalised"
  );

  Ok(ImportOutcome {
    import_id,
    stats: ImportStats {
      requested:   selected.len() as u32,
      created:     memorials.len() as u32,
      connections,
      errors:      errors.len() as u32,
    },
    errors,
    memorials,
  })
}
