//! SQL schema for the Memoria SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS import_batches (
    import_id           TEXT PRIMARY KEY,
    file_name           TEXT NOT NULL,
    individuals_parsed  INTEGER NOT NULL,
    memorials_created   INTEGER NOT NULL DEFAULT 0,
    connections_created INTEGER NOT NULL DEFAULT 0,
    status              TEXT NOT NULL,   -- 'processing' | 'completed' | 'partial'
    created_by          TEXT NOT NULL,
    created_at          TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    completed_at        TEXT
);

CREATE TABLE IF NOT EXISTS memorials (
    memorial_id    TEXT PRIMARY KEY,     -- generated slug id
    name           TEXT NOT NULL,
    birth_date     TEXT,                 -- ISO YYYY-MM-DD
    death_date     TEXT,
    cemetery_name  TEXT,
    status         TEXT NOT NULL,        -- 'draft' | 'published'
    source         TEXT NOT NULL,        -- 'manual' | 'gedcom'
    import_id      TEXT REFERENCES import_batches(import_id),
    needs_location INTEGER NOT NULL,
    needs_cemetery INTEGER NOT NULL,
    owner_id       TEXT NOT NULL,
    created_at     TEXT NOT NULL
);

-- Duplicate edges (same endpoints, same kind) are rejected by the UNIQUE
-- constraint; callers treat that rejection as harmless.
CREATE TABLE IF NOT EXISTS connections (
    connection_id    TEXT PRIMARY KEY,
    from_memorial_id TEXT NOT NULL REFERENCES memorials(memorial_id),
    to_memorial_id   TEXT NOT NULL REFERENCES memorials(memorial_id),
    kind             TEXT NOT NULL,      -- 'spouse' | 'child' | 'parent'
    label            TEXT,
    created_by       TEXT NOT NULL,
    created_at       TEXT NOT NULL,
    UNIQUE (from_memorial_id, to_memorial_id, kind)
);

CREATE INDEX IF NOT EXISTS memorials_import_idx  ON memorials(import_id);
CREATE INDEX IF NOT EXISTS connections_from_idx  ON connections(from_memorial_id);
CREATE INDEX IF NOT EXISTS connections_to_idx    ON connections(to_memorial_id);

PRAGMA user_version = 1;
";
