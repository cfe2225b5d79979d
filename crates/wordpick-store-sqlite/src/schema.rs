//! SQL schema for the wordpick SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Catalog of pickable words. Rows are written only by bulk upsert.
CREATE TABLE IF NOT EXISTS word_bank (
    word        TEXT PRIMARY KEY,
    lang        TEXT NOT NULL DEFAULT 'en',
    valence     INTEGER NOT NULL DEFAULT 1 CHECK (valence BETWEEN -2 AND 2),
    energy      INTEGER NOT NULL DEFAULT 3 CHECK (energy BETWEEN 1 AND 5),
    types       TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    domains     TEXT NOT NULL DEFAULT '[]',
    tags        TEXT NOT NULL DEFAULT '[]',
    synonyms    TEXT NOT NULL DEFAULT '[]',
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS player_session (
    id          TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL
);

-- Picks are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS pick (
    pick_id     TEXT PRIMARY KEY,
    session_id  TEXT NOT NULL REFERENCES player_session(id),
    word        TEXT NOT NULL,
    mood        INTEGER,
    note        TEXT,
    tags        TEXT,                         -- JSON array or NULL
    created_at  TEXT NOT NULL                 -- fixed-width RFC 3339 UTC
);

CREATE INDEX IF NOT EXISTS pick_session_idx    ON pick(session_id, created_at);
CREATE INDEX IF NOT EXISTS pick_created_idx    ON pick(created_at);
CREATE INDEX IF NOT EXISTS pick_word_idx       ON pick(word);

PRAGMA user_version = 1;
";
