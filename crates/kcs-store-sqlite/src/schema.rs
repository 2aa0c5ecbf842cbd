//! SQL schema for the KCS SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Submissions are write-once.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS candidates (
    id             TEXT PRIMARY KEY,
    request_id     TEXT NOT NULL UNIQUE,   -- client-generated dedup key
    form_type      TEXT NOT NULL,          -- 'general' | 'beginner'
    lp_id          TEXT NOT NULL,

    name           TEXT NOT NULL,
    birth_year     INTEGER NOT NULL,
    tel            TEXT NOT NULL,
    email          TEXT NOT NULL,

    positions      TEXT NOT NULL,          -- comma-joined
    qualifications TEXT,                   -- comma-joined; general only
    experience     TEXT,                   -- beginner only

    utm_source     TEXT,
    utm_medium     TEXT,
    utm_campaign   TEXT,
    utm_content    TEXT,
    utm_term       TEXT,

    referrer       TEXT,
    landing_path   TEXT NOT NULL,

    created_at     TEXT NOT NULL           -- RFC 3339 UTC, fixed width
);

CREATE INDEX IF NOT EXISTS candidates_created_idx ON candidates(created_at);
CREATE INDEX IF NOT EXISTS candidates_lp_idx      ON candidates(lp_id);

PRAGMA user_version = 1;
";
