//! SQL schema for the Tally SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Supplier rows are append-only. Re-registering an identity inserts a new
-- row under a fresh id; the identity resolves to its highest id, and the
-- displaced id lives on only as a number inside shipment/witness rows.
CREATE TABLE IF NOT EXISTS suppliers (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,  -- sequential from 1
    identity      TEXT NOT NULL,
    details       TEXT NOT NULL,
    registered_at TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

-- One row per (item, supplier). content_hash is NULL for rows created by
-- witnesses before any receipt; NULL-ness is the 'no receipt yet' check.
CREATE TABLE IF NOT EXISTS shipments (
    item_id       INTEGER NOT NULL,
    supplier_id   INTEGER NOT NULL,
    content_hash  TEXT,            -- 64 hex chars once a receipt is recorded
    witness_count INTEGER NOT NULL DEFAULT 0,
    recorded_at   TEXT,            -- set together with content_hash
    PRIMARY KEY (item_id, supplier_id)
);

-- One attestation per (item, witness identity), never updated.
CREATE TABLE IF NOT EXISTS witnesses (
    item_id     INTEGER NOT NULL,
    witness     TEXT NOT NULL,
    name_hash   TEXT NOT NULL,
    supplier_id INTEGER NOT NULL,
    recorded_at TEXT NOT NULL,
    PRIMARY KEY (item_id, witness)
);

CREATE INDEX IF NOT EXISTS suppliers_identity_idx ON suppliers(identity);

PRAGMA user_version = 1;
";
