//! SQL schema for the Grocer SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision for future migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS prices (
    id                 TEXT PRIMARY KEY,
    store_name         TEXT NOT NULL,
    item_name          TEXT NOT NULL,
    -- Unicode-lowercased item_name; LIKE folds ASCII only.
    item_name_folded   TEXT NOT NULL,
    brand              TEXT,
    price              REAL NOT NULL CHECK (price > 0),
    weight_value       REAL NOT NULL CHECK (weight_value > 0),
    weight_unit        TEXT NOT NULL,   -- 'kg' | 'g' | 'l' | 'ml' | 'lb' | 'ct'
    -- Derived from price/weight/unit; recomputed on every write.
    price_per_kilogram REAL,
    price_per_pound    REAL,
    price_per_count    REAL,
    is_watched         INTEGER NOT NULL DEFAULT 0,
    external_url       TEXT,
    store_id           TEXT,
    created_at         TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    CHECK (
      (price_per_count IS NOT NULL
        AND price_per_kilogram IS NULL AND price_per_pound IS NULL)
      OR
      (price_per_count IS NULL
        AND price_per_kilogram IS NOT NULL AND price_per_pound IS NOT NULL)
    )
);

-- Independent of prices: no foreign key, rows are snapshots.
CREATE TABLE IF NOT EXISTS shopping_list (
    id              TEXT PRIMARY KEY,
    item_name       TEXT NOT NULL,
    store_name      TEXT,
    estimated_price REAL NOT NULL DEFAULT 0,
    is_bought       INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS prices_item_idx     ON prices(item_name_folded);
CREATE INDEX IF NOT EXISTS prices_created_idx  ON prices(created_at);
CREATE INDEX IF NOT EXISTS list_created_idx    ON shopping_list(created_at);

PRAGMA user_version = 1;
";
