mod repository;

pub use repository::*;

/// SQL migration for the flat key-value layout: two namespaces ("local" and
/// "session"), one JSON value per key.
pub const MIGRATION_001_INITIAL: &str = "
CREATE TABLE IF NOT EXISTS kv_entries (
    area TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (area, key)
);
";
