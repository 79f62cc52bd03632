//! `SQLite` schema definitions for the durable key-value store.

/// SQL statement to create the key-value table.
///
/// Each row is one durable slot; the value is overwritten whole on every save.
pub const CREATE_KV_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create the metadata table holding the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Statements that must exist before the version can be read.
pub const BOOTSTRAP_STATEMENTS: &[&str] = &[CREATE_METADATA_TABLE];

/// Write a slot, replacing any previous value in one statement.
pub const UPSERT_VALUE: &str = r"
INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
";

/// Read a slot.
pub const SELECT_VALUE: &str = "SELECT value FROM kv WHERE key = ?1";

/// Read when a slot was last written.
pub const SELECT_UPDATED_AT: &str = "SELECT updated_at FROM kv WHERE key = ?1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kv_table_columns() {
        assert!(CREATE_KV_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_KV_TABLE.contains("value TEXT NOT NULL"));
        assert!(CREATE_KV_TABLE.contains("updated_at TEXT NOT NULL"));
    }

    #[test]
    fn test_upsert_overwrites_whole_value() {
        assert!(UPSERT_VALUE.contains("ON CONFLICT(key) DO UPDATE"));
        assert!(UPSERT_VALUE.contains("value = excluded.value"));
    }

    #[test]
    fn test_bootstrap_creates_metadata() {
        assert_eq!(BOOTSTRAP_STATEMENTS, &[CREATE_METADATA_TABLE]);
    }
}
