//! `SQLite` schema definitions for the namespace store.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the namespaces table.
///
/// Each row holds one logical namespace and its JSON-encoded value.
pub const CREATE_NAMESPACES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS namespaces (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_NAMESPACES_TABLE, CREATE_METADATA_TABLE];
