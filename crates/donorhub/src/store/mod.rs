//! Namespaced persistence layer for donorhub.
//!
//! This module provides a `SQLite`-backed store mapping logical namespace
//! keys to JSON-encoded values, with synchronous get/set and no
//! transactions across a read-modify-write pair.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Namespace holding the ordered list of donor applications.
pub const DONORS_NAMESPACE: &str = "availableDonors";

/// Namespace holding the local override of the canonical account profile.
pub const PROFILE_OVERRIDE_NAMESPACE: &str = "updatedUser";

/// Namespace holding the dismissed-state of the donation banner.
pub const BANNER_CLOSED_NAMESPACE: &str = "bloodDonationBannerClosed";

/// Namespace→JSON value store.
///
/// Each namespace key maps to exactly one JSON value. Reads degrade to
/// `None` on any failure so callers always receive a usable default;
/// writes surface their errors because a lost write means a lost record.
///
/// The store offers no compare-and-swap: two processes sharing one
/// database file can interleave a read-modify-write pair. Callers must
/// read the latest value immediately before writing.
#[derive(Debug)]
pub struct Store {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Store {
    /// Open or create a store database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Enable WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the value stored under a namespace.
    ///
    /// Returns `None` for a missing namespace, a corrupt payload, or a
    /// failed query; the failure is logged, never raised. Callers that
    /// want a default should use [`Store::get_or_default`].
    pub fn get<T: DeserializeOwned>(&self, namespace: &str) -> Option<T> {
        let raw: Option<String> = match self
            .conn
            .query_row(
                "SELECT value FROM namespaces WHERE key = ?1",
                [namespace],
                |row| row.get(0),
            )
            .optional()
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read namespace {namespace}: {e}");
                return None;
            }
        };

        let raw = raw?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Corrupt payload in namespace {namespace}: {e}");
                None
            }
        }
    }

    /// Read a namespace, substituting the type's default when absent.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, namespace: &str) -> T {
        self.get(namespace).unwrap_or_default()
    }

    /// Encode and write a value under a namespace, replacing any
    /// previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the database write fails. A failed
    /// write means the value was not persisted and must be surfaced to
    /// the user.
    pub fn set<T: Serialize + ?Sized>(&self, namespace: &str, value: &T) -> Result<()> {
        let payload = serde_json::to_string(value)?;
        self.conn.execute(
            r"
            INSERT INTO namespaces (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')
            ",
            params![namespace, payload],
        )?;
        debug!("Wrote namespace {namespace}");
        Ok(())
    }

    /// Remove a namespace and its value.
    ///
    /// Returns `true` if a value was removed, `false` if the namespace
    /// was already absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn remove(&self, namespace: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM namespaces WHERE key = ?1", [namespace])?;
        Ok(affected > 0)
    }

    /// Check whether a namespace currently holds a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn contains(&self, namespace: &str) -> Result<bool> {
        let count: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM namespaces WHERE key = ?1",
            [namespace],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
