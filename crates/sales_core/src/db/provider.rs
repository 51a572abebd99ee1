//! Connection providers: the seam between repositories and a storage backend.

use super::config::SqliteConfig;
use super::open::open_db;
use super::{DbError, DbResult};
use rusqlite::Connection;

/// Supplies fresh connections and backend-specific identity retrieval.
///
/// Repositories call `open` once per public operation and drop the
/// connection before returning, so implementations must not hand out a
/// connection that is still in use elsewhere.
pub trait ConnectionProvider {
    /// Opens a new, fully configured connection.
    fn open(&self) -> DbResult<Connection>;

    /// Returns the identity generated by the most recent insert on `conn`.
    ///
    /// Must be called on the same connection, inside the same transaction,
    /// directly after the insert it refers to.
    fn last_insert_id(&self, conn: &Connection) -> DbResult<i64>;
}

/// File-backed SQLite provider.
#[derive(Debug, Clone)]
pub struct SqliteConnectionProvider {
    config: SqliteConfig,
}

impl SqliteConnectionProvider {
    pub fn new(config: SqliteConfig) -> Self {
        Self { config }
    }
}

impl ConnectionProvider for SqliteConnectionProvider {
    fn open(&self) -> DbResult<Connection> {
        open_db(&self.config)
    }

    fn last_insert_id(&self, conn: &Connection) -> DbResult<i64> {
        // SQLite reports 0 when no row has been inserted on this connection.
        match conn.last_insert_rowid() {
            0 => Err(DbError::IdentityUnavailable),
            id => Ok(id),
        }
    }
}
