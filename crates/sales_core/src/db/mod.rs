//! SQLite storage bootstrap for the order store.
//!
//! # Responsibility
//! - Open and configure one SQLite connection per logical operation.
//! - Expose the per-backend "last generated identity" capability.
//! - Install the order schema on fresh databases.
//!
//! # Invariants
//! - Returned connections have `busy_timeout` configured and foreign keys
//!   set according to `SqliteConfig`.
//! - Connections are never cached or shared between operations.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod config;
mod open;
mod provider;
pub mod schema;

pub use config::SqliteConfig;
pub use open::{close_db, open_db};
pub use provider::{ConnectionProvider, SqliteConnectionProvider};
pub use schema::install_schema;

pub type DbResult<T> = Result<T, DbError>;

/// Storage transport failure.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Backend did not report an identity for the preceding insert.
    IdentityUnavailable,
    /// A statement that must touch exactly one row matched none.
    RowMissing { table: &'static str, id: i64 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::IdentityUnavailable => {
                write!(f, "store did not report a generated identity after insert")
            }
            Self::RowMissing { table, id } => write!(f, "no {table} row with id {id}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::IdentityUnavailable | Self::RowMissing { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
