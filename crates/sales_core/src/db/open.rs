//! Connection open/close utilities for SQLite.
//!
//! # Responsibility
//! - Open file connections and apply pragmas from `SqliteConfig`.
//! - Close connections explicitly so close failures are logged.
//!
//! # Invariants
//! - A connection is only returned after all pragmas were applied.
//! - Closing never fails the calling operation; errors are logged.

use super::config::SqliteConfig;
use super::DbResult;
use log::{debug, error, warn};
use rusqlite::{Connection, OpenFlags};
use std::time::{Duration, Instant};

/// Opens the configured database file and applies connection pragmas.
///
/// # Side effects
/// - Creates the file when it does not exist yet, unless
///   `create_if_missing` is off.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(config: &SqliteConfig) -> DbResult<Connection> {
    let started_at = Instant::now();
    debug!("event=db_open module=db status=start");

    let conn = match Connection::open_with_flags(&config.path, open_flags(config)) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    if let Err(err) = configure_connection(&conn, config) {
        error!(
            "event=db_open module=db status=error duration_ms={} error_code=db_configure_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err.into());
    }

    debug!(
        "event=db_open module=db status=ok duration_ms={} foreign_keys={}",
        started_at.elapsed().as_millis(),
        config.foreign_keys
    );
    Ok(conn)
}

/// Closes a connection, logging instead of propagating close failures.
pub fn close_db(conn: Connection) {
    match conn.close() {
        Ok(()) => debug!("event=db_close module=db status=ok"),
        Err((_conn, err)) => {
            warn!("event=db_close module=db status=error error={err}");
        }
    }
}

fn open_flags(config: &SqliteConfig) -> OpenFlags {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    if config.create_if_missing {
        flags | OpenFlags::SQLITE_OPEN_CREATE
    } else {
        flags
    }
}

fn configure_connection(conn: &Connection, config: &SqliteConfig) -> rusqlite::Result<()> {
    if config.foreign_keys {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    } else {
        conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
    }
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    Ok(())
}
