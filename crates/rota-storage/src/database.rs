// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use rota_core::RotaError;
use tracing::debug;

/// Handle to the single SQLite connection used by the whole process.
///
/// Opening runs all pending migrations, so a `Database` is always at the
/// current schema version.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` with WAL mode enabled.
    pub async fn open(path: &str) -> Result<Self, RotaError> {
        Self::open_with_options(path, true).await
    }

    /// Open (or create) the database at `path`.
    ///
    /// Applies connection pragmas, then runs embedded migrations.
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, RotaError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| RotaError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| {
            if wal_mode {
                conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            }
            conn.execute_batch(
                "PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        // Migrations return RotaError; ride it out of the closure as the Ok
        // value so the closure's error type stays rusqlite::Error.
        let applied = conn
            .call(|conn| Ok(crate::migrations::run_migrations(conn)))
            .await
            .map_err(map_tr_err)??;

        debug!(path, wal_mode, applied, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection. Query modules call through
    /// this; nothing else should hold a connection to the same file.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(&self) -> Result<(), RotaError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("database closed: WAL checkpoint complete");
        Ok(())
    }
}

/// Convert a tokio-rusqlite error into [`RotaError::Storage`].
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> RotaError {
    RotaError::Storage {
        source: Box::new(e),
    }
}

/// True when a rusqlite error is a UNIQUE/constraint rejection.
///
/// Query modules use this to turn expected constraint hits (duplicate chore
/// name, duplicate exclusion pair) into [`RotaError::Duplicate`] instead of
/// an opaque storage failure.
pub fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(ffi, _)
            if ffi.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
