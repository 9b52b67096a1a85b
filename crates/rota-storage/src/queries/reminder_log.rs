// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reminder dedup log operations.
//!
//! The log is append-only and unique per (assignment, reminder key); it is
//! the sole mechanism preventing duplicate reminder sends. The dispatcher
//! writes a row only after a successful send attempt.

use chrono::NaiveDateTime;
use rota_core::RotaError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{self, ReminderLogEntry};

struct LogRow {
    id: i64,
    assignment_id: i64,
    reminder_key: String,
    sent_at: String,
}

fn log_row(row: &rusqlite::Row<'_>) -> Result<LogRow, rusqlite::Error> {
    Ok(LogRow {
        id: row.get(0)?,
        assignment_id: row.get(1)?,
        reminder_key: row.get(2)?,
        sent_at: row.get(3)?,
    })
}

fn decode_entry(row: LogRow) -> Result<ReminderLogEntry, RotaError> {
    Ok(ReminderLogEntry {
        id: row.id,
        assignment_id: row.assignment_id,
        reminder_key: row.reminder_key,
        sent_at: models::parse_datetime(&row.sent_at)?,
    })
}

/// Whether a reminder was already sent for (assignment, key).
pub async fn is_logged(db: &Database, assignment_id: i64, key: &str) -> Result<bool, RotaError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(
                     SELECT 1 FROM reminder_log WHERE assignment_id = ?1 AND reminder_key = ?2
                 )",
                params![assignment_id, key],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Append a dedup record for (assignment, key).
///
/// INSERT OR IGNORE: a pair that is already logged counts as satisfied,
/// never as an error — the lazy-create reading of a duplicate hit.
pub async fn insert_log(
    db: &Database,
    assignment_id: i64,
    key: &str,
    sent_at: NaiveDateTime,
) -> Result<(), RotaError> {
    let key = key.to_string();
    let sent_at_str = models::format_datetime(sent_at);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO reminder_log (assignment_id, reminder_key, sent_at)
                 VALUES (?1, ?2, ?3)",
                params![assignment_id, key, sent_at_str],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Log entries for one assignment, oldest first.
pub async fn list_for_assignment(
    db: &Database,
    assignment_id: i64,
) -> Result<Vec<ReminderLogEntry>, RotaError> {
    let raw = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, assignment_id, reminder_key, sent_at
                 FROM reminder_log WHERE assignment_id = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![assignment_id], log_row)?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    raw.into_iter().map(decode_entry).collect()
}
