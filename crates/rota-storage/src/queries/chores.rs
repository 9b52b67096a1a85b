// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chore CRUD operations.
//!
//! Reminder rules live in the `reminder_rules` TEXT column as JSON and are
//! decoded here, once, at load. Inside the engine a chore always carries
//! structured [`ReminderRule`] values; the encoded string is never the
//! source of truth.

use std::str::FromStr;

use rota_core::RotaError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Chore, Frequency, ReminderRule};

/// Raw chore row before the rule list and frequency are decoded.
struct ChoreRow {
    id: i64,
    name: String,
    frequency: String,
    day_of_week: u8,
    reminder_rules: String,
}

fn chore_row(row: &rusqlite::Row<'_>) -> Result<ChoreRow, rusqlite::Error> {
    Ok(ChoreRow {
        id: row.get(0)?,
        name: row.get(1)?,
        frequency: row.get(2)?,
        day_of_week: row.get(3)?,
        reminder_rules: row.get(4)?,
    })
}

/// Decode one raw row into a [`Chore`].
///
/// A frequency that fails to parse is corrupt storage; a rule list that
/// fails to decode is the per-chore [`RotaError::MalformedReminderRules`]
/// condition, recoverable by the caller.
fn decode_chore(row: ChoreRow) -> Result<Chore, RotaError> {
    let frequency = Frequency::from_str(&row.frequency).map_err(|e| RotaError::Storage {
        source: format!("chore {}: bad frequency {:?}: {e}", row.id, row.frequency).into(),
    })?;
    let reminder_rules: Vec<ReminderRule> =
        serde_json::from_str(&row.reminder_rules).map_err(|e| {
            RotaError::MalformedReminderRules {
                chore_id: row.id,
                detail: e.to_string(),
            }
        })?;
    Ok(Chore {
        id: row.id,
        name: row.name,
        frequency,
        day_of_week: row.day_of_week,
        reminder_rules,
    })
}

/// Create a chore.
///
/// Rejects a repeated rule key up front and maps a UNIQUE hit on the name
/// to [`RotaError::Duplicate`] — both are user-entry errors, not storage
/// failures.
pub async fn create_chore(
    db: &Database,
    name: &str,
    frequency: Frequency,
    day_of_week: u8,
    rules: &[ReminderRule],
) -> Result<Chore, RotaError> {
    if let Some(key) = ReminderRule::find_duplicate_key(rules) {
        return Err(RotaError::Duplicate {
            what: format!("reminder rule key '{key}'"),
        });
    }
    let rules_json = serde_json::to_string(rules)
        .map_err(|e| RotaError::Internal(format!("encode reminder rules: {e}")))?;

    let name_owned = name.to_string();
    let frequency_str = frequency.to_string();
    let inserted_id = db
        .connection()
        .call(move |conn| {
            let result = conn.execute(
                "INSERT INTO chores (name, frequency, day_of_week, reminder_rules)
                 VALUES (?1, ?2, ?3, ?4)",
                params![name_owned, frequency_str, day_of_week, rules_json],
            );
            match result {
                Ok(_) => Ok(Some(conn.last_insert_rowid())),
                Err(e) if crate::database::is_constraint_violation(&e) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    let Some(id) = inserted_id else {
        return Err(RotaError::Duplicate {
            what: format!("chore name '{name}'"),
        });
    };
    Ok(Chore {
        id,
        name: name.to_string(),
        frequency,
        day_of_week,
        reminder_rules: rules.to_vec(),
    })
}

/// Get a chore by id, rules decoded.
pub async fn get_chore(db: &Database, id: i64) -> Result<Option<Chore>, RotaError> {
    let raw = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, frequency, day_of_week, reminder_rules
                 FROM chores WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], chore_row);
            match result {
                Ok(row) => Ok(Some(row)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    raw.map(decode_chore).transpose()
}

/// List all chores, ordered by id.
///
/// Decoding is per-chore: one malformed rule list yields an `Err` element
/// for that chore and leaves the rest of the listing intact, so batch runs
/// can skip it and continue.
pub async fn list_chores(db: &Database) -> Result<Vec<Result<Chore, RotaError>>, RotaError> {
    let raw = db
        .connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, frequency, day_of_week, reminder_rules
                 FROM chores ORDER BY id ASC",
            )?;
            let rows = stmt.query_map([], chore_row)?;
            let mut chores = Vec::new();
            for row in rows {
                chores.push(row?);
            }
            Ok(chores)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    Ok(raw.into_iter().map(decode_chore).collect())
}
