// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assignment CRUD operations.
//!
//! The rotation history (`previous_assignee_ids`) is a JSON int array in
//! storage and a `BTreeSet<i64>` in the engine; encode/decode happens only
//! here. At most one assignment exists per (chore, week_start), enforced
//! by a UNIQUE constraint.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::NaiveDate;
use rota_core::RotaError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{self, Assignment, AssignmentStatus};

/// Raw assignment row before dates, status, and history are decoded.
struct AssignmentRow {
    id: i64,
    chore_id: i64,
    person_id: i64,
    week_start_date: String,
    due_date: String,
    status: String,
    previous_assignee_ids: String,
    completed_at: Option<String>,
    notes: Option<String>,
}

const SELECT_COLUMNS: &str = "id, chore_id, person_id, week_start_date, due_date, status,
     previous_assignee_ids, completed_at, notes";

fn assignment_row(row: &rusqlite::Row<'_>) -> Result<AssignmentRow, rusqlite::Error> {
    Ok(AssignmentRow {
        id: row.get(0)?,
        chore_id: row.get(1)?,
        person_id: row.get(2)?,
        week_start_date: row.get(3)?,
        due_date: row.get(4)?,
        status: row.get(5)?,
        previous_assignee_ids: row.get(6)?,
        completed_at: row.get(7)?,
        notes: row.get(8)?,
    })
}

fn decode_assignment(row: AssignmentRow) -> Result<Assignment, RotaError> {
    let status = AssignmentStatus::from_str(&row.status).map_err(|e| RotaError::Storage {
        source: format!("assignment {}: bad status {:?}: {e}", row.id, row.status).into(),
    })?;
    let previous_assignee_ids: BTreeSet<i64> =
        serde_json::from_str(&row.previous_assignee_ids).map_err(|e| RotaError::Storage {
            source: format!("assignment {}: bad rotation history: {e}", row.id).into(),
        })?;
    Ok(Assignment {
        id: row.id,
        chore_id: row.chore_id,
        person_id: row.person_id,
        week_start: models::parse_date(&row.week_start_date)?,
        due_date: models::parse_date(&row.due_date)?,
        status,
        previous_assignee_ids,
        completed_at: row.completed_at.as_deref().map(models::parse_datetime).transpose()?,
        notes: row.notes,
    })
}

/// Create a pending assignment with an empty rotation history.
///
/// A UNIQUE hit on (chore, week_start) maps to [`RotaError::Duplicate`]:
/// the generator checks for an existing row first, so reaching the
/// constraint means the caller skipped that check.
pub async fn create_assignment(
    db: &Database,
    chore_id: i64,
    person_id: i64,
    week_start: NaiveDate,
    due_date: NaiveDate,
) -> Result<Assignment, RotaError> {
    let week_start_str = week_start.to_string();
    let due_date_str = due_date.to_string();
    let inserted_id = db
        .connection()
        .call(move |conn| {
            let result = conn.execute(
                "INSERT INTO assignments
                     (chore_id, person_id, week_start_date, due_date, status, previous_assignee_ids)
                 VALUES (?1, ?2, ?3, ?4, 'pending', '[]')",
                params![chore_id, person_id, week_start_str, due_date_str],
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
            what: format!("assignment for chore {chore_id} in week {week_start}"),
        });
    };
    Ok(Assignment {
        id,
        chore_id,
        person_id,
        week_start,
        due_date,
        status: AssignmentStatus::Pending,
        previous_assignee_ids: BTreeSet::new(),
        completed_at: None,
        notes: None,
    })
}

/// Get an assignment by id.
pub async fn get_assignment(db: &Database, id: i64) -> Result<Option<Assignment>, RotaError> {
    let raw = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM assignments WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], assignment_row);
            match result {
                Ok(row) => Ok(Some(row)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    raw.map(decode_assignment).transpose()
}

/// The unique assignment for (chore, week_start), if any.
pub async fn get_for_chore_week(
    db: &Database,
    chore_id: i64,
    week_start: NaiveDate,
) -> Result<Option<Assignment>, RotaError> {
    let week_start_str = week_start.to_string();
    let raw = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM assignments
                 WHERE chore_id = ?1 AND week_start_date = ?2"
            ))?;
            let result = stmt.query_row(params![chore_id, week_start_str], assignment_row);
            match result {
                Ok(row) => Ok(Some(row)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    raw.map(decode_assignment).transpose()
}

async fn list_for_week_where(
    db: &Database,
    week_start: NaiveDate,
    status_filter: Option<AssignmentStatus>,
) -> Result<Vec<Assignment>, RotaError> {
    let week_start_str = week_start.to_string();
    let raw = db
        .connection()
        .call(move |conn| {
            let mut rows_out = Vec::new();
            match status_filter {
                Some(status) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {SELECT_COLUMNS} FROM assignments
                         WHERE week_start_date = ?1 AND status = ?2 ORDER BY id ASC"
                    ))?;
                    let rows = stmt
                        .query_map(params![week_start_str, status.to_string()], assignment_row)?;
                    for row in rows {
                        rows_out.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {SELECT_COLUMNS} FROM assignments
                         WHERE week_start_date = ?1 ORDER BY id ASC"
                    ))?;
                    let rows = stmt.query_map(params![week_start_str], assignment_row)?;
                    for row in rows {
                        rows_out.push(row?);
                    }
                }
            }
            Ok(rows_out)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    raw.into_iter().map(decode_assignment).collect()
}

/// All assignments anchored at `week_start`, ordered by id.
pub async fn list_for_week(
    db: &Database,
    week_start: NaiveDate,
) -> Result<Vec<Assignment>, RotaError> {
    list_for_week_where(db, week_start, None).await
}

/// Pending assignments anchored at `week_start`, ordered by id.
pub async fn list_pending_for_week(
    db: &Database,
    week_start: NaiveDate,
) -> Result<Vec<Assignment>, RotaError> {
    list_for_week_where(db, week_start, Some(AssignmentStatus::Pending)).await
}

/// Max week_start among this person's past assignments for this chore,
/// or `None` if they were never assigned it. ISO dates compare correctly
/// as text, so SQL MAX is chronological.
pub async fn last_week_start(
    db: &Database,
    person_id: i64,
    chore_id: i64,
) -> Result<Option<NaiveDate>, RotaError> {
    let raw: Option<String> = db
        .connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT MAX(week_start_date) FROM assignments
                 WHERE person_id = ?1 AND chore_id = ?2",
                params![person_id, chore_id],
                |row| row.get(0),
            )?;
            Ok(result)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    raw.as_deref().map(models::parse_date).transpose()
}

/// Write back assignee, status, history, completion, and notes.
pub async fn update_assignment(db: &Database, assignment: &Assignment) -> Result<(), RotaError> {
    let history_json = serde_json::to_string(&assignment.previous_assignee_ids)
        .map_err(|e| RotaError::Internal(format!("encode rotation history: {e}")))?;
    let id = assignment.id;
    let person_id = assignment.person_id;
    let status = assignment.status.to_string();
    let completed_at = assignment.completed_at.map(models::format_datetime);
    let notes = assignment.notes.clone();
    let affected = db
        .connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE assignments
                 SET person_id = ?1, status = ?2, previous_assignee_ids = ?3,
                     completed_at = ?4, notes = ?5
                 WHERE id = ?6",
                params![person_id, status, history_json, completed_at, notes, id],
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    if affected == 0 {
        return Err(RotaError::NotFound {
            entity: "assignment",
            id,
        });
    }
    Ok(())
}
