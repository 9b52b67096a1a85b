// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Absence interval operations.

use chrono::NaiveDate;
use rota_core::RotaError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{self, Absence};

struct AbsenceRow {
    id: i64,
    person_id: i64,
    start_date: String,
    end_date: String,
    reason: Option<String>,
}

fn absence_row(row: &rusqlite::Row<'_>) -> Result<AbsenceRow, rusqlite::Error> {
    Ok(AbsenceRow {
        id: row.get(0)?,
        person_id: row.get(1)?,
        start_date: row.get(2)?,
        end_date: row.get(3)?,
        reason: row.get(4)?,
    })
}

fn decode_absence(row: AbsenceRow) -> Result<Absence, RotaError> {
    Ok(Absence {
        id: row.id,
        person_id: row.person_id,
        start_date: models::parse_date(&row.start_date)?,
        end_date: models::parse_date(&row.end_date)?,
        reason: row.reason,
    })
}

/// Create an absence interval, inclusive on both ends.
pub async fn create_absence(
    db: &Database,
    person_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: Option<&str>,
) -> Result<Absence, RotaError> {
    if end_date < start_date {
        return Err(RotaError::Internal(format!(
            "absence ends {end_date} before it starts {start_date}"
        )));
    }
    let start_str = start_date.to_string();
    let end_str = end_date.to_string();
    let reason_owned = reason.map(|r| r.to_string());
    let (id, reason_back) = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO absences (person_id, start_date, end_date, reason)
                 VALUES (?1, ?2, ?3, ?4)",
                params![person_id, start_str, end_str, reason_owned],
            )?;
            Ok((conn.last_insert_rowid(), reason_owned))
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    Ok(Absence {
        id,
        person_id,
        start_date,
        end_date,
        reason: reason_back,
    })
}

/// All absence intervals for a person, in insertion order. Overlaps are
/// allowed; the absence oracle only cares which interval covers a date.
pub async fn list_for_person(db: &Database, person_id: i64) -> Result<Vec<Absence>, RotaError> {
    let raw = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, person_id, start_date, end_date, reason
                 FROM absences WHERE person_id = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![person_id], absence_row)?;
            let mut absences = Vec::new();
            for row in rows {
                absences.push(row?);
            }
            Ok(absences)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    raw.into_iter().map(decode_absence).collect()
}

/// Delete an absence by id.
pub async fn delete_absence(db: &Database, id: i64) -> Result<(), RotaError> {
    let affected = db
        .connection()
        .call(move |conn| {
            let n = conn.execute("DELETE FROM absences WHERE id = ?1", params![id])?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    if affected == 0 {
        return Err(RotaError::NotFound {
            entity: "absence",
            id,
        });
    }
    Ok(())
}
