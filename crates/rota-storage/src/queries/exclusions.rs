// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chore exclusion (permanent ban) operations.

use rota_core::RotaError;
use rusqlite::params;

use crate::database::Database;
use crate::models::ChoreExclusion;

fn exclusion_from_row(row: &rusqlite::Row<'_>) -> Result<ChoreExclusion, rusqlite::Error> {
    Ok(ChoreExclusion {
        id: row.get(0)?,
        chore_id: row.get(1)?,
        person_id: row.get(2)?,
    })
}

/// Ban a person from a chore. The (chore, person) pair is unique; a
/// repeat ban is a user-entry error.
pub async fn create_exclusion(
    db: &Database,
    chore_id: i64,
    person_id: i64,
) -> Result<ChoreExclusion, RotaError> {
    let inserted_id = db
        .connection()
        .call(move |conn| {
            let result = conn.execute(
                "INSERT INTO chore_exclusions (chore_id, person_id) VALUES (?1, ?2)",
                params![chore_id, person_id],
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
            what: format!("exclusion of person {person_id} from chore {chore_id}"),
        });
    };
    Ok(ChoreExclusion {
        id,
        chore_id,
        person_id,
    })
}

/// All bans for a chore, ordered by id.
pub async fn list_for_chore(
    db: &Database,
    chore_id: i64,
) -> Result<Vec<ChoreExclusion>, RotaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, chore_id, person_id FROM chore_exclusions
                 WHERE chore_id = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![chore_id], exclusion_from_row)?;
            let mut exclusions = Vec::new();
            for row in rows {
                exclusions.push(row?);
            }
            Ok(exclusions)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a ban by id.
pub async fn delete_exclusion(db: &Database, id: i64) -> Result<(), RotaError> {
    let affected = db
        .connection()
        .call(move |conn| {
            let n = conn.execute("DELETE FROM chore_exclusions WHERE id = ?1", params![id])?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    if affected == 0 {
        return Err(RotaError::NotFound {
            entity: "exclusion",
            id,
        });
    }
    Ok(())
}
