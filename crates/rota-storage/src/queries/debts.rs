// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Debt row operations.
//!
//! Debt rows are created lazily: the first read of a (person, chore) pair
//! inserts the row with count 0 in the same atomic call. Arithmetic on the
//! counter (increment, floor-at-zero decrement) belongs to the engine's
//! ledger; this module only stores what it is told.

use rota_core::RotaError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Debt;

fn debt_from_row(row: &rusqlite::Row<'_>) -> Result<Debt, rusqlite::Error> {
    Ok(Debt {
        id: row.get(0)?,
        person_id: row.get(1)?,
        chore_id: row.get(2)?,
        count: row.get(3)?,
    })
}

/// Return the debt row for (person, chore), creating it with count 0 when
/// absent. INSERT OR IGNORE rides the UNIQUE constraint, so two racing
/// callers both land on the same row.
pub async fn get_or_create(
    db: &Database,
    person_id: i64,
    chore_id: i64,
) -> Result<Debt, RotaError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO debts (person_id, chore_id, count) VALUES (?1, ?2, 0)",
                params![person_id, chore_id],
            )?;
            let debt = conn.query_row(
                "SELECT id, person_id, chore_id, count FROM debts
                 WHERE person_id = ?1 AND chore_id = ?2",
                params![person_id, chore_id],
                debt_from_row,
            )?;
            Ok(debt)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Overwrite a debt counter.
pub async fn set_count(db: &Database, debt_id: i64, count: i64) -> Result<(), RotaError> {
    let affected = db
        .connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE debts SET count = ?1 WHERE id = ?2",
                params![count, debt_id],
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    if affected == 0 {
        return Err(RotaError::NotFound {
            entity: "debt",
            id: debt_id,
        });
    }
    Ok(())
}

/// List all debt rows, ordered by id.
pub async fn list_debts(db: &Database) -> Result<Vec<Debt>, RotaError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, person_id, chore_id, count FROM debts ORDER BY id ASC",
            )?;
            let rows = stmt.query_map([], debt_from_row)?;
            let mut debts = Vec::new();
            for row in rows {
                debts.push(row?);
            }
            Ok(debts)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Frequency;
    use crate::queries::{chores, people};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    async fn fixture(db: &Database) -> (i64, i64) {
        let person = people::create_person(db, "Naveen", "+15550004444")
            .await
            .unwrap();
        let chore = chores::create_chore(db, "Kitchen Cleaning", Frequency::Biweekly, 6, &[])
            .await
            .unwrap();
        (person.id, chore.id)
    }

    #[tokio::test]
    async fn get_or_create_starts_at_zero_and_is_stable() {
        let (db, _dir) = setup_db().await;
        let (person_id, chore_id) = fixture(&db).await;

        let first = get_or_create(&db, person_id, chore_id).await.unwrap();
        assert_eq!(first.count, 0);

        // Second call must return the same row, not a new one.
        let second = get_or_create(&db, person_id, chore_id).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.count, 0);

        let all = list_debts(&db).await.unwrap();
        assert_eq!(all.len(), 1);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_count_persists() {
        let (db, _dir) = setup_db().await;
        let (person_id, chore_id) = fixture(&db).await;

        let debt = get_or_create(&db, person_id, chore_id).await.unwrap();
        set_count(&db, debt.id, 3).await.unwrap();

        let reloaded = get_or_create(&db, person_id, chore_id).await.unwrap();
        assert_eq!(reloaded.count, 3);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_count_on_missing_row_reports_not_found() {
        let (db, _dir) = setup_db().await;
        let err = set_count(&db, 404, 1).await.unwrap_err();
        assert!(matches!(err, RotaError::NotFound { entity: "debt", .. }));
        db.close().await.unwrap();
    }
}
