// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Person CRUD operations.

use rota_core::RotaError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Person;

fn person_from_row(row: &rusqlite::Row<'_>) -> Result<Person, rusqlite::Error> {
    Ok(Person {
        id: row.get(0)?,
        name: row.get(1)?,
        contact_address: row.get(2)?,
        active: row.get(3)?,
    })
}

/// Create an active person. Returns the stored row with its new id.
pub async fn create_person(
    db: &Database,
    name: &str,
    contact_address: &str,
) -> Result<Person, RotaError> {
    let name = name.to_string();
    let contact_address = contact_address.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO people (name, contact_address, active) VALUES (?1, ?2, 1)",
                params![name, contact_address],
            )?;
            Ok(Person {
                id: conn.last_insert_rowid(),
                name,
                contact_address,
                active: true,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a person by id.
pub async fn get_person(db: &Database, id: i64) -> Result<Option<Person>, RotaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, contact_address, active FROM people WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], person_from_row);
            match result {
                Ok(person) => Ok(Some(person)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all people, ordered by id.
pub async fn list_people(db: &Database) -> Result<Vec<Person>, RotaError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, contact_address, active FROM people ORDER BY id ASC",
            )?;
            let rows = stmt.query_map([], person_from_row)?;
            let mut people = Vec::new();
            for row in rows {
                people.push(row?);
            }
            Ok(people)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List people with the active flag set, ordered by id.
///
/// This is the picker's candidate pool; inactive people never appear.
pub async fn list_active_people(db: &Database) -> Result<Vec<Person>, RotaError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, contact_address, active FROM people
                 WHERE active = 1 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map([], person_from_row)?;
            let mut people = Vec::new();
            for row in rows {
                people.push(row?);
            }
            Ok(people)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Set a person's active flag.
pub async fn set_active(db: &Database, id: i64, active: bool) -> Result<(), RotaError> {
    let affected = db
        .connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE people SET active = ?1 WHERE id = ?2",
                params![active, id],
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    if affected == 0 {
        return Err(RotaError::NotFound {
            entity: "person",
            id,
        });
    }
    Ok(())
}
