// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rota seed` command implementation.
//!
//! Loads the default household fixture: five people and the three
//! rotating chores with their reminder schedules. Safe to run
//! repeatedly; rows that already exist are left untouched.

use rota_config::model::RotaConfig;
use rota_core::types::{Frequency, ReminderRule};
use rota_core::{RecordStore, RotaError};
use rota_storage::SqliteStore;
use tracing::info;

/// Counts of rows added by one seeding pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub people_created: usize,
    pub chores_created: usize,
}

/// Household members. Contact addresses are not unique, so a shared
/// number is fine for a fixture.
const PEOPLE: [(&str, &str); 5] = [
    ("Sashi", "+16476854531"),
    ("Raja", "+16476854531"),
    ("Guru", "+16476854531"),
    ("Naveen", "+16476854531"),
    ("Veenus", "+16476854531"),
];

fn rule(key: &str, day_of_week: u8, hour: u8) -> ReminderRule {
    ReminderRule {
        key: key.to_string(),
        day_of_week,
        hour,
    }
}

/// The chore fixture: name, frequency, due day, reminder rules.
fn chore_fixtures() -> Vec<(&'static str, Frequency, u8, Vec<ReminderRule>)> {
    vec![
        (
            "Garbage Cleanup",
            Frequency::Weekly,
            4, // Friday
            vec![
                rule("monday", 0, 9),
                rule("thursday", 3, 19),
                rule("sunday", 6, 14),
            ],
        ),
        (
            "Washroom Cleaning",
            Frequency::Biweekly,
            6, // Sunday
            vec![rule("friday", 4, 10)],
        ),
        (
            "Kitchen Cleaning",
            Frequency::Biweekly,
            6, // Sunday
            vec![rule("friday", 4, 10)],
        ),
    ]
}

/// Insert any fixture rows the store does not already have.
///
/// People and chores are matched by name, so a re-run never duplicates
/// them. Every (person, chore) pair also gets a zeroed debt row, which
/// keeps the debt listing dense from day one.
pub async fn seed_store(store: &dyn RecordStore) -> Result<SeedReport, RotaError> {
    let mut report = SeedReport::default();

    let existing_people = store.people().await?;
    for (name, contact) in PEOPLE {
        if existing_people.iter().any(|p| p.name == name) {
            continue;
        }
        let person = store.create_person(name, contact).await?;
        info!(person_id = person.id, name, "seeded person");
        report.people_created += 1;
    }

    let existing_chores: Vec<String> = store
        .chores()
        .await?
        .into_iter()
        .filter_map(|chore| chore.ok().map(|c| c.name))
        .collect();
    for (name, frequency, day_of_week, rules) in chore_fixtures() {
        if existing_chores.iter().any(|n| n == name) {
            continue;
        }
        let chore = store
            .create_chore(name, frequency, day_of_week, &rules)
            .await?;
        info!(chore_id = chore.id, name, "seeded chore");
        report.chores_created += 1;
    }

    let people = store.people().await?;
    let chores = store.chores().await?;
    for person in &people {
        for chore in chores.iter().filter_map(|c| c.as_ref().ok()) {
            store.get_or_create_debt(person.id, chore.id).await?;
        }
    }

    Ok(report)
}

/// Run the `rota seed` command.
pub async fn run_seed(config: &RotaConfig) -> Result<(), RotaError> {
    let store = SqliteStore::open(&config.storage).await?;
    let report = seed_store(&store).await?;

    println!("Seed complete.");
    println!("  People added: {}", report.people_created);
    println!("  Chores added: {}", report.chores_created);

    Ok(())
}
