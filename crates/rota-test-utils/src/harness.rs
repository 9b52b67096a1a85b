// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for engine and storage integration tests.
//!
//! `TestHarness` assembles a temp-file SQLite record store and a mock
//! channel, with fixture helpers for seeding people and chores.

use std::sync::Arc;

use rota_config::model::StorageConfig;
use rota_core::traits::store::RecordStore;
use rota_core::types::{Chore, Frequency, Person, ReminderRule};
use rota_core::RotaError;
use rota_storage::SqliteStore;

use crate::mock_channel::MockChannel;

/// Shorthand for building a reminder rule in fixtures.
pub fn rule(key: &str, day_of_week: u8, hour: u8) -> ReminderRule {
    ReminderRule {
        key: key.to_string(),
        day_of_week,
        hour,
    }
}

/// A complete test environment: temp SQLite store plus mock channel.
///
/// The temp directory is kept alive for the lifetime of the harness and
/// cleaned up on drop, so every harness gets an isolated database.
pub struct TestHarness {
    /// SQLite record store backed by a temp database file.
    pub store: Arc<SqliteStore>,
    /// Mock channel capturing outbound messages.
    pub channel: Arc<MockChannel>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a fresh harness with an empty database.
    pub async fn new() -> Result<Self, RotaError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| RotaError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");
        let config = StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        };
        let store = Arc::new(SqliteStore::open(&config).await?);
        Ok(Self {
            store,
            channel: Arc::new(MockChannel::new()),
            _temp_dir: temp_dir,
        })
    }

    /// The store as the trait object the engine runs against.
    pub fn record_store(&self) -> Arc<dyn RecordStore> {
        self.store.clone()
    }

    /// Seed an active person with a fixture contact address.
    pub async fn add_person(&self, name: &str) -> Result<Person, RotaError> {
        self.store.create_person(name, "+16475550100").await
    }

    /// Seed a person and immediately deactivate them.
    pub async fn add_inactive_person(&self, name: &str) -> Result<Person, RotaError> {
        let person = self.add_person(name).await?;
        self.store.set_person_active(person.id, false).await?;
        Ok(Person {
            active: false,
            ..person
        })
    }

    /// Seed a chore with explicit frequency, target day, and rules.
    pub async fn add_chore(
        &self,
        name: &str,
        frequency: Frequency,
        day_of_week: u8,
        rules: &[ReminderRule],
    ) -> Result<Chore, RotaError> {
        self.store
            .create_chore(name, frequency, day_of_week, rules)
            .await
    }

    /// Seed a weekly chore with no reminder rules.
    pub async fn add_weekly_chore(&self, name: &str, day_of_week: u8) -> Result<Chore, RotaError> {
        self.add_chore(name, Frequency::Weekly, day_of_week, &[])
            .await
    }
}
