// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the RecordStore trait.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use rota_config::model::StorageConfig;
use rota_core::types::{
    Absence, Assignment, Chore, ChoreExclusion, Debt, Frequency, HealthStatus, Person,
    ReminderLogEntry, ReminderRule,
};
use rota_core::{Adapter, RecordStore, RotaError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed record store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. Opening runs migrations, so a constructed store is
/// always ready for use.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the store at the configured path.
    pub async fn open(config: &StorageConfig) -> Result<Self, RotaError> {
        let db = Database::open_with_options(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite record store opened");
        Ok(Self { db })
    }
}

#[async_trait]
impl Adapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, RotaError> {
        self.db
            .connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RotaError> {
        self.db.close().await
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    // --- People ---

    async fn create_person(
        &self,
        name: &str,
        contact_address: &str,
    ) -> Result<Person, RotaError> {
        queries::people::create_person(&self.db, name, contact_address).await
    }

    async fn person(&self, id: i64) -> Result<Option<Person>, RotaError> {
        queries::people::get_person(&self.db, id).await
    }

    async fn people(&self) -> Result<Vec<Person>, RotaError> {
        queries::people::list_people(&self.db).await
    }

    async fn active_people(&self) -> Result<Vec<Person>, RotaError> {
        queries::people::list_active_people(&self.db).await
    }

    async fn set_person_active(&self, id: i64, active: bool) -> Result<(), RotaError> {
        queries::people::set_active(&self.db, id, active).await
    }

    // --- Chores ---

    async fn create_chore(
        &self,
        name: &str,
        frequency: Frequency,
        day_of_week: u8,
        rules: &[ReminderRule],
    ) -> Result<Chore, RotaError> {
        queries::chores::create_chore(&self.db, name, frequency, day_of_week, rules).await
    }

    async fn chore(&self, id: i64) -> Result<Option<Chore>, RotaError> {
        queries::chores::get_chore(&self.db, id).await
    }

    async fn chores(&self) -> Result<Vec<Result<Chore, RotaError>>, RotaError> {
        queries::chores::list_chores(&self.db).await
    }

    // --- Assignments ---

    async fn create_assignment(
        &self,
        chore_id: i64,
        person_id: i64,
        week_start: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<Assignment, RotaError> {
        queries::assignments::create_assignment(&self.db, chore_id, person_id, week_start, due_date)
            .await
    }

    async fn assignment(&self, id: i64) -> Result<Option<Assignment>, RotaError> {
        queries::assignments::get_assignment(&self.db, id).await
    }

    async fn assignment_for_chore_week(
        &self,
        chore_id: i64,
        week_start: NaiveDate,
    ) -> Result<Option<Assignment>, RotaError> {
        queries::assignments::get_for_chore_week(&self.db, chore_id, week_start).await
    }

    async fn assignments_for_week(
        &self,
        week_start: NaiveDate,
    ) -> Result<Vec<Assignment>, RotaError> {
        queries::assignments::list_for_week(&self.db, week_start).await
    }

    async fn pending_assignments_for_week(
        &self,
        week_start: NaiveDate,
    ) -> Result<Vec<Assignment>, RotaError> {
        queries::assignments::list_pending_for_week(&self.db, week_start).await
    }

    async fn last_assignment_week_start(
        &self,
        person_id: i64,
        chore_id: i64,
    ) -> Result<Option<NaiveDate>, RotaError> {
        queries::assignments::last_week_start(&self.db, person_id, chore_id).await
    }

    async fn update_assignment(&self, assignment: &Assignment) -> Result<(), RotaError> {
        queries::assignments::update_assignment(&self.db, assignment).await
    }

    // --- Debts ---

    async fn get_or_create_debt(&self, person_id: i64, chore_id: i64) -> Result<Debt, RotaError> {
        queries::debts::get_or_create(&self.db, person_id, chore_id).await
    }

    async fn set_debt_count(&self, debt_id: i64, count: i64) -> Result<(), RotaError> {
        queries::debts::set_count(&self.db, debt_id, count).await
    }

    async fn debts(&self) -> Result<Vec<Debt>, RotaError> {
        queries::debts::list_debts(&self.db).await
    }

    // --- Absences ---

    async fn create_absence(
        &self,
        person_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<&str>,
    ) -> Result<Absence, RotaError> {
        queries::absences::create_absence(&self.db, person_id, start_date, end_date, reason).await
    }

    async fn absences_for_person(&self, person_id: i64) -> Result<Vec<Absence>, RotaError> {
        queries::absences::list_for_person(&self.db, person_id).await
    }

    async fn delete_absence(&self, id: i64) -> Result<(), RotaError> {
        queries::absences::delete_absence(&self.db, id).await
    }

    // --- Chore exclusions ---

    async fn create_exclusion(
        &self,
        chore_id: i64,
        person_id: i64,
    ) -> Result<ChoreExclusion, RotaError> {
        queries::exclusions::create_exclusion(&self.db, chore_id, person_id).await
    }

    async fn exclusions_for_chore(
        &self,
        chore_id: i64,
    ) -> Result<Vec<ChoreExclusion>, RotaError> {
        queries::exclusions::list_for_chore(&self.db, chore_id).await
    }

    async fn delete_exclusion(&self, id: i64) -> Result<(), RotaError> {
        queries::exclusions::delete_exclusion(&self.db, id).await
    }

    // --- Reminder log ---

    async fn reminder_logged(&self, assignment_id: i64, key: &str) -> Result<bool, RotaError> {
        queries::reminder_log::is_logged(&self.db, assignment_id, key).await
    }

    async fn log_reminder(
        &self,
        assignment_id: i64,
        key: &str,
        sent_at: NaiveDateTime,
    ) -> Result<(), RotaError> {
        queries::reminder_log::insert_log(&self.db, assignment_id, key, sent_at).await
    }

    async fn reminder_log_for_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<ReminderLogEntry>, RotaError> {
        queries::reminder_log::list_for_assignment(&self.db, assignment_id).await
    }
}
