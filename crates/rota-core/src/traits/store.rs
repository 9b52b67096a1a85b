// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store trait: the persistence contract the engine runs against.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::RotaError;
use crate::traits::adapter::Adapter;
use crate::types::{
    Absence, Assignment, Chore, ChoreExclusion, Debt, Frequency, Person, ReminderLogEntry,
    ReminderRule,
};

/// Persistence contract for people, chores, assignments, debts, absences,
/// exclusions, and the reminder dedup log.
///
/// Implementations must enforce uniqueness on chore names, on
/// (chore, week_start) for assignments, on (person, chore) for debts, on
/// (chore, person) for exclusions, and on (assignment, reminder key) for
/// the reminder log. Each method is one atomic unit of work; the engine
/// relies on that for crash-safe partial progress (§ batch-job model).
#[async_trait]
pub trait RecordStore: Adapter {
    // --- People ---

    /// Creates an active person. A duplicate contact address is allowed;
    /// names are display-only and not unique.
    async fn create_person(&self, name: &str, contact_address: &str)
    -> Result<Person, RotaError>;

    async fn person(&self, id: i64) -> Result<Option<Person>, RotaError>;

    async fn people(&self) -> Result<Vec<Person>, RotaError>;

    /// All people with the active flag set, ordered by id.
    async fn active_people(&self) -> Result<Vec<Person>, RotaError>;

    async fn set_person_active(&self, id: i64, active: bool) -> Result<(), RotaError>;

    // --- Chores ---

    /// Creates a chore. Fails with [`RotaError::Duplicate`] when the name
    /// is taken or a reminder rule key repeats within `rules`.
    async fn create_chore(
        &self,
        name: &str,
        frequency: Frequency,
        day_of_week: u8,
        rules: &[ReminderRule],
    ) -> Result<Chore, RotaError>;

    async fn chore(&self, id: i64) -> Result<Option<Chore>, RotaError>;

    /// All chores, ordered by id. A chore whose stored rule list fails to
    /// decode surfaces [`RotaError::MalformedReminderRules`] for that chore
    /// only; implementations must not fail the whole listing.
    async fn chores(&self) -> Result<Vec<Result<Chore, RotaError>>, RotaError>;

    // --- Assignments ---

    async fn create_assignment(
        &self,
        chore_id: i64,
        person_id: i64,
        week_start: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<Assignment, RotaError>;

    async fn assignment(&self, id: i64) -> Result<Option<Assignment>, RotaError>;

    /// The unique assignment for (chore, week_start), if one exists.
    async fn assignment_for_chore_week(
        &self,
        chore_id: i64,
        week_start: NaiveDate,
    ) -> Result<Option<Assignment>, RotaError>;

    /// All assignments anchored at `week_start`, ordered by id.
    async fn assignments_for_week(&self, week_start: NaiveDate)
    -> Result<Vec<Assignment>, RotaError>;

    /// Pending assignments anchored at `week_start`, ordered by id.
    async fn pending_assignments_for_week(
        &self,
        week_start: NaiveDate,
    ) -> Result<Vec<Assignment>, RotaError>;

    /// Max week_start among this person's past assignments for this chore.
    async fn last_assignment_week_start(
        &self,
        person_id: i64,
        chore_id: i64,
    ) -> Result<Option<NaiveDate>, RotaError>;

    /// Writes back assignee, status, history, completion, and notes for an
    /// existing row. Reassignment mutates in place through this method.
    async fn update_assignment(&self, assignment: &Assignment) -> Result<(), RotaError>;

    // --- Debts ---

    /// Returns the debt row for (person, chore), creating it with count 0
    /// if absent. The create is persisted immediately and racing callers
    /// observe one consistent row.
    async fn get_or_create_debt(&self, person_id: i64, chore_id: i64)
    -> Result<Debt, RotaError>;

    async fn set_debt_count(&self, debt_id: i64, count: i64) -> Result<(), RotaError>;

    async fn debts(&self) -> Result<Vec<Debt>, RotaError>;

    // --- Absences ---

    async fn create_absence(
        &self,
        person_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<&str>,
    ) -> Result<Absence, RotaError>;

    /// All absence intervals for a person, in insertion order.
    async fn absences_for_person(&self, person_id: i64) -> Result<Vec<Absence>, RotaError>;

    async fn delete_absence(&self, id: i64) -> Result<(), RotaError>;

    // --- Chore exclusions ---

    /// Fails with [`RotaError::Duplicate`] when the (chore, person) ban
    /// already exists.
    async fn create_exclusion(
        &self,
        chore_id: i64,
        person_id: i64,
    ) -> Result<ChoreExclusion, RotaError>;

    async fn exclusions_for_chore(&self, chore_id: i64)
    -> Result<Vec<ChoreExclusion>, RotaError>;

    async fn delete_exclusion(&self, id: i64) -> Result<(), RotaError>;

    // --- Reminder log ---

    /// Whether a reminder was already sent for (assignment, key).
    async fn reminder_logged(&self, assignment_id: i64, key: &str) -> Result<bool, RotaError>;

    /// Appends a dedup record. Inserting an existing (assignment, key) pair
    /// is treated as already satisfied, not an error.
    async fn log_reminder(
        &self,
        assignment_id: i64,
        key: &str,
        sent_at: NaiveDateTime,
    ) -> Result<(), RotaError>;

    /// Log entries for one assignment, oldest first.
    async fn reminder_log_for_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<ReminderLogEntry>, RotaError>;
}
