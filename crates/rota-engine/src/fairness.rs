// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fairness primitives: the debt ledger, the absence check, and the
//! assignee picker.
//!
//! Debt is scored per (person, chore): missing a chore raises that pair's
//! counter, completing one lowers it toward zero. The picker ranks the
//! eligible pool by debt first and rotation recency second, with no
//! randomness anywhere, so identical state always yields the same pick.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;

use rota_core::traits::store::RecordStore;
use rota_core::types::{Absence, Debt, Person};
use rota_core::RotaError;

/// Sort key date for people never assigned a chore, far enough in the
/// past to order them ahead of anyone with a real last-assignment week.
fn never_assigned_sentinel() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).expect("sentinel date is valid")
}

/// Store-backed fairness debt counters, floored at zero.
pub struct DebtLedger {
    store: Arc<dyn RecordStore>,
}

impl DebtLedger {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// The debt row for (person, chore), created at zero on first access.
    pub async fn get_or_create(&self, person_id: i64, chore_id: i64) -> Result<Debt, RotaError> {
        self.store.get_or_create_debt(person_id, chore_id).await
    }

    /// Raise the pair's debt by one. Returns the new count.
    pub async fn increment(&self, person_id: i64, chore_id: i64) -> Result<i64, RotaError> {
        let debt = self.store.get_or_create_debt(person_id, chore_id).await?;
        let count = debt.count + 1;
        self.store.set_debt_count(debt.id, count).await?;
        Ok(count)
    }

    /// Lower the pair's debt by one, never below zero. Decrementing a
    /// zero debt is a no-op, not an error.
    pub async fn decrement(&self, person_id: i64, chore_id: i64) -> Result<i64, RotaError> {
        let debt = self.store.get_or_create_debt(person_id, chore_id).await?;
        if debt.count == 0 {
            return Ok(0);
        }
        let count = debt.count - 1;
        self.store.set_debt_count(debt.id, count).await?;
        Ok(count)
    }
}

/// Whether a long absence (7+ inclusive days) covers `date` for this person.
///
/// Only the first stored interval containing `date` is consulted; a short
/// containing interval answers "no" even if a later overlapping interval
/// is long.
pub async fn is_away_long_on(
    store: &dyn RecordStore,
    person_id: i64,
    date: NaiveDate,
) -> Result<bool, RotaError> {
    let absences = store.absences_for_person(person_id).await?;
    Ok(long_absence_covers(&absences, date))
}

fn long_absence_covers(absences: &[Absence], date: NaiveDate) -> bool {
    absences
        .iter()
        .find(|a| a.covers(date))
        .is_some_and(Absence::is_long)
}

/// One scored entry in the picker's eligible pool.
struct Candidate {
    person: Person,
    debt: i64,
    last_week_start: Option<NaiveDate>,
}

/// Deterministic fairness-ranked assignee selection.
pub struct AssigneePicker {
    store: Arc<dyn RecordStore>,
}

impl AssigneePicker {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Pick the best assignee for a chore due on `due_date`.
    ///
    /// The pool is all active people minus `exclude_ids`, minus standing
    /// chore bans, minus anyone on a long absence covering the due date.
    /// Ranking: highest debt for this chore first; ties go to whoever was
    /// assigned it longest ago, with never-assigned people first of all.
    /// Returns `None` when the pool empties out.
    pub async fn pick(
        &self,
        chore_id: i64,
        due_date: NaiveDate,
        exclude_ids: &BTreeSet<i64>,
    ) -> Result<Option<Person>, RotaError> {
        let banned: BTreeSet<i64> = self
            .store
            .exclusions_for_chore(chore_id)
            .await?
            .into_iter()
            .map(|e| e.person_id)
            .collect();

        let mut pool = Vec::new();
        for person in self.store.active_people().await? {
            if exclude_ids.contains(&person.id) || banned.contains(&person.id) {
                continue;
            }
            if is_away_long_on(self.store.as_ref(), person.id, due_date).await? {
                continue;
            }
            // Debt rows are created lazily, but only for people who
            // survive the filters above.
            let debt = self.store.get_or_create_debt(person.id, chore_id).await?;
            let last_week_start = self
                .store
                .last_assignment_week_start(person.id, chore_id)
                .await?;
            pool.push(Candidate {
                person,
                debt: debt.count,
                last_week_start,
            });
        }

        Ok(rank(pool).map(|c| c.person))
    }
}

/// Order the pool and return the winner.
///
/// The sort is stable over the store's id ordering, which makes the whole
/// pick reproducible: same state in, same person out.
fn rank(mut pool: Vec<Candidate>) -> Option<Candidate> {
    pool.sort_by_key(|c| {
        (
            Reverse(c.debt),
            c.last_week_start.unwrap_or_else(never_assigned_sentinel),
        )
    });
    pool.into_iter().next()
}
