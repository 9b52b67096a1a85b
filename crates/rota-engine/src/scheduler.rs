// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weekly assignment generation and the assignment lifecycle.
//!
//! Weeks run Monday through Sunday. Generation walks every chore due in
//! the current week, skips rows that already exist, and threads a
//! run-local set of assignees through the picker so nobody is handed two
//! chores in one pass unless the pool leaves no other option.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use rota_core::traits::store::RecordStore;
use rota_core::types::{Assignment, AssignmentStatus, Frequency};
use rota_core::RotaError;

use crate::fairness::{is_away_long_on, AssigneePicker, DebtLedger};

/// Fixed Monday anchoring the biweekly on/off alternation.
fn biweekly_anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 2).expect("fixed anchor date is valid")
}

/// The Monday of the week containing `d`.
pub fn week_start_of(d: NaiveDate) -> NaiveDate {
    d - chrono::Duration::days(i64::from(d.weekday().num_days_from_monday()))
}

/// Whether a chore with this frequency is due in the week starting at
/// `week_start`.
///
/// Biweekly chores alternate on whole weeks counted from a fixed anchor
/// Monday; the count floors, so weeks before the anchor alternate
/// consistently too.
pub fn is_due_week(frequency: Frequency, week_start: NaiveDate) -> bool {
    match frequency {
        Frequency::Weekly => true,
        Frequency::Biweekly => {
            let diff_weeks = (week_start - biweekly_anchor()).num_days().div_euclid(7);
            diff_weeks.rem_euclid(2) == 0
        }
    }
}

/// The concrete due date for a chore inside its week.
pub fn due_date_for(week_start: NaiveDate, day_of_week: u8) -> NaiveDate {
    week_start + chrono::Duration::days(i64::from(day_of_week))
}

/// Drives assignment creation and state transitions against the store.
pub struct Scheduler {
    store: Arc<dyn RecordStore>,
    picker: AssigneePicker,
    ledger: DebtLedger,
}

impl Scheduler {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            picker: AssigneePicker::new(store.clone()),
            ledger: DebtLedger::new(store.clone()),
            store,
        }
    }

    /// Create this week's assignments for every due chore.
    ///
    /// Safe to run repeatedly: chores that already have a row for the
    /// week are left alone, but their assignees still count against the
    /// no-double-duty preference for the rest of the pass. Returns only
    /// the rows created by this call.
    pub async fn generate(&self, today: NaiveDate) -> Result<Vec<Assignment>, RotaError> {
        let week_start = week_start_of(today);
        info!(week_start = %week_start, "generating weekly assignments");

        let mut created = Vec::new();
        let mut assigned_this_week: BTreeSet<i64> = BTreeSet::new();

        for chore in self.store.chores().await? {
            let chore = match chore {
                Ok(chore) => chore,
                Err(error) => {
                    warn!(error = %error, "skipping chore that failed to load");
                    continue;
                }
            };

            if !is_due_week(chore.frequency, week_start) {
                continue;
            }

            let due_date = due_date_for(week_start, chore.day_of_week);

            // 1. Keep existing rows, but remember who holds them.
            if let Some(existing) = self
                .store
                .assignment_for_chore_week(chore.id, week_start)
                .await?
            {
                assigned_this_week.insert(existing.person_id);
                continue;
            }

            // 2. Prefer someone without a chore this week; if that leaves
            //    nobody, allow double duty.
            let mut assignee = self
                .picker
                .pick(chore.id, due_date, &assigned_this_week)
                .await?;
            if assignee.is_none() {
                assignee = self.picker.pick(chore.id, due_date, &BTreeSet::new()).await?;
            }

            let Some(assignee) = assignee else {
                warn!(chore = %chore.name, "no eligible assignee this week");
                continue;
            };

            // 3. Persist and fold the winner into the run-local set.
            let assignment = self
                .store
                .create_assignment(chore.id, assignee.id, week_start, due_date)
                .await?;
            info!(
                chore = %chore.name,
                assignee = %assignee.name,
                due_date = %due_date,
                "assignment created"
            );
            assigned_this_week.insert(assignee.id);
            created.push(assignment);
        }

        Ok(created)
    }

    /// Hand an assignment to a new person, never repeating anyone who
    /// already held it.
    ///
    /// Phase one also avoids people holding another chore this week;
    /// phase two drops that preference but keeps the history ban. If
    /// both phases come up empty the row is left untouched and
    /// [`RotaError::NoEligibleCandidate`] is returned.
    pub async fn reassign(&self, assignment_id: i64) -> Result<Assignment, RotaError> {
        let Some(mut assignment) = self.store.assignment(assignment_id).await? else {
            return Err(RotaError::NotFound {
                entity: "assignment",
                id: assignment_id,
            });
        };

        // The current holder joins the history before picking.
        let mut history = assignment.previous_assignee_ids.clone();
        history.insert(assignment.person_id);

        let assigned_this_week: BTreeSet<i64> = self
            .store
            .assignments_for_week(assignment.week_start)
            .await?
            .into_iter()
            .map(|a| a.person_id)
            .collect();

        let strict: BTreeSet<i64> = assigned_this_week.union(&history).copied().collect();
        let mut replacement = self
            .picker
            .pick(assignment.chore_id, assignment.due_date, &strict)
            .await?;
        if replacement.is_none() {
            replacement = self
                .picker
                .pick(assignment.chore_id, assignment.due_date, &history)
                .await?;
        }

        let Some(replacement) = replacement else {
            return Err(RotaError::NoEligibleCandidate {
                chore_id: assignment.chore_id,
            });
        };

        info!(
            assignment_id,
            from = assignment.person_id,
            to = replacement.id,
            "reassigning"
        );
        assignment.previous_assignee_ids = history;
        assignment.person_id = replacement.id;
        assignment.status = AssignmentStatus::Reassigned;
        self.store.update_assignment(&assignment).await?;
        Ok(assignment)
    }

    /// Mark an assignment completed and pay down one unit of the
    /// assignee's debt. Repeat calls are no-ops.
    pub async fn mark_done(
        &self,
        assignment_id: i64,
        now: NaiveDateTime,
    ) -> Result<Assignment, RotaError> {
        let Some(mut assignment) = self.store.assignment(assignment_id).await? else {
            return Err(RotaError::NotFound {
                entity: "assignment",
                id: assignment_id,
            });
        };
        if assignment.status == AssignmentStatus::Done {
            return Ok(assignment);
        }

        assignment.status = AssignmentStatus::Done;
        assignment.completed_at = Some(now);
        self.store.update_assignment(&assignment).await?;
        self.ledger
            .decrement(assignment.person_id, assignment.chore_id)
            .await?;
        Ok(assignment)
    }

    /// Mark an assignment missed and charge one unit of debt, unless a
    /// long absence covered the due date. Repeat calls are no-ops.
    pub async fn mark_missed(&self, assignment_id: i64) -> Result<Assignment, RotaError> {
        let Some(mut assignment) = self.store.assignment(assignment_id).await? else {
            return Err(RotaError::NotFound {
                entity: "assignment",
                id: assignment_id,
            });
        };
        if assignment.status == AssignmentStatus::Missed {
            return Ok(assignment);
        }

        assignment.status = AssignmentStatus::Missed;
        assignment.completed_at = None;
        self.store.update_assignment(&assignment).await?;

        if !is_away_long_on(
            self.store.as_ref(),
            assignment.person_id,
            assignment.due_date,
        )
        .await?
        {
            self.ledger
                .increment(assignment.person_id, assignment.chore_id)
                .await?;
        }
        Ok(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rota_test_utils::TestHarness;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_start_is_the_containing_monday() {
        assert_eq!(week_start_of(ymd(2026, 2, 2)), ymd(2026, 2, 2));
        assert_eq!(week_start_of(ymd(2026, 2, 6)), ymd(2026, 2, 2));
        assert_eq!(week_start_of(ymd(2026, 2, 8)), ymd(2026, 2, 2));
        assert_eq!(week_start_of(ymd(2026, 2, 9)), ymd(2026, 2, 9));
    }

    #[test]
    fn weekly_chores_are_due_every_week() {
        assert!(is_due_week(Frequency::Weekly, ymd(2026, 2, 2)));
        assert!(is_due_week(Frequency::Weekly, ymd(2026, 2, 9)));
    }

    #[test]
    fn biweekly_chores_alternate_from_the_anchor() {
        assert!(is_due_week(Frequency::Biweekly, ymd(2026, 2, 2)));
        assert!(!is_due_week(Frequency::Biweekly, ymd(2026, 2, 9)));
        assert!(is_due_week(Frequency::Biweekly, ymd(2026, 2, 16)));
    }

    #[test]
    fn biweekly_alternation_holds_before_the_anchor() {
        // Floor division keeps whole-week counts consistent on both
        // sides of the anchor.
        assert!(!is_due_week(Frequency::Biweekly, ymd(2026, 1, 26)));
        assert!(is_due_week(Frequency::Biweekly, ymd(2026, 1, 19)));
    }

    #[test]
    fn due_date_lands_on_the_chore_day() {
        assert_eq!(due_date_for(ymd(2026, 2, 2), 4), ymd(2026, 2, 6));
        assert_eq!(due_date_for(ymd(2026, 2, 2), 0), ymd(2026, 2, 2));
        assert_eq!(due_date_for(ymd(2026, 2, 2), 6), ymd(2026, 2, 8));
    }

    #[tokio::test]
    async fn generate_is_idempotent() {
        let harness = TestHarness::new().await.unwrap();
        harness.add_person("Sashi").await.unwrap();
        harness.add_person("Raja").await.unwrap();
        harness.add_weekly_chore("Garbage Cleanup", 4).await.unwrap();

        let scheduler = Scheduler::new(harness.record_store());
        let first = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].week_start, ymd(2026, 2, 2));
        assert_eq!(first[0].due_date, ymd(2026, 2, 6));
        assert_eq!(first[0].status, AssignmentStatus::Pending);

        let second = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
        assert!(second.is_empty());

        let week = harness
            .record_store()
            .assignments_for_week(ymd(2026, 2, 2))
            .await
            .unwrap();
        assert_eq!(week.len(), 1);
    }

    #[tokio::test]
    async fn generate_skips_biweekly_off_weeks() {
        let harness = TestHarness::new().await.unwrap();
        harness.add_person("Sashi").await.unwrap();
        harness
            .add_chore("Washroom Cleaning", Frequency::Biweekly, 6, &[])
            .await
            .unwrap();

        let scheduler = Scheduler::new(harness.record_store());
        let off_week = scheduler.generate(ymd(2026, 2, 11)).await.unwrap();
        assert!(off_week.is_empty());

        let on_week = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
        assert_eq!(on_week.len(), 1);
        assert_eq!(on_week[0].due_date, ymd(2026, 2, 8));
    }

    #[tokio::test]
    async fn generate_spreads_chores_across_people() {
        let harness = TestHarness::new().await.unwrap();
        let sashi = harness.add_person("Sashi").await.unwrap();
        let raja = harness.add_person("Raja").await.unwrap();
        harness.add_weekly_chore("Garbage Cleanup", 4).await.unwrap();
        harness.add_weekly_chore("Kitchen Cleaning", 6).await.unwrap();

        let scheduler = Scheduler::new(harness.record_store());
        let created = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
        assert_eq!(created.len(), 2);
        let assignees: BTreeSet<i64> = created.iter().map(|a| a.person_id).collect();
        assert_eq!(assignees, [sashi.id, raja.id].into_iter().collect());
    }

    #[tokio::test]
    async fn generate_falls_back_to_double_duty_when_pool_is_short() {
        let harness = TestHarness::new().await.unwrap();
        let sashi = harness.add_person("Sashi").await.unwrap();
        harness.add_weekly_chore("Garbage Cleanup", 4).await.unwrap();
        harness.add_weekly_chore("Kitchen Cleaning", 6).await.unwrap();

        let scheduler = Scheduler::new(harness.record_store());
        let created = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
        assert_eq!(created.len(), 2);
        assert!(created.iter().all(|a| a.person_id == sashi.id));
    }

    #[tokio::test]
    async fn generate_counts_existing_rows_against_double_duty() {
        let harness = TestHarness::new().await.unwrap();
        let sashi = harness.add_person("Sashi").await.unwrap();
        let raja = harness.add_person("Raja").await.unwrap();
        harness.add_weekly_chore("Garbage Cleanup", 4).await.unwrap();

        let scheduler = Scheduler::new(harness.record_store());
        let first = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
        assert_eq!(first[0].person_id, sashi.id);

        // A chore added mid-week goes to the other person, because the
        // existing row's assignee still counts.
        harness.add_weekly_chore("Kitchen Cleaning", 6).await.unwrap();
        let second = scheduler.generate(ymd(2026, 2, 5)).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].person_id, raja.id);
    }

    #[tokio::test]
    async fn reassign_picks_fresh_person_and_grows_history() {
        let harness = TestHarness::new().await.unwrap();
        let sashi = harness.add_person("Sashi").await.unwrap();
        let raja = harness.add_person("Raja").await.unwrap();
        let guru = harness.add_person("Guru").await.unwrap();
        harness.add_weekly_chore("Garbage Cleanup", 4).await.unwrap();

        let scheduler = Scheduler::new(harness.record_store());
        let created = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
        assert_eq!(created[0].person_id, sashi.id);

        let reassigned = scheduler.reassign(created[0].id).await.unwrap();
        assert_eq!(reassigned.person_id, raja.id);
        assert_eq!(reassigned.status, AssignmentStatus::Reassigned);
        assert_eq!(
            reassigned.previous_assignee_ids,
            [sashi.id].into_iter().collect()
        );

        let again = scheduler.reassign(created[0].id).await.unwrap();
        assert_eq!(again.person_id, guru.id);
        assert_eq!(
            again.previous_assignee_ids,
            [sashi.id, raja.id].into_iter().collect()
        );
    }

    #[tokio::test]
    async fn reassign_falls_back_past_double_duty_but_never_history() {
        let harness = TestHarness::new().await.unwrap();
        let sashi = harness.add_person("Sashi").await.unwrap();
        let raja = harness.add_person("Raja").await.unwrap();
        harness.add_weekly_chore("Garbage Cleanup", 4).await.unwrap();
        harness.add_weekly_chore("Kitchen Cleaning", 6).await.unwrap();

        let scheduler = Scheduler::new(harness.record_store());
        let created = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
        let garbage = &created[0];
        assert_eq!(garbage.person_id, sashi.id);

        // Raja already has the kitchen this week, but with Sashi in the
        // history the fallback still lands on Raja.
        let reassigned = scheduler.reassign(garbage.id).await.unwrap();
        assert_eq!(reassigned.person_id, raja.id);
    }

    #[tokio::test]
    async fn reassign_errors_once_everyone_has_been_tried() {
        let harness = TestHarness::new().await.unwrap();
        let sashi = harness.add_person("Sashi").await.unwrap();
        let raja = harness.add_person("Raja").await.unwrap();
        harness.add_weekly_chore("Garbage Cleanup", 4).await.unwrap();

        let scheduler = Scheduler::new(harness.record_store());
        let created = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
        scheduler.reassign(created[0].id).await.unwrap();

        let err = scheduler.reassign(created[0].id).await.unwrap_err();
        assert!(matches!(err, RotaError::NoEligibleCandidate { .. }));

        // The failed attempt leaves the row exactly as it was.
        let row = harness
            .record_store()
            .assignment(created[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.person_id, raja.id);
        assert_eq!(row.status, AssignmentStatus::Reassigned);
        assert_eq!(row.previous_assignee_ids, [sashi.id].into_iter().collect());
    }

    #[tokio::test]
    async fn mark_done_pays_down_debt_once() {
        let harness = TestHarness::new().await.unwrap();
        let sashi = harness.add_person("Sashi").await.unwrap();
        let chore = harness.add_weekly_chore("Garbage Cleanup", 4).await.unwrap();

        let store = harness.record_store();
        let ledger = DebtLedger::new(store.clone());
        ledger.increment(sashi.id, chore.id).await.unwrap();
        ledger.increment(sashi.id, chore.id).await.unwrap();

        let scheduler = Scheduler::new(store.clone());
        let created = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
        let now = ymd(2026, 2, 6).and_hms_opt(20, 0, 0).unwrap();

        let done = scheduler.mark_done(created[0].id, now).await.unwrap();
        assert_eq!(done.status, AssignmentStatus::Done);
        assert_eq!(done.completed_at, Some(now));
        let debt = store.get_or_create_debt(sashi.id, chore.id).await.unwrap();
        assert_eq!(debt.count, 1);

        // Marking done again changes nothing.
        scheduler.mark_done(created[0].id, now).await.unwrap();
        let debt = store.get_or_create_debt(sashi.id, chore.id).await.unwrap();
        assert_eq!(debt.count, 1);
    }

    #[tokio::test]
    async fn mark_missed_charges_debt_once() {
        let harness = TestHarness::new().await.unwrap();
        let sashi = harness.add_person("Sashi").await.unwrap();
        let chore = harness.add_weekly_chore("Garbage Cleanup", 4).await.unwrap();

        let store = harness.record_store();
        let scheduler = Scheduler::new(store.clone());
        let created = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();

        let missed = scheduler.mark_missed(created[0].id).await.unwrap();
        assert_eq!(missed.status, AssignmentStatus::Missed);
        assert_eq!(missed.completed_at, None);
        let debt = store.get_or_create_debt(sashi.id, chore.id).await.unwrap();
        assert_eq!(debt.count, 1);

        scheduler.mark_missed(created[0].id).await.unwrap();
        let debt = store.get_or_create_debt(sashi.id, chore.id).await.unwrap();
        assert_eq!(debt.count, 1);
    }

    #[tokio::test]
    async fn mark_missed_waives_debt_during_long_absence() {
        let harness = TestHarness::new().await.unwrap();
        let sashi = harness.add_person("Sashi").await.unwrap();
        let chore = harness.add_weekly_chore("Garbage Cleanup", 4).await.unwrap();

        let store = harness.record_store();
        let scheduler = Scheduler::new(store.clone());
        let created = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();

        // Seven inclusive days covering the due date waives the charge.
        store
            .create_absence(sashi.id, ymd(2026, 2, 2), ymd(2026, 2, 8), Some("trip"))
            .await
            .unwrap();

        scheduler.mark_missed(created[0].id).await.unwrap();
        let debt = store.get_or_create_debt(sashi.id, chore.id).await.unwrap();
        assert_eq!(debt.count, 0);
    }

    #[tokio::test]
    async fn lifecycle_calls_on_missing_rows_report_not_found() {
        let harness = TestHarness::new().await.unwrap();
        let scheduler = Scheduler::new(harness.record_store());

        let err = scheduler.reassign(999).await.unwrap_err();
        assert!(matches!(
            err,
            RotaError::NotFound {
                entity: "assignment",
                ..
            }
        ));
    }
}
