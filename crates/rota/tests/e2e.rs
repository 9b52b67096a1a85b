// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete rota pipeline.
//!
//! Each test creates an isolated TestHarness with a temp SQLite store and
//! a mock channel, then drives the scheduler and dispatcher against it.
//! Tests are independent and order-insensitive.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};

use rota_core::traits::store::RecordStore;
use rota_core::types::{AssignmentStatus, Frequency};
use rota_engine::{ReminderDispatcher, Scheduler};
use rota_test_utils::{rule, TestHarness};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, hour: u32) -> NaiveDateTime {
    ymd(y, m, d).and_hms_opt(hour, 30, 0).unwrap()
}

/// Seed the standard five-person, three-chore house.
async fn seed_house(harness: &TestHarness) {
    for name in ["Sashi", "Raja", "Guru", "Naveen", "Veenus"] {
        harness.add_person(name).await.unwrap();
    }
    harness
        .add_chore(
            "Garbage Cleanup",
            Frequency::Weekly,
            4,
            &[
                rule("monday", 0, 9),
                rule("thursday", 3, 19),
                rule("sunday", 6, 14),
            ],
        )
        .await
        .unwrap();
    harness
        .add_chore(
            "Washroom Cleaning",
            Frequency::Biweekly,
            6,
            &[rule("friday", 4, 10)],
        )
        .await
        .unwrap();
    harness
        .add_chore(
            "Kitchen Cleaning",
            Frequency::Biweekly,
            6,
            &[rule("friday", 4, 10)],
        )
        .await
        .unwrap();
}

// ---- Test 1: Weekly generation pipeline ----

#[tokio::test]
async fn test_generate_creates_the_full_week_and_is_idempotent() {
    let harness = TestHarness::new().await.unwrap();
    seed_house(&harness).await;

    let scheduler = Scheduler::new(harness.record_store());
    let created = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();

    assert_eq!(created.len(), 3);
    assert!(created.iter().all(|a| a.week_start == ymd(2026, 2, 2)));
    assert!(created.iter().all(|a| a.status == AssignmentStatus::Pending));
    assert_eq!(created[0].due_date, ymd(2026, 2, 6)); // garbage on Friday
    assert_eq!(created[1].due_date, ymd(2026, 2, 8)); // washroom on Sunday
    assert_eq!(created[2].due_date, ymd(2026, 2, 8)); // kitchen on Sunday

    // Five people and three chores: nobody is doubled up.
    let assignees: BTreeSet<i64> = created.iter().map(|a| a.person_id).collect();
    assert_eq!(assignees.len(), 3);

    // Running again later in the same week changes nothing.
    assert!(scheduler.generate(ymd(2026, 2, 6)).await.unwrap().is_empty());
    let week = harness
        .record_store()
        .assignments_for_week(ymd(2026, 2, 2))
        .await
        .unwrap();
    assert_eq!(week.len(), 3);
}

#[tokio::test]
async fn test_off_weeks_skip_biweekly_chores() {
    let harness = TestHarness::new().await.unwrap();
    seed_house(&harness).await;

    // The week of 2026-02-09 is an off week for the biweekly pair, so
    // only the weekly garbage chore lands.
    let scheduler = Scheduler::new(harness.record_store());
    let created = scheduler.generate(ymd(2026, 2, 11)).await.unwrap();

    assert_eq!(created.len(), 1);
    assert_eq!(created[0].due_date, ymd(2026, 2, 13));
}

// ---- Test 2: Reminder delivery through the channel ----

#[tokio::test]
async fn test_scheduled_reminder_reaches_the_channel_once() {
    let harness = TestHarness::new().await.unwrap();
    seed_house(&harness).await;

    let scheduler = Scheduler::new(harness.record_store());
    scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
    let dispatcher = ReminderDispatcher::new(harness.record_store(), harness.channel.clone());

    // Monday 09:xx matches only the garbage monday rule.
    assert_eq!(dispatcher.dispatch(at(2026, 2, 2, 9), false).await.unwrap(), 1);

    let messages = harness.channel.sent_messages().await;
    assert_eq!(messages[0].to, "+16475550100");
    assert!(messages[0].body.starts_with("🗑️ Reminder:"));
    assert!(messages[0].body.contains("⬛ Garbage (Black bin)"));
    assert!(messages[0].body.contains("Pickup: 2026-02-06 (Friday morning)"));

    // The same hour again is deduplicated by the sent log.
    assert_eq!(dispatcher.dispatch(at(2026, 2, 2, 9), false).await.unwrap(), 0);
    assert_eq!(harness.channel.sent_count().await, 1);
}

#[tokio::test]
async fn test_force_dispatch_covers_every_rule_exactly_once() {
    let harness = TestHarness::new().await.unwrap();
    seed_house(&harness).await;

    let scheduler = Scheduler::new(harness.record_store());
    scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
    let dispatcher = ReminderDispatcher::new(harness.record_store(), harness.channel.clone());

    // Three garbage rules plus one each for the biweekly pair.
    assert_eq!(dispatcher.dispatch(at(2026, 2, 3, 12), true).await.unwrap(), 5);

    let bodies: Vec<String> = harness
        .channel
        .sent_messages()
        .await
        .into_iter()
        .map(|m| m.body)
        .collect();
    assert_eq!(
        bodies.iter().filter(|b| b.starts_with("🚨 HIGH ALERT:")).count(),
        1
    );
    assert_eq!(
        bodies.iter().filter(|b| b.starts_with("🧼 Reminder:")).count(),
        1
    );

    // Everything is logged now, so another force pass is a no-op.
    assert_eq!(dispatcher.dispatch(at(2026, 2, 4, 12), true).await.unwrap(), 0);
    assert_eq!(harness.channel.sent_count().await, 5);
}

// ---- Test 3: Outcomes feed the fairness ledger ----

#[tokio::test]
async fn test_missed_chore_debt_biases_the_next_pick() {
    let harness = TestHarness::new().await.unwrap();
    let sashi = harness.add_person("Sashi").await.unwrap();
    let raja = harness.add_person("Raja").await.unwrap();
    let chore = harness.add_weekly_chore("Garbage Cleanup", 4).await.unwrap();

    let store = harness.record_store();
    let scheduler = Scheduler::new(store.clone());

    // Week one goes to Sashi; missing it charges a debt.
    let week_one = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
    assert_eq!(week_one[0].person_id, sashi.id);
    scheduler.mark_missed(week_one[0].id).await.unwrap();
    let debt = store.get_or_create_debt(sashi.id, chore.id).await.unwrap();
    assert_eq!(debt.count, 1);

    // The debtor is picked again the next week to repay it.
    let week_two = scheduler.generate(ymd(2026, 2, 11)).await.unwrap();
    assert_eq!(week_two[0].person_id, sashi.id);

    // Completing pays the debt down and lets the rotation move on.
    scheduler
        .mark_done(week_two[0].id, at(2026, 2, 13, 20))
        .await
        .unwrap();
    let debt = store.get_or_create_debt(sashi.id, chore.id).await.unwrap();
    assert_eq!(debt.count, 0);

    let week_three = scheduler.generate(ymd(2026, 2, 18)).await.unwrap();
    assert_eq!(week_three[0].person_id, raja.id);
}

#[tokio::test]
async fn test_completing_with_zero_debt_never_goes_negative() {
    let harness = TestHarness::new().await.unwrap();
    harness.add_person("Sashi").await.unwrap();
    harness.add_weekly_chore("Kitchen Cleaning", 6).await.unwrap();

    let store = harness.record_store();
    let scheduler = Scheduler::new(store.clone());
    let created = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();

    scheduler
        .mark_done(created[0].id, at(2026, 2, 8, 18))
        .await
        .unwrap();

    let debts = store.debts().await.unwrap();
    assert_eq!(debts.len(), 1);
    assert_eq!(debts[0].count, 0);
}

// ---- Test 4: Absences and exclusions shape the pool ----

#[tokio::test]
async fn test_long_absence_and_standing_ban_remove_candidates() {
    let harness = TestHarness::new().await.unwrap();
    let sashi = harness.add_person("Sashi").await.unwrap();
    let raja = harness.add_person("Raja").await.unwrap();
    let guru = harness.add_person("Guru").await.unwrap();
    let chore = harness.add_weekly_chore("Garbage Cleanup", 4).await.unwrap();

    let store = harness.record_store();
    store.create_exclusion(chore.id, sashi.id).await.unwrap();
    // Seven inclusive days covering the Friday due date.
    store
        .create_absence(raja.id, ymd(2026, 2, 2), ymd(2026, 2, 8), Some("home visit"))
        .await
        .unwrap();

    let scheduler = Scheduler::new(store);
    let created = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].person_id, guru.id);
}

#[tokio::test]
async fn test_short_absence_keeps_a_person_assignable() {
    let harness = TestHarness::new().await.unwrap();
    let sashi = harness.add_person("Sashi").await.unwrap();
    harness.add_weekly_chore("Garbage Cleanup", 4).await.unwrap();

    let store = harness.record_store();
    // Six inclusive days: covers the due date but is not long.
    store
        .create_absence(sashi.id, ymd(2026, 2, 2), ymd(2026, 2, 7), None)
        .await
        .unwrap();

    let scheduler = Scheduler::new(store);
    let created = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].person_id, sashi.id);
}

// ---- Test 5: Reassignment leaves the reminder loop ----

#[tokio::test]
async fn test_reassigned_assignment_stops_reminding() {
    let harness = TestHarness::new().await.unwrap();
    let sashi = harness.add_person("Sashi").await.unwrap();
    let raja = harness.add_person("Raja").await.unwrap();
    harness
        .add_chore(
            "Garbage Cleanup",
            Frequency::Weekly,
            4,
            &[rule("monday", 0, 9), rule("thursday", 3, 19)],
        )
        .await
        .unwrap();

    let scheduler = Scheduler::new(harness.record_store());
    let created = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
    assert_eq!(created[0].person_id, sashi.id);
    let dispatcher = ReminderDispatcher::new(harness.record_store(), harness.channel.clone());

    // The monday nudge goes to the original holder.
    assert_eq!(dispatcher.dispatch(at(2026, 2, 2, 9), false).await.unwrap(), 1);
    assert!(harness.channel.sent_messages().await[0].body.contains("Hey Sashi"));

    // Handing the chore over moves the row out of the pending set, so
    // even the never-sent thursday rule stays quiet.
    let reassigned = scheduler.reassign(created[0].id).await.unwrap();
    assert_eq!(reassigned.person_id, raja.id);
    assert_eq!(dispatcher.dispatch(at(2026, 2, 5, 19), true).await.unwrap(), 0);
    assert_eq!(harness.channel.sent_count().await, 1);
}

// ---- Test 6: Manual wiring without the harness ----

#[tokio::test]
async fn test_pipeline_runs_against_a_hand_wired_store() {
    use rota_config::model::StorageConfig;
    use rota_storage::SqliteStore;
    use rota_test_utils::MockChannel;
    use std::sync::Arc;

    let temp_dir = tempfile::TempDir::new().unwrap();
    let db_path = temp_dir.path().join("pipeline_test.db");

    let storage_config = StorageConfig {
        database_path: db_path.to_string_lossy().into_owned(),
        wal_mode: true,
    };
    let store: Arc<dyn RecordStore> = Arc::new(SqliteStore::open(&storage_config).await.unwrap());
    let channel = Arc::new(MockChannel::new());

    store.create_person("Sashi", "+16476854531").await.unwrap();
    store
        .create_chore("Garbage Cleanup", Frequency::Weekly, 4, &[rule("monday", 0, 9)])
        .await
        .unwrap();

    let scheduler = Scheduler::new(store.clone());
    let created = scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
    assert_eq!(created.len(), 1);

    let dispatcher = ReminderDispatcher::new(store.clone(), channel.clone());
    assert_eq!(dispatcher.dispatch(at(2026, 2, 2, 9), false).await.unwrap(), 1);
    assert_eq!(channel.sent_messages().await[0].to, "+16476854531");

    // The dedup log landed in the same database.
    assert!(store.reminder_logged(created[0].id, "monday").await.unwrap());
    let log = store
        .reminder_log_for_assignment(created[0].id)
        .await
        .unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].reminder_key, "monday");
}

// ---- Test 7: Independent test isolation ----

#[tokio::test]
async fn test_harnesses_are_fully_isolated() {
    let h1 = TestHarness::new().await.unwrap();
    let h2 = TestHarness::new().await.unwrap();

    h1.add_person("Sashi").await.unwrap();
    h1.add_chore(
        "Garbage Cleanup",
        Frequency::Weekly,
        4,
        &[rule("monday", 0, 9)],
    )
    .await
    .unwrap();

    let scheduler = Scheduler::new(h1.record_store());
    scheduler.generate(ymd(2026, 2, 4)).await.unwrap();
    let dispatcher = ReminderDispatcher::new(h1.record_store(), h1.channel.clone());
    dispatcher.dispatch(at(2026, 2, 2, 9), false).await.unwrap();

    assert_eq!(h1.channel.sent_count().await, 1);
    assert_eq!(h2.channel.sent_count().await, 0);
    assert!(h2.store.people().await.unwrap().is_empty());
    assert!(
        h2.record_store()
            .assignments_for_week(ymd(2026, 2, 2))
            .await
            .unwrap()
            .is_empty()
    );
}
