// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reminder dispatch over pending assignments.
//!
//! Each pass walks this week's pending assignments and their chores'
//! reminder rules. A rule fires when the wall clock matches its weekday
//! and hour exactly (or `force` is set), and at most once per
//! (assignment, rule key): the sent log is both the dedup check and the
//! receipt. The log row is written only after the channel accepts the
//! message, so a delivery failure leaves the rule eligible for a retry
//! on a later pass.

use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime, Timelike};
use tracing::{info, warn};

use rota_core::traits::channel::MessageChannel;
use rota_core::traits::store::RecordStore;
use rota_core::types::{OutboundMessage, ReminderRule};
use rota_core::RotaError;

use crate::message::build_message;
use crate::scheduler::week_start_of;

/// Whether a rule's weekday and hour match the given instant.
fn rule_matches(rule: &ReminderRule, now: NaiveDateTime) -> bool {
    now.weekday().num_days_from_monday() == u32::from(rule.day_of_week)
        && now.hour() == u32::from(rule.hour)
}

/// Sends due reminders for the current week's pending assignments.
pub struct ReminderDispatcher {
    store: Arc<dyn RecordStore>,
    channel: Arc<dyn MessageChannel>,
}

impl ReminderDispatcher {
    pub fn new(store: Arc<dyn RecordStore>, channel: Arc<dyn MessageChannel>) -> Self {
        Self { store, channel }
    }

    /// Run one dispatch pass at `now`. With `force`, every not-yet-sent
    /// rule fires regardless of the clock. Returns the number of
    /// messages actually sent.
    pub async fn dispatch(&self, now: NaiveDateTime, force: bool) -> Result<usize, RotaError> {
        let week_start = week_start_of(now.date());
        let pending = self.store.pending_assignments_for_week(week_start).await?;
        let mut sent = 0;

        for assignment in pending {
            let chore = match self.store.chore(assignment.chore_id).await {
                Ok(Some(chore)) => chore,
                Ok(None) => {
                    warn!(chore_id = assignment.chore_id, "assignment references a missing chore");
                    continue;
                }
                Err(error) => {
                    // One broken rules payload must not stall the rest
                    // of the pass.
                    warn!(
                        chore_id = assignment.chore_id,
                        error = %error,
                        "skipping chore with unusable reminder rules"
                    );
                    continue;
                }
            };

            let Some(person) = self.store.person(assignment.person_id).await? else {
                warn!(
                    person_id = assignment.person_id,
                    "assignment references a missing person"
                );
                continue;
            };

            for rule in &chore.reminder_rules {
                if !force && !rule_matches(rule, now) {
                    continue;
                }
                if self.store.reminder_logged(assignment.id, &rule.key).await? {
                    continue;
                }

                let body = build_message(&chore.name, &person.name, assignment.due_date, &rule.key);
                let msg = OutboundMessage {
                    to: person.contact_address.clone(),
                    body,
                };

                match self.channel.send(msg).await {
                    Ok(message_id) => {
                        self.store
                            .log_reminder(assignment.id, &rule.key, now)
                            .await?;
                        info!(
                            assignment_id = assignment.id,
                            rule = %rule.key,
                            message_id = %message_id.0,
                            "reminder sent"
                        );
                        sent += 1;
                    }
                    Err(error) => {
                        warn!(
                            assignment_id = assignment.id,
                            rule = %rule.key,
                            error = %error,
                            "reminder delivery failed"
                        );
                    }
                }
            }
        }

        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rota_core::types::Frequency;
    use rota_test_utils::{rule, TestHarness};

    fn at(y: i32, m: u32, d: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    async fn seeded_dispatcher(
        harness: &TestHarness,
        rules: &[rota_core::types::ReminderRule],
    ) -> ReminderDispatcher {
        harness.add_person("Sashi").await.unwrap();
        harness
            .add_chore("Garbage Cleanup", Frequency::Weekly, 4, rules)
            .await
            .unwrap();
        let scheduler = crate::scheduler::Scheduler::new(harness.record_store());
        scheduler
            .generate(NaiveDate::from_ymd_opt(2026, 2, 4).unwrap())
            .await
            .unwrap();
        ReminderDispatcher::new(harness.record_store(), harness.channel.clone())
    }

    #[test]
    fn rule_matches_exact_weekday_and_hour_only() {
        let monday_nine = rule("monday", 0, 9);
        assert!(rule_matches(&monday_nine, at(2026, 2, 2, 9)));
        assert!(!rule_matches(&monday_nine, at(2026, 2, 2, 10)));
        assert!(!rule_matches(&monday_nine, at(2026, 2, 3, 9)));
    }

    #[tokio::test]
    async fn matching_hour_sends_once_and_logs() {
        let harness = TestHarness::new().await.unwrap();
        let dispatcher = seeded_dispatcher(&harness, &[rule("monday", 0, 9)]).await;

        // Monday 09:xx matches; a second pass in the same hour is
        // deduplicated by the log.
        assert_eq!(dispatcher.dispatch(at(2026, 2, 2, 9), false).await.unwrap(), 1);
        assert_eq!(dispatcher.dispatch(at(2026, 2, 2, 9), false).await.unwrap(), 0);
        assert_eq!(harness.channel.sent_count().await, 1);
    }

    #[tokio::test]
    async fn off_hours_send_nothing_without_force() {
        let harness = TestHarness::new().await.unwrap();
        let dispatcher = seeded_dispatcher(&harness, &[rule("monday", 0, 9)]).await;

        assert_eq!(dispatcher.dispatch(at(2026, 2, 2, 8), false).await.unwrap(), 0);
        assert_eq!(harness.channel.sent_count().await, 0);
    }

    #[tokio::test]
    async fn force_fires_every_unsent_rule_then_nothing() {
        let harness = TestHarness::new().await.unwrap();
        let dispatcher = seeded_dispatcher(
            &harness,
            &[rule("monday", 0, 9), rule("thursday", 3, 19)],
        )
        .await;

        assert_eq!(dispatcher.dispatch(at(2026, 2, 3, 15), true).await.unwrap(), 2);
        // Everything is logged now, so force finds nothing left.
        assert_eq!(dispatcher.dispatch(at(2026, 2, 3, 16), true).await.unwrap(), 0);
        assert_eq!(harness.channel.sent_count().await, 2);
    }

    #[tokio::test]
    async fn delivery_failure_leaves_rule_retryable() {
        let harness = TestHarness::new().await.unwrap();
        let dispatcher = seeded_dispatcher(&harness, &[rule("monday", 0, 9)]).await;

        harness.channel.set_failing(true);
        assert_eq!(dispatcher.dispatch(at(2026, 2, 2, 9), false).await.unwrap(), 0);
        assert_eq!(harness.channel.sent_count().await, 0);

        // No log row was written, so the next pass succeeds.
        harness.channel.set_failing(false);
        assert_eq!(dispatcher.dispatch(at(2026, 2, 2, 9), false).await.unwrap(), 1);
        assert_eq!(harness.channel.sent_count().await, 1);
    }

    #[tokio::test]
    async fn escalated_template_fires_for_final_warning_rule() {
        let harness = TestHarness::new().await.unwrap();
        let dispatcher = seeded_dispatcher(&harness, &[rule("thursday", 3, 19)]).await;

        assert_eq!(dispatcher.dispatch(at(2026, 2, 5, 19), false).await.unwrap(), 1);
        let sent = harness.channel.sent_messages().await;
        assert!(sent[0].body.starts_with("🚨 HIGH ALERT:"));
        assert!(sent[0].body.contains("⬛ Garbage (Black bin)"));
    }

    #[tokio::test]
    async fn completed_assignments_get_no_reminders() {
        let harness = TestHarness::new().await.unwrap();
        let dispatcher = seeded_dispatcher(&harness, &[rule("monday", 0, 9)]).await;

        let store = harness.record_store();
        let week = store
            .assignments_for_week(NaiveDate::from_ymd_opt(2026, 2, 2).unwrap())
            .await
            .unwrap();
        let scheduler = crate::scheduler::Scheduler::new(store);
        scheduler
            .mark_done(week[0].id, at(2026, 2, 2, 8))
            .await
            .unwrap();

        assert_eq!(dispatcher.dispatch(at(2026, 2, 2, 9), false).await.unwrap(), 0);
    }
}
