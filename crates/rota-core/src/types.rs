// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Rota workspace.
//!
//! All records are owned by the record store; the engine only holds these
//! as transient in-memory views during a single operation.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Delivery receipt identifier returned by a message channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// An outbound message to be delivered via a message channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Phone-style contact address of the recipient.
    pub to: String,
    /// Message body text.
    pub body: String,
}

/// How often a chore recurs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
}

/// Lifecycle state of an assignment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Pending,
    Done,
    Missed,
    Reassigned,
}

/// A member of the household rotation pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    /// Phone-style address the message channel delivers to.
    pub contact_address: String,
    /// Inactive people are never eligible for picking.
    pub active: bool,
}

/// One reminder firing rule for a chore.
///
/// `key` doubles as the dedup identifier: at most one reminder is ever sent
/// per (assignment, key) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRule {
    pub key: String,
    /// 0 = Monday .. 6 = Sunday.
    pub day_of_week: u8,
    /// 0..=23, matched exactly against the dispatch hour.
    pub hour: u8,
}

impl ReminderRule {
    /// Returns the first key that appears twice in `rules`, if any.
    /// Rule keys must be unique within one chore's list.
    pub fn find_duplicate_key(rules: &[ReminderRule]) -> Option<&str> {
        let mut seen = BTreeSet::new();
        rules
            .iter()
            .find(|r| !seen.insert(r.key.as_str()))
            .map(|r| r.key.as_str())
    }
}

/// A recurring chore with its reminder schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chore {
    pub id: i64,
    /// Unique across all chores.
    pub name: String,
    pub frequency: Frequency,
    /// Target day of the assignment week, 0 = Monday .. 6 = Sunday.
    pub day_of_week: u8,
    /// Ordered; decoded once at load, never re-parsed inside the engine.
    pub reminder_rules: Vec<ReminderRule>,
}

/// One week's assignment of a chore to a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub chore_id: i64,
    /// Current assignee.
    pub person_id: i64,
    /// Monday anchoring the assignment's week; unique per chore.
    pub week_start: NaiveDate,
    pub due_date: NaiveDate,
    pub status: AssignmentStatus,
    /// Rotation history: everyone who held this assignment before the
    /// current assignee. Strictly grows across reassignments.
    pub previous_assignee_ids: BTreeSet<i64>,
    pub completed_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

/// Fairness debt counter for one (person, chore) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub id: i64,
    pub person_id: i64,
    pub chore_id: i64,
    /// Never negative.
    pub count: i64,
}

/// An interval during which a person is away, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Absence {
    pub id: i64,
    pub person_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

impl Absence {
    /// Whether `date` falls inside this interval.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Inclusive duration in days: (end − start) + 1.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// A "long" absence lasts 7 or more inclusive days and suppresses
    /// debt accrual for chores missed while it covers the due date.
    pub fn is_long(&self) -> bool {
        self.duration_days() >= 7
    }
}

/// Permanent ban of a person from a chore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoreExclusion {
    pub id: i64,
    pub chore_id: i64,
    pub person_id: i64,
}

/// Dedup record for a sent reminder. Append-only; unique per
/// (assignment, reminder key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderLogEntry {
    pub id: i64,
    pub assignment_id: i64,
    pub reminder_key: String,
    pub sent_at: NaiveDateTime,
}
