// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `rota-core::types` for use across
//! the trait boundaries. This module re-exports them for convenience
//! within the storage crate.

pub use rota_core::types::{
    Absence, Assignment, AssignmentStatus, Chore, ChoreExclusion, Debt, Frequency, Person,
    ReminderLogEntry, ReminderRule,
};

use chrono::{NaiveDate, NaiveDateTime};
use rota_core::RotaError;

/// Timestamp format used in TEXT columns (completed_at, sent_at).
/// Dates use `NaiveDate`'s own `%Y-%m-%d` Display form.
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, RotaError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| RotaError::Storage {
        source: format!("bad stored date {s:?}: {e}").into(),
    })
}

pub(crate) fn parse_datetime(s: &str) -> Result<NaiveDateTime, RotaError> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).map_err(|e| RotaError::Storage {
        source: format!("bad stored timestamp {s:?}: {e}").into(),
    })
}

pub(crate) fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}
