// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Alternating bin-cycle calculator.
//!
//! Garbage pickup alternates weekly between two bin pairs. The label for
//! any pickup date follows from one fixed reference date known to be a
//! black-bin week; everything else is floor arithmetic on whole weeks, so
//! dates before the reference alternate correctly too.

use chrono::NaiveDate;
use strum::Display;

/// Which bin pair goes out on a pickup date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum CycleLabel {
    /// Garbage week: green bin plus the black garbage bin.
    Black,
    /// Recycling week: green bin plus the blue recycling bin.
    Blue,
}

/// The pickup date anchoring the alternation, known to be a black week.
fn reference_pickup() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 6).expect("fixed reference date is valid")
}

/// Label for a pickup date. Total over all dates, no errors.
pub fn label_for(pickup_date: NaiveDate) -> CycleLabel {
    // Floor division keeps the alternation correct for dates before the
    // reference: -1 day is week -1, not week 0.
    let weeks_since = (pickup_date - reference_pickup()).num_days().div_euclid(7);
    if weeks_since.rem_euclid(2) == 0 {
        CycleLabel::Black
    } else {
        CycleLabel::Blue
    }
}

/// Human-readable bin listing for reminder messages.
pub fn bins_text(pickup_date: NaiveDate) -> &'static str {
    match label_for(pickup_date) {
        CycleLabel::Black => "🟩 Green Bin & ⬛ Garbage (Black bin)",
        CycleLabel::Blue => "🟩 Green Bin & 🟦 Recycling (Blue bin)",
    }
}
