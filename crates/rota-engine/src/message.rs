// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reminder message templates.
//!
//! Template choice keys off the chore name: bin collection chores embed
//! the pickup-cycle bins line, and their final-warning rule swaps in an
//! escalated variant. Everything else gets a generic checklist nudge.

use chrono::NaiveDate;

use crate::cycle;

/// Rule key whose reminder uses the escalated template for bin chores.
pub const FINAL_WARNING_KEY: &str = "thursday";

/// Render the reminder body for one assignment and one reminder rule.
pub fn build_message(
    chore_name: &str,
    assignee_name: &str,
    due_date: NaiveDate,
    rule_key: &str,
) -> String {
    if chore_name.contains("Garbage") {
        let bins = cycle::bins_text(due_date);

        if rule_key == FINAL_WARNING_KEY {
            return format!(
                "🚨 HIGH ALERT:\n\nHey {assignee_name}, it's your turn for {chore_name}.\n\
                 Bins: {bins}\n\n\
                 Tonight:\n\
                 - Keep in-house garbage clear\n\
                 - Place bins near the curb\n\n\
                 Pickup: {due_date} (Friday morning)\n\nThanks!"
            );
        }

        return format!(
            "🗑️ Reminder:\n\nHey {assignee_name}, you are assigned: {chore_name}.\n\n\
             Bins: {bins}\n\n\
             This week:\n\
             - If in-house bins are full, empty them into outside containers\n\n\
             Pickup: {due_date} (Friday morning)\n\nThanks!"
        );
    }

    if chore_name.contains("Washroom") {
        return format!(
            "🧼 Reminder:\n\nHey {assignee_name}, it's your turn for: {chore_name}.\n\n\
             Due date: {due_date}\n\n\
             Please focus on:\n\
             - Toilet, sink, and shower\n\
             - Replace shower curtain if needed\n\
             - Mop the floor\n\n\
             Drop a message in the house group chat with:\n\
             - Done (✅)\n\
             - Skip (❌)\n\
             - Reassign (⏰)\n\nThanks!"
        );
    }

    format!(
        "🧹 Reminder:\n\nHey {assignee_name}, it's your turn for: {chore_name}\n\n\
         Please focus on:\n\
         - Sink\n\
         - Kitchen Countertop\n\
         - Kitchen Stove\n\
         - Mop the floor\n\n\
         Drop a message in the house group chat with:\n\
         - Done (✅)\n\
         - Skip (❌)\n\
         - Reassign (⏰)\n\nThanks!"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn garbage_reminder_embeds_bins_for_the_week() {
        let body = build_message("Garbage Cleanup", "Sashi", ymd(2026, 2, 6), "monday");
        assert!(body.starts_with("🗑️ Reminder:"));
        assert!(body.contains("⬛ Garbage (Black bin)"));
        assert!(body.contains("Pickup: 2026-02-06 (Friday morning)"));
    }

    #[test]
    fn final_warning_escalates_bin_chores() {
        let body = build_message("Garbage Cleanup", "Sashi", ymd(2026, 2, 13), FINAL_WARNING_KEY);
        assert!(body.starts_with("🚨 HIGH ALERT:"));
        assert!(body.contains("🟦 Recycling (Blue bin)"));
        assert!(body.contains("Place bins near the curb"));
    }

    #[test]
    fn final_warning_key_does_not_escalate_other_chores() {
        let body = build_message("Kitchen Cleaning", "Raja", ymd(2026, 2, 8), FINAL_WARNING_KEY);
        assert!(body.starts_with("🧹 Reminder:"));
        assert!(!body.contains("HIGH ALERT"));
    }

    #[test]
    fn washroom_reminder_uses_washroom_checklist() {
        let body = build_message("Washroom Cleaning", "Guru", ymd(2026, 2, 8), "friday");
        assert!(body.starts_with("🧼 Reminder:"));
        assert!(body.contains("Due date: 2026-02-08"));
        assert!(body.contains("Replace shower curtain if needed"));
    }

    #[test]
    fn unknown_chores_fall_back_to_generic_checklist() {
        let body = build_message("Lawn Mowing", "Naveen", ymd(2026, 2, 8), "friday");
        assert!(body.starts_with("🧹 Reminder:"));
        assert!(body.contains("Hey Naveen"));
    }
}
