// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scheduling and fairness engine for the rota service.
//!
//! Everything here is deterministic: given the same stored state and the
//! same clock inputs, every operation makes the same decisions.
//!
//! - [`scheduler`] generates weekly assignments and drives the
//!   done/missed/reassign lifecycle
//! - [`fairness`] scores debt and picks assignees
//! - [`cycle`] maps pickup dates onto the alternating bin cycle
//! - [`reminder`] dispatches due reminders through a message channel
//! - [`message`] renders the reminder bodies

pub mod cycle;
pub mod fairness;
pub mod message;
pub mod reminder;
pub mod scheduler;

pub use cycle::CycleLabel;
pub use fairness::{AssigneePicker, DebtLedger};
pub use reminder::ReminderDispatcher;
pub use scheduler::Scheduler;
