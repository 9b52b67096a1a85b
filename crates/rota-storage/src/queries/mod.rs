// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on storage entities.

pub mod absences;
pub mod assignments;
pub mod chores;
pub mod debts;
pub mod exclusions;
pub mod people;
pub mod reminder_log;
