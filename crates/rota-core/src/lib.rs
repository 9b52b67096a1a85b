// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Rota chore engine.
//!
//! This crate provides the trait definitions, error types, and domain
//! types used throughout the Rota workspace. The engine crate depends
//! only on the seams defined here, never on concrete storage or channel
//! implementations.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RotaError;
pub use types::{
    Absence, Assignment, AssignmentStatus, Chore, ChoreExclusion, Debt, Frequency,
    HealthStatus, MessageId, OutboundMessage, Person, ReminderLogEntry, ReminderRule,
};

// Re-export the trait seams at crate root.
pub use traits::{Adapter, MessageChannel, RecordStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rota_error_has_all_variants() {
        // Verify all 8 error variants exist and can be constructed.
        let _config = RotaError::Config("test".into());
        let _storage = RotaError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = RotaError::Channel {
            message: "test".into(),
            source: None,
        };
        let _not_found = RotaError::NotFound {
            entity: "assignment",
            id: 42,
        };
        let _no_candidate = RotaError::NoEligibleCandidate { chore_id: 1 };
        let _duplicate = RotaError::Duplicate {
            what: "chore name 'Garbage Cleanup'".into(),
        };
        let _malformed = RotaError::MalformedReminderRules {
            chore_id: 1,
            detail: "expected array".into(),
        };
        let _internal = RotaError::Internal("test".into());
    }

    #[test]
    fn not_found_is_distinct_from_no_eligible_candidate() {
        let not_found = RotaError::NotFound {
            entity: "person",
            id: 7,
        };
        let no_candidate = RotaError::NoEligibleCandidate { chore_id: 7 };
        assert_eq!(not_found.to_string(), "person 7 not found");
        assert_eq!(
            no_candidate.to_string(),
            "no eligible candidate for chore 7"
        );
    }

    #[test]
    fn trait_seams_are_exported() {
        // If any trait module is missing or fails to compile, this test
        // won't compile either.
        fn _assert_adapter<T: Adapter>() {}
        fn _assert_channel<T: MessageChannel>() {}
        fn _assert_store<T: RecordStore>() {}
    }
}
