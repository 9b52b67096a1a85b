// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Rota chore engine.

use thiserror::Error;

/// The primary error type used across the Rota trait seams and engine operations.
#[derive(Debug, Error)]
pub enum RotaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Message channel errors (delivery failure, rejected address, transport fault).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A lookup by id came back empty.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The picker's candidate pool was empty after filtering.
    #[error("no eligible candidate for chore {chore_id}")]
    NoEligibleCandidate { chore_id: i64 },

    /// A uniqueness constraint rejected an insert on a user-entry path.
    #[error("duplicate {what}")]
    Duplicate { what: String },

    /// A chore's stored reminder rules failed to decode.
    #[error("malformed reminder rules for chore {chore_id}: {detail}")]
    MalformedReminderRules { chore_id: i64, detail: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RotaError {
    /// Wraps an arbitrary error as a storage failure.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RotaError::Storage {
            source: Box::new(source),
        }
    }
}
