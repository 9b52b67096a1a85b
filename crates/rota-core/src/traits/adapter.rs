// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait shared by the record store and message channel seams.

use async_trait::async_trait;

use crate::error::RotaError;
use crate::types::HealthStatus;

/// The base trait for Rota's pluggable collaborators.
///
/// Both the record store and the message channel implement this trait,
/// which provides identity, health check, and shutdown capabilities used
/// by the serve loop.
#[async_trait]
pub trait Adapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, RotaError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), RotaError>;
}
