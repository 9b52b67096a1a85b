// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema migrations, compiled in with refinery's `embed_migrations!`.
//!
//! Every database open applies whatever is pending; refinery records what
//! already ran in `refinery_schema_history`, so reopening an up-to-date
//! file applies nothing.

use rota_core::RotaError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply pending migrations, returning how many ran.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<usize, RotaError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(RotaError::storage)?;
    Ok(report.applied_migrations().len())
}
