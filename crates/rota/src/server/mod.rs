// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP control surface built on axum.
//!
//! Three route groups: an unauthenticated health endpoint, the `/cron`
//! trigger endpoints guarded by a shared secret, and the `/v1` operator
//! API guarded by a bearer token.

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;

use rota_core::RecordStore;
use rota_engine::{ReminderDispatcher, Scheduler};

pub use crate::server::auth::AuthConfig;

/// Shared state for control-surface handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record store the handlers read and write through.
    pub store: Arc<dyn RecordStore>,
    /// Weekly generator plus the assignment outcome operations.
    pub scheduler: Arc<Scheduler>,
    /// Reminder dispatch pass.
    pub dispatcher: Arc<ReminderDispatcher>,
    /// Authentication settings.
    pub auth: AuthConfig,
    /// Display name reported by the health endpoint.
    pub agent_name: String,
    /// Process start for uptime reporting.
    pub start_time: std::time::Instant,
}

/// Builds the full control-surface router.
pub fn build_router(state: AppState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let cron_routes = Router::new()
        .route("/cron/generate", post(handlers::post_cron_generate))
        .route("/cron/remind", post(handlers::post_cron_remind))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth::cron_auth_middleware,
        ))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route(
            "/v1/people",
            get(handlers::list_people).post(handlers::create_person),
        )
        .route("/v1/people/{id}/toggle", post(handlers::toggle_person))
        .route(
            "/v1/chores",
            get(handlers::list_chores).post(handlers::create_chore),
        )
        .route("/v1/assignments", get(handlers::list_assignments))
        .route("/v1/assignments/{id}/done", post(handlers::assignment_done))
        .route(
            "/v1/assignments/{id}/missed",
            post(handlers::assignment_missed),
        )
        .route(
            "/v1/assignments/{id}/reassign",
            post(handlers::assignment_reassign),
        )
        .route(
            "/v1/assignments/{id}/reminder-log",
            get(handlers::assignment_reminder_log),
        )
        .route("/v1/absences", post(handlers::create_absence))
        .route("/v1/absences/{id}", delete(handlers::delete_absence))
        .route("/v1/exclusions", post(handlers::create_exclusion))
        .route("/v1/exclusions/{id}", delete(handlers::delete_exclusion))
        .route("/v1/debts", get(handlers::list_debts))
        .route_layer(middleware::from_fn_with_state(
            auth_state,
            auth::bearer_auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(cron_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
}
