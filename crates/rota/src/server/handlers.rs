// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the control surface.
//!
//! `/cron` endpoints trigger the two scheduled operations; `/v1` is the
//! operator API over people, chores, absences, exclusions, assignments,
//! debts, and the reminder log.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use rota_core::RotaError;
use rota_core::types::{
    Absence, Assignment, Chore, ChoreExclusion, Debt, Frequency, Person, ReminderLogEntry,
    ReminderRule,
};
use rota_engine::scheduler::week_start_of;

use crate::server::AppState;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Error type the handlers bubble through `?`.
#[derive(Debug)]
pub enum ApiError {
    /// Engine or store failure, mapped onto a status by kind.
    Rota(RotaError),
    /// Request validation failure.
    BadRequest(String),
}

impl From<RotaError> for ApiError {
    fn from(err: RotaError) -> Self {
        ApiError::Rota(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Rota(err) => {
                let status = match &err {
                    RotaError::NotFound { .. } => StatusCode::NOT_FOUND,
                    RotaError::Duplicate { .. } | RotaError::NoEligibleCandidate { .. } => {
                        StatusCode::CONFLICT
                    }
                    RotaError::MalformedReminderRules { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    RotaError::Channel { .. } => StatusCode::BAD_GATEWAY,
                    RotaError::Config(_) | RotaError::Storage { .. } | RotaError::Internal(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                if status.is_server_error() {
                    tracing::error!(error = %err, "request failed");
                }
                (status, err.to_string())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// --- Health ---

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Configured agent name.
    pub agent: String,
    /// Binary version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_secs: u64,
}

/// GET /health (unauthenticated).
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        agent: state.agent_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

// --- Cron triggers ---

/// One created row in the generate response.
#[derive(Debug, Serialize)]
pub struct CreatedAssignment {
    pub id: i64,
    pub chore: String,
    pub person: String,
    pub due: NaiveDate,
}

/// Response body for POST /cron/generate.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub created_count: usize,
    pub created: Vec<CreatedAssignment>,
}

/// POST /cron/generate
///
/// Runs one generation pass for the current week and reports what was
/// created, with chore and person names resolved.
pub async fn post_cron_generate(
    State(state): State<AppState>,
) -> ApiResult<Json<GenerateResponse>> {
    let created = state.scheduler.generate(Local::now().date_naive()).await?;

    let mut rows = Vec::with_capacity(created.len());
    for assignment in &created {
        let chore = match state.store.chore(assignment.chore_id).await? {
            Some(chore) => chore.name,
            None => format!("chore {}", assignment.chore_id),
        };
        let person = match state.store.person(assignment.person_id).await? {
            Some(person) => person.name,
            None => format!("person {}", assignment.person_id),
        };
        rows.push(CreatedAssignment {
            id: assignment.id,
            chore,
            person,
            due: assignment.due_date,
        });
    }

    Ok(Json(GenerateResponse {
        created_count: rows.len(),
        created: rows,
    }))
}

/// Query parameters for POST /cron/remind.
#[derive(Debug, Deserialize)]
pub struct RemindQuery {
    /// Fire every not-yet-sent rule regardless of the clock.
    #[serde(default)]
    pub force: bool,
}

/// Response body for POST /cron/remind.
#[derive(Debug, Serialize)]
pub struct RemindResponse {
    pub sent_count: usize,
    pub forced: bool,
}

/// POST /cron/remind?force=true
pub async fn post_cron_remind(
    State(state): State<AppState>,
    Query(query): Query<RemindQuery>,
) -> ApiResult<Json<RemindResponse>> {
    let sent = state
        .dispatcher
        .dispatch(Local::now().naive_local(), query.force)
        .await?;
    Ok(Json(RemindResponse {
        sent_count: sent,
        forced: query.force,
    }))
}

// --- People ---

/// Request body for POST /v1/people.
#[derive(Debug, Deserialize)]
pub struct CreatePersonRequest {
    pub name: String,
    /// Phone-style address in E.164 format, like `+16475550100`.
    pub contact_address: String,
}

/// GET /v1/people
pub async fn list_people(State(state): State<AppState>) -> ApiResult<Json<Vec<Person>>> {
    Ok(Json(state.store.people().await?))
}

/// POST /v1/people
pub async fn create_person(
    State(state): State<AppState>,
    Json(body): Json<CreatePersonRequest>,
) -> ApiResult<(StatusCode, Json<Person>)> {
    let contact = body.contact_address.trim();
    if !contact.starts_with('+') {
        return Err(ApiError::BadRequest(
            "contact_address must be in E.164 format, like +16475550100".to_string(),
        ));
    }

    let person = state.store.create_person(body.name.trim(), contact).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

/// POST /v1/people/{id}/toggle
///
/// Flips the active flag and returns the updated person.
pub async fn toggle_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Person>> {
    let Some(person) = state.store.person(id).await? else {
        return Err(RotaError::NotFound {
            entity: "person",
            id,
        }
        .into());
    };

    let active = !person.active;
    state.store.set_person_active(id, active).await?;
    Ok(Json(Person { active, ..person }))
}

// --- Chores ---

/// Request body for POST /v1/chores.
#[derive(Debug, Deserialize)]
pub struct CreateChoreRequest {
    pub name: String,
    pub frequency: Frequency,
    /// 0 = Monday .. 6 = Sunday.
    pub day_of_week: u8,
    #[serde(default)]
    pub reminder_rules: Vec<ReminderRule>,
}

/// One row of the chore listing. Chores whose stored reminder rules fail
/// to decode still appear, carrying the decode error instead of a body.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChoreEntry {
    Ok(Chore),
    Failed { id: Option<i64>, error: String },
}

/// GET /v1/chores
pub async fn list_chores(State(state): State<AppState>) -> ApiResult<Json<Vec<ChoreEntry>>> {
    let chores = state.store.chores().await?;
    let entries = chores
        .into_iter()
        .map(|entry| match entry {
            Ok(chore) => ChoreEntry::Ok(chore),
            Err(RotaError::MalformedReminderRules { chore_id, detail }) => ChoreEntry::Failed {
                id: Some(chore_id),
                error: format!("malformed reminder rules: {detail}"),
            },
            Err(other) => ChoreEntry::Failed {
                id: None,
                error: other.to_string(),
            },
        })
        .collect();
    Ok(Json(entries))
}

/// POST /v1/chores
pub async fn create_chore(
    State(state): State<AppState>,
    Json(body): Json<CreateChoreRequest>,
) -> ApiResult<(StatusCode, Json<Chore>)> {
    if body.day_of_week > 6 {
        return Err(ApiError::BadRequest(
            "day_of_week must be 0 (Monday) through 6 (Sunday)".to_string(),
        ));
    }
    if let Some(rule) = body
        .reminder_rules
        .iter()
        .find(|r| r.day_of_week > 6 || r.hour > 23)
    {
        return Err(ApiError::BadRequest(format!(
            "reminder rule \"{}\" is out of range (day 0..=6, hour 0..=23)",
            rule.key
        )));
    }

    let chore = state
        .store
        .create_chore(
            body.name.trim(),
            body.frequency,
            body.day_of_week,
            &body.reminder_rules,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(chore)))
}

// --- Assignments ---

/// Query parameters for GET /v1/assignments.
#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    /// Any date inside the wanted week; defaults to today. The listing
    /// normalizes it to that week's Monday.
    #[serde(default)]
    pub week: Option<NaiveDate>,
}

/// GET /v1/assignments?week=2026-02-04
pub async fn list_assignments(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> ApiResult<Json<Vec<Assignment>>> {
    let anchor = query.week.unwrap_or_else(|| Local::now().date_naive());
    let week_start = week_start_of(anchor);
    Ok(Json(state.store.assignments_for_week(week_start).await?))
}

/// POST /v1/assignments/{id}/done
pub async fn assignment_done(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Assignment>> {
    let updated = state
        .scheduler
        .mark_done(id, Local::now().naive_local())
        .await?;
    Ok(Json(updated))
}

/// POST /v1/assignments/{id}/missed
pub async fn assignment_missed(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Assignment>> {
    let updated = state.scheduler.mark_missed(id).await?;
    Ok(Json(updated))
}

/// POST /v1/assignments/{id}/reassign
pub async fn assignment_reassign(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Assignment>> {
    let updated = state.scheduler.reassign(id).await?;
    Ok(Json(updated))
}

/// GET /v1/assignments/{id}/reminder-log
pub async fn assignment_reminder_log(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<ReminderLogEntry>>> {
    if state.store.assignment(id).await?.is_none() {
        return Err(RotaError::NotFound {
            entity: "assignment",
            id,
        }
        .into());
    }
    Ok(Json(state.store.reminder_log_for_assignment(id).await?))
}

// --- Absences ---

/// Request body for POST /v1/absences.
#[derive(Debug, Deserialize)]
pub struct CreateAbsenceRequest {
    pub person_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
}

/// POST /v1/absences
pub async fn create_absence(
    State(state): State<AppState>,
    Json(body): Json<CreateAbsenceRequest>,
) -> ApiResult<(StatusCode, Json<Absence>)> {
    if body.end_date < body.start_date {
        return Err(ApiError::BadRequest(
            "end_date must not be before start_date".to_string(),
        ));
    }
    if state.store.person(body.person_id).await?.is_none() {
        return Err(RotaError::NotFound {
            entity: "person",
            id: body.person_id,
        }
        .into());
    }

    let absence = state
        .store
        .create_absence(
            body.person_id,
            body.start_date,
            body.end_date,
            body.reason.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(absence)))
}

/// DELETE /v1/absences/{id}
pub async fn delete_absence(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.store.delete_absence(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Chore exclusions ---

/// Request body for POST /v1/exclusions.
#[derive(Debug, Deserialize)]
pub struct CreateExclusionRequest {
    pub chore_id: i64,
    pub person_id: i64,
}

/// POST /v1/exclusions
pub async fn create_exclusion(
    State(state): State<AppState>,
    Json(body): Json<CreateExclusionRequest>,
) -> ApiResult<(StatusCode, Json<ChoreExclusion>)> {
    if state.store.chore(body.chore_id).await?.is_none() {
        return Err(RotaError::NotFound {
            entity: "chore",
            id: body.chore_id,
        }
        .into());
    }
    if state.store.person(body.person_id).await?.is_none() {
        return Err(RotaError::NotFound {
            entity: "person",
            id: body.person_id,
        }
        .into());
    }

    let exclusion = state
        .store
        .create_exclusion(body.chore_id, body.person_id)
        .await?;
    Ok((StatusCode::CREATED, Json(exclusion)))
}

/// DELETE /v1/exclusions/{id}
pub async fn delete_exclusion(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.store.delete_exclusion(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Debts ---

/// GET /v1/debts
pub async fn list_debts(State(state): State<AppState>) -> ApiResult<Json<Vec<Debt>>> {
    Ok(Json(state.store.debts().await?))
}
