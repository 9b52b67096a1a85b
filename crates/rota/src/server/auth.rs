// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication middleware for the control surface.
//!
//! Two independent guards: a bearer token for the `/v1` operator API and
//! a shared secret in the `X-Cron-Secret` header for the `/cron` trigger
//! endpoints. When the relevant credential is not configured, every
//! request to that surface is rejected (fail-closed).

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

/// Authentication settings for the control surface.
#[derive(Clone)]
pub struct AuthConfig {
    /// Expected bearer token for `/v1`. `None` disables that API.
    pub admin_token: Option<String>,
    /// Expected `X-Cron-Secret` value for `/cron`. `None` disables those
    /// endpoints.
    pub cron_secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "admin_token",
                &self.admin_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "cron_secret",
                &self.cron_secret.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Middleware guarding the `/v1` operator API with a bearer token.
pub async fn bearer_auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(ref expected) = auth.admin_token else {
        tracing::error!("no admin token configured -- rejecting /v1 request");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(token) if token == expected => Ok(next.run(request).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Middleware guarding the `/cron` trigger endpoints with a shared secret.
pub async fn cron_auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(ref expected) = auth.cron_secret else {
        tracing::error!("no cron secret configured -- rejecting /cron request");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let provided = request
        .headers()
        .get("x-cron-secret")
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(secret) if secret == expected => Ok(next.run(request).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}
