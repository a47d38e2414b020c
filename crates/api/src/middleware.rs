use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use gatehouse_auth::{AuthGate, RoleSet};

use crate::app::errors::AuthRejection;
use crate::context::{CurrentUser, MaybeUser};

#[derive(Clone)]
pub struct AuthState {
    pub gate: Arc<AuthGate>,
}

/// State for one role-gated route group; the role set is fixed at wiring time.
#[derive(Clone)]
pub struct RoleGuard {
    pub gate: Arc<AuthGate>,
    pub roles: Arc<RoleSet>,
}

impl RoleGuard {
    pub fn new(gate: Arc<AuthGate>, roles: RoleSet) -> Self {
        Self {
            gate,
            roles: Arc::new(roles),
        }
    }
}

pub async fn require_auth(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AuthRejection> {
    let identity = state
        .gate
        .authenticate(authorization_header(req.headers()), Utc::now())?;

    req.extensions_mut().insert(CurrentUser(identity));

    Ok(next.run(req).await)
}

pub async fn optional_auth(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let identity = state
        .gate
        .authenticate_optional(authorization_header(req.headers()), Utc::now());

    req.extensions_mut().insert(MaybeUser(identity));

    next.run(req).await
}

pub async fn require_roles(
    State(guard): State<RoleGuard>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AuthRejection> {
    let identity = guard.gate.authorize(
        authorization_header(req.headers()),
        &guard.roles,
        Utc::now(),
    )?;

    req.extensions_mut().insert(CurrentUser(identity));

    Ok(next.run(req).await)
}

/// Raw `Authorization` value; a non-UTF-8 header counts as absent.
fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}
