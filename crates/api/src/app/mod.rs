//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: collaborators shared by handlers (profile store)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: response DTOs
//! - `errors.rs`: consistent error responses (401/403 mapping lives here)

use std::sync::Arc;

use axum::{Extension, Router, middleware::from_fn_with_state, routing::get};

use gatehouse_auth::{AuthGate, Hs256Verifier};

use crate::config::GateConfig;
use crate::middleware::{self, AuthState, RoleGuard};
use crate::profiles::ProfileStore;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::profile_store_from_config;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// The verifier is constructed exactly once here and shared by every route.
pub fn build_app(config: GateConfig, profiles: Arc<dyn ProfileStore>) -> Router {
    let verifier = Arc::new(Hs256Verifier::new(config.verifier));
    let gate = Arc::new(AuthGate::new(verifier));
    let auth_state = AuthState { gate: gate.clone() };

    let services = Arc::new(services::AppServices::new(profiles));

    // Required auth.
    let authenticated = Router::new()
        .route("/me", get(routes::system::me))
        .route_layer(from_fn_with_state(auth_state.clone(), middleware::require_auth));

    // Optional auth: never rejects.
    let optional = Router::new()
        .route("/welcome", get(routes::system::welcome))
        .route_layer(from_fn_with_state(auth_state, middleware::optional_auth));

    // Role-gated groups.
    let admin = routes::admin::router().route_layer(from_fn_with_state(
        RoleGuard::new(gate.clone(), routes::admin::required_roles()),
        middleware::require_roles,
    ));
    let moderation = routes::moderation::router().route_layer(from_fn_with_state(
        RoleGuard::new(gate, routes::moderation::required_roles()),
        middleware::require_roles,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/ready", get(routes::system::ready))
        .merge(authenticated)
        .merge(optional)
        .nest("/admin", admin)
        .nest("/moderation", moderation)
        .layer(Extension(services))
}
