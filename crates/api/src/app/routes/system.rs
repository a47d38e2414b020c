use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::app::dto::{IdentityDto, WelcomeDto};
use crate::app::{errors, services::AppServices};
use crate::context::{CurrentUser, MaybeUser};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Readiness: the profile store must answer.
pub async fn ready(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.profiles.ping().await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "status": "ready" }))).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            errors::json_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "store_unavailable",
                "profile store is unavailable",
            )
        }
    }
}

pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<IdentityDto> {
    Json(IdentityDto::from(user.identity()))
}

pub async fn welcome(Extension(user): Extension<MaybeUser>) -> Json<WelcomeDto> {
    Json(WelcomeDto::from(user.identity()))
}
