//! Admin-only profile lookups.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use uuid::Uuid;

use gatehouse_auth::{RoleSet, SubjectId};

use crate::app::dto::ExistsDto;
use crate::app::{errors, services::AppServices};
use crate::context::CurrentUser;

pub fn required_roles() -> RoleSet {
    RoleSet::admin()
}

pub fn router() -> Router {
    Router::new()
        .route("/profiles/:id", get(get_profile))
        .route("/profiles/:id/exists", get(profile_exists))
}

/// GET /admin/profiles/:id
pub async fn get_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Response {
    let subject = match parse_subject(&id) {
        Ok(s) => s,
        Err(res) => return res,
    };

    tracing::info!(admin = %user.identity().subject(), target = %subject, "admin profile lookup");

    match services.profiles.get_profile(&subject).await {
        Ok(Some(profile)) => (StatusCode::OK, Json(profile)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "profile not found"),
        Err(e) => errors::profile_store_error_to_response(e),
    }
}

/// GET /admin/profiles/:id/exists
pub async fn profile_exists(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let subject = match parse_subject(&id) {
        Ok(s) => s,
        Err(res) => return res,
    };

    match services.profiles.user_exists(&subject).await {
        Ok(exists) => (StatusCode::OK, Json(ExistsDto { exists })).into_response(),
        Err(e) => errors::profile_store_error_to_response(e),
    }
}

/// Profile ids are UUIDs; normalise to the canonical lowercase form.
fn parse_subject(id: &str) -> Result<SubjectId, Response> {
    Uuid::parse_str(id)
        .map(|uuid| SubjectId::new(uuid.to_string()))
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "id must be a uuid"))
}
