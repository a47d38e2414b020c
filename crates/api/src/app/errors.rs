use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use gatehouse_auth::{AuthError, BEARER_SCHEME, Rejection};

use crate::profiles::ProfileStoreError;

/// Wire-visible authentication/authorization failure.
///
/// Built from an [`AuthError`]; the precise kind has already been logged by the
/// gate and is deliberately dropped here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthRejection(pub Rejection);

impl From<AuthError> for AuthRejection {
    fn from(err: AuthError) -> Self {
        Self(err.rejection())
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self.0 {
            Rejection::Unauthenticated => {
                let mut res = json_error(
                    StatusCode::UNAUTHORIZED,
                    "unauthenticated",
                    "Invalid authentication credentials",
                );
                res.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static(BEARER_SCHEME),
                );
                res
            }
            Rejection::Forbidden { required } => json_error(
                StatusCode::FORBIDDEN,
                "forbidden",
                format!("Insufficient permissions. Required roles: [{required}]"),
            ),
        }
    }
}

pub fn profile_store_error_to_response(err: ProfileStoreError) -> Response {
    match err {
        ProfileStoreError::Unavailable(_) => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "store_unavailable",
            "profile store is unavailable",
        ),
        ProfileStoreError::Query(_) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            "profile lookup failed",
        ),
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
