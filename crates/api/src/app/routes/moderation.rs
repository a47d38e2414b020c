use axum::{Json, Router, extract::Extension, routing::get};

use gatehouse_auth::RoleSet;

use crate::app::dto::IdentityDto;
use crate::context::CurrentUser;

pub fn required_roles() -> RoleSet {
    RoleSet::moderator()
}

pub fn router() -> Router {
    Router::new().route("/queue", get(queue))
}

/// GET /moderation/queue
pub async fn queue(Extension(user): Extension<CurrentUser>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "moderator": IdentityDto::from(user.identity()),
        "required_roles": required_roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
        "items": [],
    }))
}
