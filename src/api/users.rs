//! User profile endpoint
//!
//! - GET /users/me - Profile of the bearer token's subject

use axum::{routing::get, Extension, Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{AppState, AuthenticatedUser};
use crate::models::User;

/// Public view of a stored profile
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub experience_level: String,
    pub primary_interest: String,
    pub created_at: String,
    pub last_login: Option<String>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            experience_level: user.experience_level,
            primary_interest: user.primary_interest,
            created_at: user.created_at.to_rfc3339(),
            last_login: user.last_login.map(|t| t.to_rfc3339()),
        }
    }
}

/// Build the users router (mounted behind `require_auth`)
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(get_current_user))
}

/// GET /users/me
async fn get_current_user(
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Json<ProfileResponse> {
    Json(user.into())
}
