//! Authentication API endpoints
//!
//! - POST /auth/signup - Issue a token and record the learner profile
//! - POST /auth/login - Issue a token
//!
//! Neither endpoint checks credentials; any well-formed request with a valid
//! email gets a bearer token.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::services::user::{IssuedToken, LoginInput, SignupInput};

/// Request body for signup
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub experience_level: String,
    pub primary_interest: String,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for successful authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            access_token: issued.access_token,
            token_type: issued.token_type.to_string(),
        }
    }
}

/// Build the auth router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// POST /auth/signup
async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let issued = state
        .user_service
        .signup(SignupInput {
            email: body.email,
            password: body.password,
            experience_level: body.experience_level,
            primary_interest: body.primary_interest,
        })
        .await?;

    Ok(Json(issued.into()))
}

/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let issued = state
        .user_service
        .login(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(Json(issued.into()))
}
