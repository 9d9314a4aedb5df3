//! User service
//!
//! Signup and login hand out a bearer token for any well-formed request; no
//! uniqueness or credential check gates the token. Alongside that, the service
//! keeps the `users` table current:
//! - signup stores the profile the first time an email is seen
//! - login stamps `last_login` on a known email
//!
//! Those writes are best effort. A database failure is logged and the caller
//! still gets a token.

use crate::db::repositories::UserRepository;
use crate::models::{
    NewUser, User, EMAIL_MAX_LEN, EXPERIENCE_LEVEL_MAX_LEN, PRIMARY_INTEREST_MAX_LEN,
};
use crate::services::password::hash_password;
use crate::services::token::{Claims, TokenError, TokenService, TOKEN_TYPE};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Validation error (invalid input)
    #[error("Validation error on {field}: {message}")]
    ValidationError { field: &'static str, message: String },

    /// Presented token failed verification
    #[error(transparent)]
    InvalidToken(#[from] TokenError),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Input for signup
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub email: String,
    pub password: String,
    pub experience_level: String,
    pub primary_interest: String,
}

/// Input for login
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Token handed back by signup and login
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
}

impl IssuedToken {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE,
        }
    }
}

/// User service for signup, login and profile lookup
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    tokens: TokenService,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>, tokens: TokenService) -> Self {
        Self { user_repo, tokens }
    }

    /// Issue a token for a signup request and record the profile if new.
    pub async fn signup(&self, input: SignupInput) -> Result<IssuedToken, UserServiceError> {
        validate_email(&input.email)?;
        validate_length(
            "experience_level",
            &input.experience_level,
            EXPERIENCE_LEVEL_MAX_LEN,
        )?;
        validate_length(
            "primary_interest",
            &input.primary_interest,
            PRIMARY_INTEREST_MAX_LEN,
        )?;

        let token = self
            .tokens
            .issue(&input.email, Some(&input.experience_level))
            .map_err(|e| UserServiceError::InternalError(e.into()))?;

        if let Err(e) = self.record_profile(&input).await {
            tracing::warn!("Failed to record profile for {}: {:#}", input.email, e);
        }

        Ok(IssuedToken::bearer(token))
    }

    /// Issue a token for a login request and stamp `last_login` if known.
    pub async fn login(&self, input: LoginInput) -> Result<IssuedToken, UserServiceError> {
        validate_email(&input.email)?;

        let token = self
            .tokens
            .issue(&input.email, None)
            .map_err(|e| UserServiceError::InternalError(e.into()))?;

        if let Err(e) = self.record_login(&input.email).await {
            tracing::warn!("Failed to record login for {}: {:#}", input.email, e);
        }

        Ok(IssuedToken::bearer(token))
    }

    /// Verify a bearer token and load the profile of its subject.
    ///
    /// `Ok(None)` means the token is valid but no profile was ever stored.
    pub async fn current_user(&self, token: &str) -> Result<Option<User>, UserServiceError> {
        let claims = self.verify_token(token)?;
        self.get_by_email(&claims.sub).await
    }

    /// Verify a bearer token without touching the database
    pub fn verify_token(&self, token: &str) -> Result<Claims, UserServiceError> {
        Ok(self.tokens.verify(token)?)
    }

    /// Get user by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        let user = self
            .user_repo
            .get_by_email(email)
            .await
            .context("Failed to get user by email")?;

        Ok(user)
    }

    // ========================================================================
    // Private helper methods
    // ========================================================================

    async fn record_profile(&self, input: &SignupInput) -> Result<()> {
        if self.user_repo.get_by_email(&input.email).await?.is_some() {
            tracing::debug!("Profile for {} already stored", input.email);
            return Ok(());
        }

        let password_hash = hash_password(&input.password)?;
        let user = self
            .user_repo
            .create(NewUser::new(
                input.email.clone(),
                password_hash,
                input.experience_level.clone(),
                input.primary_interest.clone(),
            ))
            .await?;

        tracing::info!("Stored profile {} for {}", user.id, user.email);
        Ok(())
    }

    async fn record_login(&self, email: &str) -> Result<()> {
        if let Some(user) = self.user_repo.get_by_email(email).await? {
            if !user.has_logged_in() {
                tracing::info!("First login for {}", user.email);
            }
            self.user_repo.touch_last_login(user.id, Utc::now()).await?;
        }
        Ok(())
    }
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain,
/// and no longer than the `email` column.
pub fn validate_email(email: &str) -> Result<(), UserServiceError> {
    validate_length("email", email, EMAIL_MAX_LEN)?;

    let invalid = || UserServiceError::ValidationError {
        field: "email",
        message: format!("Invalid email address: {}", email),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }

    Ok(())
}

/// Reject values wider than their column (counted in characters).
fn validate_length(field: &'static str, value: &str, max: usize) -> Result<(), UserServiceError> {
    if value.chars().count() > max {
        return Err(UserServiceError::ValidationError {
            field,
            message: format!("{} must be at most {} characters", field, max),
        });
    }
    Ok(())
}
