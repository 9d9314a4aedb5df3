//! User model
//!
//! A learner profile captured at signup: contact email, a password hash and
//! the two personalization answers (experience level, primary interest).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Column widths of the `users` table, in characters
pub const EMAIL_MAX_LEN: usize = 255;
pub const EXPERIENCE_LEVEL_MAX_LEN: usize = 50;
pub const PRIMARY_INTEREST_MAX_LEN: usize = 100;

/// A row of the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Email address (unique)
    pub email: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Self-reported experience, e.g. `beginner`
    pub experience_level: String,
    /// Main topic the learner wants to focus on
    pub primary_interest: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last successful login, if any
    pub last_login: Option<DateTime<Utc>>,
}

/// Fields supplied when recording a new user.
///
/// The password must already be hashed; see `services::password::hash_password`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub experience_level: String,
    pub primary_interest: String,
}

impl NewUser {
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        experience_level: impl Into<String>,
        primary_interest: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            experience_level: experience_level.into(),
            primary_interest: primary_interest.into(),
        }
    }

    /// Materialize the row with a fresh id and creation time.
    pub fn into_user(self) -> User {
        User {
            id: Uuid::new_v4(),
            email: self.email,
            password_hash: self.password_hash,
            experience_level: self.experience_level,
            primary_interest: self.primary_interest,
            created_at: Utc::now(),
            last_login: None,
        }
    }
}

impl User {
    /// Whether the user has ever logged in after signing up
    pub fn has_logged_in(&self) -> bool {
        self.last_login.is_some()
    }
}
