//! Data models
//!
//! The backend persists a single entity, [`User`]. Request and response
//! bodies live next to their handlers in [`crate::api`].

mod user;

pub use user::{
    NewUser, User, EMAIL_MAX_LEN, EXPERIENCE_LEVEL_MAX_LEN, PRIMARY_INTEREST_MAX_LEN,
};
