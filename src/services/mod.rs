//! Services layer - Business logic
//!
//! Services sit between the HTTP handlers and the repositories:
//! - token issuing and verification
//! - signup/login bookkeeping
//! - the placeholder chat responder

pub mod chat;
pub mod password;
pub mod token;
pub mod user;

pub use chat::{canned_reply, ChatReply};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenError, TokenService};
pub use user::{IssuedToken, LoginInput, SignupInput, UserService, UserServiceError};
