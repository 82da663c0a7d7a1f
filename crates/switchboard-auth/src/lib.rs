//! Credentials for Switchboard: signed, time-boxed bearer tokens and salted
//! password hashes.

pub mod error;
pub mod password;
pub mod token;

pub use error::{AuthError, Result};
pub use password::PasswordHasher;
pub use token::{Claims, TokenService, DEFAULT_TOKEN_TTL_DAYS};
