use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    Unauthenticated,

    /// Bad signature, malformed and expired tokens all end up here.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token verified but its subject no longer exists.
    #[error("User no longer exists")]
    UnknownSubject,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Token encoding error: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

pub type Result<T> = std::result::Result<T, AuthError>;
