use thiserror::Error;

pub type CryptResult<T> = std::result::Result<T, CryptError>;

/// Failures while hashing passwords or signing session tokens. A wrong
/// password or an expired token is not an error here, callers decide.
#[derive(Debug, Error)]
pub enum CryptError {
    #[error("password hashing failed: {0}")]
    Argon2Error(#[from] argon2::password_hash::Error),
    #[error("token signing failed: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}
