//! Admin authentication: password hashing and signed bearer tokens.
//!
//! Pure functions only; the axum extractor lives in `api::auth`.

mod password;
mod token;

use thiserror::Error;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenSigner, MAX_TOKEN_MINUTES};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("token lifetime of {0} minutes is out of range")]
    InvalidLifetime(i64),
}

/// Compare two byte strings without early exit.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
