use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{constant_time_eq, AuthError};

/// Longest accepted token lifetime (one year)
pub const MAX_TOKEN_MINUTES: i64 = 60 * 24 * 365;

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    /// Expiry, unix seconds
    pub exp: i64,
}

/// Issues and checks `<payload>.<signature>` bearer tokens.
///
/// The payload is base64url JSON claims; the signature is
/// `hex(sha256(payload || "." || secret))`.
#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
    ttl: Duration,
}

impl TokenSigner {
    /// `ttl_minutes` must lie in `1..=MAX_TOKEN_MINUTES`.
    pub fn new(secret: impl Into<String>, ttl_minutes: i64) -> Result<Self, AuthError> {
        if !(1..=MAX_TOKEN_MINUTES).contains(&ttl_minutes) {
            return Err(AuthError::InvalidLifetime(ttl_minutes));
        }
        let ttl =
            Duration::try_minutes(ttl_minutes).ok_or(AuthError::InvalidLifetime(ttl_minutes))?;

        Ok(Self {
            secret: secret.into(),
            ttl,
        })
    }

    fn sign(&self, payload: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(payload.as_bytes());
        hasher.update(b".");
        hasher.update(self.secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn issue(&self, user_id: i64) -> Result<String, AuthError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<String, AuthError> {
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or(AuthError::InvalidLifetime(self.ttl.num_minutes()))?;
        let claims = Claims {
            sub: user_id,
            exp: expires.timestamp(),
        };
        // Serializing two integers cannot fail.
        let json = serde_json::to_vec(&claims).unwrap_or_default();
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = self.sign(&payload);
        Ok(format!("{}.{}", payload, signature))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let (payload, signature) = token.split_once('.').ok_or(AuthError::Malformed)?;

        if !constant_time_eq(self.sign(payload).as_bytes(), signature.as_bytes()) {
            return Err(AuthError::BadSignature);
        }

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&json).map_err(|_| AuthError::Malformed)?;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", 60).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let token = signer().issue(42).unwrap();
        let claims = signer().verify(&token).unwrap();
        assert_eq!(claims.sub, 42);
    }

    #[test]
    fn test_expired() {
        let issued = Utc::now() - Duration::minutes(61);
        let token = signer().issue_at(1, issued).unwrap();
        assert_eq!(signer().verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = TokenSigner::new("other", 60).unwrap().issue(1).unwrap();
        assert_eq!(signer().verify(&token), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = signer().issue(1).unwrap();
        let (_, sig) = token.split_once('.').unwrap();
        let forged_payload = URL_SAFE_NO_PAD.encode(br#"{"sub":2,"exp":99999999999}"#);
        let forged = format!("{}.{}", forged_payload, sig);
        assert_eq!(signer().verify(&forged), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_garbage() {
        assert_eq!(signer().verify("not-a-token"), Err(AuthError::Malformed));
    }

    #[test]
    fn test_lifetime_out_of_range() {
        for minutes in [0, -5, MAX_TOKEN_MINUTES + 1, 1_000_000_000_000, i64::MAX, i64::MIN] {
            assert_eq!(
                TokenSigner::new("s", minutes).err(),
                Some(AuthError::InvalidLifetime(minutes))
            );
        }
        assert!(TokenSigner::new("s", MAX_TOKEN_MINUTES).is_ok());
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let far_future = DateTime::<Utc>::MAX_UTC - Duration::minutes(1);
        assert!(signer().issue_at(1, far_future).is_err());
    }
}
