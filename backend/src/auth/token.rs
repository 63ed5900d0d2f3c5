//! HS256 session tokens.
//!
//! Tokens are stateless: a token is valid when its signature checks out and
//! `exp` lies in the future. Nothing is kept server-side.

use std::time::Duration;

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::PlayerId;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("token lifetime of {0:?} does not fit a unix timestamp")]
    LifetimeOverflow(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Claims for `player` valid from now until `now + ttl`.
    ///
    /// Fails when the expiry would not fit an `i64` timestamp.
    pub fn new(player: PlayerId, ttl: Duration) -> Result<Self, TokenError> {
        let now = chrono::Utc::now().timestamp();
        let exp = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(|secs| now.checked_add(secs))
            .ok_or(TokenError::LifetimeOverflow(ttl))?;
        Ok(Self {
            sub: player.value(),
            iat: now,
            exp,
        })
    }

    pub fn player(&self) -> PlayerId {
        PlayerId::from(self.sub)
    }
}

/// Signing and verification keys derived from one shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `player` expiring after the configured lifetime.
    pub fn issue(&self, player: PlayerId) -> Result<String, TokenError> {
        self.encode(&Claims::new(player, self.ttl)?)
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        Ok(jsonwebtoken::encode(&Header::default(), claims, &self.encoding)?)
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::default();
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::new(b"test-secret", Duration::from_secs(3600))
    }

    #[test]
    fn test_issue_and_verify() {
        let player = PlayerId::generate();
        let token = keys().issue(player).unwrap();
        let claims = keys().verify(&token).unwrap();
        assert_eq!(claims.player(), player);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = keys().issue(PlayerId::generate()).unwrap();
        let other = JwtKeys::new(b"other-secret", Duration::from_secs(3600));
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: PlayerId::generate().value(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = keys().encode(&claims).unwrap();
        assert!(keys().verify(&token).is_err());
    }

    #[test]
    fn test_oversized_lifetime_is_an_error() {
        let player = PlayerId::generate();
        for secs in [u64::MAX, i64::MAX as u64] {
            let keys = JwtKeys::new(b"s", Duration::from_secs(secs));
            assert!(matches!(
                keys.issue(player),
                Err(TokenError::LifetimeOverflow(_))
            ));
        }
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = keys().issue(PlayerId::generate()).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[2] = "AAAA";
        assert!(keys().verify(&parts.join(".")).is_err());
        assert!(keys().verify("not.a.token").is_err());
    }
}
