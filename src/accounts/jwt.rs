use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::accounts::errors::AccountError;
use crate::accounts::repo_types::Role;
use crate::config::JwtConfig;
use crate::state::AppState;

/// Claims carried by every issued token. Holders of the same secret can
/// verify the signature, expiry, issuer and audience; nothing is stored
/// server-side and there is no revocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // account email
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::from_config(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn from_config(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl: Duration::from_secs((config.ttl_minutes as u64) * 60),
        }
    }

    /// Issue a signed HS256 bearer token for the given identity and role,
    /// expiring `ttl` after issuance.
    pub fn issue(&self, email: &str, role: Role) -> Result<String, AccountError> {
        if email.trim().is_empty() {
            return Err(AccountError::invalid_argument("Email cannot be null or empty"));
        }
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: email.to_string(),
            role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| anyhow::anyhow!(e))?;
        debug!(email = %email, role = ?role, "jwt signed");
        Ok(token)
    }

    /// Validate signature, expiry, issuer and audience. Verification lives
    /// here for transport middleware and interop checks; the account service
    /// never calls it.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(email = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 120,
        })
    }

    #[test]
    fn issue_and_verify_carries_identity_claims() {
        let keys = make_keys("dev-secret", "test-issuer", "test-aud");
        let token = keys.issue("a@x.com", Role::Student).expect("issue token");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.role, Role::Student);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }

    #[test]
    fn token_expires_two_hours_after_issuance() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let token = keys.issue("a@x.com", Role::Mentor).expect("issue token");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.exp - claims.iat, 2 * 60 * 60);
    }

    #[test]
    fn issue_rejects_blank_email() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let err = keys.issue("  ", Role::Admin).unwrap_err();
        assert!(matches!(err, AccountError::InvalidArgument(_)));
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let good_keys = make_keys("same-secret", "good-iss", "good-aud");
        let bad_keys = make_keys("same-secret", "bad-iss", "bad-aud");
        let token = good_keys.issue("a@x.com", Role::Student).expect("issue token");
        assert!(bad_keys.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_foreign_secret() {
        let keys = make_keys("secret-one", "iss", "aud");
        let other = make_keys("secret-two", "iss", "aud");
        let token = keys.issue("a@x.com", Role::Student).expect("issue token");
        assert!(other.verify(&token).is_err());
    }
}
