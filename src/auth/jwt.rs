use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{config::JwtConfig, enums::Role, state::AppState};

/// JWT payload: the verified identity plus its validity window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,     // user ID
    pub email: String, // user email
    pub role: Role,    // account role
    pub iat: usize,    // issued at (unix timestamp)
    pub exp: usize,    // expires at (unix timestamp)
}

/// Internal classification of verification failures. Externally every
/// variant collapses to the same 401, so a caller cannot tell which
/// check tripped; the variant only shows up in logs.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("missing token")]
    Missing,
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

/// Holds JWT signing and verification keys with config data.
/// Built once per request from the process-wide secret.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: Uuid, email: &str, role: Role) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + self.ttl;
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, role = ?role, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data =
            decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature => TokenError::BadSignature,
                    _ => TokenError::Malformed,
                }
            })?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &[u8], ttl_minutes: i64) -> JwtKeys {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    #[test]
    fn sign_and_verify_round_trips_identity() {
        let keys = make_keys(b"dev-secret", 5);
        let user_id = Uuid::new_v4();
        let token = keys
            .sign(user_id, "lifter@example.com", Role::Admin)
            .expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "lifter@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn role_claim_survives_round_trip_for_both_roles() {
        let keys = make_keys(b"dev-secret", 5);
        for role in [Role::Admin, Role::User] {
            let token = keys.sign(Uuid::new_v4(), "a@b.com", role).expect("sign");
            assert_eq!(keys.verify(&token).expect("verify").role, role);
        }
    }

    #[test]
    fn expired_token_is_rejected() {
        // Negative ttl puts exp in the past, beyond the default leeway.
        let keys = make_keys(b"dev-secret", -2);
        let token = keys.sign(Uuid::new_v4(), "a@b.com", Role::User).expect("sign");
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let keys = make_keys(b"dev-secret", 5);
        let other = make_keys(b"other-secret", 5);
        let token = keys.sign(Uuid::new_v4(), "a@b.com", Role::User).expect("sign");
        let err = other.verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::BadSignature));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let keys = make_keys(b"dev-secret", 5);
        let err = keys.verify("definitely-not-a-jwt").unwrap_err();
        assert!(matches!(err, TokenError::Malformed));
    }

    #[tokio::test]
    async fn keys_built_from_state_sign_and_verify() {
        let keys = JwtKeys::from_ref(&AppState::fake());
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, "a@b.com", Role::User).expect("sign");
        assert_eq!(keys.verify(&token).expect("verify").sub, user_id);
    }
}
