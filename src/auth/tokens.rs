use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Role,
};

const RESET_TTL_HOURS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Reset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies HS256 tokens for both customers and staff.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::hours(access_ttl_hours),
        }
    }

    pub fn issue_access(&self, user_id: Uuid, role: Option<Role>) -> AppResult<String> {
        self.issue(user_id, role, TokenKind::Access, self.access_ttl)
    }

    pub fn issue_reset(&self, user_id: Uuid, role: Option<Role>) -> AppResult<String> {
        self.issue(
            user_id,
            role,
            TokenKind::Reset,
            Duration::hours(RESET_TTL_HOURS),
        )
    }

    fn issue(
        &self,
        user_id: Uuid,
        role: Option<Role>,
        kind: TokenKind,
        ttl: Duration,
    ) -> AppResult<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = Claims {
            user_id,
            role,
            kind,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    /// Verifies signature and expiry, then checks the token was issued for `kind`.
    pub fn verify(&self, token: &str, kind: TokenKind) -> AppResult<Claims> {
        let decoded = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|err| {
                tracing::debug!(error = %err, "token rejected");
                match err.kind() {
                    ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("Token expired. Please sign in again.")
                    }
                    _ => AppError::unauthorized("Invalid or expired token"),
                }
            })?;

        if decoded.claims.kind != kind {
            tracing::debug!(expected = ?kind, got = ?decoded.claims.kind, "token kind mismatch");
            return Err(AppError::unauthorized("Invalid or expired token"));
        }
        Ok(decoded.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", 24)
    }

    #[test]
    fn access_token_round_trips_subject_and_role() {
        let tokens = service();
        let id = Uuid::new_v4();
        let token = tokens.issue_access(id, Some(Role::Manager)).unwrap();

        let claims = tokens.verify(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.user_id, id);
        assert_eq!(claims.role, Some(Role::Manager));
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn customer_tokens_carry_no_role() {
        let tokens = service();
        let token = tokens.issue_access(Uuid::new_v4(), None).unwrap();
        assert!(tokens.verify(&token, TokenKind::Access).unwrap().role.is_none());
    }

    #[test]
    fn reset_tokens_are_not_access_tokens() {
        let tokens = service();
        let token = tokens.issue_reset(Uuid::new_v4(), None).unwrap();

        assert!(tokens.verify(&token, TokenKind::Access).is_err());
        let claims = tokens.verify(&token, TokenKind::Reset).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let tokens = service();
        let token = tokens
            .issue(Uuid::new_v4(), None, TokenKind::Access, Duration::hours(-2))
            .unwrap();

        let err = tokens.verify(&token, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let other = TokenService::new("other-secret", 24);
        let token = other.issue_access(Uuid::new_v4(), None).unwrap();
        assert!(service().verify(&token, TokenKind::Access).is_err());
    }
}
