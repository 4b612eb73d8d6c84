use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    auth::TokenKind,
    entity::{ManagerAuths, UserAuths},
    error::AppError,
    models::Role,
    state::AppState,
};

/// Identity attached to requests that passed the customer gate.
#[derive(Debug, Clone)]
pub struct CustomerAuth {
    pub user_id: Uuid,
    pub email: String,
}

/// Identity attached to requests that passed the staff gate.
///
/// `role` comes from the token claims, so a role change applies after the
/// member signs in again.
#[derive(Debug, Clone)]
pub struct ManagerAuth {
    pub manager_id: Uuid,
    pub email: String,
    pub role: Option<Role>,
    pub ip_address: Option<String>,
}

pub fn ensure_role(manager: &ManagerAuth, required: Role) -> Result<(), AppError> {
    match manager.role {
        None => Err(AppError::unauthorized("Authentication required")),
        Some(role) if role == required => Ok(()),
        Some(_) => Err(AppError::forbidden(format!(
            "Access denied. {} role required.",
            capitalize(required.as_str())
        ))),
    }
}

pub fn ensure_manager(manager: &ManagerAuth) -> Result<(), AppError> {
    ensure_role(manager, Role::Manager)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_str = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid Authorization header"))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("Invalid Authorization scheme"))?;
    Ok(token)
}

pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

impl FromRequestParts<AppState> for CustomerAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = state.tokens.verify(token, TokenKind::Access)?;

        let user = UserAuths::find_by_id(claims.user_id).one(&state.orm).await?;
        let user = match user {
            Some(u) => u,
            None => {
                tracing::debug!(user_id = %claims.user_id, "token subject no longer exists");
                return Err(AppError::unauthorized("Customer not found"));
            }
        };

        Ok(CustomerAuth {
            user_id: user.id,
            email: user.email,
        })
    }
}

impl FromRequestParts<AppState> for ManagerAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = state.tokens.verify(token, TokenKind::Access)?;

        let manager = ManagerAuths::find_by_id(claims.user_id)
            .one(&state.orm)
            .await?;
        let manager = match manager {
            Some(m) => m,
            None => {
                tracing::debug!(manager_id = %claims.user_id, "token subject no longer exists");
                return Err(AppError::unauthorized("User not found. Please sign in again."));
            }
        };

        Ok(ManagerAuth {
            manager_id: manager.id,
            email: manager.email,
            role: claims.role,
            ip_address: client_ip(&parts.headers),
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn staff(role: Option<Role>) -> ManagerAuth {
        ManagerAuth {
            manager_id: Uuid::new_v4(),
            email: "staff@example.com".into(),
            role,
            ip_address: None,
        }
    }

    #[test]
    fn manager_passes_manager_gate() {
        assert!(ensure_manager(&staff(Some(Role::Manager))).is_ok());
    }

    #[test]
    fn employee_is_forbidden() {
        let err = ensure_manager(&staff(Some(Role::Employee))).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(err.to_string(), "Access denied. Manager role required.");
    }

    #[test]
    fn missing_role_is_unauthorized() {
        let err = ensure_manager(&staff(None)).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn bearer_token_requires_scheme() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def");
    }

    #[test]
    fn client_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers).as_deref(), Some("10.0.0.2"));

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.7"));
    }
}
