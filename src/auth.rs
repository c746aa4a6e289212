//! Request identity extractors
//!
//! Authentication itself happens upstream (the gateway validates the
//! session token and forwards the resolved identity in `x-user-id` /
//! `x-user-roles` headers). Handlers only ever see the extracted
//! [`AuthUser`].

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLES_HEADER: &str = "x-user-roles";

/// Authenticated user identity injected by the upstream gateway
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub roles: Vec<String>,
}

impl AuthUser {
    /// Check membership of a role, 403 otherwise
    pub fn require_role(&self, role: &str) -> Result<(), AppError> {
        if self.roles.iter().any(|r| r == role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!("Requires role: {role}")))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?
            .to_string();

        let roles = parts
            .headers
            .get(USER_ROLES_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { id, roles })
    }
}
