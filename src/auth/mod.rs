//! Request-scoped identity context.
//!
//! Every orchestrator call receives an explicit [`AuthUser`] extracted from
//! the bearer token instead of consulting ambient session state. Token
//! issuance and account management belong to the external identity
//! provider; this module only validates what the provider signed.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::user::Role;

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User's display name
    pub name: Option<String>,
    /// Platform role
    pub role: String,
    /// Issued at time
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

/// Authenticated user data extracted from the JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub role: Role,
}

impl AuthUser {
    pub fn is_customer(&self) -> bool {
        self.role == Role::Customer
    }

    pub fn is_organizer(&self) -> bool {
        self.role == Role::Organizer
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Failed to create token: {0}")]
    TokenCreation(String),

    #[error("Internal auth error: {0}")]
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::MissingAuth | AuthError::InvalidToken | AuthError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::TokenCreation(_) | AuthError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiration_secs: u64,
}

impl AuthConfig {
    pub fn new(jwt_secret: String, token_expiration_secs: u64) -> Self {
        Self {
            jwt_secret,
            token_expiration_secs,
        }
    }
}

/// Validates bearer tokens and, for tooling and tests, issues them.
#[derive(Debug, Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Generate a token carrying the user's identity context.
    pub fn issue_token(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        role: Role,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + ChronoDuration::seconds(self.config.token_expiration_secs as i64);

        let claims = Claims {
            sub: user_id.to_string(),
            name: name.map(str::to_string),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validate a JWT token and extract the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?
        .claims;

        Ok(claims)
    }

    /// Turn validated claims into the request-scoped identity context.
    pub fn auth_user_from_claims(&self, claims: Claims) -> Result<AuthUser, AuthError> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        let role = claims.role.parse().map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthUser {
            user_id,
            name: claims.name,
            role,
        })
    }
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // AuthService is injected into request extensions by middleware in
        // main.rs.
        let auth_service = parts
            .extensions
            .get::<Arc<AuthService>>()
            .cloned()
            .ok_or_else(|| AuthError::InternalError("AuthService not configured".to_string()))?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingAuth)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(AuthError::MissingAuth)?;

        let claims = auth_service.validate_token(token)?;
        auth_service.auth_user_from_claims(claims)
    }
}
