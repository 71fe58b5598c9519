//! Bearer-token authentication.
//!
//! Tokens are issued by the external identity service and verified here with
//! the shared HS256 secret. Every protected handler takes an [`OwnerContext`]
//! extractor, so an unauthenticated request never reaches domain code.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::state::AppState;
use clipvault_core::AppError;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid, // owner id
    pub exp: i64,  // expiration timestamp
    pub iat: i64,  // issued at timestamp
}

/// Authenticated principal all queries and mutations are scoped by.
#[derive(Debug, Clone, Copy)]
pub struct OwnerContext {
    pub owner_id: Uuid,
}

/// Verify a bearer token against the shared secret.
pub fn verify_token(token: &str, secret: &str) -> Result<JwtClaims, AppError> {
    let data = jsonwebtoken::decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;
    Ok(data.claims)
}

impl FromRequestParts<Arc<AppState>> for OwnerContext {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Missing Authorization header".to_string(),
                ))
            })?;

        let token = header_value.strip_prefix("Bearer ").ok_or_else(|| {
            HttpAppError(AppError::Unauthorized(
                "Expected a bearer token".to_string(),
            ))
        })?;

        let claims = verify_token(token, &state.config.jwt_secret)?;
        Ok(OwnerContext {
            owner_id: claims.sub,
        })
    }
}
