//! Bearer-token gating for the API surface.
//!
//! Token issuance is deliberately minimal: the desktop client logs in once
//! against the seeded user table and replays the JWT. Reads require a valid
//! token; mutating methods additionally require a writing role.

use axum::{
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::Response,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::user;
use crate::errors::ServiceError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_OPERATOR: &str = "operator";
pub const ROLE_READONLY: &str = "readonly";

fn role_can_write(role: &str) -> bool {
    matches!(role, ROLE_ADMIN | ROLE_OPERATOR)
}

/// Hashes a password as `{salt_hex}${sha256(salt_hex || password)_hex}`.
pub fn hash_password(password: &str) -> String {
    let salt: [u8; 16] = rand::random();
    let salt_hex = hex::encode(salt);
    let digest = Sha256::digest(format!("{salt_hex}{password}").as_bytes());
    format!("{salt_hex}${}", hex::encode(digest))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let digest = Sha256::digest(format!("{salt_hex}{password}").as_bytes());
    hex::encode(digest) == digest_hex
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub username: String,
    pub role: String,
    pub exp: usize,
}

impl Claims {
    pub fn can_write(&self) -> bool {
        role_can_write(&self.role)
    }
}

/// Shared auth state: signing secret plus the user table for login.
pub struct AuthState {
    secret: String,
    expiry_secs: usize,
    db: Arc<DbPool>,
}

impl AuthState {
    pub fn new(secret: String, expiry_secs: usize, db: Arc<DbPool>) -> Self {
        Self {
            secret,
            expiry_secs,
            db,
        }
    }

    pub fn issue_token(&self, user: &user::Model) -> Result<String, ServiceError> {
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
            exp: Utc::now().timestamp() as usize + self.expiry_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ServiceError::InternalError(format!("token encoding failed: {e}")))
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| ServiceError::AuthError(format!("invalid token: {e}")))
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub role: String,
    pub expires_in: usize,
}

pub fn auth_routes() -> Router<Arc<AuthState>> {
    Router::new().route("/login", post(login))
}

async fn login(
    State(auth): State<Arc<AuthState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ServiceError> {
    let found = user::Entity::find()
        .filter(user::Column::Username.eq(payload.username.clone()))
        .one(auth.db.as_ref())
        .await?;

    let Some(account) = found else {
        // Same failure as a bad password so usernames cannot be probed
        return Err(ServiceError::AuthError("invalid credentials".into()));
    };

    if !verify_password(&payload.password, &account.password_hash) {
        warn!(username = %payload.username, "failed login attempt");
        return Err(ServiceError::AuthError("invalid credentials".into()));
    }

    let token = auth.issue_token(&account)?;
    Ok(Json(LoginResponse {
        token,
        role: account.role,
        expires_in: auth.expiry_secs,
    }))
}

/// Middleware for `/api/v1`: every request needs a valid Bearer token and
/// mutating methods need a writing role. Decoded claims land in request
/// extensions for handlers that audit the acting user.
pub async fn require_auth(
    State(auth): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ServiceError::AuthError("missing bearer token".into()))?;

    let claims = auth.decode_token(token)?;

    let method = req.method();
    let mutating = method != Method::GET && method != Method::HEAD && method != Method::OPTIONS;
    if mutating && !claims.can_write() {
        return Err(ServiceError::Forbidden(format!(
            "role '{}' may not modify stock records",
            claims.role
        )));
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let stored = hash_password("s3cret");
        assert!(verify_password("s3cret", &stored));
        assert!(!verify_password("wrong", &stored));
    }

    #[test]
    fn hash_is_salted() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn malformed_stored_hash_rejected() {
        assert!(!verify_password("anything", "no-separator"));
    }

    #[test]
    fn write_roles() {
        assert!(role_can_write(ROLE_ADMIN));
        assert!(role_can_write(ROLE_OPERATOR));
        assert!(!role_can_write(ROLE_READONLY));
    }
}
