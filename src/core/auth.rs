use crate::core::{AppError, AppState};
use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Roles granted by the identity provider through `realm_access.roles`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdmRole {
    Admin,
    User,
}

impl IdmRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdmRole::Admin => "IDM_ADMIN",
            IdmRole::User => "IDM_USER",
        }
    }
}

impl fmt::Display for IdmRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

// content of the bearer token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(default)]
    pub sub: String,
    pub exp: usize, // Expiry time of the token
    #[serde(default)]
    pub realm_access: RealmAccess,
}

impl Claims {
    pub fn has_role(&self, role: IdmRole) -> bool {
        self.realm_access.roles.iter().any(|r| r == role.as_str())
    }
}

/// Signs a token for `subject` carrying `roles`, valid for `ttl`
#[instrument(skip(secret))]
pub fn encode_jwt(
    subject: &str,
    roles: &[IdmRole],
    secret: &str,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: subject.to_string(),
        exp: (Utc::now() + ttl).timestamp().max(0) as usize,
        realm_access: RealmAccess {
            roles: roles.iter().map(|r| r.as_str().to_string()).collect(),
        },
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verifies signature and expiry (HS256) and returns the claims
#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    debug!("Decoding JWT token");
    decode::<Claims>(
        jwt_token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

fn bearer_token(req: &Request) -> Result<&str, AppError> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            warn!("Missing authorization header");
            AppError::unauthorized("Please add the JWT token to the header")
        })?
        .to_str()
        .map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::unauthorized("Invalid authorization header")
        })?;

    match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => {
            warn!("Authorization header is not a bearer token");
            Err(AppError::unauthorized("Authorization header must be 'Bearer <token>'"))
        }
    }
}

/// Rejects requests without a valid bearer token and stores the decoded
/// [`Claims`] in the request extensions
#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let claims = decode_jwt(bearer_token(&req)?, &state.jwt_secret).map_err(|e| {
        warn!("Failed to decode JWT token: {}", e);
        AppError::unauthorized("Unable to decode token")
    })?;

    debug!("Authenticated subject '{}'", claims.sub);
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Checks that the caller was granted `role`
pub fn require_role(claims: &Claims, role: IdmRole) -> Result<(), AppError> {
    if !claims.has_role(role) {
        warn!(
            "Subject '{}' lacks role {}, has {:?}",
            claims.sub, role, claims.realm_access.roles
        );
        return Err(AppError::forbidden(format!(
            "This action requires the {role} role"
        )));
    }
    info!("Role check passed for '{}' ({})", claims.sub, role);
    Ok(())
}
