use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use dream_core::Principal;

use crate::error::AppError;
use crate::state::AppState;

/// JWT claims for a signed-in visitor. `sub` carries the DID principal the
/// identity resolver verified at login.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: usize,
}

impl SessionClaims {
    pub fn principal(&self) -> Principal {
        Principal::from(self.sub.as_str())
    }
}

fn decode_session(secret: &str, headers: &HeaderMap) -> Option<SessionClaims> {
    let auth_header = headers.get("Authorization").and_then(|h| h.to_str().ok())?;
    let token = auth_header.strip_prefix("Bearer ")?;

    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

/// Read the session if one is present and valid. Pages that only render
/// differently for guests use this instead of the gating middleware.
pub fn optional_session(state: &AppState, headers: &HeaderMap) -> Option<SessionClaims> {
    decode_session(&state.auth.secret, headers)
}

/// Gate for routes that require a signed-in visitor. Rejections carry the
/// sign-in prompt in the body, not a bare status.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = decode_session(&state.auth.secret, req.headers())
        .ok_or_else(|| AppError::AuthenticationError("Please sign in to continue".to_string()))?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
