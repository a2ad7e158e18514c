use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;

use dream_core::DidPresentation;

use crate::chrome::SiteChrome;
use crate::error::AppError;
use crate::middleware::auth::{optional_session, SessionClaims};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    principal: String,
}

#[derive(Debug, Serialize)]
pub struct SessionStatusView {
    pub chrome: SiteChrome,
    pub signed_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(session_status).post(login))
        .route("/logout", post(logout))
}

async fn session_status(State(state): State<AppState>, headers: HeaderMap) -> Json<SessionStatusView> {
    let session = optional_session(&state, &headers);
    Json(SessionStatusView {
        chrome: SiteChrome::standard(),
        signed_in: session.is_some(),
        principal: session.map(|s| s.sub),
    })
}

/// Verify the presented DID credentials and issue a session token whose
/// subject is the resolved principal.
async fn login(
    State(state): State<AppState>,
    Json(presentation): Json<DidPresentation>,
) -> Result<Json<AuthResponse>, AppError> {
    let principal = state
        .resolver
        .verify_presentation(&presentation)
        .await
        .map_err(|e| AppError::AuthenticationError(e.to_string()))?;

    let claims = SessionClaims {
        sub: principal.to_string(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    tracing::info!(principal = %principal, "session issued");

    Ok(Json(AuthResponse {
        token,
        principal: principal.to_string(),
    }))
}

/// Sessions are stateless; the client discards the token.
async fn logout() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "You have been signed out." }))
}
