use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;

use dream_core::{UserProfile, UserRole};

use crate::chrome::SiteChrome;
use crate::error::AppError;
use crate::middleware::auth::SessionClaims;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub chrome: SiteChrome,
    pub principal: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(save_profile))
}

async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<ProfileView>, AppError> {
    let caller = claims.principal();
    let backend = state.queries.backend();

    let profile = backend.get_caller_user_profile(&caller).await?;
    let role = backend.get_caller_user_role(&caller).await?;

    Ok(Json(ProfileView {
        chrome: SiteChrome::standard(),
        principal: caller.to_string(),
        role,
        profile,
    }))
}

async fn save_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<serde_json::Value>, AppError> {
    let caller = claims.principal();
    state
        .queries
        .backend()
        .save_caller_user_profile(&caller, &profile)
        .await?;

    tracing::info!(caller = %caller, "profile saved");
    Ok(Json(serde_json::json!({ "message": "Profile saved" })))
}
