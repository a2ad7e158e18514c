use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use dream_core::{ContactInquiry, Principal, TransportType, UserRole};

use crate::error::AppError;
use crate::middleware::auth::SessionClaims;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTransportOptionRequest {
    pub destination_id: u64,
    pub transport_type: TransportType,
    pub schedule: String,
    pub available_seats: u64,
}

#[derive(Debug, Serialize)]
struct AddTransportOptionResponse {
    id: u64,
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub principal: String,
    pub role: UserRole,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/transport-options", post(add_transport_option))
        .route("/admin/roles", post(assign_role))
        .route("/admin/contact-inquiries", get(list_contact_inquiries))
}

/// The backend enforces the role itself, but checking here keeps the error
/// shape consistent for every admin route.
async fn require_admin(state: &AppState, caller: &Principal) -> Result<(), AppError> {
    let is_admin = state.queries.backend().is_caller_admin(caller).await?;
    if !is_admin {
        return Err(AppError::AuthorizationError("Admin access required".to_string()));
    }
    Ok(())
}

async fn add_transport_option(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(req): Json<AddTransportOptionRequest>,
) -> Result<Json<AddTransportOptionResponse>, AppError> {
    let caller = claims.principal();
    require_admin(&state, &caller).await?;

    let id = state
        .queries
        .backend()
        .add_transport_option(
            &caller,
            req.destination_id,
            req.transport_type,
            &req.schedule,
            req.available_seats,
        )
        .await?;

    // The destination's options list just changed under any cached copy.
    let destination_id = req.destination_id.to_string();
    state
        .queries
        .cache()
        .invalidate_prefix(&["transportOptions", destination_id.as_str()]);

    tracing::info!(option_id = id, destination_id = req.destination_id, "transport option added");
    Ok(Json(AddTransportOptionResponse { id }))
}

async fn assign_role(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(req): Json<AssignRoleRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let caller = claims.principal();
    require_admin(&state, &caller).await?;

    let target = Principal::from(req.principal.as_str());
    state
        .queries
        .backend()
        .assign_user_role(&caller, &target, req.role)
        .await?;

    tracing::info!(target = %target, role = ?req.role, "role assigned");
    Ok(Json(serde_json::json!({ "message": "Role assigned" })))
}

async fn list_contact_inquiries(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<Vec<ContactInquiry>>, AppError> {
    let caller = claims.principal();
    require_admin(&state, &caller).await?;

    let inquiries = state.queries.contact_inquiries().await?;
    Ok(Json(inquiries))
}
