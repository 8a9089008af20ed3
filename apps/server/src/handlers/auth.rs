//! # Auth Handlers

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use jelantah_core::{Customer, Identity, UserRole};

use crate::auth::{resolve_identity, CurrentUser};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub phone: String,
    pub role: UserRole,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: Identity,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub logged_out: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: Identity,
    /// Full profile with totals and downlines, for the customer role.
    pub customer: Option<Customer>,
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    debug!(phone = %req.phone, role = %req.role, "login command");

    let identity = resolve_identity(&state.store, &req.phone, req.role)
        .ok_or_else(|| ApiError::unauthorized("Phone number or role not recognized"))?;

    let token = state.sessions.create(identity.clone());

    info!(user = %identity.id, role = %identity.role, "Logged in");

    Ok(Json(LoginResponse {
        token,
        user: identity,
    }))
}

/// POST /api/logout
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<LogoutResponse>, ApiError> {
    let logged_out = state.sessions.revoke(&user.token);
    info!(user = %user.identity.id, "Logged out");
    Ok(Json(LogoutResponse { logged_out }))
}

/// GET /api/me
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<MeResponse>, ApiError> {
    let customer = match user.role() {
        UserRole::Customer => state.store.customers().get(&user.identity.id),
        _ => None,
    };

    Ok(Json(MeResponse {
        user: user.identity,
        customer,
    }))
}
