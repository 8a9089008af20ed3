//! # Pickup Handlers
//!
//! The pickup lifecycle over HTTP, scoped per role:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  role      sees                          may do                         │
//! │  ────      ────                          ──────                         │
//! │  admin     every pickup                  create / assign / complete /   │
//! │                                          proof                          │
//! │  kurir     own pickups + open requests   take / complete / proof        │
//! │  customer  own pickups                   create (request)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use jelantah_core::{PickupRequest, PickupStatus, UserRole};
use jelantah_store::{CompletionOutcome, PickupStatusCounts};

use crate::auth::{kurir_identity, CurrentUser};
use crate::error::ApiError;
use crate::state::AppState;
use crate::storage::{compress_image, object_path, PICKUP_PROOF_BUCKET};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PickupListQuery {
    pub status: Option<PickupStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupListResponse {
    pub pickups: Vec<PickupRequest>,
    /// Status counts over the caller's scope (pre status filter).
    pub counts: PickupStatusCounts,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePickupRequest {
    /// Required for admin calls; customers always request for themselves.
    #[serde(default)]
    pub customer_id: Option<String>,
    pub estimated_liters: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignPickupRequest {
    pub kurir_id: Option<String>,
    pub kurir_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletePickupRequest {
    pub actual_liters: i64,
    #[serde(default)]
    pub kurir_id: Option<String>,
    #[serde(default)]
    pub kurir_name: Option<String>,
}

fn counts_of(pickups: &[PickupRequest]) -> PickupStatusCounts {
    let mut counts = PickupStatusCounts::default();
    for pickup in pickups {
        match pickup.status {
            PickupStatus::Request => counts.request += 1,
            PickupStatus::OnProcess => counts.on_process += 1,
            PickupStatus::Completed => counts.completed += 1,
        }
    }
    counts
}

/// A kurir may only act on pickups that are theirs or still unclaimed.
fn guard_kurir_access(user: &CurrentUser, pickup: &PickupRequest) -> Result<(), ApiError> {
    if user.role() == UserRole::Kurir
        && !pickup.assigned_to(&user.identity.id)
        && !pickup.is_available()
    {
        return Err(ApiError::forbidden("Pickup belongs to another kurir"));
    }
    Ok(())
}

/// GET /api/pickups - role-scoped listing with optional status filter
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<PickupListQuery>,
) -> Result<Json<PickupListResponse>, ApiError> {
    let scope = match user.role() {
        UserRole::Admin => state.store.pickups().list(),
        UserRole::Kurir => state.store.pickups().list_for_kurir(&user.identity.id),
        UserRole::Customer => state.store.pickups().list_for_customer(&user.identity.id),
    };

    let counts = counts_of(&scope);
    let pickups = match query.status {
        Some(status) => scope.into_iter().filter(|p| p.status == status).collect(),
        None => scope,
    };

    debug!(role = %user.identity.role, count = pickups.len(), "list pickups");
    Ok(Json(PickupListResponse { pickups, counts }))
}

/// POST /api/pickups - customer requests a pickup (admin: for any customer)
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreatePickupRequest>,
) -> Result<Json<PickupRequest>, ApiError> {
    user.require_any(&[UserRole::Admin, UserRole::Customer])?;

    let customer_id = match user.role() {
        UserRole::Customer => user.identity.id.clone(),
        _ => req
            .customer_id
            .ok_or_else(|| ApiError::validation("customerId is required"))?,
    };

    let pickup = state.store.create_pickup(&customer_id, req.estimated_liters)?;
    Ok(Json(pickup))
}

/// POST /api/pickups/{id}/assign - kurir takes a request (admin: dispatches)
pub async fn assign(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<AssignPickupRequest>,
) -> Result<Json<PickupRequest>, ApiError> {
    user.require_any(&[UserRole::Admin, UserRole::Kurir])?;

    let (kurir_id, kurir_name) = match user.role() {
        UserRole::Kurir => (user.identity.id.clone(), user.identity.name.clone()),
        _ => {
            // Admin dispatch defaults to the fleet's courier
            let fallback = kurir_identity();
            (
                req.kurir_id.unwrap_or(fallback.id),
                req.kurir_name.unwrap_or(fallback.name),
            )
        }
    };

    let pickup = state.store.assign_pickup(&id, &kurir_id, &kurir_name)?;
    Ok(Json(pickup))
}

/// POST /api/pickups/{id}/complete - record actual liters, roll up, bill
pub async fn complete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<CompletePickupRequest>,
) -> Result<Json<CompletionOutcome>, ApiError> {
    user.require_any(&[UserRole::Admin, UserRole::Kurir])?;

    let existing = state
        .store
        .pickups()
        .get(&id)
        .ok_or_else(|| ApiError::not_found("Pickup", &id))?;
    guard_kurir_access(&user, &existing)?;

    let (kurir_id, kurir_name) = match user.role() {
        // A kurir completing an open request takes it in the same step
        UserRole::Kurir => (
            Some(user.identity.id.clone()),
            Some(user.identity.name.clone()),
        ),
        _ => (req.kurir_id, req.kurir_name),
    };

    let outcome = state.store.complete_pickup(
        &id,
        kurir_id.as_deref(),
        kurir_name.as_deref(),
        req.actual_liters,
    )?;

    Ok(Json(outcome))
}

/// POST /api/pickups/{id}/proof - raw image bytes, stored externally
pub async fn upload_proof(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<PickupRequest>, ApiError> {
    user.require_any(&[UserRole::Admin, UserRole::Kurir])?;

    let existing = state
        .store
        .pickups()
        .get(&id)
        .ok_or_else(|| ApiError::not_found("Pickup", &id))?;
    guard_kurir_access(&user, &existing)?;

    let data = compress_image(&body)?;
    let path = object_path(&id);
    let url = state
        .storage()?
        .put_image(PICKUP_PROOF_BUCKET, &path, data)
        .await?;

    let pickup = state.store.pickups().set_proof_url(&id, &url)?;
    Ok(Json(pickup))
}
