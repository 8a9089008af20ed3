//! # Customer Handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use jelantah_core::validation::validate_search_query;
use jelantah_core::{CoreError, Customer, PickupRequest, UserRole};
use jelantah_store::{CustomerUpdate, NewCustomer};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CustomerListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCustomerRequest {
    #[serde(flatten)]
    pub profile: NewCustomer,

    /// Quick pickup: also open an initial request for this many liters.
    #[serde(default)]
    pub estimated_liters: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCustomerResponse {
    pub customer: Customer,
    pub pickup: Option<PickupRequest>,
}

/// GET /api/customers - admin list with name/phone search
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<CustomerListQuery>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    user.require(UserRole::Admin)?;

    let search = validate_search_query(query.search.as_deref().unwrap_or(""))
        .map_err(CoreError::from)?;

    debug!(search = %search, "list customers");
    Ok(Json(state.store.customers().search(&search)))
}

/// POST /api/customers - admin registration (the quick pickup form)
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<RegisterCustomerRequest>,
) -> Result<Json<RegisterCustomerResponse>, ApiError> {
    user.require(UserRole::Admin)?;

    let customer = state.store.register_customer(req.profile)?;

    // The form's optional estimated liters opens a pickup in the same step
    let pickup = match req.estimated_liters {
        Some(liters) if liters > 0 => Some(state.store.create_pickup(&customer.id, liters)?),
        _ => None,
    };

    Ok(Json(RegisterCustomerResponse { customer, pickup }))
}

/// PATCH /api/customers/{id} - admin partial profile update
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<CustomerUpdate>,
) -> Result<Json<Customer>, ApiError> {
    user.require(UserRole::Admin)?;

    let customer = state.store.update_customer(&id, req)?;
    Ok(Json(customer))
}
