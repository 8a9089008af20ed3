//! # Summary Handler
//!
//! The admin dashboard rollup: headcounts, pickup status breakdown, liters
//! collected, and the money picture (revenue vs kurir + referral fees).

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use jelantah_core::UserRole;
use jelantah_store::{PickupStatusCounts, Store};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub total_customers: usize,
    pub total_pickups: usize,
    pub pickup_counts: PickupStatusCounts,

    /// Sum of every customer's own collected liters.
    pub total_liters: i64,

    /// Customer bill totals (what the oil is worth).
    pub total_revenue: i64,
    pub total_kurir_fees: i64,
    pub total_referral_fees: i64,

    /// Revenue minus both fee lines.
    pub net: i64,
}

pub(crate) fn build_summary(store: &Store) -> SummaryResponse {
    let pickup_counts = store.pickups().status_counts();
    let bill_totals = store.bills().type_totals();

    SummaryResponse {
        total_customers: store.customers().count(),
        total_pickups: store.pickups().count(),
        pickup_counts,
        total_liters: store.customers().total_liters_collected(),
        total_revenue: bill_totals.customer_total,
        total_kurir_fees: bill_totals.kurir_total,
        total_referral_fees: bill_totals.referral_total,
        net: bill_totals.net(),
    }
}

/// GET /api/summary - admin only
pub async fn get(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<SummaryResponse>, ApiError> {
    user.require(UserRole::Admin)?;
    Ok(Json(build_summary(&state.store)))
}
