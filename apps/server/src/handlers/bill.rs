//! # Billing Handlers

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use jelantah_core::{Bill, BillType, UserRole};
use jelantah_store::BillTypeTotals;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::storage::{compress_image, object_path, PAYMENT_PROOF_BUCKET};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BillListQuery {
    #[serde(rename = "type")]
    pub bill_type: Option<BillType>,
    pub paid: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillListResponse {
    pub bills: Vec<Bill>,
    /// Per-type counts and totals over the caller's scope (pre filters).
    pub totals: BillTypeTotals,
    pub paid_total: i64,
    pub unpaid_total: i64,
}

fn totals_of(bills: &[Bill]) -> BillTypeTotals {
    let mut totals = BillTypeTotals::default();
    for bill in bills {
        match bill.bill_type {
            BillType::Customer => {
                totals.customer_count += 1;
                totals.customer_total += bill.total;
            }
            BillType::Kurir => {
                totals.kurir_count += 1;
                totals.kurir_total += bill.total;
            }
            BillType::Referral => {
                totals.referral_count += 1;
                totals.referral_total += bill.total;
            }
        }
    }
    totals
}

/// GET /api/bills - role-scoped listing with type/paid filters
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<BillListQuery>,
) -> Result<Json<BillListResponse>, ApiError> {
    let scope = match user.role() {
        UserRole::Admin => state.store.bills().list(),
        UserRole::Kurir => state.store.bills().list_for_kurir(&user.identity.id),
        UserRole::Customer => state.store.bills().list_for_customer(&user.identity.id),
    };

    let totals = totals_of(&scope);
    let paid_total: i64 = scope.iter().filter(|b| b.paid).map(|b| b.total).sum();
    let unpaid_total: i64 = scope.iter().filter(|b| !b.paid).map(|b| b.total).sum();

    let bills: Vec<Bill> = scope
        .into_iter()
        .filter(|b| query.bill_type.is_none_or(|t| b.bill_type == t))
        .filter(|b| query.paid.is_none_or(|p| b.paid == p))
        .collect();

    debug!(role = %user.identity.role, count = bills.len(), "list bills");
    Ok(Json(BillListResponse {
        bills,
        totals,
        paid_total,
        unpaid_total,
    }))
}

/// POST /api/bills/{id}/paid - admin settles a bill
pub async fn mark_paid(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Bill>, ApiError> {
    user.require(UserRole::Admin)?;

    let bill = state.store.bills().mark_paid(&id)?;
    Ok(Json(bill))
}

/// POST /api/bills/{id}/payment-proof - raw image bytes, stored externally
pub async fn upload_payment_proof(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Bill>, ApiError> {
    user.require(UserRole::Admin)?;

    if state.store.bills().get(&id).is_none() {
        return Err(ApiError::not_found("Bill", &id));
    }

    let data = compress_image(&body)?;
    let path = object_path(&id);
    let url = state
        .storage()?
        .put_image(PAYMENT_PROOF_BUCKET, &path, data)
        .await?;

    let bill = state.store.bills().set_payment_proof(&id, &url)?;
    Ok(Json(bill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bill(id: &str, bill_type: BillType, total: i64, paid: bool) -> Bill {
        Bill {
            id: id.to_string(),
            bill_type,
            customer_id: None,
            kurir_id: None,
            referrer_id: None,
            liters: 30,
            rate: total / 30,
            total,
            pickup_id: "p1".to_string(),
            payment_proof_url: None,
            paid,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_totals_of() {
        let bills = [
            bill("customer-p1", BillType::Customer, 180_000, false),
            bill("kurir-p1", BillType::Kurir, 22_500, true),
            bill("referral-p1", BillType::Referral, 6000, false),
        ];

        let totals = totals_of(&bills);
        assert_eq!(totals.customer_count, 1);
        assert_eq!(totals.customer_total, 180_000);
        assert_eq!(totals.kurir_total, 22_500);
        assert_eq!(totals.referral_total, 6000);
        assert_eq!(totals.net(), 151_500);
    }
}
