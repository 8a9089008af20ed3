//! # Billing Module
//!
//! The bill derivation rule: turn one completed pickup into 2-3 payable
//! records, using a per-type rate schedule.
//!
//! ## Derivation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Bill Derivation                                     │
//! │                                                                         │
//! │  PickupRequest { status: Completed, actual_liters: 30, kurir: Ahmad }  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  generate_bills(pickup, referred_by, schedule)                         │
//! │       │                                                                 │
//! │       ├── Customer bill   30L × customer_rate(30)  → Rp180.000         │
//! │       │                                                                 │
//! │       ├── Kurir bill      30L × Rp750              → Rp22.500          │
//! │       │                                                                 │
//! │       └── Referral bill   30L × Rp200              → Rp6.000           │
//! │           (only when the customer has a referrer)                      │
//! │                                                                         │
//! │  Bill ids are deterministic: customer-<pickup>, kurir-<pickup>,        │
//! │  referral-<pickup>. One pickup can never bill the same party twice.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rate Schedules
//! The customer rate is a tier table keyed on collected liters. Production
//! runs the flat Rp6.000/L single tier; some deployments add thresholds at
//! 100L and 200L. Kurir and referral fees are always flat.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Rupiah;
use crate::types::{Bill, BillType, PickupRequest, PickupStatus};
use crate::validation::validate_rate;
use crate::{DEFAULT_CUSTOMER_RATE, DEFAULT_KURIR_RATE, DEFAULT_REFERRAL_RATE};

// =============================================================================
// Rate Schedule
// =============================================================================

/// One customer-rate tier: applies to pickups of at least `min_liters`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RateTier {
    /// Smallest liter count this tier applies to.
    pub min_liters: i64,
    /// Rupiah per liter paid to the customer in this tier.
    pub rate: i64,
}

/// Per-type rates used by the bill derivation.
///
/// ## Invariants
/// - `customer_tiers` is non-empty, sorted ascending by `min_liters`,
///   and its first tier starts at 0 (every liter count resolves a rate)
/// - All rates are positive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RateSchedule {
    customer_tiers: Vec<RateTier>,
    /// Flat kurir fee in rupiah per liter.
    pub kurir_rate: i64,
    /// Flat referral fee in rupiah per liter.
    pub referral_rate: i64,
}

impl RateSchedule {
    /// Builds a flat schedule: one customer tier from zero.
    ///
    /// ## Example
    /// ```rust
    /// use jelantah_core::billing::RateSchedule;
    ///
    /// let schedule = RateSchedule::flat(6000, 750, 200).unwrap();
    /// assert_eq!(schedule.customer_rate(30), 6000);
    /// assert_eq!(schedule.customer_rate(500), 6000);
    /// ```
    pub fn flat(customer_rate: i64, kurir_rate: i64, referral_rate: i64) -> CoreResult<Self> {
        RateSchedule::tiered(
            vec![RateTier {
                min_liters: 0,
                rate: customer_rate,
            }],
            kurir_rate,
            referral_rate,
        )
    }

    /// Builds a tiered schedule from an arbitrary tier list.
    ///
    /// Tiers are sorted by `min_liters`; the lowest tier must start at 0 so
    /// every pickup resolves a rate.
    ///
    /// ## Example
    /// ```rust
    /// use jelantah_core::billing::{RateSchedule, RateTier};
    ///
    /// let schedule = RateSchedule::tiered(
    ///     vec![
    ///         RateTier { min_liters: 0, rate: 6000 },
    ///         RateTier { min_liters: 100, rate: 6250 },
    ///         RateTier { min_liters: 200, rate: 6500 },
    ///     ],
    ///     750,
    ///     200,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(schedule.customer_rate(99), 6000);
    /// assert_eq!(schedule.customer_rate(100), 6250);
    /// assert_eq!(schedule.customer_rate(250), 6500);
    /// ```
    pub fn tiered(
        mut customer_tiers: Vec<RateTier>,
        kurir_rate: i64,
        referral_rate: i64,
    ) -> CoreResult<Self> {
        if customer_tiers.is_empty() {
            return Err(crate::ValidationError::Required {
                field: "customer tiers".to_string(),
            }
            .into());
        }

        customer_tiers.sort_by_key(|t| t.min_liters);

        if customer_tiers[0].min_liters != 0 {
            return Err(crate::ValidationError::InvalidFormat {
                field: "customer tiers".to_string(),
                reason: "lowest tier must start at 0 liters".to_string(),
            }
            .into());
        }

        for tier in &customer_tiers {
            validate_rate(tier.rate)?;
        }
        validate_rate(kurir_rate)?;
        validate_rate(referral_rate)?;

        Ok(RateSchedule {
            customer_tiers,
            kurir_rate,
            referral_rate,
        })
    }

    /// Resolves the customer rate for a collected liter count: the highest
    /// tier whose threshold the count reaches.
    pub fn customer_rate(&self, liters: i64) -> i64 {
        self.customer_tiers
            .iter()
            .rev()
            .find(|t| liters >= t.min_liters)
            .map(|t| t.rate)
            // Unreachable: construction guarantees a tier at 0 liters
            .unwrap_or(DEFAULT_CUSTOMER_RATE)
    }

    /// The customer tier table, sorted ascending.
    pub fn customer_tiers(&self) -> &[RateTier] {
        &self.customer_tiers
    }
}

/// The shipped production schedule: flat Rp6.000 / Rp750 / Rp200.
impl Default for RateSchedule {
    fn default() -> Self {
        RateSchedule {
            customer_tiers: vec![RateTier {
                min_liters: 0,
                rate: DEFAULT_CUSTOMER_RATE,
            }],
            kurir_rate: DEFAULT_KURIR_RATE,
            referral_rate: DEFAULT_REFERRAL_RATE,
        }
    }
}

// =============================================================================
// Bill Derivation
// =============================================================================

/// Deterministic bill id for a (type, pickup) pair.
#[inline]
pub fn bill_id(bill_type: BillType, pickup_id: &str) -> String {
    format!("{}-{}", bill_type.prefix(), pickup_id)
}

/// Derives the 2-3 bills owed for one completed pickup.
///
/// ## Arguments
/// * `pickup` - must be `Completed`, with positive `actual_liters` and an
///   assigned kurir
/// * `referred_by` - the owning customer's referrer edge, if any (empty
///   strings count as no referrer)
/// * `schedule` - rate schedule to price against
/// * `now` - derivation timestamp recorded on every bill
///
/// ## Returns
/// Customer bill and kurir bill always; referral bill appended when
/// `referred_by` is set. The caller inserts them into the bill registry,
/// whose duplicate-id rejection (ids are deterministic per pickup) keeps a
/// replayed derivation from double-billing.
pub fn generate_bills(
    pickup: &PickupRequest,
    referred_by: Option<&str>,
    schedule: &RateSchedule,
    now: DateTime<Utc>,
) -> CoreResult<Vec<Bill>> {
    if pickup.status != PickupStatus::Completed {
        return Err(CoreError::PickupNotCompleted {
            pickup_id: pickup.id.clone(),
            status: pickup.status,
        });
    }

    let liters = match pickup.actual_liters {
        Some(l) if l > 0 => l,
        _ => {
            return Err(CoreError::ActualLitersRequired {
                pickup_id: pickup.id.clone(),
            })
        }
    };

    let kurir_id = pickup
        .kurir_id
        .as_deref()
        .ok_or_else(|| CoreError::KurirRequired {
            pickup_id: pickup.id.clone(),
        })?;

    let customer_rate = schedule.customer_rate(liters);

    let mut bills = vec![
        Bill {
            id: bill_id(BillType::Customer, &pickup.id),
            bill_type: BillType::Customer,
            customer_id: Some(pickup.customer_id.clone()),
            kurir_id: None,
            referrer_id: None,
            liters,
            rate: customer_rate,
            total: Rupiah::from_rupiah(customer_rate).for_liters(liters).amount(),
            pickup_id: pickup.id.clone(),
            payment_proof_url: None,
            paid: false,
            created_at: now,
        },
        Bill {
            id: bill_id(BillType::Kurir, &pickup.id),
            bill_type: BillType::Kurir,
            customer_id: None,
            kurir_id: Some(kurir_id.to_string()),
            referrer_id: None,
            liters,
            rate: schedule.kurir_rate,
            total: Rupiah::from_rupiah(schedule.kurir_rate)
                .for_liters(liters)
                .amount(),
            pickup_id: pickup.id.clone(),
            payment_proof_url: None,
            paid: false,
            created_at: now,
        },
    ];

    if let Some(referrer) = referred_by.filter(|r| !r.is_empty()) {
        bills.push(Bill {
            id: bill_id(BillType::Referral, &pickup.id),
            bill_type: BillType::Referral,
            customer_id: None,
            kurir_id: None,
            referrer_id: Some(referrer.to_string()),
            liters,
            rate: schedule.referral_rate,
            total: Rupiah::from_rupiah(schedule.referral_rate)
                .for_liters(liters)
                .amount(),
            pickup_id: pickup.id.clone(),
            payment_proof_url: None,
            paid: false,
            created_at: now,
        });
    }

    Ok(bills)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Customer;

    fn completed_pickup(actual_liters: Option<i64>) -> PickupRequest {
        let customer = Customer {
            id: "1".to_string(),
            name: "John Doe".to_string(),
            phone: "081234567890".to_string(),
            address: "Jl. Sudirman No. 123, Jakarta".to_string(),
            kecamatan: "Tanah Abang".to_string(),
            kota: "Jakarta".to_string(),
            bank_name: None,
            account_name: None,
            account_number: None,
            share_location: None,
            referred_by: None,
            downlines: Vec::new(),
            total_liters: 0,
            total_downline_liters: 0,
            created_at: Utc::now(),
        };

        let mut pickup = PickupRequest::new("p1".to_string(), &customer, 25, Utc::now());
        pickup.status = PickupStatus::Completed;
        pickup.actual_liters = actual_liters;
        pickup.kurir_id = Some("kurir1".to_string());
        pickup.kurir_name = Some("Ahmad Kurir".to_string());
        pickup.completed_at = Some(Utc::now());
        pickup
    }

    #[test]
    fn test_default_schedule_is_flat() {
        let schedule = RateSchedule::default();
        assert_eq!(schedule.customer_rate(1), 6000);
        assert_eq!(schedule.customer_rate(150), 6000);
        assert_eq!(schedule.customer_rate(999), 6000);
        assert_eq!(schedule.kurir_rate, 750);
        assert_eq!(schedule.referral_rate, 200);
    }

    #[test]
    fn test_tiered_rate_selection() {
        let schedule = RateSchedule::tiered(
            vec![
                RateTier {
                    min_liters: 200,
                    rate: 6500,
                },
                RateTier {
                    min_liters: 0,
                    rate: 6000,
                },
                RateTier {
                    min_liters: 100,
                    rate: 6250,
                },
            ],
            750,
            200,
        )
        .unwrap();

        // Sorted on construction, boundaries inclusive
        assert_eq!(schedule.customer_rate(1), 6000);
        assert_eq!(schedule.customer_rate(99), 6000);
        assert_eq!(schedule.customer_rate(100), 6250);
        assert_eq!(schedule.customer_rate(199), 6250);
        assert_eq!(schedule.customer_rate(200), 6500);
        assert_eq!(schedule.customer_rate(999), 6500);
    }

    #[test]
    fn test_schedule_rejects_bad_tiers() {
        assert!(RateSchedule::tiered(vec![], 750, 200).is_err());

        // Lowest tier must start at zero
        assert!(RateSchedule::tiered(
            vec![RateTier {
                min_liters: 100,
                rate: 6000
            }],
            750,
            200
        )
        .is_err());

        // Rates must be positive
        assert!(RateSchedule::flat(0, 750, 200).is_err());
        assert!(RateSchedule::flat(6000, -1, 200).is_err());
    }

    #[test]
    fn test_generate_bills_without_referrer() {
        let pickup = completed_pickup(Some(30));
        let bills = generate_bills(&pickup, None, &RateSchedule::default(), Utc::now()).unwrap();

        assert_eq!(bills.len(), 2);

        let customer_bill = &bills[0];
        assert_eq!(customer_bill.id, "customer-p1");
        assert_eq!(customer_bill.bill_type, BillType::Customer);
        assert_eq!(customer_bill.customer_id.as_deref(), Some("1"));
        assert_eq!(customer_bill.rate, 6000);
        assert_eq!(customer_bill.total, 180_000);
        assert!(!customer_bill.paid);

        let kurir_bill = &bills[1];
        assert_eq!(kurir_bill.id, "kurir-p1");
        assert_eq!(kurir_bill.kurir_id.as_deref(), Some("kurir1"));
        assert_eq!(kurir_bill.total, 22_500);
    }

    #[test]
    fn test_generate_bills_with_referrer() {
        let pickup = completed_pickup(Some(30));
        let bills =
            generate_bills(&pickup, Some("2"), &RateSchedule::default(), Utc::now()).unwrap();

        assert_eq!(bills.len(), 3);

        let referral_bill = &bills[2];
        assert_eq!(referral_bill.id, "referral-p1");
        assert_eq!(referral_bill.bill_type, BillType::Referral);
        assert_eq!(referral_bill.referrer_id.as_deref(), Some("2"));
        assert_eq!(referral_bill.rate, 200);
        assert_eq!(referral_bill.total, 6000);
    }

    #[test]
    fn test_generate_bills_empty_referrer_is_no_referrer() {
        let pickup = completed_pickup(Some(30));
        let bills =
            generate_bills(&pickup, Some(""), &RateSchedule::default(), Utc::now()).unwrap();
        assert_eq!(bills.len(), 2);
    }

    #[test]
    fn test_generate_bills_uses_tiered_customer_rate() {
        let schedule = RateSchedule::tiered(
            vec![
                RateTier {
                    min_liters: 0,
                    rate: 6000,
                },
                RateTier {
                    min_liters: 100,
                    rate: 6250,
                },
            ],
            750,
            200,
        )
        .unwrap();

        let pickup = completed_pickup(Some(120));
        let bills = generate_bills(&pickup, None, &schedule, Utc::now()).unwrap();

        assert_eq!(bills[0].rate, 6250);
        assert_eq!(bills[0].total, 120 * 6250);
        // Kurir fee stays flat regardless of tier
        assert_eq!(bills[1].rate, 750);
    }

    #[test]
    fn test_generate_bills_requires_completed_status() {
        let mut pickup = completed_pickup(Some(30));
        pickup.status = PickupStatus::OnProcess;

        let err =
            generate_bills(&pickup, None, &RateSchedule::default(), Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::PickupNotCompleted { .. }));
    }

    #[test]
    fn test_generate_bills_requires_actual_liters() {
        let pickup = completed_pickup(None);
        let err =
            generate_bills(&pickup, None, &RateSchedule::default(), Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::ActualLitersRequired { .. }));

        let pickup = completed_pickup(Some(0));
        let err =
            generate_bills(&pickup, None, &RateSchedule::default(), Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::ActualLitersRequired { .. }));
    }

    #[test]
    fn test_generate_bills_requires_kurir() {
        let mut pickup = completed_pickup(Some(30));
        pickup.kurir_id = None;

        let err =
            generate_bills(&pickup, None, &RateSchedule::default(), Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::KurirRequired { .. }));
    }
}
