//! # Domain Types
//!
//! Core domain types used throughout the Jemput Jelantah dashboard.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │  PickupRequest  │   │      Bill       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id (derived)   │       │
//! │  │  phone (login)  │   │  customer_id    │   │  bill_type      │       │
//! │  │  referred_by    │   │  status         │   │  liters × rate  │       │
//! │  │  downlines      │   │  kurir_id       │   │  paid           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    UserRole     │   │  PickupStatus   │   │    BillType     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Admin          │   │  Request        │   │  Customer       │       │
//! │  │  Customer       │   │  OnProcess      │   │  Kurir          │       │
//! │  │  Kurir          │   │  Completed      │   │  Referral       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `PickupRequest` carries `customer_name`/`customer_phone` frozen at
//! creation time, so pickup rows render without a registry join even if the
//! customer profile is edited later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// User Role
// =============================================================================

/// The three dashboard roles. Every session carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Back-office operator: full visibility, billing control.
    Admin,
    /// Oil supplier: requests pickups, receives customer payouts.
    Customer,
    /// Courier: collects oil, advances pickup status, earns fees.
    Kurir,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UserRole::Admin => "admin",
            UserRole::Customer => "customer",
            UserRole::Kurir => "kurir",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Identity
// =============================================================================

/// A logged-in identity, resolved from (phone, role) at login.
///
/// For the customer role this is a projection of the full [`Customer`]
/// record; admin and kurir identities come from the fixed login table.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub role: UserRole,
}

// =============================================================================
// Customer
// =============================================================================

/// An oil-supplying customer.
///
/// ## Referral Invariant
/// `downlines` must equal the set of customers whose `referred_by` points
/// here. The registry appends on registration; nothing ever re-validates or
/// rebuilds the list.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Phone number - doubles as the login key for the customer role.
    pub phone: String,

    /// Street address for pickups.
    pub address: String,

    /// Kecamatan (district).
    pub kecamatan: String,

    /// Kota (city).
    pub kota: String,

    /// Payout bank details, optional until the first payout.
    pub bank_name: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,

    /// Shared map link to the pickup location.
    pub share_location: Option<String>,

    /// Id of the customer who referred this one, if any.
    pub referred_by: Option<String>,

    /// Ids of customers directly referred by this one.
    pub downlines: Vec<String>,

    /// Cumulative liters from this customer's own completed pickups.
    pub total_liters: i64,

    /// Cumulative liters from direct downlines' completed pickups.
    pub total_downline_liters: i64,

    /// When the customer registered.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Whether this customer was referred by someone.
    #[inline]
    pub fn has_referrer(&self) -> bool {
        self.referred_by.as_deref().is_some_and(|r| !r.is_empty())
    }

    /// The login identity projection for this customer.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            role: UserRole::Customer,
        }
    }

    /// Case-insensitive name/phone substring match used by the admin
    /// customer search.
    pub fn matches_search(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query.to_lowercase()) || self.phone.contains(query)
    }
}

// =============================================================================
// Pickup Status
// =============================================================================

/// The status of a pickup request.
///
/// ## Lifecycle
/// Forward-only: `Request → OnProcess → Completed`. Skipping straight from
/// `Request` to `Completed` is allowed (the admin quick flow does this);
/// moving backwards never is. There is no cancel state - a request that is
/// never picked up simply stays at `Request`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum PickupStatus {
    /// Customer asked for a pickup; no courier yet.
    Request,
    /// A kurir has taken the pickup and is on the way.
    OnProcess,
    /// Oil collected, actual liters recorded, bills generated.
    Completed,
}

impl PickupStatus {
    /// Monotonic ordering rank. Transitions must strictly increase it.
    #[inline]
    pub const fn rank(&self) -> u8 {
        match self {
            PickupStatus::Request => 0,
            PickupStatus::OnProcess => 1,
            PickupStatus::Completed => 2,
        }
    }

    /// Whether a transition from `self` to `next` is allowed.
    #[inline]
    pub fn can_advance_to(&self, next: PickupStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl Default for PickupStatus {
    fn default() -> Self {
        PickupStatus::Request
    }
}

impl fmt::Display for PickupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PickupStatus::Request => "request",
            PickupStatus::OnProcess => "on-process",
            PickupStatus::Completed => "completed",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Pickup Request
// =============================================================================

/// A pickup request moving through the collection lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PickupRequest {
    pub id: String,

    /// Owning customer.
    pub customer_id: String,

    /// Customer name at creation (frozen).
    pub customer_name: String,

    /// Customer phone at creation (frozen).
    pub customer_phone: String,

    /// Liters the customer expects to hand over.
    pub estimated_liters: i64,

    /// Liters actually collected. Set only on completion.
    pub actual_liters: Option<i64>,

    pub status: PickupStatus,

    /// Courier assigned when the pickup is taken.
    pub kurir_id: Option<String>,
    pub kurir_name: Option<String>,

    /// Photo proof of the collection, uploaded after completion.
    pub pickup_proof_url: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Set on the transition to `Completed`.
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl PickupRequest {
    /// Creates a fresh request for a customer, snapshotting name and phone.
    pub fn new(id: String, customer: &Customer, estimated_liters: i64, now: DateTime<Utc>) -> Self {
        PickupRequest {
            id,
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            customer_phone: customer.phone.clone(),
            estimated_liters,
            actual_liters: None,
            status: PickupStatus::Request,
            kurir_id: None,
            kurir_name: None,
            pickup_proof_url: None,
            created_at: now,
            completed_at: None,
        }
    }

    /// An unclaimed request any kurir may take.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.status == PickupStatus::Request && self.kurir_id.is_none()
    }

    /// Whether the given kurir owns this pickup.
    #[inline]
    pub fn assigned_to(&self, kurir_id: &str) -> bool {
        self.kurir_id.as_deref() == Some(kurir_id)
    }
}

// =============================================================================
// Bill Type
// =============================================================================

/// Who a bill pays: the oil supplier, the courier, or the referrer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum BillType {
    /// Payout to the customer for the collected oil.
    Customer,
    /// Collection fee for the kurir.
    Kurir,
    /// Referral fee for the customer's referrer.
    Referral,
}

impl BillType {
    /// Stable id prefix, also used to derive deterministic bill ids.
    #[inline]
    pub const fn prefix(&self) -> &'static str {
        match self {
            BillType::Customer => "customer",
            BillType::Kurir => "kurir",
            BillType::Referral => "referral",
        }
    }
}

impl fmt::Display for BillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

// =============================================================================
// Bill
// =============================================================================

/// A payable record derived from one completed pickup.
///
/// Exactly one of `customer_id` / `kurir_id` / `referrer_id` is set,
/// matching `bill_type`. Ids are deterministic (`<type>-<pickup_id>`), so a
/// pickup can never be billed twice for the same party.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,

    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub bill_type: BillType,

    pub customer_id: Option<String>,
    pub kurir_id: Option<String>,
    pub referrer_id: Option<String>,

    /// Liters the bill is computed from (the pickup's actual liters).
    pub liters: i64,

    /// Rate in rupiah per liter applied at derivation time (frozen).
    pub rate: i64,

    /// liters × rate, in whole rupiah.
    pub total: i64,

    /// Originating pickup.
    pub pickup_id: String,

    /// Transfer receipt uploaded when the bill is settled.
    pub payment_proof_url: Option<String>,

    pub paid: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Bill {
    /// The id of whoever this bill pays, per `bill_type`.
    pub fn owner_id(&self) -> Option<&str> {
        match self.bill_type {
            BillType::Customer => self.customer_id.as_deref(),
            BillType::Kurir => self.kurir_id.as_deref(),
            BillType::Referral => self.referrer_id.as_deref(),
        }
    }

    /// The bill total as typed money.
    #[inline]
    pub fn total_rupiah(&self) -> crate::Rupiah {
        crate::Rupiah::from_rupiah(self.total)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
