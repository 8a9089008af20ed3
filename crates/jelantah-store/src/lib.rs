//! # jelantah-store: In-Memory State for Jemput Jelantah
//!
//! This crate owns the dashboard's shared state. All three collections live
//! in process memory; nothing is persisted and nothing survives a restart.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Jemput Jelantah Data Flow                             │
//! │                                                                         │
//! │  HTTP Handler (complete_pickup)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  jelantah-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │     Store     │    │  Registries   │    │     Seed     │  │   │
//! │  │   │   (lib.rs)    │    │ (customer.rs) │    │  (demo data) │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ cross-registry│◄───│ RwLock maps   │    │ 3 customers  │  │   │
//! │  │   │ flows         │    │ per type      │    │ 3 pickups    │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  jelantah-core (billing derivation, lifecycle rules)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`registry`] - One registry per record type (customer, pickup, bill)
//! - [`error`] - Store error types
//! - [`seed`] - Demo dataset matching the dashboard walkthrough
//!
//! ## Usage
//!
//! ```rust
//! use jelantah_store::{NewCustomer, Store};
//!
//! let store = Store::default();
//!
//! let customer = store
//!     .register_customer(NewCustomer {
//!         name: "John Doe".to_string(),
//!         phone: "081234567890".to_string(),
//!         address: "Jl. Sudirman No. 123, Jakarta".to_string(),
//!         ..NewCustomer::default()
//!     })
//!     .unwrap();
//!
//! let pickup = store.create_pickup(&customer.id, 25).unwrap();
//! let outcome = store
//!     .complete_pickup(&pickup.id, Some("kurir1"), Some("Ahmad Kurir"), 30)
//!     .unwrap();
//! assert_eq!(outcome.bills.len(), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod registry;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};

// Registry re-exports for convenience
pub use registry::bill::{BillRegistry, BillTypeTotals};
pub use registry::customer::CustomerRegistry;
pub use registry::pickup::{PickupRegistry, PickupStatusCounts};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use jelantah_core::billing::generate_bills;
use jelantah_core::validation::{
    validate_address, validate_entity_id, validate_liters, validate_name, validate_phone,
};
use jelantah_core::{Bill, Customer, PickupRequest, RateSchedule};

// =============================================================================
// Request Payloads
// =============================================================================

/// Payload for registering a customer.
///
/// Mirrors the admin "quick pickup" registration form; optional fields stay
/// unset until the customer fills them in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub kecamatan: String,
    pub kota: String,
    pub bank_name: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub share_location: Option<String>,
    pub referred_by: Option<String>,
}

/// Partial profile update. Only provided fields change.
///
/// Referral edges and liter totals are system-maintained and not editable
/// through this path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub kecamatan: Option<String>,
    pub kota: Option<String>,
    pub bank_name: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub share_location: Option<String>,
}

/// What one pickup completion produced: the final pickup record and the
/// bills derived from it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    pub pickup: PickupRequest,
    pub bills: Vec<Bill>,
}

// =============================================================================
// Store
// =============================================================================

/// The shared dashboard state: three registries plus the rate schedule used
/// when pickups complete.
///
/// ## Thread Safety
/// Each registry guards its own map with a `RwLock`; cross-registry flows
/// take the locks one at a time and never hold one across another call.
/// That gives per-operation atomicity per registry - the strongest
/// guarantee this single-process dashboard needs.
#[derive(Debug, Default)]
pub struct Store {
    customers: CustomerRegistry,
    pickups: PickupRegistry,
    bills: BillRegistry,
    schedule: RateSchedule,
}

impl Store {
    /// Creates an empty store priced by the given schedule.
    pub fn new(schedule: RateSchedule) -> Self {
        Store {
            customers: CustomerRegistry::new(),
            pickups: PickupRegistry::new(),
            bills: BillRegistry::new(),
            schedule,
        }
    }

    /// The customer registry.
    pub fn customers(&self) -> &CustomerRegistry {
        &self.customers
    }

    /// The pickup registry.
    pub fn pickups(&self) -> &PickupRegistry {
        &self.pickups
    }

    /// The bill registry.
    pub fn bills(&self) -> &BillRegistry {
        &self.bills
    }

    /// The rate schedule bills derive from.
    pub fn schedule(&self) -> &RateSchedule {
        &self.schedule
    }

    // =========================================================================
    // Cross-Registry Flows
    // =========================================================================

    /// Registers a customer and wires the referral edge.
    ///
    /// ## Flow
    /// 1. Validate name / phone / address
    /// 2. Insert (duplicate phone rejected - it is the login key)
    /// 3. If referred: append the new id to the referrer's downlines
    ///
    /// A `referred_by` that resolves to nobody is kept as submitted but
    /// wires no edge, matching how the dashboard has always behaved.
    pub fn register_customer(&self, new: NewCustomer) -> StoreResult<Customer> {
        validate_name(&new.name).map_err(jelantah_core::CoreError::from)?;
        validate_phone(&new.phone).map_err(jelantah_core::CoreError::from)?;
        validate_address(&new.address).map_err(jelantah_core::CoreError::from)?;

        let referred_by = new.referred_by.filter(|r| !r.is_empty());
        if let Some(referrer_id) = referred_by.as_deref() {
            validate_entity_id(referrer_id).map_err(jelantah_core::CoreError::from)?;
        }

        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            phone: new.phone.trim().to_string(),
            address: new.address.trim().to_string(),
            kecamatan: new.kecamatan.trim().to_string(),
            kota: new.kota.trim().to_string(),
            bank_name: new.bank_name,
            account_name: new.account_name,
            account_number: new.account_number,
            share_location: new.share_location,
            referred_by: referred_by.clone(),
            downlines: Vec::new(),
            total_liters: 0,
            total_downline_liters: 0,
            created_at: Utc::now(),
        };

        self.customers.insert(customer.clone())?;

        if let Some(referrer_id) = referred_by {
            if !self.customers.append_downline(&referrer_id, &customer.id) {
                warn!(referrer = %referrer_id, customer = %customer.id, "Referrer not found, downline edge not wired");
            }
        }

        info!(id = %customer.id, name = %customer.name, "Customer registered");
        Ok(customer)
    }

    /// Applies a partial profile update.
    pub fn update_customer(&self, id: &str, update: CustomerUpdate) -> StoreResult<Customer> {
        if let Some(name) = &update.name {
            validate_name(name).map_err(jelantah_core::CoreError::from)?;
        }
        if let Some(address) = &update.address {
            validate_address(address).map_err(jelantah_core::CoreError::from)?;
        }
        if let Some(phone) = &update.phone {
            validate_phone(phone).map_err(jelantah_core::CoreError::from)?;
            // The phone is the login key; keep it unique across customers
            if let Some(existing) = self.customers.find_by_phone(phone) {
                if existing.id != id {
                    return Err(StoreError::DuplicatePhone {
                        phone: phone.clone(),
                    });
                }
            }
        }

        let updated = self.customers.update(id, |customer| {
            if let Some(name) = update.name {
                customer.name = name.trim().to_string();
            }
            if let Some(phone) = update.phone {
                customer.phone = phone.trim().to_string();
            }
            if let Some(address) = update.address {
                customer.address = address.trim().to_string();
            }
            if let Some(kecamatan) = update.kecamatan {
                customer.kecamatan = kecamatan.trim().to_string();
            }
            if let Some(kota) = update.kota {
                customer.kota = kota.trim().to_string();
            }
            if let Some(bank_name) = update.bank_name {
                customer.bank_name = Some(bank_name);
            }
            if let Some(account_name) = update.account_name {
                customer.account_name = Some(account_name);
            }
            if let Some(account_number) = update.account_number {
                customer.account_number = Some(account_number);
            }
            if let Some(share_location) = update.share_location {
                customer.share_location = Some(share_location);
            }
        })?;

        info!(id = %updated.id, "Customer updated");
        Ok(updated)
    }

    /// Creates a pickup request for a customer.
    pub fn create_pickup(
        &self,
        customer_id: &str,
        estimated_liters: i64,
    ) -> StoreResult<PickupRequest> {
        validate_entity_id(customer_id).map_err(jelantah_core::CoreError::from)?;
        validate_liters(estimated_liters).map_err(jelantah_core::CoreError::from)?;

        let customer = self
            .customers
            .get(customer_id)
            .ok_or_else(|| StoreError::not_found("Customer", customer_id))?;

        let pickup = PickupRequest::new(
            Uuid::new_v4().to_string(),
            &customer,
            estimated_liters,
            Utc::now(),
        );

        self.pickups.insert(pickup.clone())?;
        info!(id = %pickup.id, customer = %customer_id, liters = estimated_liters, "Pickup requested");
        Ok(pickup)
    }

    /// A kurir (or the admin, on a kurir's behalf) takes a pickup.
    pub fn assign_pickup(
        &self,
        pickup_id: &str,
        kurir_id: &str,
        kurir_name: &str,
    ) -> StoreResult<PickupRequest> {
        let pickup = self.pickups.assign(pickup_id, kurir_id, kurir_name)?;
        info!(id = %pickup.id, kurir = %kurir_id, "Pickup assigned");
        Ok(pickup)
    }

    /// Completes a pickup: the one flow that touches every registry.
    ///
    /// ## Flow
    /// ```text
    /// complete_pickup(id, kurir, 30L)
    ///     │
    ///     ├── 1. pickup registry: status → Completed, liters + stamp
    ///     │
    ///     ├── 2. customer registry: owner.total_liters += 30
    ///     │
    ///     ├── 3. customer registry: referrer.total_downline_liters += 30
    ///     │       (only when the owner was referred)
    ///     │
    ///     └── 4. bill registry: insert the 2-3 derived bills
    /// ```
    ///
    /// Step 1's forward-only transition makes the flow single-shot: a second
    /// completion fails before any roll-up or bill is touched.
    pub fn complete_pickup(
        &self,
        pickup_id: &str,
        kurir_id: Option<&str>,
        kurir_name: Option<&str>,
        actual_liters: i64,
    ) -> StoreResult<CompletionOutcome> {
        validate_liters(actual_liters).map_err(jelantah_core::CoreError::from)?;

        let now = Utc::now();
        let pickup = self
            .pickups
            .complete(pickup_id, kurir_id, kurir_name, actual_liters, now)?;

        // Roll up liters onto the owning customer and their referrer.
        let referred_by = match self.customers.get(&pickup.customer_id) {
            Some(customer) => {
                self.customers
                    .update(&customer.id, |c| c.total_liters += actual_liters)?;
                customer.referred_by.filter(|r| !r.is_empty())
            }
            None => {
                warn!(pickup = %pickup.id, customer = %pickup.customer_id, "Completed pickup has no customer record");
                None
            }
        };

        if let Some(referrer_id) = referred_by.as_deref() {
            if self
                .customers
                .update(referrer_id, |c| c.total_downline_liters += actual_liters)
                .is_err()
            {
                warn!(referrer = %referrer_id, "Referrer record missing, downline liters not rolled up");
            }
        }

        let bills = generate_bills(&pickup, referred_by.as_deref(), &self.schedule, now)?;
        self.bills.insert_many(bills.clone())?;

        info!(
            id = %pickup.id,
            liters = actual_liters,
            bills = bills.len(),
            "Pickup completed and billed"
        );

        Ok(CompletionOutcome { pickup, bills })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use jelantah_core::{BillType, PickupStatus};

    fn new_customer(name: &str, phone: &str, referred_by: Option<&str>) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            phone: phone.to_string(),
            address: "Jl. Sudirman No. 123, Jakarta".to_string(),
            kecamatan: "Tanah Abang".to_string(),
            kota: "Jakarta".to_string(),
            referred_by: referred_by.map(|r| r.to_string()),
            ..NewCustomer::default()
        }
    }

    #[test]
    fn test_register_customer_wires_downline() {
        let store = Store::default();
        let john = store
            .register_customer(new_customer("John Doe", "081234567890", None))
            .unwrap();
        let jane = store
            .register_customer(new_customer("Jane Smith", "081234567891", Some(&john.id)))
            .unwrap();

        assert_eq!(jane.referred_by.as_deref(), Some(john.id.as_str()));
        assert_eq!(
            store.customers().get(&john.id).unwrap().downlines,
            vec![jane.id]
        );
    }

    #[test]
    fn test_register_customer_rejects_duplicate_phone() {
        let store = Store::default();
        store
            .register_customer(new_customer("John Doe", "081234567890", None))
            .unwrap();

        let err = store
            .register_customer(new_customer("Imposter", "081234567890", None))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicatePhone { .. }));
    }

    #[test]
    fn test_register_customer_ghost_referrer_keeps_edge_unwired() {
        let store = Store::default();
        let jane = store
            .register_customer(new_customer("Jane Smith", "081234567891", Some("ghost")))
            .unwrap();

        // The submitted edge survives; no downline list was touched
        assert_eq!(jane.referred_by.as_deref(), Some("ghost"));
    }

    #[test]
    fn test_create_pickup_requires_customer() {
        let store = Store::default();
        let err = store.create_pickup("missing", 25).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_complete_pickup_full_flow() {
        let store = Store::default();
        let john = store
            .register_customer(new_customer("John Doe", "081234567890", None))
            .unwrap();
        let jane = store
            .register_customer(new_customer("Jane Smith", "081234567891", Some(&john.id)))
            .unwrap();

        let pickup = store.create_pickup(&jane.id, 25).unwrap();
        store
            .assign_pickup(&pickup.id, "kurir1", "Ahmad Kurir")
            .unwrap();

        let outcome = store
            .complete_pickup(&pickup.id, None, None, 30)
            .unwrap();

        assert_eq!(outcome.pickup.status, PickupStatus::Completed);
        assert_eq!(outcome.pickup.actual_liters, Some(30));

        // Jane was referred by John: customer + kurir + referral bills
        assert_eq!(outcome.bills.len(), 3);
        assert_eq!(outcome.bills[0].bill_type, BillType::Customer);
        assert_eq!(outcome.bills[0].total, 180_000);
        assert_eq!(outcome.bills[2].referrer_id.as_deref(), Some(john.id.as_str()));

        // Liter roll-ups landed on both sides of the referral edge
        assert_eq!(store.customers().get(&jane.id).unwrap().total_liters, 30);
        assert_eq!(
            store.customers().get(&john.id).unwrap().total_downline_liters,
            30
        );

        // And the registry kept all three bills
        assert_eq!(store.bills().count(), 3);
    }

    #[test]
    fn test_complete_pickup_without_referrer_makes_two_bills() {
        let store = Store::default();
        let john = store
            .register_customer(new_customer("John Doe", "081234567890", None))
            .unwrap();
        let pickup = store.create_pickup(&john.id, 25).unwrap();

        let outcome = store
            .complete_pickup(&pickup.id, Some("kurir1"), Some("Ahmad Kurir"), 20)
            .unwrap();

        assert_eq!(outcome.bills.len(), 2);
        assert_eq!(store.customers().get(&john.id).unwrap().total_liters, 20);
    }

    #[test]
    fn test_complete_pickup_is_single_shot() {
        let store = Store::default();
        let john = store
            .register_customer(new_customer("John Doe", "081234567890", None))
            .unwrap();
        let pickup = store.create_pickup(&john.id, 25).unwrap();

        store
            .complete_pickup(&pickup.id, Some("kurir1"), Some("Ahmad Kurir"), 30)
            .unwrap();

        // Replaying the completion fails on the status machine, before any
        // totals or bills are touched
        let err = store
            .complete_pickup(&pickup.id, Some("kurir1"), Some("Ahmad Kurir"), 30)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(jelantah_core::CoreError::InvalidStatusTransition { .. })
        ));

        assert_eq!(store.bills().count(), 2);
        assert_eq!(store.customers().get(&john.id).unwrap().total_liters, 30);
    }

    #[test]
    fn test_update_customer_guards_phone_uniqueness() {
        let store = Store::default();
        let john = store
            .register_customer(new_customer("John Doe", "081234567890", None))
            .unwrap();
        let jane = store
            .register_customer(new_customer("Jane Smith", "081234567891", None))
            .unwrap();

        let err = store
            .update_customer(
                &jane.id,
                CustomerUpdate {
                    phone: Some(john.phone.clone()),
                    ..CustomerUpdate::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicatePhone { .. }));

        // Re-submitting your own phone is fine
        let updated = store
            .update_customer(
                &jane.id,
                CustomerUpdate {
                    phone: Some(jane.phone.clone()),
                    bank_name: Some("BCA".to_string()),
                    ..CustomerUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.bank_name.as_deref(), Some("BCA"));
    }
}
