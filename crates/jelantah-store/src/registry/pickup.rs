//! # Pickup Registry
//!
//! Keyed map of pickup requests, plus the status lifecycle enforcement.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Pickup Lifecycle                                  │
//! │                                                                         │
//! │  1. REQUEST                                                            │
//! │     └── insert() → PickupRequest { status: Request }                   │
//! │                                                                         │
//! │  2. ON-PROCESS                                                         │
//! │     └── assign() → kurir takes the pickup (kurir identity required)    │
//! │                                                                         │
//! │  3. COMPLETED                                                          │
//! │     └── complete() → actual liters recorded, completed_at stamped      │
//! │         (the Store layer rolls up totals and derives bills)            │
//! │                                                                         │
//! │  Forward-only: Request → Completed directly is fine (admin quick       │
//! │  flow); any backwards move is rejected with a typed error.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use jelantah_core::{CoreError, PickupRequest, PickupStatus};

use crate::error::{StoreError, StoreResult};

/// Per-status request counts for the admin pickup screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupStatusCounts {
    pub request: usize,
    pub on_process: usize,
    pub completed: usize,
}

/// Registry of pickup requests, keyed by id.
#[derive(Debug, Default)]
pub struct PickupRegistry {
    inner: RwLock<HashMap<String, PickupRequest>>,
}

impl PickupRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new pickup request.
    pub fn insert(&self, pickup: PickupRequest) -> StoreResult<()> {
        let mut map = self.inner.write().expect("pickup registry lock poisoned");

        if map.contains_key(&pickup.id) {
            return Err(StoreError::duplicate_id("Pickup", &pickup.id));
        }

        debug!(id = %pickup.id, customer = %pickup.customer_id, liters = pickup.estimated_liters, "Inserting pickup request");
        map.insert(pickup.id.clone(), pickup);
        Ok(())
    }

    /// Gets a pickup by id.
    pub fn get(&self, id: &str) -> Option<PickupRequest> {
        let map = self.inner.read().expect("pickup registry lock poisoned");
        map.get(id).cloned()
    }

    /// All pickups, newest first.
    pub fn list(&self) -> Vec<PickupRequest> {
        let map = self.inner.read().expect("pickup registry lock poisoned");
        let mut pickups: Vec<PickupRequest> = map.values().cloned().collect();
        pickups.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        pickups
    }

    /// Pickups in one status, newest first.
    pub fn list_by_status(&self, status: PickupStatus) -> Vec<PickupRequest> {
        self.list()
            .into_iter()
            .filter(|p| p.status == status)
            .collect()
    }

    /// One customer's pickup history, newest first.
    pub fn list_for_customer(&self, customer_id: &str) -> Vec<PickupRequest> {
        self.list()
            .into_iter()
            .filter(|p| p.customer_id == customer_id)
            .collect()
    }

    /// A kurir's worklist: their own pickups plus every unclaimed request.
    pub fn list_for_kurir(&self, kurir_id: &str) -> Vec<PickupRequest> {
        self.list()
            .into_iter()
            .filter(|p| p.assigned_to(kurir_id) || p.is_available())
            .collect()
    }

    /// Per-status counts over the whole registry.
    pub fn status_counts(&self) -> PickupStatusCounts {
        let map = self.inner.read().expect("pickup registry lock poisoned");
        let mut counts = PickupStatusCounts::default();
        for pickup in map.values() {
            match pickup.status {
                PickupStatus::Request => counts.request += 1,
                PickupStatus::OnProcess => counts.on_process += 1,
                PickupStatus::Completed => counts.completed += 1,
            }
        }
        counts
    }

    /// Total number of pickups.
    pub fn count(&self) -> usize {
        let map = self.inner.read().expect("pickup registry lock poisoned");
        map.len()
    }

    /// Moves a pickup to on-process under the given kurir.
    pub fn assign(
        &self,
        id: &str,
        kurir_id: &str,
        kurir_name: &str,
    ) -> StoreResult<PickupRequest> {
        let mut map = self.inner.write().expect("pickup registry lock poisoned");
        let pickup = map
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Pickup", id))?;

        if !pickup.status.can_advance_to(PickupStatus::OnProcess) {
            return Err(CoreError::InvalidStatusTransition {
                pickup_id: pickup.id.clone(),
                from: pickup.status,
                to: PickupStatus::OnProcess,
            }
            .into());
        }

        pickup.status = PickupStatus::OnProcess;
        pickup.kurir_id = Some(kurir_id.to_string());
        pickup.kurir_name = Some(kurir_name.to_string());

        debug!(id = %pickup.id, kurir = %kurir_id, "Pickup taken");
        Ok(pickup.clone())
    }

    /// Moves a pickup to completed with the collected liter count.
    ///
    /// A kurir identity passed here overrides the assigned one (the admin
    /// quick flow completes an unclaimed request and names the kurir in the
    /// same step). Completing with no kurir at all is an error.
    pub fn complete(
        &self,
        id: &str,
        kurir_id: Option<&str>,
        kurir_name: Option<&str>,
        actual_liters: i64,
        now: DateTime<Utc>,
    ) -> StoreResult<PickupRequest> {
        let mut map = self.inner.write().expect("pickup registry lock poisoned");
        let pickup = map
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Pickup", id))?;

        if !pickup.status.can_advance_to(PickupStatus::Completed) {
            return Err(CoreError::InvalidStatusTransition {
                pickup_id: pickup.id.clone(),
                from: pickup.status,
                to: PickupStatus::Completed,
            }
            .into());
        }

        if actual_liters <= 0 {
            return Err(CoreError::ActualLitersRequired {
                pickup_id: pickup.id.clone(),
            }
            .into());
        }

        if let Some(kurir_id) = kurir_id {
            pickup.kurir_id = Some(kurir_id.to_string());
            pickup.kurir_name = kurir_name.map(|n| n.to_string());
        }
        if pickup.kurir_id.is_none() {
            return Err(CoreError::KurirRequired {
                pickup_id: pickup.id.clone(),
            }
            .into());
        }

        pickup.status = PickupStatus::Completed;
        pickup.actual_liters = Some(actual_liters);
        pickup.completed_at = Some(now);

        debug!(id = %pickup.id, liters = actual_liters, "Pickup completed");
        Ok(pickup.clone())
    }

    /// Records the collection proof photo URL on a pickup.
    pub fn set_proof_url(&self, id: &str, url: &str) -> StoreResult<PickupRequest> {
        let mut map = self.inner.write().expect("pickup registry lock poisoned");
        let pickup = map
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Pickup", id))?;

        pickup.pickup_proof_url = Some(url.to_string());
        Ok(pickup.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jelantah_core::Customer;

    fn customer(id: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: format!("Customer {}", id),
            phone: format!("0812345678{:02}", id.parse::<u32>().unwrap_or(0)),
            address: "Jl. Test".to_string(),
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
        }
    }

    fn seeded_registry() -> PickupRegistry {
        let registry = PickupRegistry::new();
        let base = Utc::now();
        for (i, customer_id) in ["1", "2", "3"].iter().enumerate() {
            let pickup = PickupRequest::new(
                format!("p{}", i + 1),
                &customer(customer_id),
                25,
                base + Duration::seconds(i as i64),
            );
            registry.insert(pickup).unwrap();
        }
        registry
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let registry = seeded_registry();
        let dup = PickupRequest::new("p1".to_string(), &customer("1"), 10, Utc::now());
        assert!(matches!(
            registry.insert(dup).unwrap_err(),
            StoreError::DuplicateId { .. }
        ));
    }

    #[test]
    fn test_list_newest_first() {
        let registry = seeded_registry();
        let ids: Vec<String> = registry.list().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["p3", "p2", "p1"]);
    }

    #[test]
    fn test_assign_then_complete() {
        let registry = seeded_registry();

        let taken = registry.assign("p1", "kurir1", "Ahmad Kurir").unwrap();
        assert_eq!(taken.status, PickupStatus::OnProcess);
        assert_eq!(taken.kurir_id.as_deref(), Some("kurir1"));

        let done = registry
            .complete("p1", None, None, 30, Utc::now())
            .unwrap();
        assert_eq!(done.status, PickupStatus::Completed);
        assert_eq!(done.actual_liters, Some(30));
        assert!(done.completed_at.is_some());
        // Kurir from the assign step survives completion
        assert_eq!(done.kurir_name.as_deref(), Some("Ahmad Kurir"));
    }

    #[test]
    fn test_complete_straight_from_request() {
        let registry = seeded_registry();

        // Admin quick flow: complete an unclaimed request, naming the kurir
        let done = registry
            .complete("p2", Some("kurir1"), Some("Ahmad Kurir"), 15, Utc::now())
            .unwrap();
        assert_eq!(done.status, PickupStatus::Completed);
        assert_eq!(done.kurir_id.as_deref(), Some("kurir1"));
    }

    #[test]
    fn test_complete_requires_kurir_and_liters() {
        let registry = seeded_registry();

        let err = registry.complete("p1", None, None, 30, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::KurirRequired { .. })
        ));

        let err = registry
            .complete("p1", Some("kurir1"), Some("Ahmad Kurir"), 0, Utc::now())
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::ActualLitersRequired { .. })
        ));
    }

    #[test]
    fn test_no_backwards_transitions() {
        let registry = seeded_registry();
        registry
            .complete("p1", Some("kurir1"), Some("Ahmad Kurir"), 30, Utc::now())
            .unwrap();

        // Re-assignment and re-completion are both backwards now
        let err = registry.assign("p1", "kurir1", "Ahmad Kurir").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InvalidStatusTransition { .. })
        ));

        let err = registry
            .complete("p1", None, None, 10, Utc::now())
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InvalidStatusTransition { .. })
        ));
    }

    #[test]
    fn test_kurir_worklist_scoping() {
        let registry = seeded_registry();
        registry.assign("p1", "kurir1", "Ahmad Kurir").unwrap();
        registry.assign("p2", "kurir2", "Budi Kurir").unwrap();

        // kurir1 sees their own pickup and the unclaimed p3, not kurir2's
        let ids: Vec<String> = registry
            .list_for_kurir("kurir1")
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["p3", "p1"]);
    }

    #[test]
    fn test_status_counts() {
        let registry = seeded_registry();
        registry.assign("p1", "kurir1", "Ahmad Kurir").unwrap();
        registry
            .complete("p2", Some("kurir1"), Some("Ahmad Kurir"), 15, Utc::now())
            .unwrap();

        assert_eq!(
            registry.status_counts(),
            PickupStatusCounts {
                request: 1,
                on_process: 1,
                completed: 1,
            }
        );
    }

    #[test]
    fn test_set_proof_url() {
        let registry = seeded_registry();
        let updated = registry
            .set_proof_url("p1", "https://storage.example/pickup-proofs/p1.jpg")
            .unwrap();
        assert_eq!(
            updated.pickup_proof_url.as_deref(),
            Some("https://storage.example/pickup-proofs/p1.jpg")
        );
    }
}
