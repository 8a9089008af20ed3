//! # Customer Registry
//!
//! Keyed map of customer profiles, plus the referral bookkeeping.
//!
//! ## Referral Bookkeeping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  register("Jane", referred_by: "1")                                     │
//! │       │                                                                 │
//! │       ├── insert Jane                                                   │
//! │       │                                                                 │
//! │       └── append_downline("1", jane_id)                                 │
//! │              │                                                          │
//! │              └── customer "1".downlines += [jane_id]                    │
//! │                                                                         │
//! │  Single level, append-only. Nothing walks the graph and nothing        │
//! │  re-validates the edge list afterwards.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use jelantah_core::Customer;

use crate::error::{StoreError, StoreResult};

/// Registry of customer records, keyed by id.
#[derive(Debug, Default)]
pub struct CustomerRegistry {
    inner: RwLock<HashMap<String, Customer>>,
}

impl CustomerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new customer.
    ///
    /// Rejects duplicate ids and duplicate phone numbers - the phone is the
    /// customer login key and must stay unique.
    pub fn insert(&self, customer: Customer) -> StoreResult<()> {
        let mut map = self.inner.write().expect("customer registry lock poisoned");

        if map.contains_key(&customer.id) {
            return Err(StoreError::duplicate_id("Customer", &customer.id));
        }

        if map.values().any(|c| c.phone == customer.phone) {
            return Err(StoreError::DuplicatePhone {
                phone: customer.phone.clone(),
            });
        }

        debug!(id = %customer.id, name = %customer.name, "Inserting customer");
        map.insert(customer.id.clone(), customer);
        Ok(())
    }

    /// Gets a customer by id.
    pub fn get(&self, id: &str) -> Option<Customer> {
        let map = self.inner.read().expect("customer registry lock poisoned");
        map.get(id).cloned()
    }

    /// Finds a customer by phone number (the customer login lookup).
    pub fn find_by_phone(&self, phone: &str) -> Option<Customer> {
        let map = self.inner.read().expect("customer registry lock poisoned");
        map.values().find(|c| c.phone == phone).cloned()
    }

    /// Applies a mutation to one customer and returns the updated record.
    pub fn update<F>(&self, id: &str, mutate: F) -> StoreResult<Customer>
    where
        F: FnOnce(&mut Customer),
    {
        let mut map = self.inner.write().expect("customer registry lock poisoned");
        let customer = map
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Customer", id))?;

        mutate(customer);
        Ok(customer.clone())
    }

    /// Appends a new downline id to a referrer's edge list.
    ///
    /// Returns `false` (and changes nothing) when the referrer id does not
    /// resolve - the `referred_by` field on the new customer is kept as
    /// submitted either way.
    pub fn append_downline(&self, referrer_id: &str, customer_id: &str) -> bool {
        let mut map = self.inner.write().expect("customer registry lock poisoned");
        match map.get_mut(referrer_id) {
            Some(referrer) => {
                referrer.downlines.push(customer_id.to_string());
                debug!(referrer = %referrer_id, downline = %customer_id, "Downline appended");
                true
            }
            None => false,
        }
    }

    /// All customers in registration order (oldest first).
    pub fn list(&self) -> Vec<Customer> {
        let map = self.inner.read().expect("customer registry lock poisoned");
        let mut customers: Vec<Customer> = map.values().cloned().collect();
        customers.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        customers
    }

    /// Name/phone substring search over the full list.
    pub fn search(&self, query: &str) -> Vec<Customer> {
        self.list()
            .into_iter()
            .filter(|c| c.matches_search(query))
            .collect()
    }

    /// Number of registered customers.
    pub fn count(&self) -> usize {
        let map = self.inner.read().expect("customer registry lock poisoned");
        map.len()
    }

    /// Sum of every customer's own collected liters.
    pub fn total_liters_collected(&self) -> i64 {
        let map = self.inner.read().expect("customer registry lock poisoned");
        map.values().map(|c| c.total_liters).sum()
    }
}
