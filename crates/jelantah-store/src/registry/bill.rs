//! # Bill Registry
//!
//! Keyed map of derived bills and their payment flags.
//!
//! Bill ids are deterministic per pickup (`customer-<id>`, `kurir-<id>`,
//! `referral-<id>`), so the duplicate-id rejection here is what makes a
//! replayed derivation harmless: the second insert fails instead of
//! double-billing anyone.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use jelantah_core::{Bill, BillType};

use crate::error::{StoreError, StoreResult};

/// Per-type bill counts and rupiah totals for the billing screen and the
/// admin summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillTypeTotals {
    pub customer_count: usize,
    pub kurir_count: usize,
    pub referral_count: usize,
    pub customer_total: i64,
    pub kurir_total: i64,
    pub referral_total: i64,
}

impl BillTypeTotals {
    /// Net position: customer payouts minus kurir and referral fees.
    pub fn net(&self) -> i64 {
        self.customer_total - self.kurir_total - self.referral_total
    }
}

/// Registry of bills, keyed by id.
#[derive(Debug, Default)]
pub struct BillRegistry {
    inner: RwLock<HashMap<String, Bill>>,
}

impl BillRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one derivation's bills as a unit.
    ///
    /// Ids are checked before anything is written, so a duplicate anywhere
    /// in the batch leaves the registry untouched.
    pub fn insert_many(&self, bills: Vec<Bill>) -> StoreResult<()> {
        let mut map = self.inner.write().expect("bill registry lock poisoned");

        for bill in &bills {
            if map.contains_key(&bill.id) {
                return Err(StoreError::duplicate_id("Bill", &bill.id));
            }
        }

        for bill in bills {
            debug!(id = %bill.id, total = bill.total, "Inserting bill");
            map.insert(bill.id.clone(), bill);
        }
        Ok(())
    }

    /// Gets a bill by id.
    pub fn get(&self, id: &str) -> Option<Bill> {
        let map = self.inner.read().expect("bill registry lock poisoned");
        map.get(id).cloned()
    }

    /// All bills, newest first.
    pub fn list(&self) -> Vec<Bill> {
        let map = self.inner.read().expect("bill registry lock poisoned");
        let mut bills: Vec<Bill> = map.values().cloned().collect();
        bills.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        bills
    }

    /// Bills of one type, newest first.
    pub fn list_by_type(&self, bill_type: BillType) -> Vec<Bill> {
        self.list()
            .into_iter()
            .filter(|b| b.bill_type == bill_type)
            .collect()
    }

    /// A kurir's fee bills, newest first.
    pub fn list_for_kurir(&self, kurir_id: &str) -> Vec<Bill> {
        self.list()
            .into_iter()
            .filter(|b| b.kurir_id.as_deref() == Some(kurir_id))
            .collect()
    }

    /// A customer's bills: their payouts plus referral fees they earned.
    pub fn list_for_customer(&self, customer_id: &str) -> Vec<Bill> {
        self.list()
            .into_iter()
            .filter(|b| {
                b.customer_id.as_deref() == Some(customer_id)
                    || b.referrer_id.as_deref() == Some(customer_id)
            })
            .collect()
    }

    /// Marks a bill paid. Already-paid bills stay paid.
    pub fn mark_paid(&self, id: &str) -> StoreResult<Bill> {
        let mut map = self.inner.write().expect("bill registry lock poisoned");
        let bill = map
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Bill", id))?;

        bill.paid = true;
        debug!(id = %bill.id, "Bill marked paid");
        Ok(bill.clone())
    }

    /// Records the transfer receipt URL on a bill.
    pub fn set_payment_proof(&self, id: &str, url: &str) -> StoreResult<Bill> {
        let mut map = self.inner.write().expect("bill registry lock poisoned");
        let bill = map
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Bill", id))?;

        bill.payment_proof_url = Some(url.to_string());
        Ok(bill.clone())
    }

    /// Per-type counts and totals over the whole registry.
    pub fn type_totals(&self) -> BillTypeTotals {
        let map = self.inner.read().expect("bill registry lock poisoned");
        let mut totals = BillTypeTotals::default();
        for bill in map.values() {
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

    /// Total number of bills.
    pub fn count(&self) -> usize {
        let map = self.inner.read().expect("bill registry lock poisoned");
        map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn bill(id: &str, bill_type: BillType, total: i64, offset_secs: i64) -> Bill {
        Bill {
            id: id.to_string(),
            bill_type,
            customer_id: matches!(bill_type, BillType::Customer).then(|| "1".to_string()),
            kurir_id: matches!(bill_type, BillType::Kurir).then(|| "kurir1".to_string()),
            referrer_id: matches!(bill_type, BillType::Referral).then(|| "2".to_string()),
            liters: 30,
            rate: total / 30,
            total,
            pickup_id: "p1".to_string(),
            payment_proof_url: None,
            paid: false,
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn test_insert_many_is_all_or_nothing() {
        let registry = BillRegistry::new();
        registry
            .insert_many(vec![bill("customer-p1", BillType::Customer, 180_000, 0)])
            .unwrap();

        // Batch with one colliding id writes nothing
        let err = registry
            .insert_many(vec![
                bill("kurir-p1", BillType::Kurir, 22_500, 1),
                bill("customer-p1", BillType::Customer, 180_000, 1),
            ])
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { .. }));
        assert_eq!(registry.count(), 1);
        assert!(registry.get("kurir-p1").is_none());
    }

    #[test]
    fn test_type_and_owner_filters() {
        let registry = BillRegistry::new();
        registry
            .insert_many(vec![
                bill("customer-p1", BillType::Customer, 180_000, 0),
                bill("kurir-p1", BillType::Kurir, 22_500, 1),
                bill("referral-p1", BillType::Referral, 6000, 2),
            ])
            .unwrap();

        assert_eq!(registry.list_by_type(BillType::Kurir).len(), 1);
        assert_eq!(registry.list_for_kurir("kurir1").len(), 1);
        assert_eq!(registry.list_for_kurir("kurir9").len(), 0);

        // Customer "2" referred customer "1", so they see the referral fee
        let for_referrer = registry.list_for_customer("2");
        assert_eq!(for_referrer.len(), 1);
        assert_eq!(for_referrer[0].bill_type, BillType::Referral);
    }

    #[test]
    fn test_mark_paid() {
        let registry = BillRegistry::new();
        registry
            .insert_many(vec![bill("customer-p1", BillType::Customer, 180_000, 0)])
            .unwrap();

        let paid = registry.mark_paid("customer-p1").unwrap();
        assert!(paid.paid);

        // Idempotent
        let paid = registry.mark_paid("customer-p1").unwrap();
        assert!(paid.paid);

        assert!(registry.mark_paid("missing").is_err());
    }

    #[test]
    fn test_type_totals() {
        let registry = BillRegistry::new();
        registry
            .insert_many(vec![
                bill("customer-p1", BillType::Customer, 180_000, 0),
                bill("kurir-p1", BillType::Kurir, 22_500, 1),
                bill("referral-p1", BillType::Referral, 6000, 2),
            ])
            .unwrap();

        let totals = registry.type_totals();
        assert_eq!(totals.customer_count, 1);
        assert_eq!(totals.customer_total, 180_000);
        assert_eq!(totals.kurir_total, 22_500);
        assert_eq!(totals.referral_total, 6000);
        assert_eq!(totals.net(), 151_500);
    }
}
