//! # Demo Seed Data
//!
//! Populates a fresh store with the walkthrough dataset the dashboard demos
//! ship with: three customers on one referral edge and one pickup in each
//! lifecycle stage.
//!
//! Bills start empty on purpose - they only ever exist as derivations of
//! completions that happen while the process is running.

use chrono::{TimeZone, Utc};
use tracing::info;

use jelantah_core::{Customer, PickupRequest, PickupStatus};

use crate::error::StoreResult;
use crate::Store;

/// Seeds the demo dataset into an empty store.
///
/// A store that already has customers is left untouched, so calling this on
/// every startup is safe.
pub fn seed_demo(store: &Store) -> StoreResult<()> {
    if store.customers().count() > 0 {
        info!("Store already populated, skipping demo seed");
        return Ok(());
    }

    let date = |y: i32, m: u32, d: u32| {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
            .single()
            .expect("valid seed date")
    };

    let customers = [
        Customer {
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
            downlines: vec!["2".to_string(), "3".to_string()],
            total_liters: 150,
            total_downline_liters: 80,
            created_at: date(2024, 1, 15),
        },
        Customer {
            id: "2".to_string(),
            name: "Jane Smith".to_string(),
            phone: "081234567891".to_string(),
            address: "Jl. Thamrin No. 456, Jakarta".to_string(),
            kecamatan: "Menteng".to_string(),
            kota: "Jakarta".to_string(),
            bank_name: None,
            account_name: None,
            account_number: None,
            share_location: None,
            referred_by: Some("1".to_string()),
            downlines: Vec::new(),
            total_liters: 45,
            total_downline_liters: 0,
            created_at: date(2024, 1, 20),
        },
        Customer {
            id: "3".to_string(),
            name: "Bob Wilson".to_string(),
            phone: "081234567892".to_string(),
            address: "Jl. Gatot Subroto No. 789, Jakarta".to_string(),
            kecamatan: "Setiabudi".to_string(),
            kota: "Jakarta".to_string(),
            bank_name: None,
            account_name: None,
            account_number: None,
            share_location: None,
            referred_by: Some("1".to_string()),
            downlines: Vec::new(),
            total_liters: 35,
            total_downline_liters: 0,
            created_at: date(2024, 1, 25),
        },
    ];

    for customer in customers {
        store.customers().insert(customer)?;
    }

    let pickups = [
        PickupRequest {
            id: "1".to_string(),
            customer_id: "1".to_string(),
            customer_name: "John Doe".to_string(),
            customer_phone: "081234567890".to_string(),
            estimated_liters: 25,
            actual_liters: Some(30),
            status: PickupStatus::Completed,
            kurir_id: Some("kurir1".to_string()),
            kurir_name: Some("Ahmad Kurir".to_string()),
            pickup_proof_url: None,
            created_at: date(2024, 1, 30),
            completed_at: Some(date(2024, 1, 31)),
        },
        PickupRequest {
            id: "2".to_string(),
            customer_id: "2".to_string(),
            customer_name: "Jane Smith".to_string(),
            customer_phone: "081234567891".to_string(),
            estimated_liters: 15,
            actual_liters: None,
            status: PickupStatus::OnProcess,
            kurir_id: Some("kurir1".to_string()),
            kurir_name: Some("Ahmad Kurir".to_string()),
            pickup_proof_url: None,
            created_at: date(2024, 2, 1),
            completed_at: None,
        },
        PickupRequest {
            id: "3".to_string(),
            customer_id: "3".to_string(),
            customer_name: "Bob Wilson".to_string(),
            customer_phone: "081234567892".to_string(),
            estimated_liters: 20,
            actual_liters: None,
            status: PickupStatus::Request,
            kurir_id: None,
            kurir_name: None,
            pickup_proof_url: None,
            created_at: date(2024, 2, 2),
            completed_at: None,
        },
    ];

    for pickup in pickups {
        store.pickups().insert(pickup)?;
    }

    info!(
        customers = store.customers().count(),
        pickups = store.pickups().count(),
        "Demo seed loaded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_demo() {
        let store = Store::default();
        seed_demo(&store).unwrap();

        assert_eq!(store.customers().count(), 3);
        assert_eq!(store.pickups().count(), 3);
        assert_eq!(store.bills().count(), 0);

        // The referral edge matches on both sides
        let john = store.customers().get("1").unwrap();
        assert_eq!(john.downlines, vec!["2".to_string(), "3".to_string()]);
        assert_eq!(
            store.customers().get("2").unwrap().referred_by.as_deref(),
            Some("1")
        );

        // One pickup per lifecycle stage
        let counts = store.pickups().status_counts();
        assert_eq!(counts.request, 1);
        assert_eq!(counts.on_process, 1);
        assert_eq!(counts.completed, 1);
    }

    #[test]
    fn test_seed_demo_is_idempotent() {
        let store = Store::default();
        seed_demo(&store).unwrap();
        seed_demo(&store).unwrap();

        assert_eq!(store.customers().count(), 3);
        assert_eq!(store.pickups().count(), 3);
    }

    #[test]
    fn test_seeded_pickup_can_complete() {
        let store = Store::default();
        seed_demo(&store).unwrap();

        // Bob's open request goes through the whole flow
        let outcome = store
            .complete_pickup("3", Some("kurir1"), Some("Ahmad Kurir"), 20)
            .unwrap();

        // Bob was referred by John: three bills
        assert_eq!(outcome.bills.len(), 3);
        assert_eq!(store.customers().get("3").unwrap().total_liters, 55);
        assert_eq!(
            store.customers().get("1").unwrap().total_downline_liters,
            100
        );
    }
}
