//! # Registry Module
//!
//! In-memory registry implementations for the dashboard state.
//!
//! ## Registry Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Registry Pattern Explained                           │
//! │                                                                         │
//! │  Each record type lives in its own keyed map behind a RwLock.          │
//! │                                                                         │
//! │  HTTP Handler                                                          │
//! │       │                                                                 │
//! │       │  store.customers().search("john")                               │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  CustomerRegistry                                                      │
//! │  ├── insert(&self, customer)                                           │
//! │  ├── get(&self, id)                                                    │
//! │  ├── find_by_phone(&self, phone)                                       │
//! │  └── update(&self, id, mutate)                                         │
//! │       │                                                                 │
//! │       │  RwLock<HashMap<String, Customer>>                              │
//! │       ▼                                                                 │
//! │  Process memory (nothing is persisted)                                 │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Locks are held per operation, never across await points             │
//! │  • Reads hand out clones, so no lock escapes the registry              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Registries
//!
//! - [`CustomerRegistry`] - Customer profiles, referral edges, liter totals
//! - [`PickupRegistry`] - Pickup requests and their status lifecycle
//! - [`BillRegistry`] - Derived bills and payment flags

pub mod bill;
pub mod customer;
pub mod pickup;

pub use bill::{BillRegistry, BillTypeTotals};
pub use customer::CustomerRegistry;
pub use pickup::{PickupRegistry, PickupStatusCounts};
