//! # jelantah-core: Pure Business Logic for Jemput Jelantah
//!
//! This crate is the **heart** of the Jemput Jelantah dashboard. It contains
//! all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Jemput Jelantah Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Dashboard Frontend (React)                     │   │
//! │  │    Login ──► Admin Screens ──► Kurir Screens ──► Customer      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP/JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    jelantah-server (axum)                       │   │
//! │  │    login, customers, pickups, bills, summary, upload            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ jelantah-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  billing  │  │ validation│  │   │
//! │  │   │ Customer  │  │  Rupiah   │  │RateSched. │  │   rules   │  │   │
//! │  │   │  Pickup   │  │           │  │ derive    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO SHARED STATE • NO NETWORK • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 jelantah-store (State Layer)                    │   │
//! │  │         Customer / Pickup / Bill registries (in-memory)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, PickupRequest, Bill, roles)
//! - [`money`] - Rupiah type with integer arithmetic (no floating point!)
//! - [`billing`] - Rate schedule and bill derivation on pickup completion
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Registry access, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are whole rupiah (i64), never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use jelantah_core::billing::RateSchedule;
//! use jelantah_core::money::Rupiah;
//!
//! let schedule = RateSchedule::default();
//!
//! // Flat default rate: Rp6.000 per liter for customers
//! assert_eq!(schedule.customer_rate(30), 6000);
//! assert_eq!(Rupiah::from_rupiah(30 * 6000), Rupiah::from_rupiah(180_000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use jelantah_core::Rupiah` instead of
// `use jelantah_core::money::Rupiah`

pub use billing::{RateSchedule, RateTier};
pub use error::{CoreError, ValidationError};
pub use money::Rupiah;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default customer payout rate in rupiah per liter.
///
/// ## Why a constant?
/// The production schedule is flat Rp6.000/L. Tiered schedules (thresholds
/// at 100L and 200L) exist in some deployments and are built with
/// [`billing::RateSchedule::tiered`]; this constant seeds the default.
pub const DEFAULT_CUSTOMER_RATE: i64 = 6000;

/// Flat kurir fee in rupiah per collected liter.
pub const DEFAULT_KURIR_RATE: i64 = 750;

/// Flat referral fee in rupiah per liter, paid to the referrer.
pub const DEFAULT_REFERRAL_RATE: i64 = 200;

/// Maximum liters accepted for a single pickup (estimated or actual).
///
/// ## Business Reason
/// Prevents typo-sized requests (e.g. 2500 instead of 25). Household and
/// restaurant jelantah pickups are far below this bound.
pub const MAX_PICKUP_LITERS: i64 = 999;
