//! # Error Types
//!
//! Domain-specific error types for jelantah-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  jelantah-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  jelantah-store errors (separate crate)                                │
//! │  └── StoreError       - Registry operation failures                    │
//! │                                                                         │
//! │  HTTP API errors (in app)                                              │
//! │  └── ApiError         - What the dashboard sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError → Frontend   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (pickup id, field name, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::types::PickupStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Customer cannot be found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Pickup request cannot be found.
    #[error("Pickup not found: {0}")]
    PickupNotFound(String),

    /// Bill cannot be found.
    #[error("Bill not found: {0}")]
    BillNotFound(String),

    /// The requested status change would move the pickup backwards.
    ///
    /// ## When This Occurs
    /// - Completing a pickup that is already completed
    /// - Taking a pickup that has moved past `Request`
    ///
    /// ## User Workflow
    /// ```text
    /// Kurir taps "Selesai" twice
    ///      │
    ///      ▼
    /// Second completion: Completed → Completed
    ///      │
    ///      ▼
    /// InvalidStatusTransition { from: completed, to: completed }
    ///      │
    ///      ▼
    /// UI shows: "Pickup sudah selesai"
    /// ```
    #[error("Pickup {pickup_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        pickup_id: String,
        from: PickupStatus,
        to: PickupStatus,
    },

    /// Bill derivation was asked for a pickup that is not completed.
    #[error("Pickup {pickup_id} is {status}, bills derive only from completed pickups")]
    PickupNotCompleted {
        pickup_id: String,
        status: PickupStatus,
    },

    /// The operation needs a courier identity and none is assigned.
    #[error("Pickup {pickup_id} has no kurir assigned")]
    KurirRequired { pickup_id: String },

    /// Completion was attempted without a positive actual liter count.
    #[error("Pickup {pickup_id} needs actual liters to complete")]
    ActualLitersRequired { pickup_id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., phone already registered).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
