//! # Store Error Types
//!
//! Error types for registry operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (business rule / validation)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds registry context                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in server app) ← Serialized for the dashboard               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Frontend displays user-friendly message                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use jelantah_core::CoreError;

/// Registry operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in its registry.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// An insert collided with an existing id.
    ///
    /// ## When This Occurs
    /// - Seeding the same data twice
    /// - Replayed bill derivation (bill ids are deterministic per pickup)
    #[error("Duplicate {entity} id: '{id}' already exists")]
    DuplicateId { entity: String, id: String },

    /// A customer registration reused a registered phone number.
    ///
    /// Phone numbers are the customer login key, so they must stay unique.
    #[error("Phone '{phone}' is already registered")]
    DuplicatePhone { phone: String },

    /// Business rule violation (wraps CoreError).
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a DuplicateId error.
    pub fn duplicate_id(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::DuplicateId {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Result type for registry operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::not_found("Customer", "42");
        assert_eq!(err.to_string(), "Customer not found: 42");

        let err = StoreError::duplicate_id("Bill", "customer-p1");
        assert_eq!(err.to_string(), "Duplicate Bill id: 'customer-p1' already exists");
    }

    #[test]
    fn test_core_error_passthrough() {
        let core = CoreError::PickupNotFound("p9".to_string());
        let err: StoreError = core.into();
        // transparent: the core message survives unchanged
        assert_eq!(err.to_string(), "Pickup not found: p9");
    }
}
