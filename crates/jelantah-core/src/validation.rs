//! # Validation Module
//!
//! Input validation utilities for the Jemput Jelantah dashboard.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP Handler (Rust)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Registries                                                   │
//! │  ├── Duplicate id / phone rejection                                    │
//! │  └── Status lifecycle enforcement                                      │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use jelantah_core::validation::{validate_phone, validate_liters};
//!
//! // Validate a login / registration phone number
//! validate_phone("081234567890").unwrap();
//!
//! // Validate an estimated or actual liter count
//! validate_liters(25).unwrap();
//! ```

use crate::error::ValidationError;
use crate::MAX_PICKUP_LITERS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an Indonesian mobile phone number.
///
/// ## Rules
/// - Must not be empty
/// - Digits only
/// - Must start with `08` (local mobile prefix, as the login screen expects)
/// - Must be between 10 and 13 digits
///
/// ## Example
/// ```rust
/// use jelantah_core::validation::validate_phone;
///
/// assert!(validate_phone("081234567890").is_ok());
/// assert!(validate_phone("").is_err());
/// assert!(validate_phone("0812-345-678").is_err());
/// assert!(validate_phone("621234567890").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    if !phone.starts_with("08") {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must start with 08".to_string(),
        });
    }

    if phone.len() < 10 || phone.len() > 13 {
        return Err(ValidationError::OutOfRange {
            field: "phone length".to_string(),
            min: 10,
            max: 13,
        });
    }

    Ok(())
}

/// Validates a customer display name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 100 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a pickup street address.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
pub fn validate_address(address: &str) -> ValidationResult<()> {
    let address = address.trim();

    if address.is_empty() {
        return Err(ValidationError::Required {
            field: "address".to_string(),
        });
    }

    if address.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "address".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a customer search query.
///
/// ## Rules
/// - Can be empty (returns the full list)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates an entity id.
///
/// ## Rules
/// - Must not be empty
/// - Maximum 64 characters
///
/// Ids are opaque strings here, not UUIDs: seeded records use short
/// numeric ids and derived bill ids carry a type prefix.
pub fn validate_entity_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: 64,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a liter count (estimated or actual).
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_PICKUP_LITERS (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Kurir: Complete Pickup                                                 │
/// │                                                                         │
/// │  Kurir enters actual liters: 30                                        │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_liters(30) ← THIS FUNCTION                                   │
/// │       │                                                                 │
/// │       ├── liters <= 0? → Error: "liters must be positive"              │
/// │       │                                                                 │
/// │       ├── liters > 999? → Error: "liters must be between 1 and 999"    │
/// │       │                                                                 │
/// │       └── OK → Proceed with completion + bill derivation               │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_liters(liters: i64) -> ValidationResult<()> {
    if liters <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "liters".to_string(),
        });
    }

    if liters > MAX_PICKUP_LITERS {
        return Err(ValidationError::OutOfRange {
            field: "liters".to_string(),
            min: 1,
            max: MAX_PICKUP_LITERS,
        });
    }

    Ok(())
}

/// Validates a per-liter rate in rupiah.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Zero-rate schedules would emit worthless bills
pub fn validate_rate(rate: i64) -> ValidationResult<()> {
    if rate <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "rate".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone() {
        // Valid phones
        assert!(validate_phone("081234567890").is_ok());
        assert!(validate_phone("08111111111").is_ok());
        assert!(validate_phone("0812345678").is_ok());

        // Invalid phones
        assert!(validate_phone("").is_err());
        assert!(validate_phone("   ").is_err());
        assert!(validate_phone("0812-345-678").is_err());
        assert!(validate_phone("621234567890").is_err());
        assert!(validate_phone("08123").is_err());
        assert!(validate_phone("08123456789012345").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("John Doe").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"A".repeat(150)).is_err());
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("Jl. Sudirman No. 123, Jakarta").is_ok());
        assert!(validate_address("").is_err());
        assert!(validate_address(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_liters() {
        assert!(validate_liters(1).is_ok());
        assert!(validate_liters(30).is_ok());
        assert!(validate_liters(999).is_ok());

        assert!(validate_liters(0).is_err());
        assert!(validate_liters(-5).is_err());
        assert!(validate_liters(1000).is_err());
    }

    #[test]
    fn test_validate_entity_id() {
        assert!(validate_entity_id("1").is_ok());
        assert!(validate_entity_id("customer-1738000000000").is_ok());
        assert!(validate_entity_id("").is_err());
        assert!(validate_entity_id(&"x".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  john  ").unwrap(), "john");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate(6000).is_ok());
        assert!(validate_rate(0).is_err());
        assert!(validate_rate(-200).is_err());
    }
}
