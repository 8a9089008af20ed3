//! # Login & Sessions
//!
//! The login stub: (phone, role) resolves against a fixed two-entry table
//! plus the customer registry. No passwords, no token crypto - a session is
//! an opaque UUID in an in-memory map, gone on restart like everything else.
//!
//! ## Login Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  role      phone          identity                                      │
//! │  ────      ─────          ────────                                      │
//! │  admin     08111111111 →  Administrator (id: admin)                    │
//! │  kurir     08222222222 →  Ahmad Kurir   (id: kurir1)                   │
//! │  customer  <any>       →  customer registry lookup by phone            │
//! │                                                                         │
//! │  Anything else → login rejected                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use jelantah_core::{Identity, UserRole};
use jelantah_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// The fixed admin login phone.
pub const ADMIN_PHONE: &str = "08111111111";

/// The fixed kurir login phone.
pub const KURIR_PHONE: &str = "08222222222";

/// The back-office identity.
pub fn admin_identity() -> Identity {
    Identity {
        id: "admin".to_string(),
        name: "Administrator".to_string(),
        phone: ADMIN_PHONE.to_string(),
        role: UserRole::Admin,
    }
}

/// The courier identity.
pub fn kurir_identity() -> Identity {
    Identity {
        id: "kurir1".to_string(),
        name: "Ahmad Kurir".to_string(),
        phone: KURIR_PHONE.to_string(),
        role: UserRole::Kurir,
    }
}

/// Resolves a (phone, role) pair to an identity, or nothing.
pub fn resolve_identity(store: &Store, phone: &str, role: UserRole) -> Option<Identity> {
    match role {
        UserRole::Admin => (phone == ADMIN_PHONE).then(admin_identity),
        UserRole::Kurir => (phone == KURIR_PHONE).then(kurir_identity),
        UserRole::Customer => store.customers().find_by_phone(phone).map(|c| c.identity()),
    }
}

// =============================================================================
// Session State
// =============================================================================

/// In-memory session map: opaque token → identity.
///
/// ## Thread Safety
/// `Arc<Mutex<HashMap>>` - multiple handlers resolve tokens concurrently,
/// writes happen on login/logout only.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    inner: Arc<Mutex<HashMap<String, Identity>>>,
}

impl SessionState {
    /// Creates an empty session map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session and returns its token.
    pub fn create(&self, identity: Identity) -> String {
        let token = Uuid::new_v4().to_string();
        let mut map = self.inner.lock().expect("session lock poisoned");
        map.insert(token.clone(), identity);
        token
    }

    /// Resolves a token to its identity.
    pub fn resolve(&self, token: &str) -> Option<Identity> {
        let map = self.inner.lock().expect("session lock poisoned");
        map.get(token).cloned()
    }

    /// Ends a session. Returns whether the token existed.
    pub fn revoke(&self, token: &str) -> bool {
        let mut map = self.inner.lock().expect("session lock poisoned");
        map.remove(token).is_some()
    }
}

// =============================================================================
// Request Extractor
// =============================================================================

/// The authenticated caller, extracted from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub identity: Identity,
    pub token: String,
}

impl CurrentUser {
    /// The caller's role.
    #[inline]
    pub fn role(&self) -> UserRole {
        self.identity.role
    }

    /// Rejects callers that don't hold the given role.
    pub fn require(&self, role: UserRole) -> Result<(), ApiError> {
        if self.identity.role == role {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!("Requires {} role", role)))
        }
    }

    /// Rejects callers outside the given roles.
    pub fn require_any(&self, roles: &[UserRole]) -> Result<(), ApiError> {
        if roles.contains(&self.identity.role) {
            Ok(())
        } else {
            let allowed: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
            Err(ApiError::forbidden(format!(
                "Requires one of: {}",
                allowed.join(", ")
            )))
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Expected a Bearer token"))?;

        let identity = state
            .sessions
            .resolve(token)
            .ok_or_else(|| ApiError::unauthorized("Session not found, please login again"))?;

        Ok(CurrentUser {
            identity,
            token: token.to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use jelantah_store::{seed::seed_demo, NewCustomer};

    #[test]
    fn test_fixed_login_table() {
        let store = Store::default();

        let admin = resolve_identity(&store, ADMIN_PHONE, UserRole::Admin).unwrap();
        assert_eq!(admin.id, "admin");
        assert_eq!(admin.role, UserRole::Admin);

        let kurir = resolve_identity(&store, KURIR_PHONE, UserRole::Kurir).unwrap();
        assert_eq!(kurir.id, "kurir1");
        assert_eq!(kurir.name, "Ahmad Kurir");

        // Right phone, wrong role
        assert!(resolve_identity(&store, ADMIN_PHONE, UserRole::Kurir).is_none());
        assert!(resolve_identity(&store, KURIR_PHONE, UserRole::Admin).is_none());
        // Wrong phone entirely
        assert!(resolve_identity(&store, "08999999999", UserRole::Admin).is_none());
    }

    #[test]
    fn test_customer_login_resolves_from_registry() {
        let store = Store::default();
        seed_demo(&store).unwrap();

        let user = resolve_identity(&store, "081234567890", UserRole::Customer).unwrap();
        assert_eq!(user.id, "1");
        assert_eq!(user.name, "John Doe");
        assert_eq!(user.role, UserRole::Customer);

        assert!(resolve_identity(&store, "080000000000", UserRole::Customer).is_none());
    }

    #[test]
    fn test_newly_registered_customer_can_login() {
        let store = Store::default();
        store
            .register_customer(NewCustomer {
                name: "Siti".to_string(),
                phone: "081298765432".to_string(),
                address: "Jl. Melati No. 4, Bandung".to_string(),
                ..NewCustomer::default()
            })
            .unwrap();

        let user = resolve_identity(&store, "081298765432", UserRole::Customer).unwrap();
        assert_eq!(user.name, "Siti");
    }

    #[test]
    fn test_session_round_trip() {
        let sessions = SessionState::new();
        let token = sessions.create(admin_identity());

        let resolved = sessions.resolve(&token).unwrap();
        assert_eq!(resolved.id, "admin");

        assert!(sessions.revoke(&token));
        assert!(sessions.resolve(&token).is_none());
        assert!(!sessions.revoke(&token));
    }

    #[test]
    fn test_role_guards() {
        let user = CurrentUser {
            identity: kurir_identity(),
            token: "t".to_string(),
        };

        assert!(user.require(UserRole::Kurir).is_ok());
        assert!(user.require(UserRole::Admin).is_err());
        assert!(user
            .require_any(&[UserRole::Admin, UserRole::Kurir])
            .is_ok());
        assert!(user.require_any(&[UserRole::Customer]).is_err());
    }
}
