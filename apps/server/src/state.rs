//! # Application State
//!
//! Shared state handed to every handler by axum.
//!
//! ## Why Multiple Fields, One Struct?
//! One focused state type per concern, carried by axum as a single
//! `Clone` struct of cheap handles:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        AppState                                         │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │ Arc<Store>   │  │ SessionState │  │ Option<Arc<      │              │
//! │  │              │  │              │  │   ObjectStorage>>│              │
//! │  │ registries + │  │ token →      │  │                  │              │
//! │  │ rate schedule│  │ identity map │  │ None = uploads   │              │
//! │  │              │  │              │  │ disabled         │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Store: registries lock internally per operation                     │
//! │  • SessionState: Arc<Mutex<HashMap>>                                   │
//! │  • ObjectStorage: reqwest::Client is already shareable                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use jelantah_store::Store;

use crate::auth::SessionState;
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::storage::ObjectStorage;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub sessions: SessionState,
    pub storage: Option<Arc<ObjectStorage>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Assembles the state handed to the router.
    pub fn new(
        store: Arc<Store>,
        sessions: SessionState,
        storage: Option<Arc<ObjectStorage>>,
        config: Arc<ServerConfig>,
    ) -> Self {
        AppState {
            store,
            sessions,
            storage,
            config,
        }
    }

    /// The storage client, or a typed error when uploads are not configured.
    pub fn storage(&self) -> Result<&ObjectStorage, ApiError> {
        self.storage
            .as_deref()
            .ok_or_else(|| ApiError::storage("Object storage is not configured"))
    }
}
