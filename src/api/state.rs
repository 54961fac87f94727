//! Application state for the workforce compliance API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::EngineSettings;
use crate::store::WorkforceStore;

/// Shared application state.
///
/// Holds the record store and the engine settings. Both are read-only for
/// the lifetime of the server.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn WorkforceStore>,
    settings: Arc<EngineSettings>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(store: impl WorkforceStore + 'static, settings: EngineSettings) -> Self {
        Self {
            store: Arc::new(store),
            settings: Arc::new(settings),
        }
    }

    /// Returns the record store.
    pub fn store(&self) -> &dyn WorkforceStore {
        self.store.as_ref()
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }
}
