//! Application state for the estimator API.

use std::sync::Arc;

use crate::config::ConfigLoader;

/// Shared application state.
///
/// Holds the regulatory tables, loaded once at start-up and shared read-only
/// by every handler.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}
