//! Application state for the BizHub API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{ConfigLoader, PaginationSettings};
use crate::store::Store;

/// Shared application state.
///
/// Holds the loaded platform configuration and the record store.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<Store>,
}

impl AppState {
    /// Creates application state from a configuration loader and a store.
    pub fn new(config: ConfigLoader, store: Store) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a reference to the record store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Platform-wide pagination settings.
    pub fn pagination(&self) -> PaginationSettings {
        self.config.config().pagination()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<AppState>();
    }
}
