//! Backend registry.
//!
//! The [`BackendRegistry`] maps backend names to constructors so the cast
//! runtime can pick its execution target from configuration.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::backend::{Backend, BackendFactory};
use crate::error::{HalError, HalResult};
use crate::info::BackendInfo;

type Factory = Box<dyn Fn(BackendInfo) -> HalResult<Box<dyn Backend>> + Send + Sync>;

/// Named backend constructors.
pub struct BackendRegistry {
    factories: FxHashMap<String, Factory>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// Register a backend type under `name`.
    pub fn register<B>(&mut self, name: impl Into<String>)
    where
        B: BackendFactory + 'static,
    {
        let name = name.into();
        debug!("Registering backend: {}", name);
        self.factories.insert(
            name,
            Box::new(|info| {
                let backend = B::from_info(info)?;
                Ok(Box::new(backend))
            }),
        );
    }

    /// Register a backend with a custom constructor.
    pub fn register_factory(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(BackendInfo) -> HalResult<Box<dyn Backend>> + Send + Sync + 'static,
    ) {
        let name = name.into();
        debug!("Registering factory backend: {}", name);
        self.factories.insert(name, Box::new(factory));
    }

    /// Create a backend by name.
    pub fn create(&self, name: &str, info: BackendInfo) -> HalResult<Box<dyn Backend>> {
        let Some(factory) = self.factories.get(name) else {
            return Err(HalError::BackendUnavailable(format!(
                "No backend registered with name '{name}'"
            )));
        };
        factory(info)
    }

    /// Registered names, sorted.
    pub fn available_backends(&self) -> Vec<String> {
        let mut names: Vec<_> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_backend(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}
