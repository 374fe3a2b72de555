//! Adapter registry
//!
//! Maps adapter names to factories that build fresh adapter instances.
//! Registries are owned by the caller and handed to each [`Logger`](super::Logger),
//! so independent registries can coexist in one process.

use super::{
    adapter::Adapter,
    error::{LoggerError, Result},
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Constructor for a fresh adapter instance
pub type AdapterFactory = Arc<dyn Fn() -> Box<dyn Adapter> + Send + Sync>;

#[derive(Default)]
pub struct AdapterRegistry {
    factories: RwLock<HashMap<String, AdapterFactory>>,
}

impl AdapterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered. Registration is wiring done
    /// once at startup; a duplicate is a programming error.
    ///
    /// # Example
    ///
    /// ```
    /// use fanout_logger::prelude::*;
    ///
    /// struct Discard;
    ///
    /// impl Adapter for Discard {
    ///     fn init(&mut self, _config: &str) -> Result<()> { Ok(()) }
    ///     fn write_msg(&mut self, _message: &str, _level: LogLevel) -> Result<()> { Ok(()) }
    ///     fn flush(&mut self) {}
    ///     fn destroy(&mut self) {}
    /// }
    ///
    /// let registry = AdapterRegistry::new();
    /// registry.register("discard", || Box::new(Discard) as Box<dyn Adapter>);
    /// assert!(registry.contains("discard"));
    /// ```
    pub fn register<F>(&self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Adapter> + Send + Sync + 'static,
    {
        self.register_factory(name, Some(Arc::new(factory)));
    }

    /// Register an optional factory under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `factory` is `None` or `name` is already registered.
    pub fn register_factory(&self, name: &str, factory: Option<AdapterFactory>) {
        if let Err(e) = self.try_register(name, factory) {
            panic!("adapter registration failed: {}", e);
        }
    }

    /// Non-panicking form of [`register_factory`](Self::register_factory).
    pub fn try_register(&self, name: &str, factory: Option<AdapterFactory>) -> Result<()> {
        let factory = factory.ok_or_else(|| LoggerError::missing_factory(name))?;

        let mut factories = self.factories.write();
        if factories.contains_key(name) {
            return Err(LoggerError::duplicate_adapter(name));
        }
        factories.insert(name.to_string(), factory);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.read().is_empty()
    }

    /// Build a new adapter, or `None` for an unknown name
    pub fn create(&self, name: &str) -> Option<Box<dyn Adapter>> {
        // Clone the factory out so user code never runs under the registry lock
        let factory = self.factories.read().get(name).cloned()?;
        Some(factory())
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("names", &self.names())
            .finish()
    }
}
