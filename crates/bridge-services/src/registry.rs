use crate::{HostError, Result};
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

type Service = Arc<dyn Any + Send + Sync>;
type Factory = Arc<dyn Fn() -> Service + Send + Sync>;

struct Slot {
    factory: Factory,
    cached: Option<Service>,
}

/// Explicit service locator for emulated host globals.
///
/// Each named service is built by its factory at most once, at first
/// resolution, and the same instance is returned thereafter. Construction
/// order is independent of registration order, and unknown names fail with
/// a typed error rather than a silent default.
#[derive(Default)]
pub struct ServiceRegistry {
    slots: Mutex<HashMap<String, Slot>>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a named service.
    ///
    /// Re-registration replaces the factory and drops any cached instance.
    pub fn register<T, F>(&self, name: &str, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move || Arc::new(factory()) as Service);
        self.lock().insert(
            name.to_string(),
            Slot {
                factory,
                cached: None,
            },
        );
    }

    /// Resolve a named service, constructing and caching it on first access.
    pub fn resolve<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        let factory = {
            let slots = self.lock();
            let slot = slots
                .get(name)
                .ok_or_else(|| HostError::UnknownService(name.to_string()))?;

            if let Some(cached) = &slot.cached {
                return downcast(name, cached.clone());
            }

            slot.factory.clone()
        };

        // construct outside the lock so factories may resolve other services
        log::debug!("constructing service '{}'", name);
        let service = factory();

        let mut slots = self.lock();
        let slot = slots
            .get_mut(name)
            .ok_or_else(|| HostError::UnknownService(name.to_string()))?;
        let cached = slot.cached.get_or_insert(service).clone();
        downcast(name, cached)
    }

    /// Whether a service name has been registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn downcast<T: Any + Send + Sync>(name: &str, service: Service) -> Result<Arc<T>> {
    service
        .downcast::<T>()
        .map_err(|_| HostError::ServiceType(name.to_string()))
}
