//! Process-wide number system selection
//!
//! Exactly one number system is current at a time. It starts as the
//! engine named by `MENSURA_NUMBER_SYSTEM` (falling back to `default`)
//! and is meant to be chosen once at startup; readers always see a
//! complete engine because the swap happens under a write lock.
//! Code that needs a specific engine should pass it explicitly instead.

use crate::{DefaultNumberSystem, NumberSystem, NumberSystemRegistry};
use mensura_core::NumberError;
use std::env;
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

static REGISTRY: OnceLock<RwLock<NumberSystemRegistry>> = OnceLock::new();
static CURRENT: OnceLock<RwLock<Arc<dyn NumberSystem>>> = OnceLock::new();

fn registry() -> &'static RwLock<NumberSystemRegistry> {
    REGISTRY.get_or_init(|| RwLock::new(NumberSystemRegistry::standard()))
}

fn read_registry() -> RwLockReadGuard<'static, NumberSystemRegistry> {
    registry().read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_registry() -> RwLockWriteGuard<'static, NumberSystemRegistry> {
    registry().write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn initial_system() -> Arc<dyn NumberSystem> {
    let registry = read_registry();
    if let Ok(name) = env::var("MENSURA_NUMBER_SYSTEM") {
        match registry.lookup(name.trim()) {
            Ok(system) => return system,
            Err(e) => tracing::warn!(error = %e, "ignoring MENSURA_NUMBER_SYSTEM"),
        }
    }
    registry
        .get(DefaultNumberSystem::NAME)
        .unwrap_or_else(|| Arc::new(DefaultNumberSystem::new()))
}

fn slot() -> &'static RwLock<Arc<dyn NumberSystem>> {
    CURRENT.get_or_init(|| RwLock::new(initial_system()))
}

/// The number system converters evaluate with by default
pub fn current() -> Arc<dyn NumberSystem> {
    match slot().read() {
        Ok(guard) => Arc::clone(&guard),
        Err(poisoned) => Arc::clone(&poisoned.into_inner()),
    }
}

/// Make `system` current, returning the previous one
pub fn set_current(system: Arc<dyn NumberSystem>) -> Arc<dyn NumberSystem> {
    let mut guard = slot().write().unwrap_or_else(|poisoned| poisoned.into_inner());
    tracing::debug!(from = guard.name(), to = system.name(), "number system selected");
    std::mem::replace(&mut *guard, system)
}

/// Make the registered system called `name` current
pub fn select(name: &str) -> Result<Arc<dyn NumberSystem>, NumberError> {
    let system = read_registry().lookup(name)?;
    set_current(Arc::clone(&system));
    Ok(system)
}

/// Add a system to the process-wide registry so it can be selected by name
pub fn register(system: Arc<dyn NumberSystem>) {
    write_registry().register(system);
}

/// Look up a registered system without selecting it
pub fn lookup(name: &str) -> Result<Arc<dyn NumberSystem>, NumberError> {
    read_registry().lookup(name)
}

/// Names of every system in the process-wide registry
pub fn available() -> Vec<String> {
    read_registry().names().into_iter().map(str::to_string).collect()
}
