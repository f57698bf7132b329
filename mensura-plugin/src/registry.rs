//! Number system registry

use crate::{DefaultNumberSystem, FloatNumberSystem, NumberSystem, NumberSystemMeta};
use mensura_core::NumberError;
use std::collections::HashMap;
use std::sync::Arc;

/// Number systems addressable by name.
///
/// The `default` engine is always present; registering another engine
/// under that name replaces it.
#[derive(Clone)]
pub struct NumberSystemRegistry {
    systems: HashMap<String, Arc<dyn NumberSystem>>,
}

impl NumberSystemRegistry {
    /// Registry holding only the default engine
    pub fn new() -> Self {
        let mut systems: HashMap<String, Arc<dyn NumberSystem>> = HashMap::new();
        systems.insert(DefaultNumberSystem::NAME.to_string(), Arc::new(DefaultNumberSystem::new()));
        Self { systems }
    }

    /// Registry with every built-in engine
    pub fn standard() -> Self {
        Self::new().with_system(FloatNumberSystem::new())
    }

    pub fn with_system<S: NumberSystem + 'static>(mut self, system: S) -> Self {
        self.register(Arc::new(system));
        self
    }

    pub fn register(&mut self, system: Arc<dyn NumberSystem>) {
        let name = system.name().to_lowercase();
        tracing::debug!(system = %name, "registered number system");
        self.systems.insert(name, system);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn NumberSystem>> {
        self.systems.get(&name.to_lowercase()).cloned()
    }

    /// Look up an engine, suggesting close names when it is missing
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn NumberSystem>, NumberError> {
        self.get(name).ok_or_else(|| {
            let similar = self.find_similar(name);
            if similar.is_empty() {
                NumberError::UnknownSystem(name.to_string())
            } else {
                NumberError::UnknownSystem(format!("{} (similar: {})", name, similar.join(", ")))
            }
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.systems.contains_key(&name.to_lowercase())
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.systems.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn list(&self) -> Vec<NumberSystemMeta> {
        let mut metas: Vec<NumberSystemMeta> = self.systems.values().map(|s| s.meta()).collect();
        metas.sort_by(|a, b| a.name.cmp(b.name));
        metas
    }

    /// Registered names resembling `name`, best match first
    fn find_similar(&self, name: &str) -> Vec<String> {
        let query = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self
            .systems
            .keys()
            .filter_map(|candidate| {
                let score = Self::similarity_score(&query, candidate);
                (score > 0).then(|| (candidate.clone(), score))
            })
            .collect();
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        if query.is_empty() {
            return 0;
        }
        if candidate.starts_with(query) {
            100
        } else if candidate.contains(query) {
            50
        } else if query.contains(candidate) {
            30
        } else {
            0
        }
    }
}

impl Default for NumberSystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NumberSystemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumberSystemRegistry").field("systems", &self.names()).finish()
    }
}
