//! Lookup collaborators for bundled plugins and the remote plugin service.

use std::collections::HashMap;

use crate::error::StrategyResult;
use crate::request::{PluginId, PluginRequest};
use crate::resolution::ArtifactDescriptor;

/// Plugins shipped with the host, keyed by fully qualified id.
pub trait PluginCatalog: Send + Sync {
    /// Returns the bundled plugin with `id`, if any.
    fn find(&self, id: &PluginId) -> Option<ArtifactDescriptor>;
}

/// A fixed, in-memory [`PluginCatalog`].
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    plugins: HashMap<PluginId, ArtifactDescriptor>,
}

impl StaticCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bundled plugin.
    pub fn insert(&mut self, id: PluginId) {
        self.plugins.insert(id.clone(), ArtifactDescriptor::bundled(id));
    }

    /// Adds a bundled plugin (builder pattern).
    pub fn with(mut self, id: PluginId) -> Self {
        self.insert(id);
        self
    }

    /// Returns the number of bundled plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl FromIterator<PluginId> for StaticCatalog {
    fn from_iter<T: IntoIterator<Item = PluginId>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for id in iter {
            catalog.insert(id);
        }
        catalog
    }
}

impl PluginCatalog for StaticCatalog {
    fn find(&self, id: &PluginId) -> Option<ArtifactDescriptor> {
        self.plugins.get(id).cloned()
    }
}

/// Client for a remote plugin service.
///
/// Timeouts, retries and caching belong to the implementation.
pub trait PluginService: Send + Sync {
    /// Looks up `request`; `Ok(None)` means the service does not know it.
    fn lookup(&self, request: &PluginRequest) -> StrategyResult<Option<ArtifactDescriptor>>;

    /// Human-readable description used in diagnostics.
    fn describe(&self) -> String {
        "remote plugin service".to_string()
    }
}

/// Placeholder used when no remote service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredService;

impl PluginService for UnconfiguredService {
    fn lookup(&self, _request: &PluginRequest) -> StrategyResult<Option<ArtifactDescriptor>> {
        Ok(None)
    }

    fn describe(&self) -> String {
        "no remote plugin service configured".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_catalog_lookup() {
        let catalog: StaticCatalog = ["quarry.java", "quarry.base"]
            .into_iter()
            .map(|s| PluginId::new(s).unwrap())
            .collect();

        assert_eq!(catalog.len(), 2);
        let java = PluginId::new("quarry.java").unwrap();
        assert_eq!(catalog.find(&java), Some(ArtifactDescriptor::bundled(java)));
        assert!(catalog.find(&PluginId::new("java").unwrap()).is_none());
    }
}
