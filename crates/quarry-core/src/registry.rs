//! Registry of declared repository endpoints.
//!
//! The registry hands out endpoints in declaration order, which is the order
//! their strategies take in the resolution chain.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::endpoint::RepositoryEndpoint;
use crate::services::{FileResolver, ResolutionServices};

/// Ordered collection of declared repository endpoints.
pub struct RepositoryRegistry {
    /// Base context for locations of declared endpoints.
    resolver: Arc<dyn FileResolver>,
    /// Services handed to every endpoint.
    services: ResolutionServices,
    /// Endpoints in declaration order.
    endpoints: RwLock<Vec<Arc<RepositoryEndpoint>>>,
}

impl RepositoryRegistry {
    /// Creates an empty registry.
    pub fn new(resolver: Arc<dyn FileResolver>, services: ResolutionServices) -> Self {
        Self {
            resolver,
            services,
            endpoints: RwLock::new(Vec::new()),
        }
    }

    /// Declares a maven endpoint and lets `configure` set it up.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// registry.maven(|repo| {
    ///     repo.set_location("https://plugins.example.com/m2").ok();
    /// });
    /// ```
    pub fn maven<F>(&self, configure: F) -> Arc<RepositoryEndpoint>
    where
        F: FnOnce(&RepositoryEndpoint),
    {
        let endpoint = RepositoryEndpoint::new(Arc::clone(&self.resolver), self.services.clone());
        configure(&endpoint);
        self.add(endpoint)
    }

    /// Declares a maven endpoint at `location`.
    pub fn maven_at(&self, location: impl Into<String>) -> Arc<RepositoryEndpoint> {
        let endpoint = RepositoryEndpoint::new(Arc::clone(&self.resolver), self.services.clone())
            .with_location(location);
        self.add(endpoint)
    }

    /// Appends an already constructed endpoint.
    pub fn add(&self, endpoint: RepositoryEndpoint) -> Arc<RepositoryEndpoint> {
        let endpoint = Arc::new(endpoint);
        let mut endpoints = self.endpoints.write();
        endpoints.push(Arc::clone(&endpoint));
        debug!(
            repository = endpoint.name(),
            position = endpoints.len(),
            "Declared repository endpoint"
        );
        endpoint
    }

    /// Returns a snapshot of the endpoints in declaration order.
    pub fn endpoints(&self) -> Vec<Arc<RepositoryEndpoint>> {
        self.endpoints.read().clone()
    }

    /// Returns the number of declared endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.read().len()
    }

    /// Returns `true` if no endpoint has been declared.
    pub fn is_empty(&self) -> bool {
        self.endpoints.read().is_empty()
    }

    /// Returns the services shared with every endpoint.
    pub fn services(&self) -> &ResolutionServices {
        &self.services
    }
}

impl std::fmt::Debug for RepositoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryRegistry")
            .field("endpoints", &*self.endpoints.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingHandler, base_resolver, services_with};

    fn registry() -> RepositoryRegistry {
        let handler = Arc::new(CountingHandler::default());
        RepositoryRegistry::new(base_resolver(), services_with(handler))
    }

    #[test]
    fn test_declaration_order_is_preserved() {
        let registry = registry();
        registry.maven_at("https://a.example.com/");
        registry.maven(|repo| {
            repo.set_location("https://b.example.com/").unwrap();
        });
        registry.maven_at("https://c.example.com/");

        let locations: Vec<_> = registry
            .endpoints()
            .iter()
            .map(|e| e.location().unwrap().to_string())
            .collect();
        assert_eq!(
            locations,
            [
                "https://a.example.com/",
                "https://b.example.com/",
                "https://c.example.com/"
            ]
        );
    }

    #[test]
    fn test_returned_endpoint_is_shared() {
        let registry = registry();
        let endpoint = registry.maven_at("https://a.example.com/");
        endpoint.as_resolution_strategy().unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.endpoints()[0].is_frozen());
    }

    #[test]
    fn test_empty_registry() {
        let registry = registry();
        assert!(registry.is_empty());
        assert!(registry.endpoints().is_empty());
    }
}
