//! Construction of the resolution chain.
//!
//! The chain always has the same shape:
//!
//! ```text
//! noop ─► core ─► [injected classpath] ─► repositories… ─► [override] ─► remote plugin service
//! ```
//!
//! Bracketed entries are present only when configured. Earlier strategies
//! mask later ones: a builtin plugin can never be shadowed by a repository.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::endpoint::RepositoryEndpoint;
use crate::error::StrategyResult;
use crate::registry::RepositoryRegistry;
use crate::services::{DefaultFileLookup, FileLookup};
use crate::strategy::{
    BoxedStrategy, BuiltinStrategy, InjectedClasspathStrategy, NoopStrategy,
    RemoteServiceStrategy, StrategyChain,
};

/// Orders already built strategies into a chain.
///
/// The no-op strategy is always first.
pub fn assemble_chain(
    builtin: BoxedStrategy,
    classpath: Option<BoxedStrategy>,
    repositories: impl IntoIterator<Item = BoxedStrategy>,
    remote: BoxedStrategy,
) -> StrategyChain {
    let noop: BoxedStrategy = Arc::new(NoopStrategy);
    std::iter::once(noop)
        .chain(std::iter::once(builtin))
        .chain(classpath)
        .chain(repositories)
        .chain(std::iter::once(remote))
        .collect()
}

/// Builds [`StrategyChain`]s from the declared sources.
pub struct StrategyFactory {
    builtin: Arc<BuiltinStrategy>,
    classpath: Arc<InjectedClasspathStrategy>,
    registry: Arc<RepositoryRegistry>,
    remote: Arc<RemoteServiceStrategy>,
    file_lookup: Arc<dyn FileLookup>,
    override_location: Option<String>,
    /// Synthesized on the first build that needs it.
    override_endpoint: Mutex<Option<Arc<RepositoryEndpoint>>>,
}

impl StrategyFactory {
    /// Creates a factory with no repository override.
    pub fn new(
        builtin: BuiltinStrategy,
        classpath: InjectedClasspathStrategy,
        registry: Arc<RepositoryRegistry>,
        remote: RemoteServiceStrategy,
    ) -> Self {
        Self {
            builtin: Arc::new(builtin),
            classpath: Arc::new(classpath),
            registry,
            remote: Arc::new(remote),
            file_lookup: Arc::new(DefaultFileLookup),
            override_location: None,
            override_endpoint: Mutex::new(None),
        }
    }

    /// Sets the file lookup used for the override endpoint (builder pattern).
    pub fn with_file_lookup(mut self, file_lookup: Arc<dyn FileLookup>) -> Self {
        self.file_lookup = file_lookup;
        self
    }

    /// Sets the repository override location (builder pattern).
    ///
    /// The override is appended after every declared repository.
    pub fn with_override_location(mut self, location: Option<String>) -> Self {
        self.override_location = location;
        self
    }

    /// Returns the registry of declared endpoints.
    pub fn registry(&self) -> &Arc<RepositoryRegistry> {
        &self.registry
    }

    /// Returns the configured override location.
    pub fn override_location(&self) -> Option<&str> {
        self.override_location.as_deref()
    }

    /// Builds the chain for the current set of declared endpoints.
    ///
    /// Every endpoint is frozen by this call. Repeated builds reuse the
    /// endpoints' cached strategies, so no location is registered twice.
    ///
    /// # Errors
    ///
    /// Fails if any endpoint location, the override included, cannot be
    /// resolved. All locations are checked before the first endpoint is
    /// frozen, so a failed build registers nothing.
    pub fn build_chain(&self) -> StrategyResult<StrategyChain> {
        let mut endpoints = self.registry.endpoints();
        endpoints.extend(self.override_endpoint()?);

        for endpoint in &endpoints {
            endpoint.location()?;
        }

        let repositories = endpoints
            .iter()
            .map(|endpoint| endpoint.as_resolution_strategy())
            .collect::<StrategyResult<Vec<_>>>()?;

        let classpath: Option<BoxedStrategy> = if self.classpath.is_classpath_empty() {
            None
        } else {
            Some(Arc::clone(&self.classpath) as BoxedStrategy)
        };

        let chain = assemble_chain(
            Arc::clone(&self.builtin) as BoxedStrategy,
            classpath,
            repositories,
            Arc::clone(&self.remote) as BoxedStrategy,
        );
        debug!(strategies = ?chain.names(), "Built resolution chain");
        Ok(chain)
    }

    /// Returns the override endpoint, creating it on first use.
    ///
    /// Its location resolves against the process working directory since no
    /// project base directory is known at this point.
    fn override_endpoint(&self) -> StrategyResult<Option<Arc<RepositoryEndpoint>>> {
        let Some(location) = &self.override_location else {
            return Ok(None);
        };

        let mut slot = self.override_endpoint.lock();
        if let Some(endpoint) = slot.as_ref() {
            return Ok(Some(Arc::clone(endpoint)));
        }

        let resolver = self.file_lookup.current_dir_resolver()?;
        let endpoint = Arc::new(
            RepositoryEndpoint::new(resolver, self.registry.services().clone())
                .with_location(location.clone()),
        );
        info!(location = %location, "Using plugin repository override");
        *slot = Some(Arc::clone(&endpoint));
        Ok(Some(endpoint))
    }
}

impl std::fmt::Debug for StrategyFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyFactory")
            .field("namespace", &self.builtin.namespace())
            .field("classpath", &self.classpath.roots())
            .field("registry", &self.registry)
            .field("override_location", &self.override_location)
            .field("offline", &self.remote.is_offline())
            .finish()
    }
}
