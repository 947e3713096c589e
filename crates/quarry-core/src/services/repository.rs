//! Repository registration and artifact lookup collaborators.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};
use url::Url;

use crate::error::StrategyResult;
use crate::resolution::ModuleCoordinates;

// =============================================================================
// Registration
// =============================================================================

/// Configuration applied to a repository while it is being registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySpec {
    name: String,
    location: Option<Url>,
}

impl RepositorySpec {
    /// Creates an unconfigured spec.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
        }
    }

    /// Sets the repository location.
    pub fn set_location(&mut self, location: Url) {
        self.location = Some(location);
    }

    /// Returns the repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the configured location.
    pub fn location(&self) -> Option<&Url> {
        self.location.as_ref()
    }
}

/// Makes repositories available to subsequent artifact lookups.
///
/// Registration is fire-and-forget: nothing is returned to the caller.
pub trait RepositoryHandler: Send + Sync {
    /// Registers a maven-layout repository configured by `configure`.
    fn maven(&self, configure: &dyn Fn(&mut RepositorySpec));
}

/// A repository that has been registered with a [`RepositoryList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredRepository {
    /// Repository name.
    pub name: String,
    /// Canonical location.
    pub location: Url,
}

/// In-memory, ordered [`RepositoryHandler`].
#[derive(Debug, Default)]
pub struct RepositoryList {
    repositories: RwLock<Vec<RegisteredRepository>>,
}

impl RepositoryList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the registered repositories in order.
    pub fn repositories(&self) -> Vec<RegisteredRepository> {
        self.repositories.read().clone()
    }

    /// Returns the number of registered repositories.
    pub fn len(&self) -> usize {
        self.repositories.read().len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.repositories.read().is_empty()
    }
}

impl RepositoryHandler for RepositoryList {
    fn maven(&self, configure: &dyn Fn(&mut RepositorySpec)) {
        let mut spec = RepositorySpec::new("maven");
        configure(&mut spec);

        let Some(location) = spec.location.clone() else {
            warn!(repository = %spec.name, "Repository registered without a location, ignoring");
            return;
        };

        debug!(repository = %spec.name, location = %location, "Registered repository");
        self.repositories.write().push(RegisteredRepository {
            name: spec.name,
            location,
        });
    }
}

// =============================================================================
// Artifact Lookup
// =============================================================================

/// A marker module located in a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    /// The coordinates that were resolved.
    pub coordinates: ModuleCoordinates,
    /// The repository that served them, when known.
    pub repository: Option<Url>,
}

/// Resolves marker modules against the registered repositories.
pub trait ArtifactResolver: Send + Sync {
    /// Looks up `coordinates`; `Ok(None)` means no repository has them.
    fn resolve_marker(
        &self,
        coordinates: &ModuleCoordinates,
    ) -> StrategyResult<Option<ResolvedModule>>;
}

// =============================================================================
// Versions
// =============================================================================

/// Classifies version constraints.
pub trait VersionSelector: Send + Sync {
    /// Returns `true` if `version` selects a range rather than one version.
    fn is_dynamic(&self, version: &str) -> bool;
}

/// Treats `+` suffixes, `latest.*` and bracketed ranges as dynamic.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultVersionSelector;

impl VersionSelector for DefaultVersionSelector {
    fn is_dynamic(&self, version: &str) -> bool {
        version.ends_with('+')
            || version.starts_with("latest.")
            || version.starts_with(['[', '(', ']'])
            || version.ends_with([']', ')', '['])
    }
}

// =============================================================================
// Service Bundle
// =============================================================================

/// Collaborators shared by every repository-backed strategy.
#[derive(Clone)]
pub struct ResolutionServices {
    /// Where endpoints register their locations.
    pub repositories: Arc<dyn RepositoryHandler>,
    /// Looks up markers across registered repositories.
    pub artifacts: Arc<dyn ArtifactResolver>,
    /// Classifies requested versions.
    pub versions: Arc<dyn VersionSelector>,
}

impl ResolutionServices {
    /// Creates a bundle with the default version selector.
    pub fn new(
        repositories: Arc<dyn RepositoryHandler>,
        artifacts: Arc<dyn ArtifactResolver>,
    ) -> Self {
        Self {
            repositories,
            artifacts,
            versions: Arc::new(DefaultVersionSelector),
        }
    }

    /// Replaces the version selector.
    pub fn with_versions(mut self, versions: Arc<dyn VersionSelector>) -> Self {
        self.versions = versions;
        self
    }
}

impl std::fmt::Debug for ResolutionServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionServices").finish_non_exhaustive()
    }
}
