//! Resolution outcomes.
//!
//! A strategy answers a [`PluginRequest`](crate::PluginRequest) with either
//! [`Resolution::Found`] or [`Resolution::NotFound`]. The composite
//! dispatcher merges the not-found answers of every consulted strategy into a
//! single [`NotFound`] so callers can see *why* each source declined.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use url::Url;

use crate::request::{PluginId, PluginRequest};

/// Maven-style `group:name:version` coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModuleCoordinates {
    /// Group.
    pub group: String,
    /// Artifact name.
    pub name: String,
    /// Version.
    pub version: String,
}

impl ModuleCoordinates {
    /// Suffix of the marker artifact published for every plugin.
    pub const MARKER_SUFFIX: &'static str = ".quarry-plugin";

    /// Creates coordinates.
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Returns the marker coordinates for `id` at `version`.
    ///
    /// The marker of plugin `p` is `p:p.quarry-plugin:version`.
    pub fn marker(id: &PluginId, version: &str) -> Self {
        Self::new(
            id.as_str(),
            format!("{}{}", id, Self::MARKER_SUFFIX),
            version,
        )
    }
}

impl fmt::Display for ModuleCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

/// Where a resolved plugin comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ArtifactSource {
    /// Bundled with the host.
    Bundled,
    /// Found on an injected classpath root.
    Classpath {
        /// The descriptor file that matched.
        path: PathBuf,
    },
    /// A module published to a repository.
    Module {
        /// Marker coordinates.
        coordinates: ModuleCoordinates,
        /// The repository that served it, when known.
        repository: Option<Url>,
    },
    /// Served by the remote plugin service.
    Remote {
        /// Download location reported by the service.
        location: Url,
    },
}

/// Details of a located plugin artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactDescriptor {
    /// The plugin id.
    pub id: PluginId,
    /// The resolved version, if the source is versioned.
    pub version: Option<String>,
    /// Where the artifact lives.
    pub source: ArtifactSource,
}

impl ArtifactDescriptor {
    /// Creates a descriptor for a plugin bundled with the host.
    pub fn bundled(id: PluginId) -> Self {
        Self {
            id,
            version: None,
            source: ArtifactSource::Bundled,
        }
    }

    /// Creates a descriptor for a plugin found on the injected classpath.
    pub fn classpath(id: PluginId, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            version: None,
            source: ArtifactSource::Classpath { path: path.into() },
        }
    }

    /// Creates a descriptor for a repository module.
    pub fn module(id: PluginId, coordinates: ModuleCoordinates, repository: Option<Url>) -> Self {
        Self {
            id,
            version: Some(coordinates.version.clone()),
            source: ArtifactSource::Module {
                coordinates,
                repository,
            },
        }
    }

    /// Creates a descriptor for an artifact served by the remote service.
    pub fn remote(id: PluginId, version: impl Into<String>, location: Url) -> Self {
        Self {
            id,
            version: Some(version.into()),
            source: ArtifactSource::Remote { location },
        }
    }
}

impl fmt::Display for ArtifactDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some(version) = &self.version {
            write!(f, "@{version}")?;
        }
        match &self.source {
            ArtifactSource::Bundled => write!(f, " (bundled)"),
            ArtifactSource::Classpath { path } => write!(f, " ({})", path.display()),
            ArtifactSource::Module {
                coordinates,
                repository: Some(repo),
            } => write!(f, " ({coordinates} from {repo})"),
            ArtifactSource::Module { coordinates, .. } => write!(f, " ({coordinates})"),
            ArtifactSource::Remote { location } => write!(f, " ({location})"),
        }
    }
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundPlugin {
    /// The located artifact.
    pub artifact: ArtifactDescriptor,
    /// Name of the strategy that located it.
    pub strategy: String,
}

/// Why one strategy declined a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declined {
    /// Name of the strategy.
    pub strategy: String,
    /// Human-readable reason.
    pub reason: String,
}

/// A request that no consulted strategy could satisfy.
///
/// Reasons are kept in chain order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotFound {
    reasons: Vec<Declined>,
}

impl NotFound {
    /// Creates a not-found outcome with a single reason.
    pub fn single(strategy: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            reasons: vec![Declined {
                strategy: strategy.into(),
                reason: reason.into(),
            }],
        }
    }

    /// Appends the reasons of another outcome, preserving order.
    pub fn absorb(&mut self, other: NotFound) {
        self.reasons.extend(other.reasons);
    }

    /// Returns every recorded reason.
    pub fn declined(&self) -> &[Declined] {
        &self.reasons
    }

    /// Returns the reason texts in order.
    pub fn reasons(&self) -> impl Iterator<Item = &str> {
        self.reasons.iter().map(|d| d.reason.as_str())
    }

    /// Returns the names of the strategies that declined, in order.
    pub fn strategies(&self) -> impl Iterator<Item = &str> {
        self.reasons.iter().map(|d| d.strategy.as_str())
    }
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "was not found in any of the following sources:")?;
        for declined in &self.reasons {
            write!(f, "\n- {} ({})", declined.strategy, declined.reason)?;
        }
        Ok(())
    }
}

/// The outcome of resolving a plugin request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The plugin was located.
    Found(FoundPlugin),
    /// No strategy could locate the plugin.
    NotFound(NotFound),
}

impl Resolution {
    /// Creates a found outcome.
    pub fn found(artifact: ArtifactDescriptor, strategy: impl Into<String>) -> Self {
        Self::Found(FoundPlugin {
            artifact,
            strategy: strategy.into(),
        })
    }

    /// Creates a not-found outcome with a single reason.
    pub fn not_found(strategy: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotFound(NotFound::single(strategy, reason))
    }

    /// Returns `true` if the plugin was located.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns the found plugin, if any.
    pub fn as_found(&self) -> Option<&FoundPlugin> {
        match self {
            Self::Found(found) => Some(found),
            Self::NotFound(_) => None,
        }
    }

    /// Returns the not-found details, if any.
    pub fn as_not_found(&self) -> Option<&NotFound> {
        match self {
            Self::Found(_) => None,
            Self::NotFound(not_found) => Some(not_found),
        }
    }

    /// Renders a user-facing report for `request`.
    pub fn report(&self, request: &PluginRequest) -> String {
        match self {
            Self::Found(found) => {
                format!("Plugin {request} resolved to {} by {}", found.artifact, found.strategy)
            }
            Self::NotFound(not_found) => format!("Plugin {request} {not_found}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> PluginId {
        PluginId::new(s).unwrap()
    }

    #[test]
    fn test_marker_coordinates() {
        let coords = ModuleCoordinates::marker(&id("com.acme.lint"), "1.0");
        assert_eq!(coords.to_string(), "com.acme.lint:com.acme.lint.quarry-plugin:1.0");
    }

    #[test]
    fn test_not_found_absorb_keeps_order() {
        let mut all = NotFound::default();
        all.absorb(NotFound::single("a", "r1"));
        all.absorb(NotFound::single("b", "r2"));
        assert_eq!(all.reasons().collect::<Vec<_>>(), ["r1", "r2"]);
        assert_eq!(all.strategies().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn test_not_found_report_lists_sources() {
        let mut all = NotFound::single("core", "not a builtin plugin");
        all.absorb(NotFound::single("remote plugin service", "offline"));
        let request = PluginRequest::new(id("lint"));
        let report = Resolution::NotFound(all).report(&request);

        assert!(report.starts_with("Plugin [id: 'lint'] was not found"));
        assert!(report.contains("- core (not a builtin plugin)"));
        assert!(report.contains("- remote plugin service (offline)"));
    }

    #[test]
    fn test_resolution_accessors() {
        let found = Resolution::found(ArtifactDescriptor::bundled(id("java")), "core");
        assert!(found.is_found());
        assert_eq!(found.as_found().unwrap().strategy, "core");
        assert!(found.as_not_found().is_none());

        let missing = Resolution::not_found("noop", "nothing here");
        assert!(!missing.is_found());
        assert_eq!(missing.as_not_found().unwrap().declined().len(), 1);
    }
}
