use std::path::PathBuf;

use tracing::trace;

use crate::error::StrategyResult;
use crate::request::PluginRequest;
use crate::resolution::{ArtifactDescriptor, Resolution};
use crate::strategy::ResolutionStrategy;

/// Directory under each classpath root that holds plugin descriptors.
pub const DESCRIPTOR_DIR: &str = "quarry-plugins";

/// Resolves locally built plugins from an injected classpath.
///
/// A root provides plugin `p` when it contains `quarry-plugins/p.toml`.
/// Roots are searched in order and the first match wins.
#[derive(Debug, Clone, Default)]
pub struct InjectedClasspathStrategy {
    roots: Vec<PathBuf>,
}

impl InjectedClasspathStrategy {
    /// Strategy name.
    pub const NAME: &'static str = "injected classpath";

    /// Creates a strategy over `roots`.
    pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if no classpath roots were injected.
    pub fn is_classpath_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Returns the classpath roots.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl ResolutionStrategy for InjectedClasspathStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn resolve(&self, request: &PluginRequest) -> StrategyResult<Resolution> {
        let id = request.id();
        let file_name = format!("{id}.toml");

        for root in &self.roots {
            let candidate = root.join(DESCRIPTOR_DIR).join(&file_name);
            trace!(plugin = %id, path = %candidate.display(), "Probing classpath root");
            if candidate.is_file() {
                return Ok(Resolution::found(
                    ArtifactDescriptor::classpath(id.clone(), candidate),
                    Self::NAME,
                ));
            }
        }

        Ok(Resolution::not_found(
            Self::NAME,
            format!(
                "no plugin descriptor in {} classpath root(s)",
                self.roots.len()
            ),
        ))
    }
}
