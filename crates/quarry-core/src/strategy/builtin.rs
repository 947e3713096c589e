use std::sync::Arc;

use tracing::trace;

use crate::error::{StrategyError, StrategyResult};
use crate::request::PluginRequest;
use crate::resolution::Resolution;
use crate::services::PluginCatalog;
use crate::strategy::ResolutionStrategy;

/// Namespace reserved for plugins bundled with the host.
pub const DEFAULT_NAMESPACE: &str = "quarry";

/// Resolves plugins bundled with the host.
///
/// Unqualified ids are looked up inside the builtin namespace, so `java` and
/// `quarry.java` name the same plugin. Ids qualified with any other namespace
/// are declined without touching the catalog.
pub struct BuiltinStrategy {
    namespace: String,
    catalog: Arc<dyn PluginCatalog>,
}

impl BuiltinStrategy {
    /// Strategy name.
    pub const NAME: &'static str = "core";

    /// Creates a builtin strategy for [`DEFAULT_NAMESPACE`].
    pub fn new(catalog: Arc<dyn PluginCatalog>) -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE, catalog)
    }

    /// Creates a builtin strategy for a custom namespace.
    pub fn with_namespace(namespace: impl Into<String>, catalog: Arc<dyn PluginCatalog>) -> Self {
        Self {
            namespace: namespace.into(),
            catalog,
        }
    }

    /// Returns the builtin namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl ResolutionStrategy for BuiltinStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn resolve(&self, request: &PluginRequest) -> StrategyResult<Resolution> {
        let id = request.id();

        if let Some(namespace) = id.namespace() {
            if namespace != self.namespace {
                trace!(plugin = %id, namespace, "Outside the builtin namespace");
                return Ok(Resolution::not_found(
                    Self::NAME,
                    format!("plugin is not in the '{}' namespace", self.namespace),
                ));
            }
        }

        let qualified = id.with_namespace(&self.namespace);
        let Some(artifact) = self.catalog.find(&qualified) else {
            return Ok(Resolution::not_found(Self::NAME, "not a builtin plugin"));
        };

        if request.version().is_some() {
            return Err(StrategyError::invalid_request(
                request,
                format!(
                    "plugin '{qualified}' is bundled with the host and cannot be requested with a version"
                ),
            ));
        }

        Ok(Resolution::found(artifact, Self::NAME))
    }
}
