use tracing::debug;
use url::Url;

use crate::error::StrategyResult;
use crate::request::PluginRequest;
use crate::resolution::{ArtifactDescriptor, ModuleCoordinates, Resolution};
use crate::services::ResolutionServices;
use crate::strategy::ResolutionStrategy;

/// Resolves plugin markers through a registered repository.
///
/// Built by [`RepositoryEndpoint::as_resolution_strategy`](crate::RepositoryEndpoint::as_resolution_strategy)
/// after the endpoint's location has been registered with the
/// [`RepositoryHandler`](crate::services::RepositoryHandler).
pub struct RepositoryStrategy {
    name: String,
    location: Url,
    services: ResolutionServices,
}

impl RepositoryStrategy {
    pub(crate) fn new(repository: &str, location: Url, services: ResolutionServices) -> Self {
        Self {
            name: format!("{repository} repository '{location}'"),
            location,
            services,
        }
    }

    /// Returns the registered location.
    pub fn location(&self) -> &Url {
        &self.location
    }
}

impl ResolutionStrategy for RepositoryStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, request: &PluginRequest) -> StrategyResult<Resolution> {
        let Some(version) = request.version() else {
            return Ok(Resolution::not_found(
                &self.name,
                "plugin dependency must include a version number for this source",
            ));
        };

        if self.services.versions.is_dynamic(version) {
            return Ok(Resolution::not_found(
                &self.name,
                format!("dynamic plugin versions are not supported ('{version}')"),
            ));
        }

        let coordinates = ModuleCoordinates::marker(request.id(), version);
        debug!(repository = %self.location, marker = %coordinates, "Resolving plugin marker");

        match self.services.artifacts.resolve_marker(&coordinates)? {
            Some(module) => Ok(Resolution::found(
                ArtifactDescriptor::module(request.id().clone(), module.coordinates, module.repository),
                &self.name,
            )),
            None => Ok(Resolution::not_found(
                &self.name,
                format!("could not resolve plugin artifact '{coordinates}'"),
            )),
        }
    }
}
