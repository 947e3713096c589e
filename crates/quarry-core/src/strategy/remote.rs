use std::sync::Arc;

use crate::error::StrategyResult;
use crate::request::PluginRequest;
use crate::resolution::Resolution;
use crate::services::{PluginService, UnconfiguredService};
use crate::strategy::ResolutionStrategy;

/// Resolves plugins through the remote plugin service.
///
/// This is the slowest and most general source and always comes last.
pub struct RemoteServiceStrategy {
    service: Arc<dyn PluginService>,
    offline: bool,
}

impl RemoteServiceStrategy {
    /// Strategy name.
    pub const NAME: &'static str = "remote plugin service";

    /// Creates a strategy backed by `service`.
    pub fn new(service: Arc<dyn PluginService>) -> Self {
        Self {
            service,
            offline: false,
        }
    }

    /// Creates a strategy that never contacts any service.
    pub fn offline() -> Self {
        Self::new(Arc::new(UnconfiguredService)).with_offline(true)
    }

    /// Sets offline mode.
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Returns `true` if offline mode is enabled.
    pub fn is_offline(&self) -> bool {
        self.offline
    }
}

impl ResolutionStrategy for RemoteServiceStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn resolve(&self, request: &PluginRequest) -> StrategyResult<Resolution> {
        if self.offline {
            return Ok(Resolution::not_found(Self::NAME, "offline mode is enabled"));
        }

        match self.service.lookup(request)? {
            Some(artifact) => Ok(Resolution::found(artifact, Self::NAME)),
            None => Ok(Resolution::not_found(
                Self::NAME,
                format!("not found ({})", self.service.describe()),
            )),
        }
    }
}
