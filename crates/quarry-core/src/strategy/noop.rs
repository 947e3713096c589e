use crate::error::StrategyResult;
use crate::request::PluginRequest;
use crate::resolution::Resolution;
use crate::strategy::ResolutionStrategy;

/// Strategy that never resolves anything.
///
/// It always sits first in the chain so tests and diagnostics have a fixed
/// anchor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStrategy;

impl NoopStrategy {
    /// Strategy name.
    pub const NAME: &'static str = "noop";
}

impl ResolutionStrategy for NoopStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn resolve(&self, _request: &PluginRequest) -> StrategyResult<Resolution> {
        Ok(Resolution::not_found(
            Self::NAME,
            "the no-op source never provides plugins",
        ))
    }
}
