//! Composite resolution over a strategy chain.
//!
//! For each request the [`CompositeDispatcher`]:
//!
//! 1. Consults strategies in chain order
//! 2. Stops at the first strategy that finds the plugin
//! 3. Collects every decline into one [`NotFound`] otherwise
//!
//! A strategy that fails aborts the walk; later strategies are not asked.

use tracing::{Level, debug, span, warn};

use crate::error::{ResolveError, ResolveResult};
use crate::request::PluginRequest;
use crate::resolution::{NotFound, Resolution};
use crate::strategy::StrategyChain;

/// Resolves plugin requests by walking a [`StrategyChain`].
///
/// # Thread Safety
///
/// `CompositeDispatcher` is `Send + Sync` and holds no per-request state, so
/// one instance can serve any number of concurrent requests.
#[derive(Clone)]
pub struct CompositeDispatcher {
    chain: StrategyChain,
}

impl CompositeDispatcher {
    /// Creates a dispatcher over `chain`.
    pub fn new(chain: StrategyChain) -> Self {
        Self { chain }
    }

    /// Returns the chain.
    pub fn chain(&self) -> &StrategyChain {
        &self.chain
    }

    /// Returns the strategy names in consultation order.
    pub fn strategy_names(&self) -> Vec<String> {
        self.chain.names()
    }

    /// Resolves `request`.
    ///
    /// # Returns
    ///
    /// [`Resolution::Found`] from the first strategy that found the plugin,
    /// or a [`Resolution::NotFound`] with one entry per strategy, in order.
    ///
    /// # Errors
    ///
    /// [`ResolveError::StrategyFailed`] if a strategy fails.
    pub fn resolve(&self, request: &PluginRequest) -> ResolveResult<Resolution> {
        let span = span!(Level::DEBUG, "resolve", plugin = %request.id());
        let _enter = span.enter();

        let mut not_found = NotFound::default();

        for strategy in self.chain.iter() {
            match strategy.resolve(request) {
                Ok(Resolution::Found(found)) => {
                    debug!(strategy = strategy.name(), "Plugin found");
                    return Ok(Resolution::Found(found));
                }
                Ok(Resolution::NotFound(declined)) => {
                    debug!(strategy = strategy.name(), "Strategy declined");
                    not_found.absorb(declined);
                }
                Err(source) => {
                    warn!(strategy = strategy.name(), error = %source, "Strategy failed");
                    return Err(ResolveError::StrategyFailed {
                        strategy: strategy.name().to_string(),
                        request: request.to_string(),
                        source,
                    });
                }
            }
        }

        Ok(Resolution::NotFound(not_found))
    }
}

impl std::fmt::Debug for CompositeDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeDispatcher")
            .field("chain", &self.chain)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StrategyError;
    use crate::services::StaticCatalog;
    use crate::strategy::{BoxedStrategy, BuiltinStrategy};
    use crate::testing::{StubStrategy, id, request};
    use std::sync::Arc;

    fn dispatcher(strategies: Vec<BoxedStrategy>) -> CompositeDispatcher {
        CompositeDispatcher::new(StrategyChain::new(strategies))
    }

    #[test]
    fn test_short_circuits_on_first_found() {
        let first = StubStrategy::not_found("first", "unknown");
        let second = StubStrategy::found("second");
        let third = StubStrategy::found("third");
        let dispatcher = dispatcher(vec![
            first.clone() as BoxedStrategy,
            second.clone(),
            third.clone(),
        ]);

        let resolution = dispatcher.resolve(&request("com.acme.lint@1.0")).unwrap();

        assert_eq!(resolution.as_found().unwrap().strategy, "second");
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
        assert_eq!(third.calls(), 0);
    }

    #[test]
    fn test_aggregates_declines_in_order() {
        let dispatcher = dispatcher(vec![
            StubStrategy::not_found("r1", "no") as BoxedStrategy,
            StubStrategy::not_found("r2", "nope"),
            StubStrategy::not_found("r3", "never"),
        ]);

        let resolution = dispatcher.resolve(&request("com.acme.lint")).unwrap();
        let not_found = resolution.as_not_found().unwrap();

        assert_eq!(not_found.strategies().collect::<Vec<_>>(), ["r1", "r2", "r3"]);
        assert_eq!(not_found.reasons().collect::<Vec<_>>(), ["no", "nope", "never"]);
    }

    #[test]
    fn test_builtin_masks_later_strategies() {
        let catalog = StaticCatalog::new().with(id("quarry.lint"));
        let repository = StubStrategy::found("maven repository 'https://a.example.com/'");
        let dispatcher = dispatcher(vec![
            Arc::new(BuiltinStrategy::new(Arc::new(catalog))) as BoxedStrategy,
            repository.clone(),
        ]);

        let resolution = dispatcher.resolve(&request("lint")).unwrap();

        assert_eq!(resolution.as_found().unwrap().strategy, "core");
        assert_eq!(repository.calls(), 0);
    }

    #[test]
    fn test_failure_stops_the_walk() {
        let after = StubStrategy::found("after");
        let dispatcher = dispatcher(vec![
            StubStrategy::not_found("before", "no") as BoxedStrategy,
            StubStrategy::failing("broken"),
            after.clone(),
        ]);

        let err = dispatcher.resolve(&request("com.acme.lint@1.0")).unwrap_err();

        let ResolveError::StrategyFailed {
            strategy,
            request: shown,
            source,
        } = err;
        assert_eq!(strategy, "broken");
        assert_eq!(shown, "[id: 'com.acme.lint', version: '1.0']");
        assert!(matches!(source, StrategyError::Unavailable { .. }));
        assert_eq!(after.calls(), 0);
    }

    #[test]
    fn test_dispatcher_is_reusable_across_threads() {
        let found = StubStrategy::found("only");
        let dispatcher = dispatcher(vec![found.clone() as BoxedStrategy]);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let resolution = dispatcher.resolve(&request("com.acme.lint")).unwrap();
                    assert!(resolution.is_found());
                });
            }
        });

        assert_eq!(found.calls(), 4);
        assert_eq!(dispatcher.strategy_names(), ["only"]);
    }

    #[test]
    fn test_empty_chain_reports_nothing_consulted() {
        let dispatcher = dispatcher(Vec::new());
        let resolution = dispatcher.resolve(&request("com.acme.lint")).unwrap();
        assert!(resolution.as_not_found().unwrap().declined().is_empty());
    }
}
