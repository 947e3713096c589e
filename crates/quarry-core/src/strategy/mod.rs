//! Resolution strategies.
//!
//! A [`ResolutionStrategy`] is one way of satisfying a
//! [`PluginRequest`]. Strategies are tried in a fixed order by the
//! [`CompositeDispatcher`](crate::CompositeDispatcher):
//!
//! | Strategy | Source |
//! |----------|--------|
//! | [`NoopStrategy`] | nothing; placeholder that always declines |
//! | [`BuiltinStrategy`] | plugins bundled with the host |
//! | [`InjectedClasspathStrategy`] | locally built plugins on an injected classpath |
//! | [`RepositoryStrategy`] | one per declared repository endpoint |
//! | [`RemoteServiceStrategy`] | the remote plugin service |
//!
//! A strategy answers with [`Resolution::NotFound`] when it simply does not
//! know the plugin. Returning `Err` means something broke, and stops the
//! whole resolution.

mod builtin;
mod classpath;
mod noop;
mod remote;
mod repository;

pub use builtin::{BuiltinStrategy, DEFAULT_NAMESPACE};
pub use classpath::{DESCRIPTOR_DIR, InjectedClasspathStrategy};
pub use noop::NoopStrategy;
pub use remote::RemoteServiceStrategy;
pub use repository::RepositoryStrategy;

use std::fmt;
use std::sync::Arc;

use crate::error::StrategyResult;
use crate::request::PluginRequest;
use crate::resolution::Resolution;

/// One pluggable method of resolving a plugin request.
pub trait ResolutionStrategy: Send + Sync {
    /// Name used in diagnostics and in [`FoundPlugin::strategy`](crate::FoundPlugin).
    fn name(&self) -> &str;

    /// Attempts to resolve `request`.
    fn resolve(&self, request: &PluginRequest) -> StrategyResult<Resolution>;
}

/// Shared, type-erased strategy.
pub type BoxedStrategy = Arc<dyn ResolutionStrategy>;

/// An immutable, ordered sequence of strategies.
///
/// Cloning is cheap and clones share the same strategies, so a chain can be
/// handed to several dispatchers or threads.
#[derive(Clone)]
pub struct StrategyChain {
    strategies: Arc<[BoxedStrategy]>,
}

impl StrategyChain {
    /// Creates a chain from strategies in resolution order.
    pub fn new(strategies: Vec<BoxedStrategy>) -> Self {
        Self {
            strategies: strategies.into(),
        }
    }

    /// Returns the number of strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns `true` if the chain has no strategies.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Iterates the strategies in order.
    pub fn iter(&self) -> impl Iterator<Item = &BoxedStrategy> {
        self.strategies.iter()
    }

    /// Returns the strategy at `index`.
    pub fn get(&self, index: usize) -> Option<&BoxedStrategy> {
        self.strategies.get(index)
    }

    /// Returns the strategy names in order.
    pub fn names(&self) -> Vec<String> {
        self.strategies.iter().map(|s| s.name().to_string()).collect()
    }
}

impl FromIterator<BoxedStrategy> for StrategyChain {
    fn from_iter<T: IntoIterator<Item = BoxedStrategy>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StrategyChain {
    type Item = &'a BoxedStrategy;
    type IntoIter = std::slice::Iter<'a, BoxedStrategy>;

    fn into_iter(self) -> Self::IntoIter {
        self.strategies.iter()
    }
}

impl fmt::Debug for StrategyChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.strategies.iter().map(|s| s.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_preserves_order() {
        let chain: StrategyChain = [
            Arc::new(NoopStrategy) as BoxedStrategy,
            Arc::new(RemoteServiceStrategy::offline()) as BoxedStrategy,
        ]
        .into_iter()
        .collect();

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.names(), ["noop", "remote plugin service"]);
        assert_eq!(format!("{chain:?}"), r#"["noop", "remote plugin service"]"#);
    }

    #[test]
    fn test_cloned_chain_shares_strategies() {
        let chain = StrategyChain::new(vec![Arc::new(NoopStrategy) as BoxedStrategy]);
        let clone = chain.clone();
        assert!(Arc::ptr_eq(chain.get(0).unwrap(), clone.get(0).unwrap()));
    }
}
