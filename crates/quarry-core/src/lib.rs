//! # Quarry Core
//!
//! The plugin resolution engine of Quarry.
//!
//! Given a plugin id and an optional version, Quarry consults an ordered
//! chain of resolution strategies, stops at the first one that finds the
//! plugin, and otherwise reports every strategy it asked and why each one
//! declined.
//!
//! ## Building Blocks
//!
//! - **Requests**: validated ids and optional versions ([`PluginId`], [`PluginRequest`])
//! - **Outcomes**: found artifacts or aggregated declines ([`Resolution`], [`NotFound`])
//! - **Strategies**: one source each ([`ResolutionStrategy`], [`StrategyChain`])
//! - **Endpoints**: declared repositories that freeze on first use ([`RepositoryEndpoint`])
//! - **Assembly**: the fixed chain order ([`StrategyFactory`]) and the walk over it
//!   ([`CompositeDispatcher`])
//! - **Services**: collaborator traits for everything outside the engine ([`services`])
//!
//! ## Chain Order
//!
//! ```text
//! ┌──────┐   ┌──────┐   ┌───────────┐   ┌──────────────┐   ┌────────┐
//! │ noop │──▶│ core │──▶│ classpath │──▶│ repositories │──▶│ remote │
//! └──────┘   └──────┘   └───────────┘   └──────────────┘   └────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use quarry_core::prelude::*;
//! use std::sync::Arc;
//!
//! let services = ResolutionServices::new(Arc::new(RepositoryList::new()), artifacts);
//! let registry = Arc::new(RepositoryRegistry::new(
//!     DefaultFileLookup.file_resolver(project_dir),
//!     services,
//! ));
//! registry.maven_at("https://plugins.example.com/m2");
//!
//! let factory = StrategyFactory::new(
//!     BuiltinStrategy::new(Arc::new(StaticCatalog::new())),
//!     InjectedClasspathStrategy::default(),
//!     registry,
//!     RemoteServiceStrategy::offline(),
//! );
//!
//! let dispatcher = CompositeDispatcher::new(factory.build_chain()?);
//! let request = PluginRequest::parse("com.acme.lint@1.0")?;
//! println!("{}", dispatcher.resolve(&request)?.report(&request));
//! ```

pub mod dispatcher;
pub mod endpoint;
pub mod error;
pub mod factory;
pub mod registry;
pub mod request;
pub mod resolution;
pub mod services;
pub mod strategy;

#[cfg(test)]
mod testing;

pub use dispatcher::CompositeDispatcher;
pub use endpoint::{MAVEN, RepositoryEndpoint};
pub use error::{
    EndpointError, LocationError, LocationResult, RequestError, ResolveError, ResolveResult,
    StrategyError, StrategyResult,
};
pub use factory::{StrategyFactory, assemble_chain};
pub use registry::RepositoryRegistry;
pub use request::{PluginId, PluginRequest};
pub use resolution::{
    ArtifactDescriptor, ArtifactSource, Declined, FoundPlugin, ModuleCoordinates, NotFound,
    Resolution,
};
pub use strategy::{
    BoxedStrategy, BuiltinStrategy, InjectedClasspathStrategy, NoopStrategy,
    RemoteServiceStrategy, RepositoryStrategy, ResolutionStrategy, StrategyChain,
};

/// Prelude for common imports.
pub mod prelude {
    pub use super::services::{
        ArtifactResolver, DefaultFileLookup, FileLookup, FileResolver, PluginCatalog,
        PluginService, RepositoryHandler, RepositoryList, ResolutionServices, StaticCatalog,
    };
    pub use super::{
        ArtifactDescriptor, BuiltinStrategy, CompositeDispatcher, InjectedClasspathStrategy,
        NotFound, PluginId, PluginRequest, RemoteServiceStrategy, RepositoryEndpoint,
        RepositoryRegistry, Resolution, ResolutionStrategy, StrategyChain, StrategyFactory,
    };
}
