//! # Quarry
//!
//! Ordered, masking-aware plugin resolution.
//!
//! ## Overview
//!
//! A host asks Quarry for a plugin by id and optional version. Quarry walks a
//! fixed chain of sources and answers with the first match, or with a report
//! listing every source it asked and why each one declined.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌────────────┐     ┌──────────────────────────────────────┐
//! │   Runtime   │────▶│ Dispatcher │────▶│ noop → core → classpath              │
//! │  (config)   │     │            │     │      → repositories → override       │
//! └─────────────┘     └────────────┘     │      → remote plugin service         │
//!                                        └──────────────────────────────────────┘
//! ```
//!
//! - **Runtime**: Loads configuration, sets up logging and builds the chain
//! - **Dispatcher**: Walks the chain and merges the declines
//! - **Strategies**: One plugin source each
//! - **Endpoints**: Declared repositories, frozen once the chain is built
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quarry::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let runtime = QuarryRuntime::builder().build()?;
//!     let request = PluginRequest::parse("com.acme.lint@1.0")?;
//!     println!("{}", runtime.resolve(&request)?.report(&request));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: Load `quarry.toml` files (default)
//! - `yaml-config`: Load `quarry.yaml` / `quarry.yml` files
//! - `json-log`: Enable the JSON log format

pub use quarry_core as core;
pub use quarry_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use quarry::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use quarry_runtime::{QuarryConfig, QuarryRuntime, RuntimeError, RuntimeResult};

    // Requests and outcomes
    pub use quarry_core::{
        ArtifactDescriptor, ArtifactSource, FoundPlugin, NotFound, PluginId, PluginRequest,
        Resolution,
    };

    // Building blocks for custom chains
    pub use quarry_core::{
        CompositeDispatcher, RepositoryEndpoint, RepositoryRegistry, ResolutionStrategy,
        StrategyChain, StrategyFactory,
    };
}
