//! Quarry Runtime - wiring layer for the Quarry plugin resolver.
//!
//! This crate provides:
//! - Layered configuration loading and validation (`config`)
//! - Logging configuration (`logging`)
//! - File-backed marker lookup for local repositories (`FileRepositoryResolver`)
//! - The `QuarryRuntime`, which turns configuration into a ready dispatcher
//!
//! ```ignore
//! use quarry_runtime::QuarryRuntime;
//!
//! fn main() -> anyhow::Result<()> {
//!     let runtime = QuarryRuntime::builder()
//!         .config_file("quarry.toml")
//!         .build()?;
//!
//!     let resolution = runtime.resolve_str("com.acme.lint@1.0")?;
//!     println!("{resolution:?}");
//!     Ok(())
//! }
//! ```
//!
//! # Repository Override
//!
//! Setting `QUARRY_PLUGIN_REPO_URL` appends one more repository after every
//! declared one. Use [`RuntimeBuilder::repository_override`] to set it
//! without touching the environment.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use artifacts::FileRepositoryResolver;
pub use config::{
    ConfigError, ConfigLoader, ConfigResult, LoadedConfig, Profile, QuarryConfig,
    RepositoryOverride,
};
pub use error::{RuntimeError, RuntimeResult};
pub use runtime::{QuarryRuntime, RuntimeBuilder};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, span, trace, warn};
}
