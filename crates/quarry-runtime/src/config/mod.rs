//! Configuration module for the Quarry runtime.
//!
//! Layered loading (files, environment, programmatic overrides), the
//! configuration schema, validation, and the repository override read from
//! the process environment.

pub mod error;
pub mod loader;
pub mod overrides;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, LoadedConfig, PROFILE_ENV, Profile};
pub use overrides::{OVERRIDE_ENV, RepositoryOverride};
pub use schema::{
    BuiltinConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, QuarryConfig, RepositoryConfig,
    ResolutionConfig, SpanEventConfig,
};
pub use validation::validate_config;

/// Loads configuration from the default locations and validates it.
pub fn load_config() -> ConfigResult<QuarryConfig> {
    let config = ConfigLoader::new().load()?;
    validate_config(&config)?;
    Ok(config)
}

/// Loads configuration from `path` and validates it.
pub fn load_config_from_file(path: impl AsRef<std::path::Path>) -> ConfigResult<QuarryConfig> {
    let config = ConfigLoader::new().file(path).load()?;
    validate_config(&config)?;
    Ok(config)
}
