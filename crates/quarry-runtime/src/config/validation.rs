//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BuiltinConfig, LogOutput, LoggingConfig, QuarryConfig, RepositoryConfig};
use quarry_core::PluginId;
use std::collections::HashSet;

/// Validates the entire configuration.
pub fn validate_config(config: &QuarryConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_builtin_config(&config.resolution.builtin)?;
    validate_repositories(&config.resolution.repositories)?;
    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if let Some(target) = logging.filters.keys().find(|t| t.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Log filter target cannot be empty: {target:?}"
        )));
    }

    Ok(())
}

/// Validates the builtin namespace and plugin list.
fn validate_builtin_config(builtin: &BuiltinConfig) -> ConfigResult<()> {
    if builtin.namespace.is_empty() {
        return Err(ConfigError::missing_field("resolution.builtin.namespace"));
    }

    // The namespace itself must be usable as an id prefix.
    PluginId::new(builtin.namespace.as_str()).map_err(|e| {
        ConfigError::validation(format!(
            "Invalid builtin namespace '{}': {e}",
            builtin.namespace
        ))
    })?;

    let mut seen = HashSet::new();
    for plugin in &builtin.plugins {
        let id = PluginId::new(plugin.as_str()).map_err(|e| ConfigError::InvalidPluginId {
            id: plugin.clone(),
            reason: e.to_string(),
        })?;

        if !seen.insert(id.with_namespace(&builtin.namespace)) {
            return Err(ConfigError::DuplicatePlugin(plugin.clone()));
        }
    }

    Ok(())
}

/// Validates declared repositories.
///
/// Locations are resolved later against the configuration directory, so only
/// emptiness is checked here.
fn validate_repositories(repositories: &[RepositoryConfig]) -> ConfigResult<()> {
    for repository in repositories {
        if repository.url.trim().is_empty() {
            return Err(ConfigError::invalid_url(
                &repository.url,
                "repository URL cannot be empty",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty_config() {
        let config = QuarryConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_file_output_requires_path() {
        let mut config = QuarryConfig::default();
        config.logging.output = LogOutput::File;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_invalid_plugin_id() {
        let mut config = QuarryConfig::default();
        config.resolution.builtin.plugins = vec!["bad id".to_string()];
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidPluginId { .. })
        ));
    }

    #[test]
    fn test_duplicate_builtin_after_qualification() {
        let mut config = QuarryConfig::default();
        config.resolution.builtin.plugins = vec!["lint".to_string(), "quarry.lint".to_string()];
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::DuplicatePlugin(_))
        ));
    }

    #[test]
    fn test_empty_namespace() {
        let mut config = QuarryConfig::default();
        config.resolution.builtin.namespace = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_repository_url() {
        let mut config = QuarryConfig::default();
        config.resolution.repositories = vec![RepositoryConfig::new("  ")];
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
