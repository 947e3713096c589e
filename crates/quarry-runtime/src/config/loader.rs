//! Configuration loader using figment.
//!
//! This module provides a layered configuration loading system that supports:
//!
//! - **Multiple sources**: TOML/YAML files, environment variables, programmatic defaults
//! - **Layered configuration**: Later sources override earlier ones
//! - **Profile support**: Development vs production configurations
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: enables TOML configuration files (`quarry.toml`)
//! - `yaml-config`: enables YAML configuration files (`quarry.yaml`, `quarry.yml`)
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Profile-specific config file (`quarry.{profile}.toml`)
//! 3. Main config file (`quarry.toml`)
//! 4. Environment variables (`QUARRY_*`)
//! 5. Programmatic overrides
//!
//! # Environment Variable Mapping
//!
//! Environment variables are mapped using the `QUARRY_` prefix with `__` as separator:
//!
//! - `QUARRY_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `QUARRY_RESOLUTION__OFFLINE=true` → `resolution.offline = true`
//! - `QUARRY_RESOLUTION__BUILTIN__NAMESPACE=acme` → `resolution.builtin.namespace = "acme"`
//!
//! # Example
//!
//! ```rust,ignore
//! use quarry_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .file("./config/quarry.toml")
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use tracing::{debug, info, trace};

use super::error::{ConfigError, ConfigResult};
use super::schema::QuarryConfig;

/// Environment variable selecting the profile.
pub const PROFILE_ENV: &str = "QUARRY_PROFILE";

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Parses a profile name; `prod` and `dev` are accepted as aliases.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Reads the profile from `QUARRY_PROFILE`, defaulting to Development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_ENV)
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A loaded configuration together with the main file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The extracted configuration.
    pub config: QuarryConfig,
    /// The main configuration file, if one was found.
    pub source: Option<PathBuf>,
}

impl LoadedConfig {
    /// Returns the directory relative repository paths resolve against.
    ///
    /// This is the directory of the main configuration file, if any.
    pub fn base_dir(&self) -> Option<&Path> {
        self.source.as_deref().and_then(Path::parent)
    }
}

/// Configuration loader with figment-based multi-source support.
///
/// # Example
///
/// ```rust,ignore
/// let config = ConfigLoader::new()
///     .file("quarry.toml")
///     .with_env()
///     .load()?;
/// ```
pub struct ConfigLoader {
    /// Base figment instance.
    figment: Figment,
    /// Configuration profile.
    profile: Profile,
    /// Search paths for configuration files.
    search_paths: Vec<PathBuf>,
    /// Whether to load environment variables.
    load_env: bool,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with defaults.
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds current directory to search paths.
    pub fn with_current_dir(self) -> Self {
        if let Ok(cwd) = std::env::current_dir() {
            self.search_path(cwd)
        } else {
            self
        }
    }

    /// Adds user config directory to search paths.
    pub fn with_user_config_dir(self) -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            self.search_path(config_dir.join("quarry"))
        } else {
            self
        }
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables loading environment variables (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges additional configuration programmatically.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = ConfigLoader::new()
    ///     .merge(QuarryConfig {
    ///         resolution: ResolutionConfig { offline: true, ..Default::default() },
    ///         ..Default::default()
    ///     })
    ///     .load()?;
    /// ```
    pub fn merge(mut self, config: QuarryConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Loads and returns the configuration.
    pub fn load(self) -> ConfigResult<QuarryConfig> {
        self.load_with_source().map(|loaded| loaded.config)
    }

    /// Loads the configuration and reports which main file was used.
    pub fn load_with_source(self) -> ConfigResult<LoadedConfig> {
        let profile = self.profile.clone();
        let (figment, source) = self.build_figment()?;

        let config: QuarryConfig = figment.extract()?;

        debug!(
            profile = %profile,
            logging_level = %config.logging.level,
            repositories = config.resolution.repositories.len(),
            "Configuration loaded successfully"
        );

        Ok(LoadedConfig { config, source })
    }

    /// Builds the figment instance with all sources.
    fn build_figment(mut self) -> ConfigResult<(Figment, Option<PathBuf>)> {
        let mut figment = Figment::from(Serialized::defaults(QuarryConfig::default()));
        let source;

        if let Some(path) = self.config_file.take() {
            if path.exists() {
                info!(path = %path.display(), "Loading configuration file");
                figment = Self::merge_config_file(figment, &path)?;
                source = Some(absolute(path));
            } else {
                return Err(ConfigError::FileNotFound(path));
            }
        } else {
            let (f, found) = self.load_config_files(figment);
            figment = f;
            source = found;
        }

        if self.load_env {
            trace!("Loading environment variables with QUARRY_ prefix");
            figment = figment.merge(Env::prefixed("QUARRY_").split("__"));
        }

        // Programmatic overrides win over every other source.
        let user_figment = std::mem::take(&mut self.figment);
        figment = figment.merge(user_figment);

        Ok((figment, source))
    }

    /// Merges a single config file into the figment, dispatching on file extension.
    ///
    /// Only extensions enabled via feature flags are accepted.
    fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            #[cfg(feature = "toml-config")]
            "toml" => Ok(figment.merge(Toml::file(path))),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
            _ => Err(ConfigError::ParseError(format!(
                "Unsupported or disabled configuration file format: .{ext}"
            ))),
        }
    }

    /// Resolves the effective list of search paths.
    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if self.search_paths.is_empty() {
            let mut paths = Vec::new();
            if let Ok(cwd) = std::env::current_dir() {
                paths.push(cwd);
            }
            if let Some(config_dir) = dirs::config_dir() {
                paths.push(config_dir.join("quarry"));
            }
            paths
        } else {
            self.search_paths.clone()
        }
    }

    /// Common search logic for a single file format.
    ///
    /// Iterates `search_paths × base_names`, tries a profile-specific variant first, then the
    /// base file. Stops at the first base file found and returns its path.
    #[cfg(any(feature = "toml-config", feature = "yaml-config"))]
    fn load_format_files<F>(
        &self,
        mut figment: Figment,
        search_paths: &[PathBuf],
        base_names: &[&str],
        merge_fn: F,
    ) -> (Figment, Option<PathBuf>)
    where
        F: Fn(Figment, &Path) -> Figment,
    {
        for search_path in search_paths {
            for base_name in base_names {
                let Some((stem, ext)) = base_name.rsplit_once('.') else {
                    continue;
                };

                // Profile-specific: e.g. quarry.production.toml
                let profile_name = format!("{}.{}.{}", stem, self.profile.as_str(), ext);
                let profile_path = search_path.join(&profile_name);
                if profile_path.exists() {
                    debug!(path = %profile_path.display(), "Loading profile-specific config");
                    figment = merge_fn(figment, &profile_path);
                }

                let base_path = search_path.join(base_name);
                if base_path.exists() {
                    info!(path = %base_path.display(), "Loading configuration file");
                    figment = merge_fn(figment, &base_path);
                    return (figment, Some(absolute(base_path)));
                }
            }
        }
        (figment, None)
    }

    /// Searches for and loads configuration files from search paths.
    ///
    /// Which file formats are attempted is controlled by the `toml-config` and `yaml-config`
    /// feature flags. The first format that yields a main file wins.
    fn load_config_files(&self, figment: Figment) -> (Figment, Option<PathBuf>) {
        let search_paths = self.resolve_search_paths();
        let found: Option<PathBuf> = None;

        #[cfg(feature = "toml-config")]
        let (figment, found) = {
            let (figment, path) = self.load_format_files(
                figment,
                &search_paths,
                &["quarry.toml"],
                |fig, path| fig.merge(Toml::file(path)),
            );
            (figment, found.or(path))
        };

        #[cfg(feature = "yaml-config")]
        let (figment, found) = {
            let (figment, path) = self.load_format_files(
                figment,
                &search_paths,
                &["quarry.yaml", "quarry.yml"],
                |fig, path| fig.merge(Yaml::file(path)),
            );
            (figment, found.or(path))
        };

        if found.is_none() {
            debug!(paths = ?search_paths, "No configuration file found, using defaults");
        }
        (figment, found)
    }
}

/// Makes `path` absolute against the working directory.
fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}

// =============================================================================
// Tests
// =============================================================================
