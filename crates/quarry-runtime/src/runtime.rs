//! Runtime wiring from configuration to a ready dispatcher.
//!
//! The runtime declares one repository endpoint per configured repository,
//! assembles the builtin, classpath and remote strategies, and builds the
//! resolution chain on first use.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use quarry_runtime::QuarryRuntime;
//!
//! // Auto-loads quarry.toml from the current directory
//! let runtime = QuarryRuntime::builder().build()?;
//! let resolution = runtime.resolve_str("com.acme.lint@1.0")?;
//!
//! // Custom configuration path
//! let runtime = QuarryRuntime::builder()
//!     .config_file("config/quarry.toml")
//!     .profile("production")
//!     .build()?;
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use quarry_core::services::{
    ArtifactResolver, DefaultFileLookup, FileLookup, PluginCatalog, PluginService,
    RegisteredRepository, RepositoryList, ResolutionServices, StaticCatalog, UnconfiguredService,
};
use quarry_core::{
    BuiltinStrategy, CompositeDispatcher, InjectedClasspathStrategy, PluginId, PluginRequest,
    RemoteServiceStrategy, RepositoryRegistry, Resolution, StrategyFactory,
};
use tracing::{debug, info};

use crate::artifacts::FileRepositoryResolver;
use crate::config::{ConfigLoader, LoadedConfig, QuarryConfig, RepositoryOverride, validate_config};
use crate::error::RuntimeResult;
use crate::logging;

/// Plugin resolution runtime.
///
/// # Simple Usage
///
/// ```rust,ignore
/// let runtime = QuarryRuntime::builder().build()?;
///
/// match runtime.resolve_str("lint")? {
///     Resolution::Found(found) => println!("{} via {}", found.artifact, found.strategy),
///     Resolution::NotFound(not_found) => println!("{not_found}"),
/// }
/// ```
///
/// # Thread Safety
///
/// `QuarryRuntime` is `Send + Sync`; concurrent first resolutions may both
/// build a chain, but endpoints register their locations only once.
pub struct QuarryRuntime {
    /// The configuration.
    config: QuarryConfig,
    /// Repositories registered by frozen endpoints.
    repositories: Arc<RepositoryList>,
    /// Builds the resolution chain.
    factory: StrategyFactory,
    /// Built on first resolution.
    dispatcher: OnceLock<CompositeDispatcher>,
}

impl QuarryRuntime {
    /// Creates a runtime builder for custom configuration.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from an already loaded configuration.
    ///
    /// Relative paths resolve against the working directory and logging is
    /// initialized from `config.logging`.
    pub fn from_config(config: &QuarryConfig) -> RuntimeResult<Self> {
        Self::builder().config(config.clone()).build()
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &QuarryConfig {
        &self.config
    }

    /// Returns the registry of declared endpoints.
    ///
    /// Endpoints declared after the first resolution are not part of the
    /// chain.
    pub fn registry(&self) -> &Arc<RepositoryRegistry> {
        self.factory.registry()
    }

    /// Returns the repositories registered so far, in registration order.
    pub fn repositories(&self) -> Vec<RegisteredRepository> {
        self.repositories.repositories()
    }

    /// Returns the dispatcher, building the chain on first use.
    ///
    /// # Errors
    ///
    /// Fails if a declared repository location cannot be resolved. The
    /// next call retries.
    pub fn dispatcher(&self) -> RuntimeResult<&CompositeDispatcher> {
        if let Some(dispatcher) = self.dispatcher.get() {
            return Ok(dispatcher);
        }

        let chain = self.factory.build_chain()?;
        info!(strategies = ?chain.names(), "Resolution chain ready");
        Ok(self.dispatcher.get_or_init(|| CompositeDispatcher::new(chain)))
    }

    /// Resolves `request`.
    pub fn resolve(&self, request: &PluginRequest) -> RuntimeResult<Resolution> {
        Ok(self.dispatcher()?.resolve(request)?)
    }

    /// Parses `input` as `id` or `id@version` and resolves it.
    pub fn resolve_str(&self, input: &str) -> RuntimeResult<Resolution> {
        let request = PluginRequest::parse(input)?;
        self.resolve(&request)
    }
}

impl std::fmt::Debug for QuarryRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuarryRuntime")
            .field("factory", &self.factory)
            .field("chain_built", &self.dispatcher.get().is_some())
            .finish()
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for creating a [`QuarryRuntime`].
///
/// # Example
///
/// ```rust,ignore
/// let runtime = QuarryRuntime::builder()
///     .config_file("config/quarry.toml")
///     .plugin_service(Arc::new(MyPortalClient::new()))
///     .build()?;
/// ```
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
    config: Option<QuarryConfig>,
    base_dir: Option<PathBuf>,
    catalog: Option<Arc<dyn PluginCatalog>>,
    plugin_service: Option<Arc<dyn PluginService>>,
    artifact_resolver: Option<Arc<dyn ArtifactResolver>>,
    file_lookup: Arc<dyn FileLookup>,
    repository_override: Option<RepositoryOverride>,
    init_logging: bool,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
            config: None,
            base_dir: None,
            catalog: None,
            plugin_service: None,
            artifact_resolver: None,
            file_lookup: Arc::new(DefaultFileLookup),
            repository_override: None,
            init_logging: true,
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Uses `config` instead of loading one.
    pub fn config(mut self, config: QuarryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the directory relative repository and classpath paths resolve
    /// against. Defaults to the configuration file's directory, then the
    /// working directory.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Replaces the builtin catalog built from `resolution.builtin.plugins`.
    pub fn catalog(mut self, catalog: Arc<dyn PluginCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Sets the remote plugin service client.
    pub fn plugin_service(mut self, service: Arc<dyn PluginService>) -> Self {
        self.plugin_service = Some(service);
        self
    }

    /// Replaces the file-backed marker lookup.
    pub fn artifact_resolver(mut self, resolver: Arc<dyn ArtifactResolver>) -> Self {
        self.artifact_resolver = Some(resolver);
        self
    }

    /// Sets the file lookup used to resolve repository locations.
    pub fn file_lookup(mut self, file_lookup: Arc<dyn FileLookup>) -> Self {
        self.file_lookup = file_lookup;
        self
    }

    /// Sets the repository override instead of reading the environment.
    pub fn repository_override(mut self, repository_override: RepositoryOverride) -> Self {
        self.repository_override = Some(repository_override);
        self
    }

    /// Whether to initialize logging from the configuration (default: true).
    pub fn init_logging(mut self, enabled: bool) -> Self {
        self.init_logging = enabled;
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> RuntimeResult<QuarryRuntime> {
        let loaded = match self.config {
            Some(config) => LoadedConfig {
                config,
                source: None,
            },
            None => self.config_loader.load_with_source()?,
        };
        validate_config(&loaded.config)?;

        if self.init_logging {
            logging::init_from_config(&loaded.config.logging);
        }

        let base_dir = match self.base_dir.or_else(|| loaded.base_dir().map(Path::to_path_buf)) {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let config = loaded.config;
        let resolution = &config.resolution;

        let repositories = Arc::new(RepositoryList::new());
        let artifacts = self.artifact_resolver.unwrap_or_else(|| {
            let resolver = FileRepositoryResolver::new(Arc::clone(&repositories));
            Arc::new(resolver) as Arc<dyn ArtifactResolver>
        });
        let services = ResolutionServices::new(repositories.clone(), artifacts);

        let registry = Arc::new(RepositoryRegistry::new(
            self.file_lookup.file_resolver(&base_dir),
            services,
        ));
        for repository in &resolution.repositories {
            registry.maven_at(repository.url.as_str());
        }

        let namespace = &resolution.builtin.namespace;
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => {
                let catalog = resolution
                    .builtin
                    .plugins
                    .iter()
                    .map(|id| PluginId::new(id.as_str()).map(|id| id.with_namespace(namespace)))
                    .collect::<Result<StaticCatalog, _>>()?;
                Arc::new(catalog)
            }
        };

        let classpath =
            InjectedClasspathStrategy::new(resolution.classpath.iter().map(|p| base_dir.join(p)));

        let service = self
            .plugin_service
            .unwrap_or_else(|| Arc::new(UnconfiguredService) as Arc<dyn PluginService>);
        let remote = RemoteServiceStrategy::new(service).with_offline(resolution.offline);

        let repository_override = self
            .repository_override
            .unwrap_or_else(RepositoryOverride::from_env);

        let factory = StrategyFactory::new(
            BuiltinStrategy::with_namespace(namespace.clone(), catalog),
            classpath,
            registry,
            remote,
        )
        .with_file_lookup(self.file_lookup)
        .with_override_location(repository_override.into_location());

        debug!(
            base_dir = %base_dir.display(),
            repositories = resolution.repositories.len(),
            offline = resolution.offline,
            "Runtime initialized from configuration"
        );

        Ok(QuarryRuntime {
            config,
            repositories,
            factory,
            dispatcher: OnceLock::new(),
        })
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RepositoryConfig, ResolutionConfig};
    use crate::error::RuntimeError;
    use quarry_core::{ModuleCoordinates, ResolveError, StrategyError};
    use std::fs;
    use url::Url;

    fn runtime(base: &Path, resolution: ResolutionConfig) -> QuarryRuntime {
        QuarryRuntime::builder()
            .config(QuarryConfig {
                resolution,
                ..Default::default()
            })
            .base_dir(base)
            .repository_override(RepositoryOverride::none())
            .init_logging(false)
            .build()
            .unwrap()
    }

    fn publish_marker(repo: &Path, id: &str, version: &str) {
        let coordinates = ModuleCoordinates::marker(&PluginId::new(id).unwrap(), version);
        let path = FileRepositoryResolver::marker_path(repo.to_path_buf(), &coordinates);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<project/>").unwrap();
    }

    #[test]
    fn test_minimal_chain() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = runtime(dir.path(), ResolutionConfig::default());

        assert_eq!(
            runtime.dispatcher().unwrap().strategy_names(),
            ["noop", "core", "remote plugin service"]
        );
        assert!(runtime.repositories().is_empty());
    }

    #[test]
    fn test_builtin_plugin() {
        let dir = tempfile::tempdir().unwrap();
        let mut resolution = ResolutionConfig::default();
        resolution.builtin.plugins = vec!["java".to_string()];
        let runtime = runtime(dir.path(), resolution);

        let resolution = runtime.resolve_str("java").unwrap();
        assert_eq!(resolution.as_found().unwrap().strategy, "core");

        let err = runtime.resolve_str("quarry.java@1.0").unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Resolve(ResolveError::StrategyFailed {
                source: StrategyError::InvalidRequest { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_relative_repository_resolves_against_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        publish_marker(&dir.path().join("repo"), "com.acme.lint", "1.0");

        let resolution = ResolutionConfig {
            repositories: vec![RepositoryConfig::new("repo")],
            offline: true,
            ..Default::default()
        };
        let runtime = runtime(dir.path(), resolution);

        let location = Url::from_file_path(dir.path().join("repo")).unwrap();
        let found = runtime.resolve_str("com.acme.lint@1.0").unwrap();
        assert_eq!(
            found.as_found().unwrap().strategy,
            format!("maven repository '{location}'")
        );
        assert_eq!(runtime.repositories().len(), 1);
        assert_eq!(runtime.repositories()[0].location, location);
    }

    #[test]
    fn test_classpath_plugin() {
        let dir = tempfile::tempdir().unwrap();
        let descriptors = dir.path().join("build").join("quarry-plugins");
        fs::create_dir_all(&descriptors).unwrap();
        fs::write(descriptors.join("com.acme.fmt.toml"), "").unwrap();

        let resolution = ResolutionConfig {
            classpath: vec![PathBuf::from("build")],
            ..Default::default()
        };
        let runtime = runtime(dir.path(), resolution);

        let found = runtime.resolve_str("com.acme.fmt").unwrap();
        assert_eq!(found.as_found().unwrap().strategy, "injected classpath");
    }

    #[test]
    fn test_not_found_lists_every_source() {
        let dir = tempfile::tempdir().unwrap();
        let resolution = ResolutionConfig {
            repositories: vec![RepositoryConfig::new("https://plugins.example.com/m2")],
            offline: true,
            ..Default::default()
        };
        let runtime = runtime(dir.path(), resolution);

        let outcome = runtime.resolve_str("com.acme.lint").unwrap();
        let not_found = outcome.as_not_found().unwrap();
        assert_eq!(
            not_found.strategies().collect::<Vec<_>>(),
            [
                "noop",
                "core",
                "maven repository 'https://plugins.example.com/m2'",
                "remote plugin service",
            ]
        );
        assert_eq!(not_found.reasons().last(), Some("offline mode is enabled"));
    }

    #[test]
    fn test_override_comes_after_declared_repositories() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = dir.path().join("mirror");
        publish_marker(&mirror, "com.acme.lint", "2.0");

        let runtime = QuarryRuntime::builder()
            .config(QuarryConfig {
                resolution: ResolutionConfig {
                    repositories: vec![RepositoryConfig::new("https://a.example.com/")],
                    offline: true,
                    ..Default::default()
                },
                ..Default::default()
            })
            .base_dir(dir.path())
            .repository_override(RepositoryOverride::new(mirror.to_string_lossy()))
            .init_logging(false)
            .build()
            .unwrap();

        let mirror_url = Url::from_file_path(&mirror).unwrap();
        let names = runtime.dispatcher().unwrap().strategy_names();
        assert_eq!(names[2], "maven repository 'https://a.example.com/'");
        assert_eq!(names[3], format!("maven repository '{mirror_url}'"));

        let found = runtime.resolve_str("com.acme.lint@2.0").unwrap();
        assert!(found.is_found());
        assert_eq!(runtime.repositories().len(), 2);
    }

    #[test]
    fn test_dispatcher_is_built_once() {
        let dir = tempfile::tempdir().unwrap();
        let resolution = ResolutionConfig {
            repositories: vec![RepositoryConfig::new("https://a.example.com/")],
            ..Default::default()
        };
        let runtime = runtime(dir.path(), resolution);

        let first = runtime.dispatcher().unwrap() as *const CompositeDispatcher;
        let second = runtime.dispatcher().unwrap() as *const CompositeDispatcher;
        assert_eq!(first, second);
        assert_eq!(runtime.repositories().len(), 1);
    }

    #[test]
    fn test_invalid_request() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = runtime(dir.path(), ResolutionConfig::default());
        assert!(matches!(
            runtime.resolve_str("com.acme.lint@"),
            Err(RuntimeError::Request(_))
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = QuarryConfig::default();
        config.resolution.builtin.plugins = vec!["not valid".to_string()];
        let result = QuarryRuntime::builder()
            .config(config)
            .init_logging(false)
            .build();
        assert!(matches!(result, Err(RuntimeError::Config(_))));
    }
}
