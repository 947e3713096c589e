//! User-declared repository endpoints.
//!
//! A [`RepositoryEndpoint`] is configurable until it is first turned into a
//! resolution strategy. That first conversion *freezes* it:
//!
//! ```text
//! new() ──► Configurable ── set_location()* ──► as_resolution_strategy() ──► Frozen
//!                                                        │
//!                     register location once, build one RepositoryStrategy
//! ```
//!
//! Once frozen, [`set_location`](RepositoryEndpoint::set_location) fails and
//! every further conversion returns the same cached strategy without
//! registering the location again.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;
use url::Url;

use crate::error::{EndpointError, LocationError, LocationResult, StrategyResult};
use crate::services::{FileResolver, RepositorySpec, ResolutionServices};
use crate::strategy::{BoxedStrategy, RepositoryStrategy};

/// Name reported by maven-style endpoints.
pub const MAVEN: &str = "maven";

struct EndpointState {
    /// Raw, unresolved location.
    location: Option<String>,
    /// Set exactly once, on first conversion. Presence means frozen.
    strategy: Option<BoxedStrategy>,
}

/// A declared remote repository.
///
/// # Thread Safety
///
/// The freeze, the registration side effect and strategy construction run
/// under one lock, so concurrent first conversions still register the
/// location exactly once.
pub struct RepositoryEndpoint {
    name: String,
    resolver: Arc<dyn FileResolver>,
    services: ResolutionServices,
    state: Mutex<EndpointState>,
}

impl RepositoryEndpoint {
    /// Creates a maven endpoint with no location.
    ///
    /// `resolver` supplies the base context locations are resolved against.
    pub fn new(resolver: Arc<dyn FileResolver>, services: ResolutionServices) -> Self {
        Self {
            name: MAVEN.to_string(),
            resolver,
            services,
            state: Mutex::new(EndpointState {
                location: None,
                strategy: None,
            }),
        }
    }

    /// Sets the initial location (builder pattern).
    ///
    /// A freshly created endpoint cannot be frozen, so this never fails.
    pub fn with_location(self, value: impl Into<String>) -> Self {
        self.state.lock().location = Some(value.into());
        self
    }

    /// Returns the endpoint name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores a raw location.
    ///
    /// The value is not validated until the endpoint is used.
    pub fn set_location(&self, value: impl Into<String>) -> Result<(), EndpointError> {
        let mut state = self.state.lock();
        if state.strategy.is_some() {
            return Err(EndpointError::Frozen {
                name: self.name.clone(),
                location: state.location.clone().unwrap_or_default(),
            });
        }
        state.location = Some(value.into());
        Ok(())
    }

    /// Returns the raw location as it was set.
    pub fn raw_location(&self) -> Option<String> {
        self.state.lock().location.clone()
    }

    /// Resolves the location to a canonical URL.
    pub fn location(&self) -> LocationResult<Url> {
        let raw = self.raw_location().ok_or_else(|| LocationError::Missing {
            name: self.name.clone(),
        })?;
        self.resolver.resolve_uri(&raw)
    }

    /// Returns `true` once the endpoint has produced its strategy.
    pub fn is_frozen(&self) -> bool {
        self.state.lock().strategy.is_some()
    }

    /// Returns the repository strategy for this endpoint, creating it on
    /// first use.
    ///
    /// The first successful call freezes the endpoint and registers its
    /// location with the repository handler. If the location cannot be
    /// resolved the endpoint stays configurable.
    pub fn as_resolution_strategy(&self) -> StrategyResult<BoxedStrategy> {
        let mut state = self.state.lock();
        if let Some(strategy) = &state.strategy {
            return Ok(Arc::clone(strategy));
        }

        let raw = state.location.as_deref().ok_or_else(|| LocationError::Missing {
            name: self.name.clone(),
        })?;
        let location = self.resolver.resolve_uri(raw)?;

        self.services
            .repositories
            .maven(&|spec: &mut RepositorySpec| spec.set_location(location.clone()));

        info!(repository = %self.name, location = %location, "Repository endpoint frozen");

        let strategy: BoxedStrategy = Arc::new(RepositoryStrategy::new(
            &self.name,
            location,
            self.services.clone(),
        ));
        state.strategy = Some(Arc::clone(&strategy));
        Ok(strategy)
    }
}

impl fmt::Debug for RepositoryEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RepositoryEndpoint")
            .field("name", &self.name)
            .field("location", &state.location)
            .field("frozen", &state.strategy.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StrategyError;
    use crate::testing::{CountingHandler, base_resolver, services_with};
    use std::sync::Barrier;

    fn endpoint(handler: &Arc<CountingHandler>) -> RepositoryEndpoint {
        RepositoryEndpoint::new(base_resolver(), services_with(Arc::clone(handler)))
    }

    #[test]
    fn test_set_location_after_use_fails() {
        let handler = Arc::new(CountingHandler::default());
        let endpoint = endpoint(&handler);
        endpoint.set_location("https://repo.example.com/a").unwrap();
        endpoint.as_resolution_strategy().unwrap();

        let err = endpoint.set_location("https://repo.example.com/b").unwrap_err();
        assert!(matches!(err, EndpointError::Frozen { .. }));
        assert_eq!(
            endpoint.location().unwrap().as_str(),
            "https://repo.example.com/a"
        );
    }

    #[test]
    fn test_location_may_change_before_use() {
        let handler = Arc::new(CountingHandler::default());
        let endpoint = endpoint(&handler);
        endpoint.set_location("https://repo.example.com/a").unwrap();
        endpoint.set_location("https://repo.example.com/b").unwrap();

        // Reading the location does not freeze the endpoint.
        assert_eq!(
            endpoint.location().unwrap().as_str(),
            "https://repo.example.com/b"
        );
        assert!(!endpoint.is_frozen());
        assert_eq!(handler.registrations(), 0);
    }

    #[test]
    fn test_strategy_is_cached_and_registered_once() {
        let handler = Arc::new(CountingHandler::default());
        let endpoint = endpoint(&handler);
        endpoint.set_location("https://repo.example.com/").unwrap();

        let first = endpoint.as_resolution_strategy().unwrap();
        let second = endpoint.as_resolution_strategy().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(endpoint.is_frozen());
        assert_eq!(handler.registrations(), 1);
        assert_eq!(
            handler.locations(),
            vec![Url::parse("https://repo.example.com/").unwrap()]
        );
    }

    #[test]
    fn test_concurrent_first_use_registers_once() {
        let handler = Arc::new(CountingHandler::default());
        let endpoint = endpoint(&handler);
        endpoint.set_location("https://repo.example.com/").unwrap();

        let barrier = Barrier::new(8);
        let strategies: Vec<BoxedStrategy> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        endpoint.as_resolution_strategy().unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(handler.registrations(), 1);
        assert!(strategies.iter().all(|s| Arc::ptr_eq(s, &strategies[0])));
    }

    #[test]
    fn test_missing_location_does_not_freeze() {
        let handler = Arc::new(CountingHandler::default());
        let endpoint = endpoint(&handler);

        let err = endpoint.as_resolution_strategy().err().unwrap();
        assert!(matches!(
            err,
            StrategyError::InvalidLocation(LocationError::Missing { .. })
        ));
        assert!(!endpoint.is_frozen());
        assert_eq!(handler.registrations(), 0);
    }

    #[test]
    fn test_invalid_location_can_be_fixed() {
        let handler = Arc::new(CountingHandler::default());
        let endpoint = endpoint(&handler);
        endpoint.set_location("").unwrap();

        assert!(endpoint.as_resolution_strategy().is_err());
        assert!(!endpoint.is_frozen());

        endpoint.set_location("https://repo.example.com/").unwrap();
        assert!(endpoint.as_resolution_strategy().is_ok());
        assert_eq!(handler.registrations(), 1);
    }

    #[test]
    fn test_relative_location_resolves_against_base() {
        let handler = Arc::new(CountingHandler::default());
        let endpoint = endpoint(&handler);
        endpoint.set_location("local-repo").unwrap();

        let expected = Url::from_file_path(std::env::temp_dir().join("local-repo")).unwrap();
        assert_eq!(endpoint.location().unwrap(), expected);
        assert_eq!(endpoint.raw_location().as_deref(), Some("local-repo"));
    }
}
