//! Repository override from the process environment.
//!
//! Setting `QUARRY_PLUGIN_REPO_URL` appends one more repository after all
//! declared ones. Relative paths resolve against the working directory.

use tracing::debug;

/// Environment variable naming the override repository.
pub const OVERRIDE_ENV: &str = "QUARRY_PLUGIN_REPO_URL";

/// An optional override repository location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryOverride {
    location: Option<String>,
}

impl RepositoryOverride {
    /// No override.
    pub fn none() -> Self {
        Self::default()
    }

    /// Overrides with `location`. An empty value means no override.
    pub fn new(location: impl Into<String>) -> Self {
        let location = location.into();
        let location = (!location.trim().is_empty()).then_some(location);
        Self { location }
    }

    /// Reads `QUARRY_PLUGIN_REPO_URL`.
    pub fn from_env() -> Self {
        match std::env::var(OVERRIDE_ENV) {
            Ok(value) => {
                debug!(env = OVERRIDE_ENV, value = %value, "Read repository override");
                Self::new(value)
            }
            Err(_) => Self::none(),
        }
    }

    /// Returns the override location.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Consumes the override, returning its location.
    pub fn into_location(self) -> Option<String> {
        self.location
    }
}
