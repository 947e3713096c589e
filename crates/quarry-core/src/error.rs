//! Unified error types for the Quarry resolution core.
//!
//! A plugin that cannot be found is *not* an error: it is the
//! [`NotFound`](crate::resolution::NotFound) outcome. The types here cover
//! misuse of endpoints, malformed input, and strategies that break while
//! resolving.

use thiserror::Error;

// =============================================================================
// Request Errors
// =============================================================================

/// Errors raised while building a [`PluginRequest`](crate::PluginRequest).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The plugin id is empty or contains an invalid segment.
    #[error("invalid plugin id '{id}': {reason}")]
    InvalidId {
        /// The rejected id.
        id: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A version separator was given without a version.
    #[error("plugin request '{0}' has an empty version")]
    EmptyVersion(String),
}

// =============================================================================
// Location Errors
// =============================================================================

/// Errors produced when turning a raw repository location into a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// No location was ever assigned.
    #[error("no location has been set for repository '{name}'")]
    Missing {
        /// Repository name.
        name: String,
    },

    /// The raw value could not be resolved.
    #[error("cannot resolve '{value}' to a URI: {reason}")]
    Invalid {
        /// The raw value.
        value: String,
        /// Reason for failure.
        reason: String,
    },
}

impl LocationError {
    /// Creates an invalid location error.
    pub fn invalid(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Endpoint Errors
// =============================================================================

/// Misuse of a [`RepositoryEndpoint`](crate::RepositoryEndpoint).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// The location was changed after the endpoint took part in resolution.
    #[error(
        "the location of plugin repository '{name}' cannot be changed after it has been used to resolve plugins (current location: {location})"
    )]
    Frozen {
        /// Repository name.
        name: String,
        /// The location the endpoint was frozen with.
        location: String,
    },
}

// =============================================================================
// Strategy Errors
// =============================================================================

/// An unexpected failure inside a resolution strategy.
///
/// Unlike a clean "not found", these abort the whole resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    /// A repository location could not be resolved.
    #[error(transparent)]
    InvalidLocation(#[from] LocationError),

    /// The request is malformed for this source.
    #[error("invalid plugin request {request}: {reason}")]
    InvalidRequest {
        /// Display form of the request.
        request: String,
        /// Reason for rejection.
        reason: String,
    },

    /// A backing service could not be reached.
    #[error("{source_name} is unavailable: {reason}")]
    Unavailable {
        /// The service that failed.
        source_name: String,
        /// Reason for failure.
        reason: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl StrategyError {
    /// Creates an invalid request error.
    pub fn invalid_request(request: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            request: request.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an unavailable-service error.
    pub fn unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for StrategyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// =============================================================================
// Resolve Errors
// =============================================================================

/// A resolution attempt that terminated with a hard failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A strategy failed; strategies after it were not consulted.
    #[error("failed to resolve plugin {request} using {strategy}: {source}")]
    StrategyFailed {
        /// Name of the failing strategy.
        strategy: String,
        /// Display form of the request.
        request: String,
        /// The underlying failure.
        #[source]
        source: StrategyError,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for strategy operations.
pub type StrategyResult<T> = Result<T, StrategyError>;

/// Result type for dispatcher operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Result type for location resolution.
pub type LocationResult<T> = Result<T, LocationError>;
