//! Plugin identifiers and requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// A validated plugin identifier such as `quarry.java` or `com.acme.lint`.
///
/// An id is a non-empty sequence of `.`-separated segments made of ASCII
/// alphanumerics, `-` and `_`. Everything before the last segment is the
/// namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PluginId(String);

impl PluginId {
    /// Parses and validates an id.
    pub fn new(id: impl Into<String>) -> Result<Self, RequestError> {
        let id = id.into();
        let invalid = |reason: &str| RequestError::InvalidId {
            id: id.clone(),
            reason: reason.to_string(),
        };

        if id.is_empty() {
            return Err(invalid("plugin id cannot be empty"));
        }

        for segment in id.split('.') {
            if segment.is_empty() {
                return Err(invalid("plugin id cannot contain empty segments"));
            }
            if let Some(c) = segment
                .chars()
                .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
            {
                return Err(invalid(&format!("character '{c}' is not allowed")));
            }
        }

        Ok(Self(id))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the id has a namespace (contains a `.`).
    pub fn is_qualified(&self) -> bool {
        self.0.contains('.')
    }

    /// Returns the namespace, i.e. everything before the last segment.
    pub fn namespace(&self) -> Option<&str> {
        self.0.rfind('.').map(|dot| &self.0[..dot])
    }

    /// Returns the last segment of the id.
    pub fn name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Qualifies an unqualified id with `namespace`.
    ///
    /// Already qualified ids are returned unchanged.
    pub fn with_namespace(&self, namespace: &str) -> Self {
        if self.is_qualified() {
            self.clone()
        } else {
            Self(format!("{namespace}.{}", self.0))
        }
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PluginId {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PluginId {
    type Error = RequestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PluginId> for String {
    fn from(id: PluginId) -> Self {
        id.0
    }
}

impl AsRef<str> for PluginId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A request to locate a plugin, optionally constrained to a version.
///
/// Requests are immutable and created once per resolution call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginRequest {
    id: PluginId,
    version: Option<String>,
}

impl PluginRequest {
    /// Creates a request without a version constraint.
    pub fn new(id: PluginId) -> Self {
        Self { id, version: None }
    }

    /// Creates a request for a specific version.
    pub fn versioned(id: PluginId, version: impl Into<String>) -> Self {
        Self {
            id,
            version: Some(version.into()),
        }
    }

    /// Parses `id` or `id@version`.
    ///
    /// The split happens at the last `@`, so only the id part is validated
    /// as an identifier.
    pub fn parse(input: &str) -> Result<Self, RequestError> {
        match input.rfind('@') {
            Some(at) => {
                let (id, version) = (&input[..at], &input[at + 1..]);
                if version.is_empty() {
                    return Err(RequestError::EmptyVersion(input.to_string()));
                }
                Ok(Self::versioned(PluginId::new(id)?, version))
            }
            None => Ok(Self::new(PluginId::new(input)?)),
        }
    }

    /// Returns the requested plugin id.
    pub fn id(&self) -> &PluginId {
        &self.id
    }

    /// Returns the version constraint, if any.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl fmt::Display for PluginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "[id: '{}', version: '{}']", self.id, version),
            None => write!(f, "[id: '{}']", self.id),
        }
    }
}

impl FromStr for PluginRequest {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
