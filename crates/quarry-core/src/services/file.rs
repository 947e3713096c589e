//! Location resolution.
//!
//! The core never parses repository locations itself. It hands raw values to
//! a [`FileResolver`], which turns them into canonical absolute URLs relative
//! to some base context.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use url::Url;

use crate::error::{LocationError, LocationResult};

/// Resolves raw location values against a base context.
pub trait FileResolver: Send + Sync {
    /// Returns the canonical absolute URL for `value`.
    fn resolve_uri(&self, value: &str) -> LocationResult<Url>;
}

/// Creates [`FileResolver`]s for base directories.
pub trait FileLookup: Send + Sync {
    /// Returns a resolver that resolves relative paths against `base`.
    fn file_resolver(&self, base: &Path) -> Arc<dyn FileResolver>;

    /// Returns a resolver rooted at the process working directory.
    fn current_dir_resolver(&self) -> LocationResult<Arc<dyn FileResolver>> {
        let cwd = std::env::current_dir()
            .map_err(|e| LocationError::invalid(".", format!("no working directory: {e}")))?;
        Ok(self.file_resolver(&cwd))
    }
}

/// Resolver that accepts absolute URLs as-is and treats anything else as a
/// filesystem path relative to a base directory.
#[derive(Debug, Clone)]
pub struct BaseDirFileResolver {
    base: PathBuf,
}

impl BaseDirFileResolver {
    /// Creates a resolver rooted at `base`. The base should be absolute.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Returns the base directory.
    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl FileResolver for BaseDirFileResolver {
    fn resolve_uri(&self, value: &str) -> LocationResult<Url> {
        let value = value.trim();
        if value.is_empty() {
            return Err(LocationError::invalid(value, "location is empty"));
        }

        // Single-letter schemes are Windows drive letters, not URLs.
        if let Ok(url) = Url::parse(value) {
            if url.scheme().len() > 1 {
                return Ok(url);
            }
        }

        let path = Path::new(value);
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        };

        Url::from_file_path(normalize(&joined))
            .map_err(|()| LocationError::invalid(value, "path is not absolute"))
    }
}

/// Default [`FileLookup`] producing [`BaseDirFileResolver`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFileLookup;

impl FileLookup for DefaultFileLookup {
    fn file_resolver(&self, base: &Path) -> Arc<dyn FileResolver> {
        Arc::new(BaseDirFileResolver::new(base))
    }
}

/// Lexically removes `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> PathBuf {
        std::env::temp_dir().join("quarry-base")
    }

    #[test]
    fn test_absolute_url_passes_through() {
        let resolver = BaseDirFileResolver::new(base());
        let url = resolver.resolve_uri("https://repo.example.com/plugins").unwrap();
        assert_eq!(url.as_str(), "https://repo.example.com/plugins");
    }

    #[test]
    fn test_relative_path_resolves_against_base() {
        let resolver = BaseDirFileResolver::new(base());
        let url = resolver.resolve_uri("./repo/../local-repo").unwrap();
        assert_eq!(url, Url::from_file_path(base().join("local-repo")).unwrap());
    }

    #[test]
    fn test_empty_location_is_invalid() {
        let resolver = BaseDirFileResolver::new(base());
        assert!(matches!(
            resolver.resolve_uri("  "),
            Err(LocationError::Invalid { .. })
        ));
    }

    #[test]
    fn test_relative_base_is_rejected() {
        let resolver = BaseDirFileResolver::new("relative/base");
        assert!(resolver.resolve_uri("repo").is_err());
    }

    #[test]
    fn test_current_dir_resolver() {
        let resolver = DefaultFileLookup.current_dir_resolver().unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            resolver.resolve_uri("repo").unwrap(),
            Url::from_file_path(cwd.join("repo")).unwrap()
        );
    }
}
