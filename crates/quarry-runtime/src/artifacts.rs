//! File-backed marker lookup.
//!
//! Looks for marker modules in registered `file:` repositories using the
//! maven directory layout:
//!
//! ```text
//! <repository>/<group as path>/<name>/<version>/<name>-<version>.pom
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use quarry_core::{ModuleCoordinates, StrategyResult};
use quarry_core::services::{ArtifactResolver, RepositoryList, ResolvedModule};
use tracing::{debug, trace};
use url::Url;

/// Resolves markers against the local repositories of a [`RepositoryList`].
///
/// Repositories are searched in registration order. Remote repositories are
/// skipped since artifact download is not part of resolution.
#[derive(Debug, Clone)]
pub struct FileRepositoryResolver {
    repositories: Arc<RepositoryList>,
}

impl FileRepositoryResolver {
    /// Creates a resolver reading from `repositories`.
    pub fn new(repositories: Arc<RepositoryList>) -> Self {
        Self { repositories }
    }

    /// Returns where the marker would live inside a repository rooted at `root`.
    pub fn marker_path(root: PathBuf, coordinates: &ModuleCoordinates) -> PathBuf {
        let mut path = root;
        path.extend(coordinates.group.split('.'));
        path.push(&coordinates.name);
        path.push(&coordinates.version);
        path.push(format!("{}-{}.pom", coordinates.name, coordinates.version));
        path
    }

    fn local_root(location: &Url) -> Option<PathBuf> {
        if location.scheme() != "file" {
            return None;
        }
        location.to_file_path().ok()
    }
}

impl ArtifactResolver for FileRepositoryResolver {
    fn resolve_marker(
        &self,
        coordinates: &ModuleCoordinates,
    ) -> StrategyResult<Option<ResolvedModule>> {
        for repository in self.repositories.repositories() {
            let Some(root) = Self::local_root(&repository.location) else {
                debug!(
                    location = %repository.location,
                    "Skipping non-local repository"
                );
                continue;
            };

            let path = Self::marker_path(root, coordinates);
            trace!(path = %path.display(), "Checking for marker");
            if path.is_file() {
                return Ok(Some(ResolvedModule {
                    coordinates: coordinates.clone(),
                    repository: Some(repository.location),
                }));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::PluginId;
    use quarry_core::services::{RepositoryHandler, RepositorySpec};
    use std::fs;

    fn register(list: &RepositoryList, location: Url) {
        list.maven(&|spec: &mut RepositorySpec| spec.set_location(location.clone()));
    }

    fn marker() -> ModuleCoordinates {
        ModuleCoordinates::marker(&PluginId::new("com.acme.lint").unwrap(), "1.0")
    }

    #[test]
    fn test_marker_path_layout() {
        let path = FileRepositoryResolver::marker_path(PathBuf::from("/repo"), &marker());
        assert_eq!(
            path,
            PathBuf::from(
                "/repo/com/acme/lint/com.acme.lint.quarry-plugin/1.0/com.acme.lint.quarry-plugin-1.0.pom"
            )
        );
    }

    #[test]
    fn test_finds_marker_in_second_repository() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let path = FileRepositoryResolver::marker_path(second.path().to_path_buf(), &marker());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "<project/>").unwrap();

        let list = Arc::new(RepositoryList::new());
        register(&list, Url::parse("https://remote.example.com/m2").unwrap());
        register(&list, Url::from_file_path(first.path()).unwrap());
        register(&list, Url::from_file_path(second.path()).unwrap());

        let resolver = FileRepositoryResolver::new(list);
        let module = resolver.resolve_marker(&marker()).unwrap().unwrap();
        assert_eq!(
            module.repository,
            Some(Url::from_file_path(second.path()).unwrap())
        );
    }

    #[test]
    fn test_missing_marker() {
        let repo = tempfile::tempdir().unwrap();
        let list = Arc::new(RepositoryList::new());
        register(&list, Url::from_file_path(repo.path()).unwrap());

        let resolver = FileRepositoryResolver::new(list);
        assert_eq!(resolver.resolve_marker(&marker()).unwrap(), None);
    }
}
