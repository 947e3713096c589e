//! Collaborator interfaces consumed by the resolution core.
//!
//! Everything the dispatcher does not own lives behind these traits:
//! - location resolution ([`FileResolver`], [`FileLookup`])
//! - repository registration and artifact lookup ([`RepositoryHandler`],
//!   [`ArtifactResolver`], [`VersionSelector`])
//! - bundled plugins and the remote service ([`PluginCatalog`],
//!   [`PluginService`])

pub mod file;
pub mod lookup;
pub mod repository;

pub use file::{BaseDirFileResolver, DefaultFileLookup, FileLookup, FileResolver};
pub use lookup::{PluginCatalog, PluginService, StaticCatalog, UnconfiguredService};
pub use repository::{
    ArtifactResolver, DefaultVersionSelector, RegisteredRepository, RepositoryHandler,
    RepositoryList, RepositorySpec, ResolutionServices, ResolvedModule, VersionSelector,
};
