//! Stubs shared by the unit tests of this crate.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use url::Url;

use crate::error::{StrategyError, StrategyResult};
use crate::request::{PluginId, PluginRequest};
use crate::resolution::{ArtifactDescriptor, ModuleCoordinates, Resolution};
use crate::services::{
    ArtifactResolver, BaseDirFileResolver, FileResolver, RepositoryHandler, RepositoryList,
    RepositorySpec, ResolutionServices, ResolvedModule,
};
use crate::strategy::ResolutionStrategy;

/// Repository handler that counts registrations.
#[derive(Default)]
pub(crate) struct CountingHandler {
    registrations: AtomicUsize,
    list: RepositoryList,
}

impl CountingHandler {
    pub(crate) fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    pub(crate) fn locations(&self) -> Vec<Url> {
        self.list
            .repositories()
            .into_iter()
            .map(|r| r.location)
            .collect()
    }
}

impl RepositoryHandler for CountingHandler {
    fn maven(&self, configure: &dyn Fn(&mut RepositorySpec)) {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        self.list.maven(configure);
    }
}

/// Artifact resolver that knows nothing.
pub(crate) struct NoArtifacts;

impl ArtifactResolver for NoArtifacts {
    fn resolve_marker(&self, _: &ModuleCoordinates) -> StrategyResult<Option<ResolvedModule>> {
        Ok(None)
    }
}

pub(crate) fn services_with(handler: Arc<CountingHandler>) -> ResolutionServices {
    ResolutionServices::new(handler, Arc::new(NoArtifacts))
}

pub(crate) fn base_resolver() -> Arc<dyn FileResolver> {
    Arc::new(BaseDirFileResolver::new(std::env::temp_dir()))
}

enum Outcome {
    Found,
    NotFound(String),
    Fail,
}

/// Strategy with a fixed outcome that counts its invocations.
pub(crate) struct StubStrategy {
    name: String,
    outcome: Outcome,
    calls: AtomicUsize,
}

impl StubStrategy {
    pub(crate) fn found(name: &str) -> Arc<Self> {
        Self::with(name, Outcome::Found)
    }

    pub(crate) fn not_found(name: &str, reason: &str) -> Arc<Self> {
        Self::with(name, Outcome::NotFound(reason.to_string()))
    }

    pub(crate) fn failing(name: &str) -> Arc<Self> {
        Self::with(name, Outcome::Fail)
    }

    fn with(name: &str, outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ResolutionStrategy for StubStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, request: &PluginRequest) -> StrategyResult<Resolution> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Outcome::Found => Ok(Resolution::found(
                ArtifactDescriptor::bundled(request.id().clone()),
                &self.name,
            )),
            Outcome::NotFound(reason) => Ok(Resolution::not_found(&self.name, reason)),
            Outcome::Fail => Err(StrategyError::unavailable(&self.name, "stubbed failure")),
        }
    }
}

pub(crate) fn request(input: &str) -> PluginRequest {
    PluginRequest::parse(input).unwrap()
}

pub(crate) fn id(input: &str) -> PluginId {
    PluginId::new(input).unwrap()
}
