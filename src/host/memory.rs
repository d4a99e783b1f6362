//! In-memory host implementation.
//!
//! This module provides a reference implementation of the host traits:
//! a repository manager with a per-type factory registry, a plain root
//! package, and an output buffer. Tests and embedders without a resolver
//! of their own use it to drive the pipeline.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};

use super::{Io, Repository, RepositoryConfig, RepositoryManager, RootPackage, Verbosity};
use crate::package::{Constraint, Link, Links, StabilityFlags};

/// A repository with a fixed list of packages.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayRepository {
    name: String,
    packages: Vec<String>,
}

impl ArrayRepository {
    pub fn new<I, S>(name: impl Into<String>, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            packages: packages.into_iter().map(Into::into).collect(),
        }
    }
}

impl Repository for ArrayRepository {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn packages(&self) -> Result<Vec<String>> {
        Ok(self.packages.clone())
    }
}

/// Builds repositories of one type.
pub trait RepositoryFactory {
    fn create(&self, config: &RepositoryConfig, name: Option<&str>)
    -> Result<Arc<dyn Repository>>;
}

impl<F> RepositoryFactory for F
where
    F: Fn(&RepositoryConfig, Option<&str>) -> Result<Arc<dyn Repository>>,
{
    fn create(
        &self,
        config: &RepositoryConfig,
        name: Option<&str>,
    ) -> Result<Arc<dyn Repository>> {
        self(config, name)
    }
}

/// Repository manager keeping the search order in a `Vec`, highest priority first.
///
/// Repository types must be registered before declarations of that type
/// can be turned into repositories.
#[derive(Default)]
pub struct InMemoryRepositoryManager {
    factories: HashMap<String, Box<dyn RepositoryFactory>>,
    repositories: Vec<Arc<dyn Repository>>,
}

impl InMemoryRepositoryManager {
    /// Create a new manager with no registered types and no repositories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a repository type.
    ///
    /// If a factory is already registered for this type, it will be replaced.
    pub fn register(&mut self, kind: impl Into<String>, factory: impl RepositoryFactory + 'static) {
        self.factories.insert(kind.into(), Box::new(factory));
    }

    /// Check if a factory is registered for a repository type.
    pub fn has(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Append a repository at the end of the search order.
    pub fn add_repository(&mut self, repository: Arc<dyn Repository>) {
        self.repositories.push(repository);
    }

    /// Repositories in search order.
    pub fn repositories(&self) -> &[Arc<dyn Repository>] {
        &self.repositories
    }

    /// Repository names in search order.
    pub fn repository_names(&self) -> Vec<String> {
        self.repositories.iter().map(|r| r.name()).collect()
    }
}

impl RepositoryManager for InMemoryRepositoryManager {
    fn create_repository(
        &self,
        kind: &str,
        config: &RepositoryConfig,
        name: Option<&str>,
    ) -> Result<Arc<dyn Repository>> {
        let factory = self
            .factories
            .get(kind)
            .with_context(|| format!("Repository type is not registered: {}", kind))?;
        factory.create(config, name)
    }

    fn prepend_repository(&mut self, repository: Arc<dyn Repository>) {
        self.repositories.insert(0, repository);
    }
}

/// A root package holding its links and stability flags directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryRootPackage {
    pub name: String,
    pub requires: Links,
    pub dev_requires: Links,
    pub stability_flags: StabilityFlags,
}

impl InMemoryRootPackage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a `require` entry on `target` with the given constraint text.
    pub fn require(mut self, target: &str, constraint: &str) -> Self {
        let link = Link::new(
            &self.name,
            target,
            Constraint::Range(constraint.to_string()),
            "requires",
            constraint,
        );
        self.requires.insert(target.to_string(), link);
        self
    }

    /// Add a `require-dev` entry on `target` with the given constraint text.
    pub fn require_dev(mut self, target: &str, constraint: &str) -> Self {
        let link = Link::new(
            &self.name,
            target,
            Constraint::Range(constraint.to_string()),
            "requires (for development)",
            constraint,
        );
        self.dev_requires.insert(target.to_string(), link);
        self
    }
}

impl RootPackage for InMemoryRootPackage {
    fn requires(&self) -> Links {
        self.requires.clone()
    }

    fn set_requires(&mut self, requires: Links) {
        self.requires = requires;
    }

    fn dev_requires(&self) -> Links {
        self.dev_requires.clone()
    }

    fn set_dev_requires(&mut self, dev_requires: Links) {
        self.dev_requires = dev_requires;
    }

    fn stability_flags(&self) -> StabilityFlags {
        self.stability_flags.clone()
    }

    fn set_stability_flags(&mut self, flags: StabilityFlags) {
        self.stability_flags = flags;
    }
}

/// Output channel recording every line it is given.
#[derive(Debug, Default)]
pub struct BufferIo {
    messages: RefCell<Vec<(Verbosity, String)>>,
    errors: RefCell<Vec<String>>,
}

impl BufferIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// All status lines with their verbosity, in write order.
    pub fn messages(&self) -> Vec<(Verbosity, String)> {
        self.messages.borrow().clone()
    }

    /// Status lines a user running at `verbosity` would see.
    pub fn visible_at(&self, verbosity: Verbosity) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|(level, _)| *level <= verbosity)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl Io for BufferIo {
    fn write(&self, message: &str, verbosity: Verbosity) {
        self.messages
            .borrow_mut()
            .push((verbosity, message.to_string()));
    }

    fn write_error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}
