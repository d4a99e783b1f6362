//! Host abstraction for the dependency resolver this crate extends.
//!
//! The pipeline only ever talks to the host through these traits, which
//! keeps it independent of any concrete resolver and lets tests supply
//! fakes (see [`memory`]).

pub mod memory;

use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use crate::package::{Links, StabilityFlags};

/// Raw configuration payload of one repository declaration.
pub type RepositoryConfig = serde_json::Map<String, serde_json::Value>;

/// A package source built by the host.
///
/// Once prepended, the host's repository manager co-owns the handle.
pub trait Repository: Send + Sync {
    /// Display name of the repository.
    fn name(&self) -> String;

    /// Names of all packages this repository provides.
    ///
    /// Hosts may compute this lazily (e.g. by scanning a path), so it can fail.
    fn packages(&self) -> Result<Vec<String>>;
}

/// The host's repository manager: builds repositories and owns the search order.
pub trait RepositoryManager {
    /// Build a repository of type `kind` from a declaration payload.
    ///
    /// `name` is only given for declarations with a string key.
    fn create_repository(
        &self,
        kind: &str,
        config: &RepositoryConfig,
        name: Option<&str>,
    ) -> Result<Arc<dyn Repository>>;

    /// Insert a repository at the front of the search order.
    fn prepend_repository(&mut self, repository: Arc<dyn Repository>);
}

/// The project's root package, as far as constraint forcing needs it.
///
/// Getters return owned copies; setters replace the whole collection.
pub trait RootPackage {
    fn requires(&self) -> Links;
    fn set_requires(&mut self, requires: Links);
    fn dev_requires(&self) -> Links;
    fn set_dev_requires(&mut self, dev_requires: Links);
    fn stability_flags(&self) -> StabilityFlags;
    fn set_stability_flags(&mut self, flags: StabilityFlags);
}

/// Output verbosity of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    VeryVerbose,
    Debug,
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verbosity::Quiet => write!(f, "quiet"),
            Verbosity::Normal => write!(f, "normal"),
            Verbosity::Verbose => write!(f, "verbose"),
            Verbosity::VeryVerbose => write!(f, "very-verbose"),
            Verbosity::Debug => write!(f, "debug"),
        }
    }
}

/// User-facing output channel of the host.
#[cfg_attr(test, mockall::automock)]
pub trait Io {
    /// Write a status line shown at `verbosity` and above.
    fn write(&self, message: &str, verbosity: Verbosity);

    /// Write an error line.
    fn write_error(&self, message: &str);
}
