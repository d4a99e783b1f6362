//! Root package model
//!
//! This module provides the types the host uses to describe a project's
//! declared dependencies: links, their constraints, and per-package
//! stability overrides.

mod link;
mod stability;

use std::collections::BTreeMap;

pub use link::{Constraint, DEV_PRETTY_CONSTRAINT, Link};
pub use stability::Stability;

/// Dependency links keyed by target package name.
pub type Links = BTreeMap<String, Link>;

/// Stability overrides keyed by package name.
pub type StabilityFlags = BTreeMap<String, Stability>;
