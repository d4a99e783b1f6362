//! Runtime abstraction for system operations.
//!
//! Every file the pipeline touches is read through [`Runtime`], so the
//! settings and declaration loaders can be exercised against a mock.
//!
//! # Structure
//!
//! - `fs` - File system operations (existence checks, reads)

mod fs;

use anyhow::Result;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime {
    // File System
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }
}
