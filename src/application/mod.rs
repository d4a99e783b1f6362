//! Application layer - the pipeline the host calls once per command.
//!
//! This layer ties the steps together: configuration, the invocation gate,
//! declaration loading, repository injection and constraint forcing.

mod local_repositories;

pub use local_repositories::{Applied, HostContext, LocalRepositories, Outcome};
