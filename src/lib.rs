pub mod application;
pub mod config;
pub mod declaration;
pub mod error;
pub mod force_dev;
pub mod gate;
pub mod host;
pub mod inject;
pub mod package;
pub mod runtime;

pub use application::{Applied, HostContext, LocalRepositories, Outcome};
pub use config::{ConfigResolver, ExtensionConfig};
pub use error::{Error, Result};
pub use gate::CommandInvocation;
