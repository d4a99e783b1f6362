//! Local repositories use case - runs the whole pipeline for one host command.
//!
//! This use case coordinates:
//! - Extension configuration (global settings)
//! - The invocation gate
//! - Loading `repositories.json`
//! - Repository injection
//! - Constraint forcing

use std::path::{Path, PathBuf};

use log::debug;

use crate::config::{ConfigResolver, ExtensionConfig};
use crate::declaration::{self, DECLARATION_FILE, LoadOutcome};
use crate::error::Error;
use crate::force_dev::force_dev;
use crate::gate::{CommandInvocation, should_run};
use crate::host::{Io, RepositoryManager, RootPackage, Verbosity};
use crate::inject::inject;
use crate::runtime::Runtime;

/// Mutable host state lent to the pipeline for one command.
pub struct HostContext<'h, M: ?Sized, P: ?Sized, I: ?Sized> {
    /// Directory holding the project manifest
    pub project_root: &'h Path,
    pub manager: &'h mut M,
    pub package: &'h mut P,
    pub io: &'h I,
}

/// Summary of a pipeline run that reached the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Applied {
    /// Names of the injected repositories, highest priority first
    pub repositories: Vec<String>,
    /// Declarations skipped because the host could not build them
    pub skipped: usize,
    /// Dependencies rewritten to `@dev`
    pub rewritten: Vec<String>,
}

/// What the pipeline did for one command.
#[derive(Debug)]
pub enum Outcome {
    /// The command is not a trigger command, or an ignore option is active.
    Skipped,
    /// The project has no declaration file.
    NoDeclarationFile,
    /// A step failed; the error has been reported through the host's output.
    Failed(Error),
    Applied(Applied),
}

/// Entry point the host calls for every command it runs.
pub struct LocalRepositories<'a, R: Runtime> {
    runtime: &'a R,
    settings_path: PathBuf,
}

impl<'a, R: Runtime> LocalRepositories<'a, R> {
    /// Create the pipeline reading global settings from `settings_path`.
    pub fn new(runtime: &'a R, settings_path: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            settings_path: settings_path.into(),
        }
    }

    /// Resolve the extension configuration for a new invocation.
    pub fn config(&self) -> ExtensionConfig {
        ConfigResolver::new(self.runtime, &self.settings_path)
            .resolve()
            .clone()
    }

    /// Run the pipeline for `invocation`.
    ///
    /// Never fails from the host's point of view: errors are written to
    /// `host.io` and returned as [`Outcome::Failed`], leaving the host with
    /// whatever state the completed steps produced.
    #[tracing::instrument(skip(self, host))]
    pub fn on_command<M, P, I>(
        &self,
        invocation: &CommandInvocation,
        host: HostContext<'_, M, P, I>,
    ) -> Outcome
    where
        M: RepositoryManager + ?Sized,
        P: RootPackage + ?Sized,
        I: Io + ?Sized,
    {
        let config = self.config();

        if !should_run(&invocation.command, &invocation.options, &config) {
            debug!(
                "Not loading local repositories for '{}' with options {:?}",
                invocation.command, invocation.options
            );
            return Outcome::Skipped;
        }

        let path = host.project_root.join(DECLARATION_FILE);
        let declarations = match declaration::load(self.runtime, &path) {
            Ok(LoadOutcome::Absent) => {
                host.io.write(
                    &format!("No local {} available", DECLARATION_FILE),
                    Verbosity::Verbose,
                );
                return Outcome::NoDeclarationFile;
            }
            Ok(LoadOutcome::Loaded(declarations)) => {
                host.io.write(
                    &format!("Local {} available", DECLARATION_FILE),
                    Verbosity::Normal,
                );
                declarations
            }
            Err(e) => {
                host.io.write(
                    &format!("Local {} available", DECLARATION_FILE),
                    Verbosity::Normal,
                );
                host.io.write_error(&e.to_string());
                return Outcome::Failed(e);
            }
        };

        host.io.write(
            &format!("Repositories found: {}", declarations.len()),
            Verbosity::Verbose,
        );

        let injected = inject(&declarations, host.manager, host.io);

        let mut applied = Applied {
            repositories: injected.names(),
            skipped: injected.skipped,
            rewritten: Vec::new(),
        };

        if !config.force_dev {
            debug!("force-dev disabled, keeping declared constraints");
            return Outcome::Applied(applied);
        }

        match force_dev(&injected.repositories, host.package) {
            Ok(rewritten) => {
                applied.rewritten = rewritten;
                Outcome::Applied(applied)
            }
            Err(e) => {
                host.io.write_error(&e.to_string());
                Outcome::Failed(e)
            }
        }
    }
}
