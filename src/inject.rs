//! Turn declarations into repositories at the front of the host's search order.

use std::sync::Arc;

use log::{debug, warn};

use crate::declaration::Declarations;
use crate::error::Error;
use crate::host::{Io, Repository, RepositoryManager, Verbosity};

/// Repositories added to the host by [`inject`].
pub struct Injected {
    /// Added repositories, highest priority first
    pub repositories: Vec<Arc<dyn Repository>>,
    /// Declarations the host could not build a repository from
    pub skipped: usize,
}

impl Injected {
    pub fn names(&self) -> Vec<String> {
        self.repositories.iter().map(|r| r.name()).collect()
    }
}

/// Prepend one repository per declaration to the host's search order.
///
/// Declarations are prepended last-to-first, so afterwards the host searches
/// them in file order ahead of everything it had before. A declaration the
/// host rejects is reported and skipped; the others are still added.
pub fn inject<M, I>(declarations: &Declarations, manager: &mut M, io: &I) -> Injected
where
    M: RepositoryManager + ?Sized,
    I: Io + ?Sized,
{
    let mut repositories = Vec::with_capacity(declarations.len());
    let mut skipped = 0;

    for declaration in declarations.in_prepend_order() {
        let kind = declaration.kind();

        let created = manager.create_repository(kind, &declaration.config, declaration.name());
        let repository = match created {
            Ok(repository) => repository,
            Err(source) => {
                let err = Error::RepositoryConstruction {
                    key: declaration.key.to_string(),
                    kind: kind.to_string(),
                    source,
                };
                warn!("Skipping declaration: {}", err);
                io.write_error(&err.to_string());
                skipped += 1;
                continue;
            }
        };

        io.write(
            &format!("Adding repository: {}", repository.name()),
            Verbosity::Normal,
        );
        manager.prepend_repository(Arc::clone(&repository));
        debug!("Prepended {} repository {}", kind, declaration.key);
        io.write("Repository added successfully", Verbosity::Verbose);

        repositories.push(repository);
    }

    repositories.reverse();
    Injected {
        repositories,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{DeclarationKey, RepositoryDeclaration};
    use crate::host::RepositoryConfig;
    use crate::host::memory::{ArrayRepository, BufferIo, InMemoryRepositoryManager};
    use crate::test_utils::{named_factory, register_test_factories};
    use serde_json::json;

    fn declaration(key: DeclarationKey, entry: serde_json::Value) -> RepositoryDeclaration {
        let config: RepositoryConfig = entry.as_object().cloned().unwrap();
        let kind = config
            .get("type")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        RepositoryDeclaration { key, kind, config }
    }

    fn named(name: &str, entry: serde_json::Value) -> RepositoryDeclaration {
        declaration(DeclarationKey::Name(name.to_string()), entry)
    }

    fn manager_with_existing() -> InMemoryRepositoryManager {
        let mut manager = InMemoryRepositoryManager::new();
        register_test_factories(&mut manager);
        manager.add_repository(Arc::new(ArrayRepository::new(
            "packagist.org",
            ["psr/log"],
        )));
        manager
    }

    #[test]
    fn test_final_order_matches_file_order() {
        let declarations = Declarations::new(vec![
            named("d1", json!({"url": "../d1"})),
            named("d2", json!({"type": "vcs", "url": "https://example.com/d2"})),
            named("d3", json!({"path": "../d3"})),
        ]);
        let mut manager = manager_with_existing();
        let io = BufferIo::new();

        let injected = inject(&declarations, &mut manager, &io);

        assert_eq!(
            manager.repository_names(),
            vec!["d1", "d2", "d3", "packagist.org"]
        );
        assert_eq!(injected.names(), vec!["d1", "d2", "d3"]);
        assert_eq!(injected.skipped, 0);
        assert!(io.errors().is_empty());
    }

    #[test]
    fn test_missing_type_defaults_to_path() {
        let mut manager = InMemoryRepositoryManager::new();
        manager.register("path", named_factory("path"));
        let io = BufferIo::new();

        let declarations = Declarations::new(vec![named("lib", json!({"url": "../lib"}))]);
        let injected = inject(&declarations, &mut manager, &io);

        assert_eq!(injected.names(), vec!["lib"]);
    }

    #[test]
    fn test_anonymous_declarations_pass_no_name() {
        let mut manager = manager_with_existing();
        let io = BufferIo::new();

        let declarations = Declarations::new(vec![
            declaration(DeclarationKey::Index(0), json!({"url": "../one"})),
            declaration(DeclarationKey::Index(1), json!({"url": "../two"})),
        ]);
        inject(&declarations, &mut manager, &io);

        assert_eq!(
            manager.repository_names(),
            vec!["path repo (../one)", "path repo (../two)", "packagist.org"]
        );
    }

    #[test]
    fn test_failed_declaration_is_skipped() {
        let declarations = Declarations::new(vec![
            named("good-1", json!({"url": "../good-1"})),
            named("bad", json!({"type": "svn", "url": "svn://example.com/bad"})),
            named("good-2", json!({"url": "../good-2"})),
        ]);
        let mut manager = manager_with_existing();
        let io = BufferIo::new();

        let injected = inject(&declarations, &mut manager, &io);

        assert_eq!(
            manager.repository_names(),
            vec!["good-1", "good-2", "packagist.org"]
        );
        assert_eq!(injected.skipped, 1);
        assert_eq!(
            io.errors(),
            vec!["failed to create svn repository bad: Repository type is not registered: svn"]
        );
    }

    #[test]
    fn test_status_lines() {
        let declarations = Declarations::new(vec![
            named("a", json!({"url": "../a"})),
            named("b", json!({"url": "../b"})),
        ]);
        let mut manager = manager_with_existing();
        let io = BufferIo::new();

        inject(&declarations, &mut manager, &io);

        assert_eq!(
            io.visible_at(Verbosity::Normal),
            vec!["Adding repository: b", "Adding repository: a"]
        );
        assert_eq!(
            io.visible_at(Verbosity::Verbose),
            vec![
                "Adding repository: b",
                "Repository added successfully",
                "Adding repository: a",
                "Repository added successfully",
            ]
        );
    }

    #[test]
    fn test_empty_declarations_change_nothing() {
        let mut manager = manager_with_existing();
        let io = BufferIo::new();

        let injected = inject(&Declarations::default(), &mut manager, &io);

        assert!(injected.repositories.is_empty());
        assert_eq!(manager.repository_names(), vec!["packagist.org"]);
        assert!(io.messages().is_empty());
    }
}
