//! Project-local repository declarations (`repositories.json`).
//!
//! The file lives next to the project manifest:
//!
//! ```json
//! {
//!     "repositories": {
//!         "libA": { "path": "../libA" },
//!         "libB": { "type": "vcs", "url": "https://example.com/libB" }
//!     }
//! }
//! ```
//!
//! `repositories` may also be a list. Entries are kept in file order; the
//! first entry is meant to be searched first.

use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::host::RepositoryConfig;
use crate::runtime::Runtime;

/// File name of the declaration file in the project root.
pub const DECLARATION_FILE: &str = "repositories.json";

/// Repository type used when a declaration has none.
pub const DEFAULT_REPOSITORY_TYPE: &str = "path";

/// Path of the declaration file for the project whose manifest is at `manifest_path`.
pub fn declaration_path(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DECLARATION_FILE)
}

/// Key of a declaration in the `repositories` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationKey {
    /// A named entry; the name is passed on to the host.
    Name(String),
    /// A list position or numeric object key; the host picks a name.
    Index(usize),
}

impl DeclarationKey {
    /// Classify an object key. Canonical decimal integers are anonymous.
    pub fn from_object_key(key: &str) -> Self {
        let canonical = !key.is_empty()
            && key.bytes().all(|b| b.is_ascii_digit())
            && (key == "0" || !key.starts_with('0'));

        match key.parse::<usize>() {
            Ok(index) if canonical => DeclarationKey::Index(index),
            _ => DeclarationKey::Name(key.to_string()),
        }
    }

    /// The name to hand to the host, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            DeclarationKey::Name(name) => Some(name),
            DeclarationKey::Index(_) => None,
        }
    }
}

impl fmt::Display for DeclarationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationKey::Name(name) => write!(f, "{}", name),
            DeclarationKey::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// One entry of the `repositories` field.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryDeclaration {
    pub key: DeclarationKey,
    /// Declared `type`, if any
    pub kind: Option<String>,
    /// The full entry, passed unchanged to the host
    pub config: RepositoryConfig,
}

impl RepositoryDeclaration {
    /// Repository type, defaulting to [`DEFAULT_REPOSITORY_TYPE`].
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or(DEFAULT_REPOSITORY_TYPE)
    }

    pub fn name(&self) -> Option<&str> {
        self.key.name()
    }

    /// Declared `url`, falling back to `path`.
    pub fn location(&self) -> Option<&str> {
        ["url", "path"]
            .iter()
            .find_map(|field| self.config.get(*field).and_then(Value::as_str))
    }
}

/// Declarations in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Declarations {
    entries: Vec<RepositoryDeclaration>,
}

impl Declarations {
    pub fn new(entries: Vec<RepositoryDeclaration>) -> Self {
        Self { entries }
    }

    /// Declarations in file order, highest priority first.
    pub fn iter(&self) -> impl Iterator<Item = &RepositoryDeclaration> {
        self.entries.iter()
    }

    /// Declarations in the order they must be prepended to the host's
    /// search list so that the final order equals file order.
    pub fn in_prepend_order(&self) -> impl Iterator<Item = &RepositoryDeclaration> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of looking for a declaration file.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// No declaration file exists.
    Absent,
    Loaded(Declarations),
}

/// Load the declaration file at `path`.
///
/// A missing file is [`LoadOutcome::Absent`], not an error.
#[tracing::instrument(skip(runtime))]
pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<LoadOutcome> {
    if !runtime.exists(path) {
        debug!("No declaration file at {:?}", path);
        return Ok(LoadOutcome::Absent);
    }

    let content = runtime
        .read_to_string(path)
        .map_err(|e| Error::DeclarationParse {
            path: path.to_path_buf(),
            reason: format!("{:#}", e),
        })?;

    let declarations = parse(&content).map_err(|failure| match failure {
        ParseFailure::Syntax(reason) => Error::DeclarationParse {
            path: path.to_path_buf(),
            reason,
        },
        ParseFailure::Schema(violations) => Error::SchemaValidation {
            path: path.to_path_buf(),
            violations,
        },
    })?;

    debug!("Loaded {} declaration(s) from {:?}", declarations.len(), path);
    Ok(LoadOutcome::Loaded(declarations))
}

enum ParseFailure {
    Syntax(String),
    Schema(Vec<String>),
}

fn parse(content: &str) -> std::result::Result<Declarations, ParseFailure> {
    let root: Value =
        serde_json::from_str(content).map_err(|e| ParseFailure::Syntax(e.to_string()))?;

    let violations = validate(&root);
    if !violations.is_empty() {
        return Err(ParseFailure::Schema(violations));
    }

    let entries: Vec<(DeclarationKey, &Value)> = match root.get("repositories") {
        None => Vec::new(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, entry)| (DeclarationKey::from_object_key(key), entry))
            .collect(),
        Some(Value::Array(list)) => list
            .iter()
            .enumerate()
            .map(|(index, entry)| (DeclarationKey::Index(index), entry))
            .collect(),
        // Rejected by validate()
        Some(_) => Vec::new(),
    };

    let declarations = entries
        .into_iter()
        .filter_map(|(key, entry)| {
            let config = entry.as_object()?.clone();
            let kind = config
                .get("type")
                .and_then(Value::as_str)
                .map(str::to_string);
            Some(RepositoryDeclaration { key, kind, config })
        })
        .collect();

    Ok(Declarations::new(declarations))
}

/// Check the lax schema, returning every violation found.
///
/// Unknown fields are allowed at every level.
fn validate(root: &Value) -> Vec<String> {
    let mut violations = Vec::new();

    let Some(root) = root.as_object() else {
        violations.push("root : must be an object".to_string());
        return violations;
    };

    let entries: Vec<(String, &Value)> = match root.get("repositories") {
        None => return violations,
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, entry)| (format!("repositories.{}", key), entry))
            .collect(),
        Some(Value::Array(list)) => list
            .iter()
            .enumerate()
            .map(|(index, entry)| (format!("repositories[{}]", index), entry))
            .collect(),
        Some(_) => {
            violations.push("repositories : must be an object or an array".to_string());
            return violations;
        }
    };

    for (pointer, entry) in entries {
        let Some(entry) = entry.as_object() else {
            violations.push(format!("{} : must be an object", pointer));
            continue;
        };

        if let Some(kind) = entry.get("type")
            && !kind.is_string()
        {
            violations.push(format!("{}.type : must be a string", pointer));
        }

        let has_location = ["url", "path"]
            .iter()
            .any(|field| entry.get(*field).is_some_and(Value::is_string));
        if !has_location {
            violations.push(format!(
                "{} : must have a \"url\" or \"path\" string",
                pointer
            ));
        }
    }

    violations
}
