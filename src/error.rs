use std::path::PathBuf;

/// Errors produced while loading settings, loading declarations, or
/// applying them to the host.
///
/// None of these are fatal to the host: the pipeline reports them through
/// [`crate::host::Io`] and hands control back.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The global settings file could not be read or has the wrong shape.
    #[error("invalid global settings in {}: {reason}", .path.display())]
    ConfigParse { path: PathBuf, reason: String },

    /// The declaration file could not be read or is not valid JSON.
    #[error("\"{}\" does not contain valid JSON: {reason}", .path.display())]
    DeclarationParse { path: PathBuf, reason: String },

    /// The declaration file is valid JSON but does not match the schema.
    #[error(
        "\"{}\" does not match the expected JSON schema:\n{}",
        .path.display(),
        format_violations(.violations)
    )]
    SchemaValidation {
        path: PathBuf,
        violations: Vec<String>,
    },

    /// The host refused to build a repository from a declaration.
    #[error("failed to create {kind} repository {key}: {source}")]
    RepositoryConstruction {
        key: String,
        kind: String,
        source: anyhow::Error,
    },

    /// An injected repository could not list the packages it provides.
    #[error("failed to list packages of repository {repository}: {source}")]
    PackageEnumeration {
        repository: String,
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

fn format_violations(violations: &[String]) -> String {
    violations
        .iter()
        .map(|v| format!(" - {}", v))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_validation_lists_every_violation() {
        let err = Error::SchemaValidation {
            path: PathBuf::from("/project/repositories.json"),
            violations: vec![
                "repositories.libA.type : must be a string".into(),
                "repositories.libB : must have a \"url\" or \"path\" string".into(),
            ],
        };

        assert_eq!(
            err.to_string(),
            "\"/project/repositories.json\" does not match the expected JSON schema:\n \
             - repositories.libA.type : must be a string\n \
             - repositories.libB : must have a \"url\" or \"path\" string"
        );
    }

    #[test]
    fn test_repository_construction_message() {
        let err = Error::RepositoryConstruction {
            key: "libA".into(),
            kind: "svn".into(),
            source: anyhow::anyhow!("Repository type is not registered: svn"),
        };

        assert_eq!(
            err.to_string(),
            "failed to create svn repository libA: Repository type is not registered: svn"
        );
    }
}
