//! Dependency links declared by the root package.

use std::fmt;

/// Pretty form of the constraint written by constraint forcing.
pub const DEV_PRETTY_CONSTRAINT: &str = "@dev";

/// Version constraint carried by a [`Link`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Matches any version.
    MatchAll,
    /// A version range as the host parsed it (e.g. `>=1.0.0.0-dev <2.0.0.0-dev`).
    Range(String),
}

impl Constraint {
    /// The development constraint: matches every version of a package.
    pub fn dev() -> Self {
        Constraint::MatchAll
    }

    /// Check if this constraint accepts any version.
    pub fn matches_all(&self) -> bool {
        matches!(self, Constraint::MatchAll)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::MatchAll => write!(f, "*"),
            Constraint::Range(range) => write!(f, "{}", range),
        }
    }
}

/// A requirement from `source` onto the package named `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Name of the package declaring the requirement
    pub source: String,
    /// Name of the required package
    pub target: String,
    pub constraint: Constraint,
    /// Relationship description, e.g. "requires" or "requires (for development)"
    pub description: String,
    /// Constraint as the user wrote it, e.g. `^1.0`
    pub pretty_constraint: String,
}

impl Link {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        constraint: Constraint,
        description: impl Into<String>,
        pretty_constraint: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            constraint,
            description: description.into(),
            pretty_constraint: pretty_constraint.into(),
        }
    }

    /// Copy of this link with only the constraint replaced.
    pub fn with_constraint(&self, constraint: Constraint, pretty: impl Into<String>) -> Self {
        Self {
            constraint,
            pretty_constraint: pretty.into(),
            ..self.clone()
        }
    }

    /// Copy of this link constrained to any development version.
    pub fn to_dev(&self) -> Self {
        self.with_constraint(Constraint::dev(), DEV_PRETTY_CONSTRAINT)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.source, self.description, self.target, self.pretty_constraint
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_link() -> Link {
        Link::new(
            "acme/app",
            "acme/lib-a",
            Constraint::Range(">=1.0.0.0-dev <2.0.0.0-dev".into()),
            "requires",
            "^1.0",
        )
    }

    #[test]
    fn test_to_dev_keeps_identity() {
        let link = make_link();
        let dev = link.to_dev();

        assert_eq!(dev.source, "acme/app");
        assert_eq!(dev.target, "acme/lib-a");
        assert_eq!(dev.description, "requires");
        assert_eq!(dev.constraint, Constraint::MatchAll);
        assert_eq!(dev.pretty_constraint, "@dev");
    }

    #[test]
    fn test_to_dev_does_not_touch_original() {
        let link = make_link();
        let _ = link.to_dev();

        assert_eq!(link.pretty_constraint, "^1.0");
        assert!(!link.constraint.matches_all());
    }

    #[test]
    fn test_link_display() {
        assert_eq!(
            make_link().to_string(),
            "acme/app requires acme/lib-a (^1.0)"
        );
        assert_eq!(
            make_link().to_dev().to_string(),
            "acme/app requires acme/lib-a (@dev)"
        );
    }

    #[test]
    fn test_constraint_display() {
        assert_eq!(Constraint::dev().to_string(), "*");
        assert_eq!(Constraint::Range("^2.0".into()).to_string(), "^2.0");
    }
}
