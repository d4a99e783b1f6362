//! Package stability levels.

use std::fmt;
use std::str::FromStr;

/// Minimum stability a package version must have to be accepted.
///
/// Ordered from most to least stable, matching the host's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Stability {
    #[default]
    Stable,
    RC,
    Beta,
    Alpha,
    Dev,
}

impl Stability {
    /// Numeric code used by the host's stability flags.
    pub fn code(self) -> u8 {
        match self {
            Stability::Stable => 0,
            Stability::RC => 5,
            Stability::Beta => 10,
            Stability::Alpha => 15,
            Stability::Dev => 20,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Stability::Stable),
            5 => Some(Stability::RC),
            10 => Some(Stability::Beta),
            15 => Some(Stability::Alpha),
            20 => Some(Stability::Dev),
            _ => None,
        }
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stability::Stable => write!(f, "stable"),
            Stability::RC => write!(f, "RC"),
            Stability::Beta => write!(f, "beta"),
            Stability::Alpha => write!(f, "alpha"),
            Stability::Dev => write!(f, "dev"),
        }
    }
}

impl FromStr for Stability {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stable" => Ok(Stability::Stable),
            "rc" => Ok(Stability::RC),
            "beta" => Ok(Stability::Beta),
            "alpha" => Ok(Stability::Alpha),
            "dev" => Ok(Stability::Dev),
            _ => anyhow::bail!(
                "Unknown stability: {}. Expected stable, RC, beta, alpha, or dev.",
                s
            ),
        }
    }
}
