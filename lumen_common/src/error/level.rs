//! Error severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Severity of a reported error.
///
/// Variants are declared from least to most severe, so the derived ordering
/// makes `Fatal` the greatest level. Uses lowercase serde values for TOML
/// compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLevel {
    /// Advisory, non-blocking.
    Warning,
    /// Operation failed, subsystem may continue in a degraded state.
    Critical,
    /// Subsystem cannot continue.
    Fatal,
}

impl ErrorLevel {
    /// All levels, least severe first.
    pub const ALL: [ErrorLevel; 3] = [ErrorLevel::Warning, ErrorLevel::Critical, ErrorLevel::Fatal];

    /// Lowercase label used in settings files and log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorLevel::Warning => "warning",
            ErrorLevel::Critical => "critical",
            ErrorLevel::Fatal => "fatal",
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name an [`ErrorLevel`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for ErrorLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_is_most_severe() {
        assert!(ErrorLevel::Fatal > ErrorLevel::Critical);
        assert!(ErrorLevel::Critical > ErrorLevel::Warning);
        assert_eq!(ErrorLevel::ALL.iter().max(), Some(&ErrorLevel::Fatal));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("fatal".parse::<ErrorLevel>(), Ok(ErrorLevel::Fatal));
        assert_eq!(" Critical ".parse::<ErrorLevel>(), Ok(ErrorLevel::Critical));
        assert_eq!("WARNING".parse::<ErrorLevel>(), Ok(ErrorLevel::Warning));
        assert!(matches!("error".parse::<ErrorLevel>(), Err(ParseLevelError(_))));
    }

    #[test]
    fn test_level_deserialization() {
        #[derive(Debug, Deserialize)]
        struct TestWrapper {
            level: ErrorLevel,
        }

        let wrapper: TestWrapper = toml::from_str("level = \"critical\"").unwrap();
        assert_eq!(wrapper.level, ErrorLevel::Critical);
        assert!(toml::from_str::<TestWrapper>("level = \"loud\"").is_err());
    }

    #[test]
    fn test_display_matches_label() {
        for level in ErrorLevel::ALL {
            assert_eq!(level.to_string(), level.as_str());
        }
    }
}
