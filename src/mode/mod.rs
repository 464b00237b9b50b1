//! Environment mode resolution
//!
//! Exactly one runtime mode is active per process. It is picked from the
//! active profile labels: labels that are not `dev`, `test` or `prod` are
//! ignored, no match means `dev`, and two different matches abort startup.
//!
//! ```rust
//! use bootkit::mode::Mode;
//!
//! assert_eq!(Mode::select(["cloud", "prod"]).unwrap(), Mode::Prod);
//! assert_eq!(Mode::select(Vec::<String>::new()).unwrap(), Mode::Dev);
//! assert!(Mode::select(["test", "prod"]).is_err());
//! ```

mod resolver;

pub use resolver::{resolve, resolve_environment};

use crate::error::ConflictingEnvironmentError;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Canonical runtime mode
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Dev,
    Test,
    Prod,
}

impl Mode {
    /// Pick the single recognized mode among raw profile labels.
    ///
    /// Matching is exact and case-sensitive. Repeating the same label is not
    /// a conflict.
    pub fn select<I, S>(labels: I) -> Result<Mode, ConflictingEnvironmentError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut matched: Vec<Mode> = Vec::new();
        for label in labels {
            if let Ok(mode) = label.as_ref().parse::<Mode>() {
                if !matched.contains(&mode) {
                    matched.push(mode);
                }
            }
        }

        match matched.as_slice() {
            [] => Ok(Mode::Dev),
            [mode] => Ok(*mode),
            _ => Err(ConflictingEnvironmentError {
                labels: matched.iter().map(Mode::to_string).collect(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Dev => crate::constants::MODE_DEV,
            Mode::Test => crate::constants::MODE_TEST,
            Mode::Prod => crate::constants::MODE_PROD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_no_recognized_label_defaults_to_dev() {
        let cases: Vec<Vec<&str>> = vec![
            vec![],
            vec!["cloud"],
            vec!["DEV", "Prod"],
            vec!["local", "docker", "k8s"],
        ];
        for labels in cases {
            assert_eq!(Mode::select(&labels).unwrap(), Mode::Dev, "{labels:?}");
        }
    }

    #[test]
    fn test_single_recognized_label_wins() {
        for mode in Mode::iter() {
            let labels = vec!["cloud".to_string(), mode.to_string(), "eu-west".to_string()];
            assert_eq!(Mode::select(&labels).unwrap(), mode);
        }
        assert_eq!(Mode::select(["prod", "prod"]).unwrap(), Mode::Prod);
    }

    #[test]
    fn test_multiple_recognized_labels_conflict() {
        let err = Mode::select(["test", "prod"]).unwrap_err();
        assert_eq!(err.labels, vec!["test", "prod"]);

        let err = Mode::select(["prod", "x", "dev", "test"]).unwrap_err();
        assert_eq!(err.labels, vec!["prod", "dev", "test"]);
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(Mode::Dev.to_string(), "dev");
        assert_eq!(Mode::Test.as_ref(), "test");
        assert_eq!(Mode::Prod.as_str(), "prod");
        assert_eq!("prod".parse::<Mode>().unwrap(), Mode::Prod);
        assert!("Prod".parse::<Mode>().is_err());
    }
}
