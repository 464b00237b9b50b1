use thiserror::Error;

use crate::launcher::HostError;
use crate::lifecycle::LifecycleError;
use crate::scan::DiscoveryError;

pub type Result<T> = std::result::Result<T, BootError>;

/// Fatal configuration problems detected before or during startup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Application name must not be blank")]
    BlankApplicationName,

    #[error(transparent)]
    ConflictingEnvironment(#[from] ConflictingEnvironmentError),

    #[error("Invalid value '{value}' for property '{key}': {reason}")]
    InvalidProperty {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigurationError {
    pub fn invalid_property(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidProperty {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// More than one recognized environment mode was active at the same time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Conflicting environment modes active: [{}]", .labels.join(","))]
pub struct ConflictingEnvironmentError {
    pub labels: Vec<String>,
}

#[derive(Debug, Error)]
pub enum BootError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("Host startup failed: {0}")]
    Host(#[from] HostError),
}

impl From<ConflictingEnvironmentError> for BootError {
    fn from(err: ConflictingEnvironmentError) -> Self {
        BootError::Configuration(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_names_labels() {
        let err = ConflictingEnvironmentError {
            labels: vec!["test".to_string(), "prod".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Conflicting environment modes active: [test,prod]"
        );

        let boot: BootError = err.into();
        assert!(boot.to_string().contains("test,prod"));
    }
}
