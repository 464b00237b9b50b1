use super::TypeKind;
use thiserror::Error;

/// Recoverable discovery problems.
///
/// Discovery never aborts on these: the affected entry is logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("No registered type named '{type_name}'")]
    Unresolvable { type_name: String },

    #[error("Type '{type_name}' is {kind} and cannot be instantiated")]
    NotConstructible { type_name: String, kind: TypeKind },

    #[error("Constructor of '{type_name}' failed: {message}")]
    ConstructorFailed { type_name: String, message: String },

    #[error("Constructor of '{type_name}' panicked: {message}")]
    ConstructorPanicked { type_name: String, message: String },

    #[error("Type '{type_name}' does not provide capability '{capability}'")]
    MissingBinding {
        type_name: String,
        capability: String,
    },
}

impl DiscoveryError {
    pub fn unresolvable(type_name: impl Into<String>) -> Self {
        Self::Unresolvable {
            type_name: type_name.into(),
        }
    }

    /// Wrap any constructor error, keeping its full context chain
    pub fn constructor_failed<E: Into<anyhow::Error>>(type_name: &str, err: E) -> Self {
        Self::ConstructorFailed {
            type_name: type_name.to_string(),
            message: format!("{:#}", err.into()),
        }
    }

    pub fn missing_binding(type_name: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::MissingBinding {
            type_name: type_name.into(),
            capability: capability.into(),
        }
    }
}
