//! Lifecycle-specific error types

use strum_macros::{AsRefStr, Display};
use thiserror::Error;

/// Lifecycle phase driven by the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum Phase {
    #[strum(serialize = "pre-load")]
    PreLoad,
    #[strum(serialize = "on-load")]
    OnLoad,
    #[strum(serialize = "on-destroy")]
    OnDestroy,
}

/// Errors raised by, or on behalf of, lifecycle components
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Raised by a component from inside one of its hooks
    #[error("{0}")]
    Failed(String),

    /// A component hook failed while the manager was running a phase
    #[error("{phase} failed for {component}: {message}")]
    HookFailed {
        component: String,
        phase: Phase,
        message: String,
    },
}

impl LifecycleError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    /// Wrap any error a component ran into, keeping its context chain
    pub fn from_error<E: Into<anyhow::Error>>(err: E) -> Self {
        Self::Failed(format!("{:#}", err.into()))
    }

    pub fn hook_failed(
        component: impl Into<String>,
        phase: Phase,
        message: impl Into<String>,
    ) -> Self {
        Self::HookFailed {
            component: component.into(),
            phase,
            message: message.into(),
        }
    }
}

/// A specialized Result type for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_failed_message() {
        let err = LifecycleError::hook_failed("app::Cache", Phase::PreLoad, "redis unreachable");
        assert_eq!(err.to_string(), "pre-load failed for app::Cache: redis unreachable");
    }

    #[test]
    fn test_from_error_keeps_context() {
        let source = anyhow::anyhow!("connection refused").context("opening pool");
        let err = LifecycleError::from_error(source);
        assert_eq!(err.to_string(), "opening pool: connection refused");
    }
}
