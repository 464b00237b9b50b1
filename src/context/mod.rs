//! Process-wide application context
//!
//! Holds the application name and the resolved runtime mode. The context is
//! created by [`ProcessContext::init`] at startup and read by any component
//! that needs environment-aware behavior. Reads never fail: before `init`
//! the name is empty and the mode is `dev`.

use crate::constants::EMPTY_STR;
use crate::mode::Mode;
use serde::Serialize;
use std::sync::{PoisonError, RwLock};

static INSTANCE: RwLock<Option<ProcessContext>> = RwLock::new(None);

/// Snapshot of the process-wide context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessContext {
    app_name: String,
    app_mode: Mode,
}

impl ProcessContext {
    /// Create the process context, replacing any previous one.
    ///
    /// The mode starts as `dev` until the environment resolver records the
    /// resolved one.
    pub fn init(app_name: impl Into<String>) {
        let context = ProcessContext {
            app_name: app_name.into(),
            app_mode: Mode::default(),
        };
        tracing::debug!("Process context initialised for '{}'", context.app_name);
        *INSTANCE.write().unwrap_or_else(PoisonError::into_inner) = Some(context);
    }

    /// Clone of the current context, if initialised
    pub fn current() -> Option<ProcessContext> {
        INSTANCE
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn app_name() -> String {
        Self::current().map_or_else(|| EMPTY_STR.to_string(), |ctx| ctx.app_name)
    }

    pub fn mode() -> Mode {
        Self::current().map_or(Mode::Dev, |ctx| ctx.app_mode)
    }

    /// Record a resolved mode. Returns `false` when no context exists.
    pub(crate) fn update_mode(mode: Mode) -> bool {
        let mut guard = INSTANCE.write().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(context) => {
                context.app_mode = mode;
                true
            }
            None => false,
        }
    }

    /// Whether the process runs in `mode`. `false` before initialisation.
    pub fn is_mode(mode: Mode) -> bool {
        Self::current().is_some_and(|ctx| ctx.app_mode == mode)
    }

    /// Whether the process runs in any of `modes`. `false` before initialisation.
    pub fn is_any_mode(modes: &[Mode]) -> bool {
        Self::current().is_some_and(|ctx| modes.contains(&ctx.app_mode))
    }

    /// Development is assumed until a context says otherwise
    pub fn is_dev() -> bool {
        Self::current().is_none_or(|ctx| ctx.app_mode == Mode::Dev)
    }

    pub fn is_test() -> bool {
        Self::is_mode(Mode::Test)
    }

    pub fn is_prod() -> bool {
        Self::is_mode(Mode::Prod)
    }

    /// Name carried by this snapshot
    pub fn name(&self) -> &str {
        &self.app_name
    }

    /// Mode carried by this snapshot
    pub fn app_mode(&self) -> Mode {
        self.app_mode
    }

    #[cfg(test)]
    pub(crate) fn clear() {
        *INSTANCE.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_before_init() {
        ProcessContext::clear();
        assert_eq!(ProcessContext::app_name(), "");
        assert_eq!(ProcessContext::mode(), Mode::Dev);
        assert!(ProcessContext::is_dev());
        assert!(!ProcessContext::is_mode(Mode::Dev));
        assert!(!ProcessContext::is_any_mode(&[Mode::Dev, Mode::Prod]));
    }

    #[test]
    #[serial]
    fn test_reinit_replaces_previous_context() {
        ProcessContext::init("billing");
        ProcessContext::update_mode(Mode::Prod);
        assert_eq!(ProcessContext::app_name(), "billing");
        assert!(ProcessContext::is_prod());

        ProcessContext::init("shipping");
        assert_eq!(ProcessContext::app_name(), "shipping");
        // Nothing carried over from the previous instance
        assert_eq!(ProcessContext::mode(), Mode::Dev);
        assert!(!ProcessContext::is_prod());
        ProcessContext::clear();
    }

    #[test]
    #[serial]
    fn test_mode_predicates() {
        ProcessContext::init("billing");
        ProcessContext::update_mode(Mode::Test);

        assert!(ProcessContext::is_test());
        assert!(!ProcessContext::is_dev());
        assert!(ProcessContext::is_mode(Mode::Test));
        assert!(ProcessContext::is_any_mode(&[Mode::Prod, Mode::Test]));
        assert!(!ProcessContext::is_any_mode(&[Mode::Prod]));

        let snapshot = ProcessContext::current().unwrap();
        assert_eq!(snapshot.name(), "billing");
        assert_eq!(snapshot.app_mode(), Mode::Test);
        ProcessContext::clear();
    }

    #[test]
    #[serial]
    fn test_update_mode_without_context() {
        ProcessContext::clear();
        assert!(!ProcessContext::update_mode(Mode::Prod));
        assert_eq!(ProcessContext::mode(), Mode::Dev);
    }
}
