//! Lifecycle capability
//!
//! Components opt into the process lifecycle by implementing [`Lifecycle`]
//! and deriving `Component` with `provides(Lifecycle)`. The manager discovers
//! and drives them; no explicit registration is required.

use super::Result;
use crate::capability;

/// Hooks invoked around application startup and shutdown
///
/// Every hook defaults to a no-op, so a component overrides only the phases
/// it cares about. Hooks run synchronously on the startup thread.
///
/// # Example
///
/// ```rust,ignore
/// use bootkit::lifecycle::{Lifecycle, LifecycleError};
/// use bootkit::Component;
///
/// #[derive(Default, Component)]
/// #[component(provides(Lifecycle))]
/// pub struct CacheWarmer;
///
/// impl Lifecycle for CacheWarmer {
///     fn on_load(&self) -> Result<(), LifecycleError> {
///         tracing::info!("Warming caches");
///         Ok(())
///     }
/// }
/// ```
pub trait Lifecycle: Send + Sync {
    /// Before the host framework starts bootstrapping
    fn pre_load(&self) -> Result<()> {
        Ok(())
    }

    /// After the host framework started successfully
    fn on_load(&self) -> Result<()> {
        Ok(())
    }

    /// On shutdown, or when startup failed
    fn on_destroy(&self) -> Result<()> {
        Ok(())
    }
}

capability!(pub static LIFECYCLE for Lifecycle);

/// Trivial lifecycle that does nothing in every phase.
///
/// Useful as a delegate for wrappers that only forward some hooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLifecycle;

impl Lifecycle for NoopLifecycle {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::CapabilityOf;

    #[test]
    fn test_noop_lifecycle() {
        let noop = NoopLifecycle;
        assert!(noop.pre_load().is_ok());
        assert!(noop.on_load().is_ok());
        assert!(noop.on_destroy().is_ok());
    }

    #[test]
    fn test_lifecycle_descriptor() {
        assert!(<dyn Lifecycle as CapabilityOf>::descriptor().is(&LIFECYCLE));
        assert_eq!(LIFECYCLE.name, "Lifecycle");
    }
}
