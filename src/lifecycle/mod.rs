//! Lifecycle Hooks Module
//!
//! Components implementing [`Lifecycle`] are discovered at startup and
//! driven through three phases by the [`LifecycleManager`].
//!
//! # Lifecycle Phases
//!
//! ```text
//! 1. pre_load (each component)       before host bootstrap
//!    ↓
//! 2. Configuration + mode resolution
//!    ↓
//! 3. Host start
//!    ↓
//! 4. on_load (each component)        host is serving
//!    ↓
//! [Running...]
//!    ↓
//! 5. Shutdown signal / host failure
//!    ↓
//! 6. on_destroy (each component)
//! ```

mod error;
mod manager;
mod shutdown;
mod traits;

pub use error::{LifecycleError, Phase, Result};
pub use manager::{ComponentState, LifecycleManager};
pub use shutdown::shutdown_signal;
pub use traits::{LIFECYCLE, Lifecycle, NoopLifecycle};
