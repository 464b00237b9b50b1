//! # Bootkit
//!
//! Application bootstrap layer: resolves the runtime mode, layers process
//! configuration, discovers lifecycle components linked into the binary and
//! drives them around the startup of a host framework.
//!
//! ## Features
//!
//! - **Environment modes**: `dev`, `test` or `prod`, selected from active profiles
//! - **Component discovery**: link-time registry scanned by namespace, no runtime reflection
//! - **Lifecycle hooks**: `pre_load`, `on_load` and `on_destroy` for every discovered component
//! - **Layered configuration**: command line > system properties > OS environment > basic defaults
//! - **Axum host**: serves a router with health probes and graceful shutdown
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bootkit::prelude::*;
//!
//! #[derive(Default, Component)]
//! #[component(provides(Lifecycle))]
//! pub struct CacheWarmer;
//!
//! impl Lifecycle for CacheWarmer {
//!     fn on_load(&self) -> Result<(), LifecycleError> {
//!         tracing::info!("Caches warmed");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     bootkit::logging::init_logging("info")?;
//!
//!     let router = Router::new().route("/hello", get(|| async { "hello" }));
//!     let args = std::env::args().skip(1);
//!     let running = bootkit::run("greeter", AxumHost::new(router), args).await?;
//!
//!     running.wait_for_shutdown().await?;
//!     Ok(())
//! }
//! ```

// Lets `#[derive(Component)]` expand to `::bootkit::...` inside this crate too
extern crate self as bootkit;

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod launcher;
pub mod lifecycle;
pub mod logging;
pub mod mode;
pub mod scan;

// Re-export core types
pub use context::ProcessContext;
pub use error::{BootError, ConfigurationError, ConflictingEnvironmentError, Result};
pub use launcher::{Application, RunningContext, run};
pub use mode::Mode;

// Re-export macros
pub use bootkit_macro::Component;

// Used by the registration macros
pub use inventory;

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use bootkit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Component;
    pub use crate::capability;
    pub use crate::config::{Environment, HostSettings, PropertySource, SystemProperties};
    pub use crate::context::ProcessContext;
    pub use crate::error::{BootError, ConfigurationError};
    pub use crate::launcher::{
        Application, AxumHost, HostError, HostEvents, HostFramework, HostHandle, RunningContext,
    };
    pub use crate::lifecycle::{
        LIFECYCLE, Lifecycle, LifecycleError, LifecycleManager, NoopLifecycle, shutdown_signal,
    };
    pub use crate::mode::Mode;
    pub use crate::scan::{ComponentScanner, filter};
    pub use async_trait::async_trait;
    pub use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        routing::get,
    };
    pub use std::sync::Arc;
}
