//! Application launcher
//!
//! [`Application`] runs the startup sequence against a [`HostFramework`];
//! [`AxumHost`] is the bundled host.

mod application;
mod beans;
mod host;
mod web;

pub use application::{Application, ApplicationBuilder, RunningContext, run};
pub use beans::BeanRegistry;
pub use host::{HostError, HostEvents, HostFramework, HostHandle};
pub use web::{AxumHost, LIVENESS_PATH, READINESS_PATH};
