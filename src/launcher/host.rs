//! Host framework boundary
//!
//! The launcher does not serve anything itself: it hands the prepared
//! environment to a [`HostFramework`] and listens to the two events the host
//! fires while starting up.

use crate::config::Environment;
use async_trait::async_trait;
use std::fmt;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid host configuration: {0}")]
    Configuration(#[from] crate::error::ConfigurationError),

    #[error("Server error: {0}")]
    Serve(String),

    #[error("{0}")]
    Other(String),
}

impl HostError {
    pub fn serve(msg: impl Into<String>) -> Self {
        Self::Serve(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

type PreparedListener = Box<dyn FnMut(&mut Environment) + Send>;
type FailedListener = Box<dyn FnMut(&HostError) + Send>;

/// Startup event hooks registered by the launcher
///
/// A host fires `environment prepared` every time its environment is
/// (re)built, and `failed` once if startup aborts.
#[derive(Default)]
pub struct HostEvents {
    on_environment_prepared: Vec<PreparedListener>,
    on_failed: Vec<FailedListener>,
    failed: bool,
}

impl HostEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_environment_prepared<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&mut Environment) + Send + 'static,
    {
        self.on_environment_prepared.push(Box::new(listener));
        self
    }

    pub fn on_failed<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&HostError) + Send + 'static,
    {
        self.on_failed.push(Box::new(listener));
        self
    }

    pub fn fire_environment_prepared(&mut self, environment: &mut Environment) {
        tracing::debug!("Environment prepared ({} sources)", environment.len());
        for listener in &mut self.on_environment_prepared {
            listener(environment);
        }
    }

    /// Notify failure listeners. Only the first call has any effect.
    pub fn fire_failed(&mut self, error: &HostError) {
        if self.failed {
            return;
        }
        self.failed = true;
        tracing::error!("Host startup failed: {}", error);
        for listener in &mut self.on_failed {
            listener(error);
        }
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }
}

impl fmt::Debug for HostEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostEvents")
            .field("on_environment_prepared", &self.on_environment_prepared.len())
            .field("on_failed", &self.on_failed.len())
            .field("failed", &self.failed)
            .finish()
    }
}

/// Underlying framework that actually serves the application
#[async_trait]
pub trait HostFramework: Send {
    /// Start serving. Implementations fire `environment prepared` before
    /// reading any configuration from `environment`.
    async fn start(
        self: Box<Self>,
        environment: &mut Environment,
        events: &mut HostEvents,
    ) -> Result<Box<dyn HostHandle>, HostError>;
}

/// Handle to a started host
#[async_trait]
pub trait HostHandle: Send + Sync {
    fn local_addr(&self) -> Option<SocketAddr>;

    /// Stop serving, draining in-flight work where the host supports it
    async fn stop(&mut self) -> Result<(), HostError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_failed_fires_once() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut events = HostEvents::new();
        let sink = Arc::clone(&calls);
        events.on_failed(move |err| sink.lock().unwrap().push(err.to_string()));

        assert!(!events.has_failed());
        events.fire_failed(&HostError::other("port in use"));
        events.fire_failed(&HostError::other("again"));

        assert!(events.has_failed());
        assert_eq!(*calls.lock().unwrap(), vec!["port in use"]);
    }

    #[test]
    fn test_prepared_listeners_see_environment() {
        let mut events = HostEvents::new();
        events.on_environment_prepared(|env| {
            env.add_last(crate::config::MapPropertySource::from_pairs("extra", [("k", "v")]));
        });

        let mut environment = Environment::new();
        events.fire_environment_prepared(&mut environment);
        assert_eq!(environment.property("k").as_deref(), Some("v"));
    }
}
