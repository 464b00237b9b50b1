//! Application Bootstrap
//!
//! Runs the startup sequence: validate, initialise the process context,
//! pre-load components, layer configuration, resolve the mode, start the host
//! and finally load components.

use super::beans::BeanRegistry;
use super::host::{HostError, HostEvents, HostFramework, HostHandle};
use super::web::AxumHost;
use crate::config::{
    BasicProperties, Environment, HostSettings, MapPropertySource, SystemEnvironmentSource,
    SystemProperties,
};
use crate::context::ProcessContext;
use crate::error::{BootError, ConfigurationError, Result};
use crate::lifecycle::{LifecycleManager, shutdown_signal};
use crate::mode::{self, Mode};
use chrono::{DateTime, Utc};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Entry point for bootstrapping an application
///
/// # Example
///
/// ```rust,ignore
/// use bootkit::launcher::{Application, AxumHost};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let running = Application::builder("orders")
///         .args(std::env::args().skip(1))
///         .host(AxumHost::new(router))
///         .run()
///         .await?;
///
///     running.wait_for_shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct Application;

impl Application {
    pub fn builder(app_name: impl Into<String>) -> ApplicationBuilder {
        ApplicationBuilder::new(app_name)
    }
}

/// Fluent configuration of a single application run
pub struct ApplicationBuilder {
    app_name: String,
    args: Vec<String>,
    host: Option<Box<dyn HostFramework>>,
    lifecycle: Option<Arc<LifecycleManager>>,
}

impl ApplicationBuilder {
    fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            args: Vec::new(),
            host: None,
            lifecycle: None,
        }
    }

    /// Command line arguments, without the program name
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Host framework to start; an [`AxumHost`] with an empty router by default
    pub fn host<H: HostFramework + 'static>(mut self, host: H) -> Self {
        self.host = Some(Box::new(host));
        self
    }

    /// Lifecycle manager to drive; the process-wide manager by default
    pub fn lifecycle(mut self, manager: Arc<LifecycleManager>) -> Self {
        self.lifecycle = Some(manager);
        self
    }

    pub async fn run(self) -> Result<RunningContext> {
        let app_name = self.app_name.trim().to_string();
        if app_name.is_empty() {
            return Err(ConfigurationError::BlankApplicationName.into());
        }

        ProcessContext::init(&app_name);

        let lifecycle = self.lifecycle.unwrap_or_else(LifecycleManager::global);
        lifecycle.pre_load()?;

        let mut environment = Environment::new();
        environment
            .add_first(MapPropertySource::from_args(&self.args))
            .add_last(SystemProperties::global().snapshot())
            .add_last(SystemEnvironmentSource::from_env());

        let mode = mode::resolve_environment(&environment)?;
        log_startup(&app_name, mode);

        let basic = BasicProperties::new(&app_name, mode);
        let mut events = HostEvents::new();
        {
            let basic = basic.clone();
            events.on_environment_prepared(move |environment| basic.apply_to(environment));
        }
        {
            let lifecycle = Arc::clone(&lifecycle);
            events.on_failed(move |_| {
                if let Err(err) = lifecycle.on_destroy() {
                    tracing::error!("Error destroying components after failed startup: {}", err);
                }
            });
        }

        let host: Box<dyn HostFramework> = match self.host {
            Some(host) => host,
            None => Box::new(AxumHost::default()),
        };
        let mut handle = match host.start(&mut environment, &mut events).await {
            Ok(handle) => handle,
            Err(err) => {
                events.fire_failed(&err);
                return Err(err.into());
            }
        };

        // A host may start without reading every setting; still a failed startup
        let settings = match HostSettings::from_environment(&environment) {
            Ok(settings) => settings,
            Err(err) => {
                stop_quietly(handle.as_mut()).await;
                events.fire_failed(&HostError::Configuration(err.clone()));
                return Err(err.into());
            }
        };

        if let Err(err) = lifecycle.on_load() {
            stop_quietly(handle.as_mut()).await;
            return Err(err.into());
        }

        let context =
            RunningContext::new(app_name, mode, environment, settings, basic, lifecycle, handle);
        tracing::info!(
            "Started {} in {} mode (run {})",
            context.app_name,
            context.mode,
            context.run_id
        );
        Ok(context)
    }
}

/// One-call form of [`Application::builder`]
pub async fn run<H, I, S>(app_name: &str, host: H, args: I) -> Result<RunningContext>
where
    H: HostFramework + 'static,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Application::builder(app_name).host(host).args(args).run().await
}

fn log_startup(app_name: &str, mode: Mode) {
    tracing::info!("Starting {} in {} mode", app_name, mode);
    match std::env::current_exe() {
        Ok(path) => tracing::info!("Running from {}", path.display()),
        Err(err) => tracing::debug!("Executable location unavailable: {}", err),
    }
}

async fn stop_quietly(handle: &mut dyn HostHandle) {
    if let Err(err) = handle.stop().await {
        tracing::error!("Error stopping host: {}", err);
    }
}

/// Handle to a started application
pub struct RunningContext {
    app_name: String,
    mode: Mode,
    run_id: Uuid,
    started_at: DateTime<Utc>,
    environment: Arc<Environment>,
    settings: Arc<HostSettings>,
    beans: BeanRegistry,
    lifecycle: Arc<LifecycleManager>,
    local_addr: Option<SocketAddr>,
    host: Mutex<Option<Box<dyn HostHandle>>>,
}

impl RunningContext {
    fn new(
        app_name: String,
        mode: Mode,
        environment: Environment,
        settings: HostSettings,
        basic: BasicProperties,
        lifecycle: Arc<LifecycleManager>,
        host: Box<dyn HostHandle>,
    ) -> Self {
        let environment = Arc::new(environment);
        let settings = Arc::new(settings);

        let beans = BeanRegistry::new();
        beans
            .register_arc(Arc::clone(&environment))
            .register_arc(Arc::clone(&settings))
            .register_arc(Arc::clone(&lifecycle))
            .register(basic);
        if let Some(context) = ProcessContext::current() {
            beans.register(context);
        }

        Self {
            app_name,
            mode,
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            environment,
            settings,
            beans,
            lifecycle,
            local_addr: host.local_addr(),
            host: Mutex::new(Some(host)),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn settings(&self) -> &HostSettings {
        &self.settings
    }

    pub fn lifecycle(&self) -> &Arc<LifecycleManager> {
        &self.lifecycle
    }

    /// Address the host is bound to, when it listens on a socket
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn beans(&self) -> &BeanRegistry {
        &self.beans
    }

    pub fn bean<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.beans.get::<T>()
    }

    /// Stop the host, then destroy every component.
    ///
    /// Safe to call more than once; later calls find nothing left to stop.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("Starting graceful shutdown...");

        let host = self.host.lock().await.take();
        let stopped = match host {
            Some(mut host) => host.stop().await.map_err(BootError::from),
            None => Ok(()),
        };

        self.lifecycle.on_destroy()?;
        stopped?;

        tracing::info!("Graceful shutdown complete");
        Ok(())
    }

    /// Wait for SIGINT/SIGTERM, then shut down
    pub async fn wait_for_shutdown(&self) -> Result<()> {
        shutdown_signal().await;
        self.shutdown().await
    }
}

impl std::fmt::Debug for RunningContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunningContext")
            .field("app_name", &self.app_name)
            .field("mode", &self.mode)
            .field("run_id", &self.run_id)
            .field("started_at", &self.started_at)
            .field("local_addr", &self.local_addr)
            .finish()
    }
}
