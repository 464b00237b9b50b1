//! Axum-backed host framework

use super::host::{HostError, HostEvents, HostFramework, HostHandle};
use crate::config::{Environment, HostSettings};
use crate::context::ProcessContext;
use crate::mode::Mode;
use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

pub const LIVENESS_PATH: &str = "/health/liveness";
pub const READINESS_PATH: &str = "/health/readiness";

/// Serves an axum [`Router`] on the configured address
///
/// # Example
///
/// ```rust,ignore
/// let router = Router::new().route("/hello", get(|| async { "hello" }));
/// let running = bootkit::run("greeter", AxumHost::new(router), std::env::args().skip(1)).await?;
/// running.wait_for_shutdown().await?;
/// ```
#[derive(Debug, Default)]
pub struct AxumHost {
    router: Router,
}

impl AxumHost {
    pub fn new(router: Router) -> Self {
        Self { router }
    }
}

struct HealthState {
    application: String,
    mode: Mode,
    started_at: DateTime<Utc>,
    ready: AtomicBool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthReport {
    status: &'static str,
    application: String,
    mode: Mode,
    started_at: DateTime<Utc>,
}

impl HealthState {
    fn report(&self, status: &'static str) -> HealthReport {
        HealthReport {
            status,
            application: self.application.clone(),
            mode: self.mode,
            started_at: self.started_at,
        }
    }
}

async fn liveness_handler(State(health): State<Arc<HealthState>>) -> Json<HealthReport> {
    Json(health.report("UP"))
}

async fn readiness_handler(
    State(health): State<Arc<HealthState>>,
) -> (StatusCode, Json<HealthReport>) {
    if health.ready.load(Ordering::Acquire) {
        (StatusCode::OK, Json(health.report("UP")))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(health.report("DOWN")))
    }
}

fn health_routes(health: Arc<HealthState>) -> Router {
    Router::new()
        .route(LIVENESS_PATH, get(liveness_handler))
        .route(READINESS_PATH, get(readiness_handler))
        .with_state(health)
}

fn failed(events: &mut HostEvents, error: HostError) -> HostError {
    events.fire_failed(&error);
    error
}

#[async_trait]
impl HostFramework for AxumHost {
    async fn start(
        self: Box<Self>,
        environment: &mut Environment,
        events: &mut HostEvents,
    ) -> Result<Box<dyn HostHandle>, HostError> {
        events.fire_environment_prepared(environment);

        let settings = match HostSettings::from_environment(environment) {
            Ok(settings) => settings,
            Err(err) => return Err(failed(events, err.into())),
        };

        let addr = settings.socket_addr();
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(source) => return Err(failed(events, HostError::Bind { addr, source })),
        };
        let local_addr = listener.local_addr().ok();

        let health = Arc::new(HealthState {
            application: settings.application_name.clone(),
            mode: ProcessContext::mode(),
            started_at: Utc::now(),
            ready: AtomicBool::new(false),
        });

        let mut router = self.router;
        if settings.health_probes_enabled {
            router = router.merge(health_routes(Arc::clone(&health)));
        }
        let router = router.layer(TraceLayer::new_for_http());

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
        });

        health.ready.store(true, Ordering::Release);
        tracing::info!(
            "Listening on {} (shutdown: {}, probes: {})",
            local_addr.unwrap_or(addr),
            settings.shutdown_mode,
            settings.health_probes_enabled
        );

        Ok(Box::new(AxumHandle {
            local_addr,
            shutdown: shutdown_tx,
            server: Some(server),
            drain_timeout: settings.drain_timeout(),
            health,
        }))
    }
}

struct AxumHandle {
    local_addr: Option<SocketAddr>,
    shutdown: watch::Sender<bool>,
    server: Option<JoinHandle<std::io::Result<()>>>,
    drain_timeout: Duration,
    health: Arc<HealthState>,
}

#[async_trait]
impl HostHandle for AxumHandle {
    fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// In-flight requests get up to the drain timeout, then the server task is aborted
    async fn stop(&mut self) -> Result<(), HostError> {
        let Some(mut server) = self.server.take() else {
            return Ok(());
        };

        self.health.ready.store(false, Ordering::Release);
        let _ = self.shutdown.send(true);

        match tokio::time::timeout(self.drain_timeout, &mut server).await {
            Ok(Ok(Ok(()))) => {
                tracing::info!("Host stopped");
                Ok(())
            }
            Ok(Ok(Err(err))) => Err(HostError::serve(err.to_string())),
            Ok(Err(err)) => Err(HostError::serve(err.to_string())),
            Err(_) => {
                tracing::warn!(
                    "Drain timeout of {:?} elapsed, aborting server",
                    self.drain_timeout
                );
                server.abort();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapPropertySource;
    use crate::constants::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn local_environment(probes: &str) -> Environment {
        let mut environment = Environment::new();
        environment.add_first(MapPropertySource::from_pairs(
            COMMAND_LINE_SOURCE,
            [
                (APPLICATION_NAME, "probe-test"),
                (SERVER_ADDRESS, "127.0.0.1"),
                (SERVER_PORT, "0"),
                (HEALTH_PROBES_ENABLED, probes),
                (SHUTDOWN_GRACE_PERIOD, "1s"),
            ],
        ));
        environment
    }

    async fn fetch(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request =
            format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    fn body_of(response: &str) -> &str {
        response.split_once("\r\n\r\n").map_or("", |(_, body)| body)
    }

    #[tokio::test]
    async fn test_serves_router_and_health_probes() {
        let router = Router::new().route("/hello", get(|| async { "hello" }));
        let mut environment = local_environment("true");
        let mut events = HostEvents::new();

        let mut handle = Box::new(AxumHost::new(router))
            .start(&mut environment, &mut events)
            .await
            .unwrap();
        let addr = handle.local_addr().unwrap();

        let hello = fetch(addr, "/hello").await;
        assert!(hello.starts_with("HTTP/1.1 200"));
        assert!(hello.ends_with("hello"));

        let liveness = fetch(addr, LIVENESS_PATH).await;
        assert!(liveness.starts_with("HTTP/1.1 200"));
        let body: serde_json::Value = serde_json::from_str(body_of(&liveness)).unwrap();
        assert_eq!(body["status"], "UP");
        assert_eq!(body["application"], "probe-test");
        assert!(body["mode"].is_string());
        assert!(body["startedAt"].is_string());

        let readiness = fetch(addr, READINESS_PATH).await;
        assert!(readiness.starts_with("HTTP/1.1 200"));

        handle.stop().await.unwrap();
        assert!(TcpStream::connect(addr).await.is_err());
        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_probes_can_be_disabled() {
        let mut environment = local_environment("false");
        let mut events = HostEvents::new();

        let mut handle = Box::new(AxumHost::default())
            .start(&mut environment, &mut events)
            .await
            .unwrap();

        let liveness = fetch(handle.local_addr().unwrap(), LIVENESS_PATH).await;
        assert!(liveness.starts_with("HTTP/1.1 404"));
        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_settings_fire_failure() {
        let mut environment = local_environment("true");
        environment.add_first(MapPropertySource::from_pairs("override", [(SERVER_PORT, "http")]));
        let mut events = HostEvents::new();

        let err = Box::new(AxumHost::default())
            .start(&mut environment, &mut events)
            .await
            .err()
            .unwrap();

        assert!(matches!(err, HostError::Configuration(_)));
        assert!(events.has_failed());
    }

    #[tokio::test]
    async fn test_bind_failure_fires_failure() {
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port().to_string();

        let mut environment = local_environment("true");
        environment.add_first(MapPropertySource::from_pairs("override", [(SERVER_PORT, port)]));
        let mut events = HostEvents::new();

        let err = Box::new(AxumHost::default())
            .start(&mut environment, &mut events)
            .await
            .err()
            .unwrap();

        assert!(matches!(err, HostError::Bind { .. }));
        assert!(events.has_failed());
    }
}
