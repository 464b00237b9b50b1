use bootkit::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

static GREETINGS: AtomicU64 = AtomicU64::new(0);

/// Opens and closes the (pretend) greeting store
#[derive(Default, Component)]
#[component(provides(Lifecycle))]
pub struct GreetingStore;

impl Lifecycle for GreetingStore {
    fn pre_load(&self) -> Result<(), LifecycleError> {
        tracing::info!("Opening greeting store");
        Ok(())
    }

    fn on_destroy(&self) -> Result<(), LifecycleError> {
        tracing::info!(
            "Closing greeting store after {} greetings",
            GREETINGS.load(Ordering::Relaxed)
        );
        Ok(())
    }
}

/// Reports the resolved mode once the server is up
#[derive(Default, Component)]
#[component(provides(Lifecycle))]
pub struct ModeReporter;

impl Lifecycle for ModeReporter {
    fn on_load(&self) -> Result<(), LifecycleError> {
        if ProcessContext::is_prod() {
            tracing::info!("{} serving production traffic", ProcessContext::app_name());
        } else {
            tracing::info!(
                "{} running in {} mode",
                ProcessContext::app_name(),
                ProcessContext::mode()
            );
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct Greeting {
    message: String,
    mode: Mode,
    count: u64,
}

async fn hello(Path(name): Path<String>) -> Json<Greeting> {
    let count = GREETINGS.fetch_add(1, Ordering::Relaxed) + 1;
    Json(Greeting {
        message: format!("Hello, {name}!"),
        mode: ProcessContext::mode(),
        count,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootkit::logging::init_logging("info,tower_http=debug")?;

    let router = Router::new().route("/hello/{name}", get(hello));

    // e.g. cargo run -p hello-boot -- --server.port=3000 --app.profiles.active=prod
    let args = std::env::args().skip(1);
    let running = bootkit::run("hello-boot", AxumHost::new(router), args).await?;

    if let Some(addr) = running.local_addr() {
        tracing::info!("Try: curl http://{}/hello/world", addr);
    }

    running.wait_for_shutdown().await?;
    tracing::info!("Server stopped");
    Ok(())
}
