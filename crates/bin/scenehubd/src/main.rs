//! # scenehubd — scenehub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Initialize tracing
//! - Load the presets document from disk
//! - Construct the device network, dispatcher, and scene service
//! - Build the axum router and serve
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use scenehub_adapter_http_axum::{router, state::AppState};
use scenehub_adapter_storage_json::JsonPresetsStore;
use scenehub_adapter_virtual::VirtualDeviceNetwork;
use scenehub_app::dispatcher::CommandDispatcher;
use scenehub_app::services::scene_service::SceneService;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).context("parsing logging filter")?,
        )
        .init();

    // Persistence
    let store = JsonPresetsStore::new(&config.presets.path);
    let initial = store.load().await.context("loading presets document")?;
    tracing::info!(
        path = %config.presets.path,
        scenes = initial.scenes.len(),
        "presets document loaded"
    );

    // Device network — the virtual adapter stands in for a real device
    // directory and channel transport.
    let network = VirtualDeviceNetwork::demo();

    // Command dispatch
    let dispatcher = CommandDispatcher::spawn(network.clone(), &config.dispatcher_config());

    // Scene service
    let service = SceneService::new(
        config.scene_service_config(),
        network,
        store,
        dispatcher,
        initial,
    );

    // HTTP
    let app = router::build(AppState::new(service));
    let bind_addr = config.bind_addr();
    tracing::info!(%bind_addr, site_id = %config.site.id, "scenehubd listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    axum::serve(listener, app).await.context("serving HTTP")?;

    Ok(())
}
