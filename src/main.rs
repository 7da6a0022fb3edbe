use std::sync::Arc;

use tokio::net::TcpListener;

use roomcast::config::{generate_config_template, Config};
use roomcast::rooms::{sweeper, RoomRegistry};
use roomcast::routes;
use roomcast::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load config with layered precedence: defaults < TOML < env < CLI
    let config = Config::load()?;

    // Handle --generate-config: print template and exit
    if config.generate_config {
        print!("{}", generate_config_template());
        return Ok(());
    }

    // Initialize tracing/logging
    if config.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "roomcast=info".parse().unwrap()),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "roomcast=info".parse().unwrap()),
            )
            .init();
    }

    tracing::info!("roomcast server v{} starting", env!("CARGO_PKG_VERSION"));

    // Registry is owned here and shared via Arc: the handlers, the
    // maintenance tasks, and every listener's disconnect guard hold clones.
    let registry = Arc::new(RoomRegistry::new());

    // Spawn the keepalive and eviction sweeps
    let rooms_config = config.rooms.clone().unwrap_or_default();
    sweeper::spawn_maintenance_tasks(Arc::clone(&registry), &rooms_config);

    // Build router
    let app_state = AppState { registry };
    let app = routes::build_router(app_state, &config.static_dir);

    // Bind and serve
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
