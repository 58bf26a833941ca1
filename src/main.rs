//! Waypoint service binary.
//!
//! Startup order: parse args → load + validate config → logging →
//! metrics → clients and breakers → config watcher → HTTP server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use waypoint::config::{load_config, new_handle, watcher::ConfigWatcher, AppConfig};
use waypoint::lifecycle::Shutdown;
use waypoint::observability::{logging, metrics};
use waypoint::orchestrator::Coordinator;
use waypoint::resilience::BreakerRegistry;
use waypoint::HttpServer;

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "Travel query service: weather and attractions for a destination", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config
        }
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        user_agent = %config.contact.user_agent,
        max_attempts = config.retries.max_attempts,
        breaker_threshold = config.breaker.failure_threshold,
        breaker_cooldown_secs = config.breaker.cooldown_secs,
        "waypoint v0.1.0 starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let breakers = Arc::new(BreakerRegistry::new(config.breaker.clone()));
    let bind_address = config.listener.bind_address.clone();
    let handle = new_handle(config.clone());

    let coordinator = Arc::new(Coordinator::from_config(handle.clone(), breakers.clone())?);

    // Hot reload: validated updates are swapped into the shared handle.
    // The watcher guard must outlive the server loop.
    let _config_watcher = match &args.config {
        Some(path) => {
            let (watcher, mut updates) = ConfigWatcher::new(path);
            let guard = watcher.run()?;
            let handle = handle.clone();
            tokio::spawn(async move {
                while let Some(new_config) = updates.recv().await {
                    tracing::info!("Applying reloaded configuration");
                    handle.store(Arc::new(new_config));
                }
            });
            Some(guard)
        }
        None => None,
    };

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(&config, coordinator, breakers);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
