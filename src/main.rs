use std::sync::Arc;

use geodist::config::{self, AppState, Config};
use geodist::geocoder::NominatimGeocoder;
use geodist::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument: config file base name, e.g. `geodist /etc/geodist/config`
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;

    logger::init(&cfg)?;

    // Tokio runtime; `server.workers` overrides the thread count (default: CPU cores)
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::bind_listener(addr).map_err(|e| {
        log::error!("Failed to bind {addr}: {e}");
        e
    })?;

    let geocoder = NominatimGeocoder::new(&cfg.geocoder)?;
    let state = Arc::new(AppState::new(cfg, Arc::new(geocoder)));

    server::start_signal_handler(Arc::clone(&state.shutdown))?;

    // Report the bound address, which differs from the configured one for port 0
    logger::log_server_start(&listener.local_addr()?, &state.config);

    server::serve(listener, state).await;
    log::info!("geodist stopped");
    Ok(())
}
