//! Signaltrix API server.
//!
//! Stateless HTTP service: fetches candles through the provider (with an
//! optional Redis cache in front) and serves multi-timeframe signals.

use std::env;
use std::sync::Arc;

use dotenvy::dotenv;
use signaltrix::core::http::{start_server, AppState};
use signaltrix::logging;
use signaltrix::metrics::Metrics;
use signaltrix::services::{CandleCache, TwelveDataProvider};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let environment = signaltrix::config::get_environment();
    info!("Starting Signaltrix API Server");
    info!(environment = %environment, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let provider = TwelveDataProvider::from_env();
    if provider.key_count() == 0 {
        warn!("no TwelveData API keys configured; every fetch will fail over to the placeholder signal");
    } else {
        info!(keys = provider.key_count(), "provider API keys configured");
    }

    let cache = match env::var("REDIS_URL") {
        Ok(url) => match CandleCache::connect(&url).await {
            Ok(cache) => {
                info!("candle cache connected");
                Some(cache)
            }
            Err(e) => {
                warn!(error = %e, "candle cache unavailable, continuing without it");
                None
            }
        },
        Err(_) => None,
    };

    let metrics = Arc::new(Metrics::new()?);
    let state = AppState::new(Arc::new(provider), cache, metrics);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state, port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
