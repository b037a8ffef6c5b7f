mod config;
mod handler;
mod service;
#[cfg(test)]
mod testing;

use config::ApiConfig;
use service::IngestService;
use std::fmt::Display;
use std::sync::Arc;
use store::{ReadingStore, StoreConfig};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine, the variables may come from the environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting paint-line sensor ingest");

    // Nothing is bound until the store is configured and reachable
    let store_config = StoreConfig::from_env()
        .map_err(|e| fatal("Failed to load store configuration", e))?;
    let api_config =
        ApiConfig::from_env().map_err(|e| fatal("Failed to load API configuration", e))?;

    let store = ReadingStore::new(store_config)
        .map_err(|e| fatal("Failed to create InfluxDB client", e))?;

    let connect_context = format!("Failed to connect to InfluxDB at {}", store.config().url);
    match tokio::time::timeout(api_config.write_timeout, store.health_check()).await {
        Ok(Ok(())) => info!("Connected to InfluxDB at {}", store.config().url),
        Ok(Err(e)) => return Err(fatal(&connect_context, e).into()),
        Err(_) => {
            let waited = format!("no answer within {:?}", api_config.write_timeout);
            return Err(fatal(&connect_context, waited).into());
        }
    }

    let service = Arc::new(IngestService::new(Arc::new(store), api_config.write_timeout));
    let app = handler::router(service.clone());

    let addr = api_config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| fatal(&format!("Failed to bind {}", addr), e))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router is gone, so this is the last handle to the store client
    drop(service);
    info!("InfluxDB client released, shutdown complete");

    Ok(())
}

// Log a startup failure and turn it into the error main exits with
fn fatal(context: &str, err: impl Display) -> String {
    error!("{}: {}", context, err);
    format!("{}: {}", context, err)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining in-flight requests");
}
