//! donation_platform_server: serves the donation platform API over HTTP.
//!
//! Configuration comes from the environment (and `.env`); see `AppConfig::from_env`.

use donation_platform::api;
use donation_platform::app::AppServices;
use donation_platform::config::AppConfig;
use donation_platform::db_migration;
use std::process::ExitCode;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), String> {
    let config = AppConfig::from_env().map_err(|e| e.to_string())?;

    let pool = db_migration::connect(&config.database_url)
        .await
        .map_err(|e| format!("Failed to open database: {}", e))?;
    db_migration::initialize_database(&pool)
        .await
        .map_err(|e| format!("Failed to migrate database: {}", e))?;

    let services = AppServices::new(pool, &config).map_err(|e| e.to_string())?;
    let app = api::router(services);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", config.bind_addr, e))?;
    log::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {}", e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Could not listen for shutdown signal: {}", e);
    }
    log::info!("Shutting down");
}
