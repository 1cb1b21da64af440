//! Products API - REST server for the products table

use axum::{middleware, routing::get};
use axum_helpers::{create_production_app, create_router, health_router};
use core_config::tracing::{ExtraLayer, init_tracing_with, install_color_eyre};
use migration::Migrator;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::Registry;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // The log index must exist before the first event is shipped; failure aborts startup.
    let search_layer = match &config.search_log {
        Some(search) => {
            let layer = observability::start_search_logging(search)
                .await
                .map_err(|e| eyre::eyre!("Search log sink failed to start: {}", e))?;
            Some(Box::new(layer.filtered::<Registry>()) as ExtraLayer)
        }
        None => None,
    };

    init_tracing_with(&config.environment, search_layer);
    if let Some(search) = &config.search_log {
        info!(
            index = %search.index,
            min_severity = %search.min_severity,
            "Shipping logs to search index"
        );
    }

    observability::install_panic_logging();
    observability::init_metrics()
        .map_err(|e| eyre::eyre!("Failed to install metrics recorder: {}", e))?;

    info!("Connecting to PostgreSQL");
    let db = database::postgres::connect_from_config_with_retry(config.database.clone())
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::run_migrations::<Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

    let state = AppState { config, db };

    // create_router adds docs/middleware to our composed routes
    let router = create_router::<openapi::ApiDoc>(api::routes(&state), &state.config.server)?;

    // - /health: liveness with app name/version
    // - /ready: readiness with a database round trip
    // - /metrics: Prometheus exposition
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()))
        .route("/metrics", get(observability::metrics_handler))
        .layer(middleware::from_fn(observability::metrics_middleware));

    info!(
        "Starting {} v{} on port {}",
        state.config.app.name, state.config.app.version, state.config.server.port
    );

    let AppState { config, db } = state;

    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing database connections");
        match db.close().await {
            Ok(_) => info!("PostgreSQL connection closed successfully"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
