//! Products API - REST server for the product catalog

use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::eyre;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::{AppState, Backend};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let backend = match &config.mongodb {
        Some(mongo_config) => {
            let client =
                database::mongodb::connect_from_config_with_retry(mongo_config, None).await?;
            let db = client.database(mongo_config.database());
            info!(database = %mongo_config.database(), "Using MongoDB product store");
            Backend::Mongo { client, db }
        }
        None => {
            info!("Using in-memory product store; data is lost on restart");
            Backend::Memory
        }
    };

    let state = AppState {
        config: config.clone(),
        backend,
    };

    let api_routes = api::routes(&state);
    let router = create_router::<openapi::ApiDoc>(api_routes)?;
    let app = router.merge(health_router(config.app));

    info!(
        "Starting {} v{} on {}",
        config.app.name,
        config.app.version,
        config.server.address()
    );

    create_production_app(app, &config.server, async move {
        if let Backend::Mongo { client, .. } = state.backend {
            info!("Shutting down: closing MongoDB connections");
            client.shutdown().await;
            info!("MongoDB connection closed");
        }
    })
    .await
    .map_err(|e| eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
