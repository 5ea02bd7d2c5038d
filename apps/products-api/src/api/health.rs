//! Readiness endpoint

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use database::mongodb::check_health_detailed;
use serde_json::Value;

use crate::state::{AppState, Backend};

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let store_check: HealthCheckFuture = match &state.backend {
        Backend::Mongo { client, .. } => {
            let client = client.clone();
            Box::pin(async move {
                let status = check_health_detailed(&client).await;
                if status.healthy {
                    Ok(())
                } else {
                    Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
                }
            })
        }
        Backend::Memory => Box::pin(async { Ok(()) }),
    };

    run_health_checks(vec![("store", store_check)])
        .await
        .unwrap_or_else(|failed| failed)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .with_state(state)
}
