use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;

use crate::{
    configuration::{ApplicationSettings, CompatSettings},
    db,
    server::app::AppState,
};

#[derive(Serialize)]
struct HealthResponse {
    mensagem: String,
    autor: String,
    #[serde(rename = "dbStatus")]
    db_status: String,
}

async fn health(
    State(pool): State<PgPool>,
    State(application): State<Arc<ApplicationSettings>>,
    State(compat): State<CompatSettings>,
) -> (StatusCode, Json<HealthResponse>) {
    tracing::info!("GET / requested");

    let (status, db_status) = match db::ping(&pool).await {
        Ok(()) => (StatusCode::OK, "ok".to_owned()),
        Err(e) => {
            tracing::warn!("Database check failed: {e}");
            let status = if compat.health_always_ok {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            (status, e.to_string())
        }
    };

    (
        status,
        Json(HealthResponse {
            mensagem: application.description.clone(),
            autor: application.author.clone(),
            db_status,
        }),
    )
}

pub fn health_router(state: AppState) -> Router {
    Router::new().route("/", get(health)).with_state(state)
}
