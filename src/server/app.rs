use std::sync::Arc;

use anyhow::Context;
use axum::{extract::FromRef, http::StatusCode, Json, Router};
use routes::{health_router, questions_router, users_router};
use serde_json::{json, Value};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::configuration::{ApplicationSettings, CompatSettings, Settings};
use crate::db;

use super::routes;

#[derive(FromRef, Clone)]
pub struct AppState {
    pool: PgPool,
    application: Arc<ApplicationSettings>,
    compat: CompatSettings,
}

impl AppState {
    pub fn new(pool: PgPool, application: ApplicationSettings, compat: CompatSettings) -> Self {
        Self {
            pool,
            application: Arc::new(application),
            compat,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health_router(state.clone()))
        .merge(questions_router(state.clone()))
        .merge(users_router(state))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
}

async fn fallback() -> (StatusCode, Json<Value>) {
    tracing::info!("Fallback");
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "mensagem": "Rota não encontrada" })),
    )
}

/// Serves until Ctrl+C or SIGTERM, then drains in-flight requests and closes the pool.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let pool = db::establish_connection(&settings.database)
        .context("Invalid database connection string")?;
    let addr = format!(
        "{}:{}",
        settings.application.host, settings.application.port
    );
    let state = AppState::new(pool.clone(), settings.application, settings.compat);
    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Closing database pool");
    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::warn!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::warn!("Received SIGTERM, shutting down"),
    }
}
