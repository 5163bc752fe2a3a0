use anyhow::Result;
use axum::{
    routing::{get, post},
    Json, Router,
};
use lighting_worker::{LightingWorker, WorkerHandle};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod routes;

const DEFAULT_PORT: &str = "18700";

#[derive(Clone)]
pub struct AppState {
    pub worker: WorkerHandle,
}

pub fn app(state: AppState) -> Router {
    let lighting_routes = Router::new()
        .route("/messages", post(routes::post_message))
        .route("/calculate", post(routes::calculate))
        .route("/optimize", post(routes::optimize))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1/lighting", lighting_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "lighting_gateway=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // One worker for the whole process; requests queue FIFO behind it
    let worker = LightingWorker::spawn()?;
    let state = AppState {
        worker: worker.handle(),
    };

    let port = std::env::var("LIGHTING_GATEWAY_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| DEFAULT_PORT.to_string());
    let addr = format!("0.0.0.0:{}", port);

    tracing::info!("Lighting Gateway starting on {}", addr);
    tracing::info!(
        "   Grid {}x{}, {} Monte Carlo samples by default",
        photometrics::config::DEFAULT_GRID_RESOLUTION,
        photometrics::config::DEFAULT_GRID_RESOLUTION,
        photometrics::config::DEFAULT_SAMPLE_COUNT
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "lighting-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
