pub mod baked_goods;
pub mod bakeries;
pub mod extract;
pub mod models;


// Re-exports
pub use models::*;

use crate::storage::{BakedGoodRepo, BakeryRepo};
use axum::{extract::State, response::Html, routing::get, Json, Router};
use tower_http::trace::TraceLayer;

pub async fn home_handler() -> Html<&'static str> {
    Html("<h1>Bakery GET-POST-PATCH-DELETE API</h1>")
}

pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, AppError> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        total_bakeries: BakeryRepo::new(&state.pool).count().await?,
        total_baked_goods: BakedGoodRepo::new(&state.pool).count().await?,
    }))
}

/// Full application router with tracing
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .merge(bakeries::routes())
        .merge(baked_goods::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
