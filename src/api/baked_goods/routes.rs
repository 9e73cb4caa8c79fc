use crate::api::baked_goods::handlers::{
    by_price_handler, create_baked_good_handler, delete_baked_good_handler,
    most_expensive_handler,
};
use crate::api::models::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/baked_goods", post(create_baked_good_handler))
        .route("/baked_goods/by_price", get(by_price_handler))
        .route("/baked_goods/most_expensive", get(most_expensive_handler))
        .route("/baked_goods/{id}", delete(delete_baked_good_handler))
}
