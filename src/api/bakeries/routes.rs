use crate::api::bakeries::handlers::{
    get_bakery_handler, list_bakeries_handler, update_bakery_handler,
};
use crate::api::models::AppState;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bakeries", get(list_bakeries_handler))
        .route(
            "/bakeries/{id}",
            get(get_bakery_handler).patch(update_bakery_handler),
        )
}
