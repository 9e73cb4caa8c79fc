use crate::api::extract::{BakedGoods, RecordId, Resource};
use crate::api::models::*;
use crate::storage::BakedGoodRepo;
use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    Form, Json,
};
use tracing::{info, warn};

pub async fn by_price_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<BakedGoodResponse>>, AppError> {
    let goods = BakedGoodRepo::new(&state.pool).list_by_price().await?;
    Ok(Json(goods.into_iter().map(BakedGoodResponse::from).collect()))
}

pub async fn most_expensive_handler(
    State(state): State<AppState>,
) -> Result<Json<BakedGoodResponse>, AppError> {
    let good = BakedGoodRepo::new(&state.pool)
        .most_expensive()
        .await?
        .ok_or(AppError::NotFound(BakedGoods::NOT_FOUND))?;
    Ok(Json(good.into()))
}

pub async fn create_baked_good_handler(
    State(state): State<AppState>,
    form: Result<Form<NewBakedGoodForm>, FormRejection>,
) -> Result<(StatusCode, Json<BakedGoodResponse>), AppError> {
    let Form(form) = form.map_err(|e| AppError::BadRequest(e.body_text()))?;

    // Validate
    let new = form.validate().map_err(|e| {
        warn!(reason = %e, "Rejected baked good");
        AppError::BadRequest(e)
    })?;

    let created = BakedGoodRepo::new(&state.pool).create(new).await?;

    info!(
        baked_good_id = created.baked_good.id,
        bakery_id = created.baked_good.bakery_id,
        "Baked good created"
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn delete_baked_good_handler(
    State(state): State<AppState>,
    RecordId(id, _): RecordId<BakedGoods>,
) -> Result<Json<MessageResponse>, AppError> {
    if !BakedGoodRepo::new(&state.pool).delete(id).await? {
        return Err(AppError::NotFound(BakedGoods::NOT_FOUND));
    }

    info!(baked_good_id = id, "Baked good deleted");

    Ok(Json(MessageResponse {
        message: "Baked Good deleted successfully".to_string(),
    }))
}
