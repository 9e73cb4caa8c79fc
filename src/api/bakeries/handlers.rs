use crate::api::extract::{Bakeries, RecordId, Resource};
use crate::api::models::*;
use crate::storage::{BakedGoodRepo, Bakery, BakeryRepo};
use axum::{
    extract::{rejection::FormRejection, State},
    Form, Json,
};
use std::collections::HashMap;
use tracing::{info, warn};

pub async fn list_bakeries_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<BakeryResponse>>, AppError> {
    let bakeries = BakeryRepo::new(&state.pool).list().await?;

    // One query for all goods, grouped here
    let mut goods_by_bakery: HashMap<i64, Vec<_>> = HashMap::new();
    for good in BakedGoodRepo::new(&state.pool).list_all().await? {
        if let Some(bakery_id) = good.bakery_id {
            goods_by_bakery.entry(bakery_id).or_default().push(good);
        }
    }

    let results = bakeries
        .into_iter()
        .map(|bakery| BakeryResponse {
            baked_goods: goods_by_bakery.remove(&bakery.id).unwrap_or_default(),
            bakery,
        })
        .collect();

    Ok(Json(results))
}

pub async fn get_bakery_handler(
    State(state): State<AppState>,
    RecordId(id, _): RecordId<Bakeries>,
) -> Result<Json<BakeryResponse>, AppError> {
    let bakery = BakeryRepo::new(&state.pool)
        .find(id)
        .await?
        .ok_or(AppError::NotFound(Bakeries::NOT_FOUND))?;

    Ok(Json(with_goods(&state, bakery).await?))
}

pub async fn update_bakery_handler(
    State(state): State<AppState>,
    RecordId(id, _): RecordId<Bakeries>,
    form: Result<Form<UpdateBakeryForm>, FormRejection>,
) -> Result<Json<BakeryResponse>, AppError> {
    let Form(form) = form.map_err(|e| {
        warn!(bakery_id = id, "Rejected bakery update body");
        AppError::BadRequest(e.body_text())
    })?;

    let repo = BakeryRepo::new(&state.pool);
    let bakery = match form.new_name() {
        Some(name) => {
            let bakery = repo.rename(id, name).await?;
            if bakery.is_some() {
                info!(bakery_id = id, name, "Bakery renamed");
            }
            bakery
        }
        None => repo.find(id).await?,
    }
    .ok_or(AppError::NotFound(Bakeries::NOT_FOUND))?;

    Ok(Json(with_goods(&state, bakery).await?))
}

async fn with_goods(state: &AppState, bakery: Bakery) -> Result<BakeryResponse, AppError> {
    let baked_goods = BakedGoodRepo::new(&state.pool)
        .list_for_bakery(bakery.id)
        .await?;
    Ok(BakeryResponse {
        bakery,
        baked_goods,
    })
}
