use crate::storage::{BakedGood, BakedGoodWithBakery, Bakery, DbError, NewBakedGood};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

/// A bakery with the goods it owns
#[derive(Debug, Serialize)]
pub struct BakeryResponse {
    #[serde(flatten)]
    pub bakery: Bakery,
    pub baked_goods: Vec<BakedGood>,
}

/// A baked good with its bakery inlined
#[derive(Debug, Serialize)]
pub struct BakedGoodResponse {
    #[serde(flatten)]
    pub baked_good: BakedGood,
    pub bakery: Option<Bakery>,
}

impl From<BakedGoodWithBakery> for BakedGoodResponse {
    fn from(row: BakedGoodWithBakery) -> Self {
        Self {
            baked_good: row.baked_good,
            bakery: row.bakery,
        }
    }
}

/// Form body for `POST /baked_goods`
///
/// Every field is optional here so that a missing one is reported by
/// [`NewBakedGoodForm::validate`] rather than by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct NewBakedGoodForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub bakery_id: Option<String>,
}

/// Form body for `PATCH /bakeries/{id}`
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBakeryForm {
    pub name: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub total_bakeries: i64,
    pub total_baked_goods: i64,
}

/// Confirmation body for deletes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl NewBakedGoodForm {
    /// Validate the form and convert it into typed fields
    pub fn validate(&self) -> Result<NewBakedGood, String> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| "name is required".to_string())?;

        let price = match self.price.as_deref().map(str::trim) {
            None | Some("") => return Err("price is required".to_string()),
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|price| price.is_finite())
                .ok_or_else(|| format!("price must be a number, got '{}'", raw))?,
        };

        let bakery_id = match self.bakery_id.as_deref().map(str::trim) {
            None | Some("") => return Err("bakery_id is required".to_string()),
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| format!("bakery_id must be an integer, got '{}'", raw))?,
        };

        Ok(NewBakedGood {
            name: name.to_string(),
            price,
            bakery_id,
        })
    }
}

impl UpdateBakeryForm {
    /// The new name, if one was given. Blank names count as absent.
    pub fn new_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(&'static str),
    Unprocessable(String),
    Internal(String),
}

impl From<DbError> for AppError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::MissingReference { .. } => AppError::Unprocessable(e.to_string()),
            DbError::Sqlx(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Internal(msg) => {
                // Store details stay in the log
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
