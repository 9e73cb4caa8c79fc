//! Custom extractors

use std::marker::PhantomData;
use std::num::IntErrorKind;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use super::models::AppError;

/// A resource addressed by integer id
pub trait Resource {
    /// Body of the 404 for an id that names nothing
    const NOT_FOUND: &'static str;
}

pub struct Bakeries;

impl Resource for Bakeries {
    const NOT_FOUND: &'static str = "Bakery not found";
}

pub struct BakedGoods;

impl Resource for BakedGoods {
    const NOT_FOUND: &'static str = "Baked Good not found";
}

/// Integer record id taken from the path
///
/// Non-numeric ids become a JSON 400 instead of axum's plain-text rejection.
/// An integer outside the i64 range cannot name a row, so it is a 404.
pub struct RecordId<R>(pub i64, pub PhantomData<fn() -> R>);

impl<S, R> FromRequestParts<S> for RecordId<R>
where
    S: Send + Sync,
    R: Resource,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        match raw.parse::<i64>() {
            Ok(id) => Ok(Self(id, PhantomData)),
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                Err(AppError::NotFound(R::NOT_FOUND))
            }
            Err(_) => Err(AppError::BadRequest(format!("invalid id '{}'", raw))),
        }
    }
}
