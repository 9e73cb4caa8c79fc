use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Bakery record
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Bakery {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Baked good record
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct BakedGood {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub bakery_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Baked good joined with the bakery it references, if any
#[derive(Debug, Clone, PartialEq)]
pub struct BakedGoodWithBakery {
    pub baked_good: BakedGood,
    pub bakery: Option<Bakery>,
}

/// Fields for a new baked good; id and timestamp come from the store layer
#[derive(Debug, Clone, PartialEq)]
pub struct NewBakedGood {
    pub name: String,
    pub price: f64,
    pub bakery_id: i64,
}
