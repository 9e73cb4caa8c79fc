pub mod baked_goods;
pub mod bakeries;
pub mod db;
pub mod models;
pub mod seed;

pub use baked_goods::BakedGoodRepo;
pub use bakeries::BakeryRepo;
pub use models::{BakedGood, BakedGoodWithBakery, Bakery, NewBakedGood};

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("{resource} {id} does not exist")]
    MissingReference { resource: &'static str, id: i64 },
}
