//! Sample data for a fresh store.
//!
//! No route creates bakeries, so an empty database would leave every write
//! endpoint with nothing to point at.

use sqlx::SqlitePool;
use tracing::info;

use super::{BakedGoodRepo, BakeryRepo, DbError, NewBakedGood};

const BAKERIES: &[(&str, &[(&str, f64)])] = &[
    (
        "Delightful donuts",
        &[("Chocolate dipped donut", 2.75), ("Apple-spice filled donut", 3.5)],
    ),
    (
        "Incredible crullers",
        &[("Glazed honey cruller", 3.25), ("Chocolate cruller", 3.0)],
    ),
    ("Rye and shine", &[("Marble rye loaf", 7.5), ("Everything bagel", 1.75)]),
];

/// Insert the sample bakeries and their goods if there are no bakeries yet.
///
/// Returns the number of bakeries inserted.
pub async fn seed_if_empty(pool: &SqlitePool) -> Result<usize, DbError> {
    let bakeries = BakeryRepo::new(pool);
    if bakeries.count().await? > 0 {
        return Ok(0);
    }

    let goods = BakedGoodRepo::new(pool);
    for (name, items) in BAKERIES {
        let bakery = bakeries.create(name).await?;
        for (item, price) in items.iter() {
            goods
                .create(NewBakedGood {
                    name: item.to_string(),
                    price: *price,
                    bakery_id: bakery.id,
                })
                .await?;
        }
        info!(bakery_id = bakery.id, goods = items.len(), "Seeded bakery");
    }

    Ok(BAKERIES.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::db::memory_pool;

    #[tokio::test]
    async fn seeds_once() {
        let pool = memory_pool().await;

        assert_eq!(seed_if_empty(&pool).await.unwrap(), 3);
        assert_eq!(seed_if_empty(&pool).await.unwrap(), 0);

        assert_eq!(BakeryRepo::new(&pool).count().await.unwrap(), 3);
        assert_eq!(BakedGoodRepo::new(&pool).count().await.unwrap(), 6);
    }
}
