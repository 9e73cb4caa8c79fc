//! Baked good repository
//!
//! Listings join the owning bakery in the same query. Creation leans on the
//! store's foreign key for the bakery reference.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use super::{BakedGood, BakedGoodWithBakery, Bakery, DbError, NewBakedGood};

const SELECT_WITH_BAKERY: &str = r#"
    SELECT
        g.id,
        g.name,
        g.price,
        g.bakery_id,
        g.created_at,
        b.name AS bakery_name,
        b.created_at AS bakery_created_at
    FROM baked_goods g
    LEFT JOIN bakeries b ON b.id = g.bakery_id
"#;

pub struct BakedGoodRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BakedGoodRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Ascending price; equal prices fall back to id order.
    pub async fn list_by_price(&self) -> Result<Vec<BakedGoodWithBakery>, DbError> {
        let sql = format!("{SELECT_WITH_BAKERY} ORDER BY g.price ASC, g.id ASC");
        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;
        let goods = rows.iter().map(with_bakery).collect::<Result<_, _>>()?;
        Ok(goods)
    }

    /// Highest price; ties resolve to the lowest id.
    pub async fn most_expensive(&self) -> Result<Option<BakedGoodWithBakery>, DbError> {
        let sql = format!("{SELECT_WITH_BAKERY} ORDER BY g.price DESC, g.id ASC LIMIT 1");
        let row = sqlx::query(&sql).fetch_optional(self.pool).await?;
        Ok(row.as_ref().map(with_bakery).transpose()?)
    }

    /// Every baked good that belongs to some bakery, in id order.
    pub async fn list_all(&self) -> Result<Vec<BakedGood>, DbError> {
        let goods = sqlx::query_as::<_, BakedGood>(
            r#"
            SELECT id, name, price, bakery_id, created_at
            FROM baked_goods
            WHERE bakery_id IS NOT NULL
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?;
        Ok(goods)
    }

    pub async fn list_for_bakery(&self, bakery_id: i64) -> Result<Vec<BakedGood>, DbError> {
        let goods = sqlx::query_as::<_, BakedGood>(
            r#"
            SELECT id, name, price, bakery_id, created_at
            FROM baked_goods
            WHERE bakery_id = ?
            ORDER BY id
            "#,
        )
        .bind(bakery_id)
        .fetch_all(self.pool)
        .await?;
        Ok(goods)
    }

    pub async fn find(&self, id: i64) -> Result<Option<BakedGoodWithBakery>, DbError> {
        let sql = format!("{SELECT_WITH_BAKERY} WHERE g.id = ?");
        let row = sqlx::query(&sql).bind(id).fetch_optional(self.pool).await?;
        Ok(row.as_ref().map(with_bakery).transpose()?)
    }

    /// Insert a baked good owned by an existing bakery.
    ///
    /// A single autocommit INSERT, so the write lock is taken up front and
    /// concurrent creates queue on the busy timeout. The store's foreign key
    /// rejects a `bakery_id` that names no bakery, which surfaces as
    /// [`DbError::MissingReference`].
    pub async fn create(&self, new: NewBakedGood) -> Result<BakedGoodWithBakery, DbError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO baked_goods (name, price, bakery_id, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&new.name)
        .bind(new.price)
        .bind(new.bakery_id)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| reference_error(e, new.bakery_id))?;

        self.find(id)
            .await?
            .ok_or(DbError::Sqlx(sqlx::Error::RowNotFound))
    }

    /// Returns `false` when nothing had this id.
    pub async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM baked_goods WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM baked_goods")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

fn with_bakery(row: &SqliteRow) -> Result<BakedGoodWithBakery, sqlx::Error> {
    let baked_good = BakedGood::from_row(row)?;
    let bakery_name: Option<String> = row.try_get("bakery_name")?;
    let bakery_created_at: Option<DateTime<Utc>> = row.try_get("bakery_created_at")?;

    let bakery = match (baked_good.bakery_id, bakery_name, bakery_created_at) {
        (Some(id), Some(name), Some(created_at)) => Some(Bakery {
            id,
            name,
            created_at,
        }),
        _ => None,
    };

    Ok(BakedGoodWithBakery { baked_good, bakery })
}

fn reference_error(err: sqlx::Error, bakery_id: i64) -> DbError {
    let dangling = err
        .as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation());
    if dangling {
        DbError::MissingReference {
            resource: "Bakery",
            id: bakery_id,
        }
    } else {
        DbError::Sqlx(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::db::{create_pool, memory_pool, migrate};
    use crate::storage::BakeryRepo;

    async fn add(pool: &SqlitePool, name: &str, price: f64, bakery_id: i64) -> BakedGood {
        BakedGoodRepo::new(pool)
            .create(NewBakedGood {
                name: name.to_string(),
                price,
                bakery_id,
            })
            .await
            .unwrap()
            .baked_good
    }

    #[tokio::test]
    async fn create_joins_bakery() {
        let pool = memory_pool().await;
        let bakery = BakeryRepo::new(&pool).create("Crumbs").await.unwrap();

        let created = BakedGoodRepo::new(&pool)
            .create(NewBakedGood {
                name: "Croissant".to_string(),
                price: 3.5,
                bakery_id: bakery.id,
            })
            .await
            .unwrap();

        assert_eq!(created.baked_good.name, "Croissant");
        assert_eq!(created.baked_good.price, 3.5);
        assert_eq!(created.baked_good.bakery_id, Some(bakery.id));
        assert_eq!(created.bakery, Some(bakery));
    }

    #[tokio::test]
    async fn create_with_unknown_bakery_is_missing_reference() {
        let pool = memory_pool().await;
        let err = BakedGoodRepo::new(&pool)
            .create(NewBakedGood {
                name: "Orphan".to_string(),
                price: 1.0,
                bakery_id: 404,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::MissingReference { resource: "Bakery", id: 404 }
        ));
        assert_eq!(err.to_string(), "Bakery 404 does not exist");
        assert_eq!(BakedGoodRepo::new(&pool).count().await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_on_a_file_database_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("bakery.db").display());
        let pool = create_pool(&url, 5).await.unwrap();
        migrate(&pool).await.unwrap();
        let bakery_id = BakeryRepo::new(&pool).create("Crumbs").await.unwrap().id;

        let handles: Vec<_> = (0..100)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    BakedGoodRepo::new(&pool)
                        .create(NewBakedGood {
                            name: format!("Roll {}", i),
                            price: i as f64,
                            bakery_id,
                        })
                        .await
                })
            })
            .collect();

        for handle in handles {
            let created = handle.await.expect("task panicked").expect("create failed");
            assert_eq!(created.bakery.map(|b| b.id), Some(bakery_id));
        }
        assert_eq!(BakedGoodRepo::new(&pool).count().await.unwrap(), 100);
        pool.close().await;
    }

    #[tokio::test]
    async fn by_price_is_non_decreasing() {
        let pool = memory_pool().await;
        let bakery = BakeryRepo::new(&pool).create("Crumbs").await.unwrap();
        add(&pool, "Cake", 20.0, bakery.id).await;
        add(&pool, "Roll", 0.5, bakery.id).await;
        add(&pool, "Pie", 7.25, bakery.id).await;

        let prices: Vec<f64> = BakedGoodRepo::new(&pool)
            .list_by_price()
            .await
            .unwrap()
            .iter()
            .map(|g| g.baked_good.price)
            .collect();

        assert_eq!(prices, vec![0.5, 7.25, 20.0]);
    }

    #[tokio::test]
    async fn most_expensive_prefers_lowest_id_on_ties() {
        let pool = memory_pool().await;
        let bakery = BakeryRepo::new(&pool).create("Crumbs").await.unwrap();
        let first = add(&pool, "Gold Cake", 50.0, bakery.id).await;
        add(&pool, "Also Gold Cake", 50.0, bakery.id).await;
        add(&pool, "Muffin", 2.0, bakery.id).await;

        let top = BakedGoodRepo::new(&pool).most_expensive().await.unwrap().unwrap();
        assert_eq!(top.baked_good.id, first.id);
    }

    #[tokio::test]
    async fn most_expensive_on_empty_table_is_none() {
        let pool = memory_pool().await;
        assert!(BakedGoodRepo::new(&pool).most_expensive().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_went_away() {
        let pool = memory_pool().await;
        let bakery = BakeryRepo::new(&pool).create("Crumbs").await.unwrap();
        let good = add(&pool, "Scone", 2.5, bakery.id).await;
        let repo = BakedGoodRepo::new(&pool);

        assert!(repo.delete(good.id).await.unwrap());
        assert!(!repo.delete(good.id).await.unwrap());
        assert!(repo.find(good.id).await.unwrap().is_none());
        assert!(repo.list_by_price().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_for_bakery_only_returns_owned_goods() {
        let pool = memory_pool().await;
        let bakeries = BakeryRepo::new(&pool);
        let a = bakeries.create("A").await.unwrap();
        let b = bakeries.create("B").await.unwrap();
        add(&pool, "A1", 1.0, a.id).await;
        add(&pool, "B1", 1.0, b.id).await;
        add(&pool, "A2", 1.0, a.id).await;

        let names: Vec<String> = BakedGoodRepo::new(&pool)
            .list_for_bakery(a.id)
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["A1", "A2"]);
        assert_eq!(BakedGoodRepo::new(&pool).list_all().await.unwrap().len(), 3);
    }
}
