//! Bakery repository

use chrono::Utc;
use sqlx::SqlitePool;

use super::{Bakery, DbError};

pub struct BakeryRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BakeryRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All bakeries in id order.
    pub async fn list(&self) -> Result<Vec<Bakery>, DbError> {
        let bakeries = sqlx::query_as::<_, Bakery>(
            "SELECT id, name, created_at FROM bakeries ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(bakeries)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Bakery>, DbError> {
        let bakery = sqlx::query_as::<_, Bakery>(
            "SELECT id, name, created_at FROM bakeries WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(bakery)
    }

    pub async fn create(&self, name: &str) -> Result<Bakery, DbError> {
        let bakery = sqlx::query_as::<_, Bakery>(
            "INSERT INTO bakeries (name, created_at) VALUES (?, ?) RETURNING id, name, created_at",
        )
        .bind(name)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;
        Ok(bakery)
    }

    /// Change only the name. Returns `None` when no bakery has this id.
    pub async fn rename(&self, id: i64, name: &str) -> Result<Option<Bakery>, DbError> {
        let bakery = sqlx::query_as::<_, Bakery>(
            "UPDATE bakeries SET name = ? WHERE id = ? RETURNING id, name, created_at",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(bakery)
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bakeries")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
