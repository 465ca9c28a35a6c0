// src/db/work_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::common::db_utils::{soft_delete, SoftDeletable};
use crate::common::error::AppError;
use crate::common::filters::TitleFilter;
use crate::models::guidebook::{NewWork, Work};

#[async_trait]
pub trait WorkRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Work>, AppError>;

    async fn has_works(&self, guidebook_id: i64) -> Result<bool, AppError>;

    async fn count_by_guidebook(
        &self,
        guidebook_id: i64,
        filter: &TitleFilter,
    ) -> Result<i64, AppError>;

    /// One page of a guidebook's works, ordered by id.
    async fn page_by_guidebook(
        &self,
        guidebook_id: i64,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Work>, AppError>;

    /// Every work of a guidebook, ordered by id.
    async fn list_by_guidebook(&self, guidebook_id: i64) -> Result<Vec<Work>, AppError>;

    async fn create(&self, work: &NewWork) -> Result<Work, AppError>;

    async fn save(&self, work: &Work) -> Result<Work, AppError>;

    async fn soft_delete(&self, id: i64) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgWorkRepository {
    pool: PgPool,
}

impl PgWorkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkRepository for PgWorkRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Work>, AppError> {
        let work = sqlx::query_as::<_, Work>(
            r#"
            SELECT id, guidebook_id, title, price_by_unit, unit_of_measurement, currency,
                   is_delete, created_at, updated_at
            FROM works
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(work)
    }

    async fn has_works(&self, guidebook_id: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM works WHERE guidebook_id = $1)",
        )
        .bind(guidebook_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn count_by_guidebook(
        &self,
        guidebook_id: i64,
        filter: &TitleFilter,
    ) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM works
            WHERE guidebook_id = $1
              AND ($2::text IS NULL OR title ILIKE $2)
            "#,
        )
        .bind(guidebook_id)
        .bind(filter.like_pattern())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn page_by_guidebook(
        &self,
        guidebook_id: i64,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Work>, AppError> {
        let works = sqlx::query_as::<_, Work>(
            r#"
            SELECT id, guidebook_id, title, price_by_unit, unit_of_measurement, currency,
                   is_delete, created_at, updated_at
            FROM works
            WHERE guidebook_id = $1
              AND ($2::text IS NULL OR title ILIKE $2)
            ORDER BY id ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(guidebook_id)
        .bind(filter.like_pattern())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(works)
    }

    async fn list_by_guidebook(&self, guidebook_id: i64) -> Result<Vec<Work>, AppError> {
        let works = sqlx::query_as::<_, Work>(
            r#"
            SELECT id, guidebook_id, title, price_by_unit, unit_of_measurement, currency,
                   is_delete, created_at, updated_at
            FROM works
            WHERE guidebook_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(guidebook_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(works)
    }

    async fn create(&self, work: &NewWork) -> Result<Work, AppError> {
        let created = sqlx::query_as::<_, Work>(
            r#"
            INSERT INTO works (guidebook_id, title, price_by_unit, unit_of_measurement, currency)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, guidebook_id, title, price_by_unit, unit_of_measurement, currency,
                      is_delete, created_at, updated_at
            "#,
        )
        .bind(work.guidebook_id)
        .bind(&work.title)
        .bind(work.price_by_unit)
        .bind(work.unit_of_measurement)
        .bind(work.currency)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn save(&self, work: &Work) -> Result<Work, AppError> {
        let saved = sqlx::query_as::<_, Work>(
            r#"
            UPDATE works
            SET guidebook_id = $2,
                title = $3,
                price_by_unit = $4,
                unit_of_measurement = $5,
                currency = $6,
                is_delete = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, guidebook_id, title, price_by_unit, unit_of_measurement, currency,
                      is_delete, created_at, updated_at
            "#,
        )
        .bind(work.id)
        .bind(work.guidebook_id)
        .bind(&work.title)
        .bind(work.price_by_unit)
        .bind(work.unit_of_measurement)
        .bind(work.currency)
        .bind(work.is_delete)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn soft_delete(&self, id: i64) -> Result<(), AppError> {
        soft_delete(&self.pool, SoftDeletable::Work, id).await
    }
}
