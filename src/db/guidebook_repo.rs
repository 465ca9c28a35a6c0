// src/db/guidebook_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::common::db_utils::{soft_delete, SoftDeletable};
use crate::common::error::AppError;
use crate::common::filters::TitleFilter;
use crate::models::guidebook::GuideBook;

#[async_trait]
pub trait GuideBookRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<GuideBook>, AppError>;

    /// Whether the company has at least one guidebook without a parent.
    async fn has_roots(&self, company_id: i64) -> Result<bool, AppError>;

    async fn count_roots(&self, company_id: i64, filter: &TitleFilter) -> Result<i64, AppError>;

    /// Root guidebooks of a company, ordered by id.
    async fn list_roots(
        &self,
        company_id: i64,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GuideBook>, AppError>;

    /// Direct children, ordered by id.
    async fn list_children(&self, parent_id: i64) -> Result<Vec<GuideBook>, AppError>;

    async fn create(
        &self,
        company_id: i64,
        title: &str,
        parent_id: Option<i64>,
    ) -> Result<GuideBook, AppError>;

    /// Writes every mutable column of the row back.
    async fn save(&self, guidebook: &GuideBook) -> Result<GuideBook, AppError>;

    async fn soft_delete(&self, id: i64) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgGuideBookRepository {
    pool: PgPool,
}

impl PgGuideBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuideBookRepository for PgGuideBookRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<GuideBook>, AppError> {
        let guidebook = sqlx::query_as::<_, GuideBook>(
            r#"
            SELECT id, company_id, title, parent_guide_book_id, is_delete, created_at, updated_at
            FROM guidebooks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(guidebook)
    }

    async fn has_roots(&self, company_id: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM guidebooks
                WHERE company_id = $1 AND parent_guide_book_id IS NULL
            )
            "#,
        )
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn count_roots(&self, company_id: i64, filter: &TitleFilter) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM guidebooks
            WHERE company_id = $1
              AND parent_guide_book_id IS NULL
              AND ($2::text IS NULL OR title ILIKE $2)
            "#,
        )
        .bind(company_id)
        .bind(filter.like_pattern())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn list_roots(
        &self,
        company_id: i64,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GuideBook>, AppError> {
        let guidebooks = sqlx::query_as::<_, GuideBook>(
            r#"
            SELECT id, company_id, title, parent_guide_book_id, is_delete, created_at, updated_at
            FROM guidebooks
            WHERE company_id = $1
              AND parent_guide_book_id IS NULL
              AND ($2::text IS NULL OR title ILIKE $2)
            ORDER BY id ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(company_id)
        .bind(filter.like_pattern())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(guidebooks)
    }

    async fn list_children(&self, parent_id: i64) -> Result<Vec<GuideBook>, AppError> {
        let children = sqlx::query_as::<_, GuideBook>(
            r#"
            SELECT id, company_id, title, parent_guide_book_id, is_delete, created_at, updated_at
            FROM guidebooks
            WHERE parent_guide_book_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(children)
    }

    async fn create(
        &self,
        company_id: i64,
        title: &str,
        parent_id: Option<i64>,
    ) -> Result<GuideBook, AppError> {
        let guidebook = sqlx::query_as::<_, GuideBook>(
            r#"
            INSERT INTO guidebooks (company_id, title, parent_guide_book_id)
            VALUES ($1, $2, $3)
            RETURNING id, company_id, title, parent_guide_book_id, is_delete, created_at, updated_at
            "#,
        )
        .bind(company_id)
        .bind(title)
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(guidebook)
    }

    async fn save(&self, guidebook: &GuideBook) -> Result<GuideBook, AppError> {
        let saved = sqlx::query_as::<_, GuideBook>(
            r#"
            UPDATE guidebooks
            SET company_id = $2,
                title = $3,
                parent_guide_book_id = $4,
                is_delete = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, company_id, title, parent_guide_book_id, is_delete, created_at, updated_at
            "#,
        )
        .bind(guidebook.id)
        .bind(guidebook.company_id)
        .bind(&guidebook.title)
        .bind(guidebook.parent_guide_book_id)
        .bind(guidebook.is_delete)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn soft_delete(&self, id: i64) -> Result<(), AppError> {
        soft_delete(&self.pool, SoftDeletable::GuideBook, id).await
    }
}
