// src/db/company_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::company::{Company, CompanyRole};

// Read access to the company module: companies and the user <-> company roles
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Company>, AppError>;

    /// Every role the user holds in the company. Empty when not a member.
    async fn roles_of(&self, user_id: Uuid, company_id: i64) -> Result<Vec<CompanyRole>, AppError>;
}

#[derive(Clone)]
pub struct PgCompanyRepository {
    pool: PgPool,
}

impl PgCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for PgCompanyRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>("SELECT id, name FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(company)
    }

    async fn roles_of(&self, user_id: Uuid, company_id: i64) -> Result<Vec<CompanyRole>, AppError> {
        let roles = sqlx::query_scalar::<_, CompanyRole>(
            r#"
            SELECT role FROM company_role_users
            WHERE user_id = $1 AND company_id = $2
            "#,
        )
        .bind(user_id)
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }
}
