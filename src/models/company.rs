// src/models/company.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Maps CREATE TYPE company_role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "company_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CompanyRole {
    Director,
    Author,
    Master,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Company {
    pub id: i64,
    pub name: String,
}

// Bridge between a user and a company. A user may hold several roles in one company.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CompanyRoleUser {
    pub user_id: Uuid,
    pub company_id: i64,
    pub role: CompanyRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompanySummary {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "ООО")]
    pub name: String,
}

impl From<Company> for CompanySummary {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
        }
    }
}
