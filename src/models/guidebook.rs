// src/models/guidebook.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::company::CompanySummary;

// --- ENUMS ---

// Maps CREATE TYPE unit_of_measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "unit_of_measurement", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UnitOfMeasurement {
    CubicMeter,
    SquareMeter,
    LinearMeter,
}

// Maps CREATE TYPE currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "currency", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Rub,
    Usd,
    Eur,
}

// --- TABLE ROWS ---

/// A catalog node owned by a company. `parent_guide_book_id` makes the tree.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct GuideBook {
    pub id: i64,
    pub company_id: i64,
    pub title: String,
    pub parent_guide_book_id: Option<i64>,
    pub is_delete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A priced line item inside a guidebook.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Work {
    pub id: i64,
    pub guidebook_id: i64,
    pub title: String,
    pub price_by_unit: i32,
    pub unit_of_measurement: UnitOfMeasurement,
    pub currency: Currency,
    pub is_delete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- SERVICE INPUTS ---

#[derive(Debug, Clone)]
pub struct NewWork {
    pub guidebook_id: i64,
    pub title: String,
    pub price_by_unit: i32,
    pub unit_of_measurement: UnitOfMeasurement,
    pub currency: Currency,
}

/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default)]
pub struct GuideBookChanges {
    pub title: Option<String>,
    pub parent_guide_book_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkChanges {
    pub guidebook_id: Option<i64>,
    pub title: Option<String>,
    pub price_by_unit: Option<i32>,
    pub unit_of_measurement: Option<UnitOfMeasurement>,
    pub currency: Option<Currency>,
}

// --- RESPONSES ---

/// Guidebook reduced to its id and title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GuideBookTitle {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Внутренняя отделка")]
    pub title: String,
}

impl From<&GuideBook> for GuideBookTitle {
    fn from(guidebook: &GuideBook) -> Self {
        Self {
            id: guidebook.id,
            title: guidebook.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GuideBookView {
    pub id: i64,
    pub company: CompanySummary,
    pub title: String,
    pub parent_guide_book: Option<GuideBookTitle>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkView {
    pub id: i64,
    pub guidebook: GuideBookTitle,
    #[schema(example = "Покраска стен")]
    pub title: String,
    #[schema(example = 1000)]
    pub price_by_unit: i32,
    pub unit_of_measurement: UnitOfMeasurement,
    pub currency: Currency,
}

// A work inside the detail payload, where the guidebook is already known
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NestedWork {
    pub id: i64,
    pub title: String,
    pub price_by_unit: i32,
    pub unit_of_measurement: UnitOfMeasurement,
    pub currency: Currency,
}

impl From<&Work> for NestedWork {
    fn from(work: &Work) -> Self {
        Self {
            id: work.id,
            title: work.title.clone(),
            price_by_unit: work.price_by_unit,
            unit_of_measurement: work.unit_of_measurement,
            currency: work.currency,
        }
    }
}

/// Guidebook with its direct children and its works.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GuideBookDetail {
    pub guidebook: GuideBookTitle,
    pub nested_guidebooks: Vec<GuideBookTitle>,
    pub nested_works: Vec<NestedWork>,
}
