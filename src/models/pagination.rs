// src/models/pagination.rs

use serde::Serialize;
use utoipa::ToSchema;

/// Page envelope returned by the list endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}
