// src/common/db_utils.rs

use sqlx::PgPool;

use crate::common::error::AppError;

/// Tables whose rows are never removed, only flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SoftDeletable {
    GuideBook,
    Work,
}

impl SoftDeletable {
    fn statement(self) -> &'static str {
        match self {
            SoftDeletable::GuideBook => {
                "UPDATE guidebooks SET is_delete = TRUE, updated_at = NOW() WHERE id = $1"
            }
            SoftDeletable::Work => {
                "UPDATE works SET is_delete = TRUE, updated_at = NOW() WHERE id = $1"
            }
        }
    }
}

// Sets the delete flag. Children and dependent rows are left untouched.
pub(crate) async fn soft_delete(
    pool: &PgPool,
    target: SoftDeletable,
    id: i64,
) -> Result<(), AppError> {
    sqlx::query(target.statement())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
