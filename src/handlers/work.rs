// src/handlers/work.rs

use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError, Missing},
        extract::{parse_payload, AppJson, AppPath, AppQuery},
        pagination::ListQuery,
    },
    config::AppState,
    handlers::required,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        guidebook::{Currency, NewWork, UnitOfMeasurement, WorkChanges, WorkView},
        pagination::Paginated,
    },
    services::permission_service::PermissionTarget,
};

// ---
// Payload: work create / update
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct WorkPayload {
    #[validate(required(code = "required"))]
    #[schema(example = 1)]
    pub guidebook: Option<i64>,

    #[validate(
        required(code = "required"),
        length(min = 1, max = 150, code = "title_length")
    )]
    #[schema(example = "Покраска стен")]
    pub title: Option<String>,

    #[validate(required(code = "required"), range(min = 0, code = "min_value"))]
    #[schema(example = 1000)]
    pub price_by_unit: Option<i32>,

    #[validate(required(code = "required"))]
    pub unit_of_measurement: Option<UnitOfMeasurement>,

    #[validate(required(code = "required"))]
    pub currency: Option<Currency>,
}

impl WorkPayload {
    fn into_new_work(self) -> Result<NewWork, AppError> {
        Ok(NewWork {
            guidebook_id: required(self.guidebook, "guidebook")?,
            title: required(self.title, "title")?,
            price_by_unit: required(self.price_by_unit, "price_by_unit")?,
            unit_of_measurement: required(self.unit_of_measurement, "unit_of_measurement")?,
            currency: required(self.currency, "currency")?,
        })
    }

    fn into_changes(self) -> WorkChanges {
        WorkChanges {
            guidebook_id: self.guidebook,
            title: self.title,
            price_by_unit: self.price_by_unit,
            unit_of_measurement: self.unit_of_measurement,
            currency: self.currency,
        }
    }
}

// The guidebook named in a raw body; anything but an integer id is unresolved
fn body_target(body: &Value) -> PermissionTarget {
    match body.get("guidebook").and_then(Value::as_i64) {
        Some(id) => PermissionTarget::GuideBook(id),
        None => PermissionTarget::Unresolved,
    }
}

// GET /api/guidebook/work_list/{guidebook_id}/
#[utoipa::path(
    get,
    path = "/api/guidebook/work_list/{guidebook_id}/",
    tag = "Works",
    params(
        ("guidebook_id" = i64, Path, description = "Guidebook id"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Works of the guidebook", body = Paginated<WorkView>),
        (status = 403, description = "No role in the guidebook's company"),
        (status = 404, description = "The guidebook has no works")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_works(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    AppPath(guidebook_id): AppPath<i64>,
    AppQuery(query): AppQuery<ListQuery>,
    OriginalUri(uri): OriginalUri,
) -> Result<impl IntoResponse, ApiError> {
    let works = app_state
        .work_service
        .get_works_by_guidebook(guidebook_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?
        .ok_or_else(|| AppError::NotFound(Missing::Works).to_api_error(&locale))?;

    app_state
        .permission_service
        .ensure_member(user.0.id, PermissionTarget::GuideBook(guidebook_id))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let page = works
        .paginate(&query, &uri)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(page)))
}

// GET /api/guidebook/work/{work_id}/
#[utoipa::path(
    get,
    path = "/api/guidebook/work/{work_id}/",
    tag = "Works",
    params(("work_id" = i64, Path, description = "Work id")),
    responses(
        (status = 200, description = "The work", body = WorkView),
        (status = 403, description = "Work not found or no role in its company")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_work(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    AppPath(work_id): AppPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .permission_service
        .ensure_member(user.0.id, PermissionTarget::Work(work_id))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let work = app_state
        .work_service
        .get_by_id(work_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?
        .ok_or_else(|| AppError::NotFound(Missing::Work).to_api_error(&locale))?;

    let view = app_state
        .work_service
        .to_view(&work)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(view)))
}

// POST /api/guidebook/work_create/
#[utoipa::path(
    post,
    path = "/api/guidebook/work_create/",
    tag = "Works",
    request_body = WorkPayload,
    responses(
        (status = 201, description = "Work created", body = WorkView),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Author role required in the guidebook's company")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_work(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    AppJson(body): AppJson<Value>,
) -> Result<impl IntoResponse, ApiError> {
    // A missing guidebook is denied here; the service's 400 for it only serves direct callers
    app_state
        .permission_service
        .ensure_author(user.0.id, body_target(&body))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let payload: WorkPayload = parse_payload(body).map_err(|e| e.to_api_error(&locale))?;
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;
    let new_work = payload.into_new_work().map_err(|e| e.to_api_error(&locale))?;

    let work = app_state
        .work_service
        .create(new_work)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let view = app_state
        .work_service
        .to_view(&work)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(view)))
}

// PUT /api/guidebook/change_work/{work_id}/
#[utoipa::path(
    put,
    path = "/api/guidebook/change_work/{work_id}/",
    tag = "Works",
    params(("work_id" = i64, Path, description = "Work id")),
    request_body = WorkPayload,
    responses(
        (status = 200, description = "Work updated", body = WorkView),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Author role required"),
        (status = 404, description = "Work not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_work(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    AppPath(work_id): AppPath<i64>,
    AppJson(body): AppJson<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let work = app_state
        .work_service
        .get_by_id(work_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?
        .ok_or_else(|| AppError::NotFound(Missing::Work).to_api_error(&locale))?;

    app_state
        .permission_service
        .ensure_author(user.0.id, PermissionTarget::Work(work_id))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let payload: WorkPayload = parse_payload(body).map_err(|e| e.to_api_error(&locale))?;
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let updated = app_state
        .work_service
        .update(work, payload.into_changes())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let view = app_state
        .work_service
        .to_view(&updated)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(view)))
}

// DELETE /api/guidebook/change_work/{work_id}/
#[utoipa::path(
    delete,
    path = "/api/guidebook/change_work/{work_id}/",
    tag = "Works",
    params(("work_id" = i64, Path, description = "Work id")),
    responses(
        (status = 204, description = "Work soft-deleted"),
        (status = 403, description = "Author role required"),
        (status = 404, description = "Work not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_work(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    AppPath(work_id): AppPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let work = app_state
        .work_service
        .get_by_id(work_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?
        .ok_or_else(|| AppError::NotFound(Missing::Work).to_api_error(&locale))?;

    app_state
        .permission_service
        .ensure_author(user.0.id, PermissionTarget::Work(work_id))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    app_state
        .work_service
        .soft_delete(&work)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
