// src/handlers/guidebook.rs

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
        company::CompanyRole,
        guidebook::{GuideBookChanges, GuideBookDetail, GuideBookTitle, GuideBookView, NestedWork},
        pagination::Paginated,
    },
    services::permission_service::PermissionTarget,
};

// ---
// Payload: guidebook create / update
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GuideBookPayload {
    #[validate(
        required(code = "required"),
        length(min = 1, max = 150, code = "title_length")
    )]
    #[schema(example = "Бетонирование пола")]
    pub title: Option<String>,

    // Must exist and belong to the same company
    #[schema(example = 1)]
    pub parent_guide_book: Option<i64>,
}

// GET /api/guidebook/guidebook_list/{company_id}/
#[utoipa::path(
    get,
    path = "/api/guidebook/guidebook_list/{company_id}/",
    tag = "Guidebooks",
    params(
        ("company_id" = i64, Path, description = "Company id"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Root guidebooks of the company", body = Paginated<GuideBookTitle>),
        (status = 403, description = "No role in the company"),
        (status = 404, description = "The company has no guidebooks")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_guidebooks(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    AppPath(company_id): AppPath<i64>,
    AppQuery(query): AppQuery<ListQuery>,
    OriginalUri(uri): OriginalUri,
) -> Result<impl IntoResponse, ApiError> {
    let roots = app_state
        .guidebook_service
        .get_root_guidebooks(company_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?
        .ok_or_else(|| AppError::NotFound(Missing::GuideBooks).to_api_error(&locale))?;

    app_state
        .permission_service
        .ensure_any_company_role(user.0.id, company_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let page = roots
        .paginate(&query, &uri)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(page)))
}

// GET /api/guidebook/{guidebook_id}/
#[utoipa::path(
    get,
    path = "/api/guidebook/{guidebook_id}/",
    tag = "Guidebooks",
    params(("guidebook_id" = i64, Path, description = "Guidebook id")),
    responses(
        (status = 200, description = "Guidebook with nested guidebooks and works", body = GuideBookDetail),
        (status = 403, description = "Guidebook not found or no role in its company")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_guidebook(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    AppPath(guidebook_id): AppPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .permission_service
        .ensure_member(user.0.id, PermissionTarget::GuideBook(guidebook_id))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let guidebook = app_state
        .guidebook_service
        .get_by_id(guidebook_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?
        .ok_or_else(|| AppError::NotFound(Missing::GuideBook).to_api_error(&locale))?;

    let children = app_state
        .guidebook_service
        .list_children(guidebook_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let works = app_state
        .work_service
        .list_by_guidebook(guidebook_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let detail = GuideBookDetail {
        guidebook: GuideBookTitle::from(&guidebook),
        nested_guidebooks: children.iter().map(GuideBookTitle::from).collect(),
        nested_works: works.iter().map(NestedWork::from).collect(),
    };

    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/guidebook/guidebook_create/{company_id}/
#[utoipa::path(
    post,
    path = "/api/guidebook/guidebook_create/{company_id}/",
    tag = "Guidebooks",
    params(("company_id" = i64, Path, description = "Company id")),
    request_body = GuideBookPayload,
    responses(
        (status = 201, description = "Guidebook created", body = GuideBookView),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Author role required")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_guidebook(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    AppPath(company_id): AppPath<i64>,
    AppJson(body): AppJson<Value>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .permission_service
        .ensure_company_role(user.0.id, company_id, &[CompanyRole::Author])
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let payload: GuideBookPayload = parse_payload(body).map_err(|e| e.to_api_error(&locale))?;
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;
    let title = required(payload.title, "title").map_err(|e| e.to_api_error(&locale))?;

    let guidebook = app_state
        .guidebook_service
        .create(company_id, &title, payload.parent_guide_book)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let view = app_state
        .guidebook_service
        .to_view(&guidebook)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(view)))
}

// PUT /api/guidebook/change/{guidebook_id}/
#[utoipa::path(
    put,
    path = "/api/guidebook/change/{guidebook_id}/",
    tag = "Guidebooks",
    params(("guidebook_id" = i64, Path, description = "Guidebook id")),
    request_body = GuideBookPayload,
    responses(
        (status = 200, description = "Guidebook updated", body = GuideBookView),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Author role required"),
        (status = 404, description = "Guidebook not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_guidebook(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    AppPath(guidebook_id): AppPath<i64>,
    AppJson(body): AppJson<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let guidebook = app_state
        .guidebook_service
        .get_by_id(guidebook_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?
        .ok_or_else(|| AppError::NotFound(Missing::GuideBook).to_api_error(&locale))?;

    app_state
        .permission_service
        .ensure_author(user.0.id, PermissionTarget::GuideBook(guidebook_id))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let payload: GuideBookPayload = parse_payload(body).map_err(|e| e.to_api_error(&locale))?;
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let changes = GuideBookChanges {
        title: payload.title,
        parent_guide_book_id: payload.parent_guide_book,
    };

    let updated = app_state
        .guidebook_service
        .update(guidebook, changes)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let view = app_state
        .guidebook_service
        .to_view(&updated)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(view)))
}

// DELETE /api/guidebook/change/{guidebook_id}/
#[utoipa::path(
    delete,
    path = "/api/guidebook/change/{guidebook_id}/",
    tag = "Guidebooks",
    params(("guidebook_id" = i64, Path, description = "Guidebook id")),
    responses(
        (status = 204, description = "Guidebook soft-deleted"),
        (status = 403, description = "Author role required"),
        (status = 404, description = "Guidebook not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_guidebook(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    AppPath(guidebook_id): AppPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let guidebook = app_state
        .guidebook_service
        .get_by_id(guidebook_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?
        .ok_or_else(|| AppError::NotFound(Missing::GuideBook).to_api_error(&locale))?;

    app_state
        .permission_service
        .ensure_author(user.0.id, PermissionTarget::GuideBook(guidebook_id))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    app_state
        .guidebook_service
        .soft_delete(&guidebook)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
