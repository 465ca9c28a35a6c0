// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::messages::{validation_text, Message};
use crate::middleware::i18n::Locale;

// What was missing when a 404 is returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    GuideBooks,
    GuideBook,
    Works,
    Work,
    Page,
    Route,
}

impl Missing {
    fn message(self) -> Message {
        match self {
            Missing::GuideBooks => Message::GuideBooksNotFound,
            Missing::GuideBook => Message::GuideBookNotFound,
            Missing::Works => Message::WorksNotFound,
            Missing::Work => Message::WorkNotFound,
            Missing::Page => Message::InvalidPage,
            Missing::Route => Message::NotFound,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    #[error("permission denied")]
    PermissionDenied,

    #[error("not found: {0:?}")]
    NotFound(Missing),

    #[error("invalid token")]
    InvalidToken,

    #[error("user not found")]
    UserNotFound,

    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("jwt error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// The error as it goes over the wire.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    /// A single-field validation failure.
    pub fn field(field: &'static str, code: &'static str) -> Self {
        let mut errors = validator::ValidationErrors::new();
        errors.add(field, validator::ValidationError::new(code));
        AppError::ValidationError(errors)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::MalformedBody(_)
            | AppError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            AppError::PermissionDenied => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidToken | AppError::UserNotFound => StatusCode::UNAUTHORIZED,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Renders the error in the caller's language.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let lang = locale.lang();
        let status = self.status();

        let (message, details) = match self {
            AppError::ValidationError(errors) => {
                let mut details = BTreeMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            validation_text(&e.code, lang)
                                .map(str::to_string)
                                .or_else(|| e.message.as_ref().map(|m| m.to_string()))
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                (Message::ValidationFailed, Some(json!(details)))
            }
            AppError::MalformedBody(reason) => (Message::MalformedBody, Some(json!(reason))),
            AppError::InvalidQuery(reason) => (Message::InvalidQuery, Some(json!(reason))),
            AppError::PermissionDenied => (Message::PermissionDenied, None),
            AppError::NotFound(missing) => (missing.message(), None),
            AppError::InvalidToken => (Message::InvalidToken, None),
            AppError::UserNotFound => (Message::UserNotFound, None),
            e => {
                tracing::error!("internal server error: {}", e);
                (Message::Internal, None)
            }
        };

        ApiError {
            status,
            error: message.text(lang).to_string(),
            details,
        }
    }
}

// Errors raised outside a handler (middleware, extractor rejections) use the default locale
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn statuses_follow_the_error_kind() {
        assert_eq!(AppError::PermissionDenied.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::NotFound(Missing::GuideBooks).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::MalformedBody("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidQuery("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_details_are_grouped_by_field_and_localised() {
        let mut errors = ValidationErrors::new();
        errors.add("parent_guide_book", ValidationError::new("guidebook_not_found"));

        let api = AppError::ValidationError(errors).to_api_error(&Locale("en".into()));

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "One or more fields are invalid.");
        assert_eq!(
            api.details,
            Some(json!({ "parent_guide_book": ["Guidebook with this ID was not found."] }))
        );
    }

    #[test]
    fn not_found_messages_name_the_missing_resource() {
        let api = AppError::NotFound(Missing::Works).to_api_error(&Locale::default());
        assert_eq!(api.error, "Работы в справочнике не найдены.");
        assert!(api.details.is_none());
    }
}
