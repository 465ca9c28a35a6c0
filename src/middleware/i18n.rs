// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

const SUPPORTED_LANGUAGES: [&str; 2] = ["ru", "en"];
const DEFAULT_LANGUAGE: &str = "ru";

// Language the caller asked for through Accept-Language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Locale {
    pub fn lang(&self) -> &str {
        &self.0
    }

    pub fn from_header(value: &str) -> Self {
        // "en-US" -> "en"
        let lang = accept_language::intersection(value, &SUPPORTED_LANGUAGES)
            .into_iter()
            .next()
            .or_else(|| {
                accept_language::parse(value)
                    .into_iter()
                    .filter_map(|tag| tag.split('-').next().map(str::to_lowercase))
                    .find(|primary| SUPPORTED_LANGUAGES.contains(&primary.as_str()))
            })
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Locale(lang)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANGUAGE.to_string())
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default();

        Ok(locale)
    }
}
