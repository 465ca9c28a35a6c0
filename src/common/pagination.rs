// src/common/pagination.rs

use axum::http::Uri;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::common::error::{AppError, Missing};
use crate::common::filters::TitleFilter;
use crate::models::pagination::Paginated;

pub const PAGE_SIZE: i64 = 10;
// Equal to PAGE_SIZE, so `page_size` cannot change anything
pub const MAX_PAGE_SIZE: i64 = 10;

const PAGE_PARAM: &str = "page";
const LAST_PAGE: &str = "last";

/// Query string of the list endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// 1-based page number or `last`
    pub page: Option<String>,
    /// Requested page size, kept within 10..=10
    pub page_size: Option<String>,
}

impl ListQuery {
    pub fn filter(&self) -> TitleFilter {
        TitleFilter::new(self.title.as_deref())
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|size| *size > 0)
            .map(|size| size.clamp(PAGE_SIZE, MAX_PAGE_SIZE))
            .unwrap_or(PAGE_SIZE)
    }

    /// Resolves the requested page against the number of matching rows.
    pub fn window(&self, count: i64) -> Result<PageWindow, AppError> {
        let size = self.page_size();
        // An empty result still has one (empty) page
        let num_pages = ((count + size - 1) / size).max(1);

        let number = match self.page.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some(LAST_PAGE) => num_pages,
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| AppError::NotFound(Missing::Page))?,
        };

        if number < 1 || number > num_pages {
            return Err(AppError::NotFound(Missing::Page));
        }

        Ok(PageWindow {
            number,
            size,
            num_pages,
            count,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: i64,
    pub size: i64,
    pub num_pages: i64,
    pub count: i64,
}

impl PageWindow {
    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.size
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Wraps one page of results with links to its neighbours.
    pub fn paginate<T>(&self, uri: &Uri, results: Vec<T>) -> Paginated<T> {
        let next = self
            .has_next()
            .then(|| page_link(uri, Some(self.number + 1)));
        let previous = self.has_previous().then(|| {
            // The first page is linked without a page parameter
            let target = self.number - 1;
            page_link(uri, (target > 1).then_some(target))
        });

        Paginated {
            count: self.count,
            next,
            previous,
            results,
        }
    }
}

fn page_link(uri: &Uri, page: Option<i64>) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    if let Some(query) = uri.query() {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key != PAGE_PARAM {
                serializer.append_pair(&key, &value);
            }
        }
    }
    if let Some(page) = page {
        serializer.append_pair(PAGE_PARAM, &page.to_string());
    }

    let query = serializer.finish();
    if query.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), query)
    }
}
