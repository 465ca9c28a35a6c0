// src/services/work_service.rs

use std::sync::Arc;

use anyhow::anyhow;
use axum::http::Uri;

use crate::{
    common::{error::AppError, pagination::ListQuery},
    db::{GuideBookRepository, WorkRepository},
    models::{
        guidebook::{GuideBook, GuideBookTitle, NewWork, Work, WorkChanges, WorkView},
        pagination::Paginated,
    },
};

const GUIDEBOOK_FIELD: &str = "guidebook";

#[derive(Clone)]
pub struct WorkService {
    works: Arc<dyn WorkRepository>,
    guidebooks: Arc<dyn GuideBookRepository>,
}

/// The works of a guidebook that has at least one.
pub struct GuideBookWorks<'a> {
    service: &'a WorkService,
    guidebook_id: i64,
}

impl GuideBookWorks<'_> {
    pub async fn paginate(
        &self,
        query: &ListQuery,
        uri: &Uri,
    ) -> Result<Paginated<WorkView>, AppError> {
        let service = self.service;
        let filter = query.filter();

        let count = service
            .works
            .count_by_guidebook(self.guidebook_id, &filter)
            .await?;
        let window = query.window(count)?;
        let works = service
            .works
            .page_by_guidebook(self.guidebook_id, &filter, window.limit(), window.offset())
            .await?;

        // Every work on the page shares the same guidebook
        let guidebook = service.owning_guidebook(self.guidebook_id).await?;
        let title = GuideBookTitle::from(&guidebook);
        let results = works
            .iter()
            .map(|work| view_with(work, title.clone()))
            .collect();

        Ok(window.paginate(uri, results))
    }
}

impl WorkService {
    pub fn new(works: Arc<dyn WorkRepository>, guidebooks: Arc<dyn GuideBookRepository>) -> Self {
        Self { works, guidebooks }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Work>, AppError> {
        self.works.find_by_id(id).await
    }

    /// `None` when the guidebook holds no works.
    pub async fn get_works_by_guidebook(
        &self,
        guidebook_id: i64,
    ) -> Result<Option<GuideBookWorks<'_>>, AppError> {
        if !self.works.has_works(guidebook_id).await? {
            return Ok(None);
        }
        Ok(Some(GuideBookWorks {
            service: self,
            guidebook_id,
        }))
    }

    pub async fn list_by_guidebook(&self, guidebook_id: i64) -> Result<Vec<Work>, AppError> {
        self.works.list_by_guidebook(guidebook_id).await
    }

    pub async fn create(&self, new_work: NewWork) -> Result<Work, AppError> {
        if self.guidebooks.find_by_id(new_work.guidebook_id).await?.is_none() {
            return Err(AppError::field(GUIDEBOOK_FIELD, "guidebook_not_found"));
        }

        let work = self.works.create(&new_work).await?;
        tracing::info!(work_id = work.id, guidebook_id = work.guidebook_id, "work created");
        Ok(work)
    }

    /// Applies the given changes; absent fields keep their current value.
    pub async fn update(&self, mut work: Work, changes: WorkChanges) -> Result<Work, AppError> {
        if let Some(guidebook_id) = changes.guidebook_id {
            if guidebook_id != work.guidebook_id {
                self.check_move(&work, guidebook_id).await?;
                work.guidebook_id = guidebook_id;
            }
        }
        if let Some(title) = changes.title {
            work.title = title;
        }
        if let Some(price) = changes.price_by_unit {
            work.price_by_unit = price;
        }
        if let Some(unit) = changes.unit_of_measurement {
            work.unit_of_measurement = unit;
        }
        if let Some(currency) = changes.currency {
            work.currency = currency;
        }

        let saved = self.works.save(&work).await?;
        tracing::info!(work_id = saved.id, "work updated");
        Ok(saved)
    }

    pub async fn soft_delete(&self, work: &Work) -> Result<(), AppError> {
        self.works.soft_delete(work.id).await?;
        tracing::info!(work_id = work.id, "work soft-deleted");
        Ok(())
    }

    pub async fn to_view(&self, work: &Work) -> Result<WorkView, AppError> {
        let guidebook = self.owning_guidebook(work.guidebook_id).await?;
        Ok(view_with(work, GuideBookTitle::from(&guidebook)))
    }

    async fn owning_guidebook(&self, guidebook_id: i64) -> Result<GuideBook, AppError> {
        let guidebook = self
            .guidebooks
            .find_by_id(guidebook_id)
            .await?
            .ok_or_else(|| anyhow!("guidebook {} of a stored work is missing", guidebook_id))?;
        Ok(guidebook)
    }

    // A work may only move between guidebooks of the same company
    async fn check_move(&self, work: &Work, target_id: i64) -> Result<(), AppError> {
        let target = self
            .guidebooks
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::field(GUIDEBOOK_FIELD, "guidebook_not_found"))?;
        let current = self.owning_guidebook(work.guidebook_id).await?;

        if target.company_id != current.company_id {
            return Err(AppError::field(GUIDEBOOK_FIELD, "other_company"));
        }
        Ok(())
    }
}

fn view_with(work: &Work, guidebook: GuideBookTitle) -> WorkView {
    WorkView {
        id: work.id,
        guidebook,
        title: work.title.clone(),
        price_by_unit: work.price_by_unit,
        unit_of_measurement: work.unit_of_measurement,
        currency: work.currency,
    }
}
