// src/services/guidebook_service.rs

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::anyhow;
use axum::http::Uri;

use crate::{
    common::{
        error::AppError,
        pagination::ListQuery,
    },
    db::{CompanyRepository, GuideBookRepository},
    models::{
        company::CompanySummary,
        guidebook::{GuideBook, GuideBookChanges, GuideBookTitle, GuideBookView},
        pagination::Paginated,
    },
};

const PARENT_FIELD: &str = "parent_guide_book";

#[derive(Clone)]
pub struct GuideBookService {
    guidebooks: Arc<dyn GuideBookRepository>,
    companies: Arc<dyn CompanyRepository>,
}

/// The root guidebooks of a company that has at least one.
pub struct RootGuideBooks<'a> {
    service: &'a GuideBookService,
    company_id: i64,
}

impl RootGuideBooks<'_> {
    pub async fn paginate(
        &self,
        query: &ListQuery,
        uri: &Uri,
    ) -> Result<Paginated<GuideBookTitle>, AppError> {
        let repo = &self.service.guidebooks;
        let filter = query.filter();

        let count = repo.count_roots(self.company_id, &filter).await?;
        let window = query.window(count)?;
        let guidebooks = repo
            .list_roots(self.company_id, &filter, window.limit(), window.offset())
            .await?;

        Ok(window.paginate(uri, guidebooks.iter().map(GuideBookTitle::from).collect()))
    }
}

impl GuideBookService {
    pub fn new(
        guidebooks: Arc<dyn GuideBookRepository>,
        companies: Arc<dyn CompanyRepository>,
    ) -> Self {
        Self {
            guidebooks,
            companies,
        }
    }

    /// `None` when the company has no guidebook without a parent.
    pub async fn get_root_guidebooks(
        &self,
        company_id: i64,
    ) -> Result<Option<RootGuideBooks<'_>>, AppError> {
        if !self.guidebooks.has_roots(company_id).await? {
            return Ok(None);
        }
        Ok(Some(RootGuideBooks {
            service: self,
            company_id,
        }))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<GuideBook>, AppError> {
        self.guidebooks.find_by_id(id).await
    }

    // The parent itself is not checked for existence
    pub async fn list_children(&self, parent_id: i64) -> Result<Vec<GuideBook>, AppError> {
        self.guidebooks.list_children(parent_id).await
    }

    pub async fn create(
        &self,
        company_id: i64,
        title: &str,
        parent_id: Option<i64>,
    ) -> Result<GuideBook, AppError> {
        if let Some(parent_id) = parent_id {
            self.check_parent(company_id, parent_id).await?;
        }

        let guidebook = self.guidebooks.create(company_id, title, parent_id).await?;
        tracing::info!(
            guidebook_id = guidebook.id,
            company_id,
            "guidebook created"
        );
        Ok(guidebook)
    }

    /// Applies the given changes; absent fields keep their current value.
    pub async fn update(
        &self,
        mut guidebook: GuideBook,
        changes: GuideBookChanges,
    ) -> Result<GuideBook, AppError> {
        if let Some(title) = changes.title {
            guidebook.title = title;
        }
        if let Some(parent_id) = changes.parent_guide_book_id {
            self.check_parent(guidebook.company_id, parent_id).await?;
            self.check_not_descendant(guidebook.id, parent_id).await?;
            guidebook.parent_guide_book_id = Some(parent_id);
        }

        let saved = self.guidebooks.save(&guidebook).await?;
        tracing::info!(guidebook_id = saved.id, "guidebook updated");
        Ok(saved)
    }

    // Flags the guidebook only; children and works stay as they are
    pub async fn soft_delete(&self, guidebook: &GuideBook) -> Result<(), AppError> {
        self.guidebooks.soft_delete(guidebook.id).await?;
        tracing::info!(guidebook_id = guidebook.id, "guidebook soft-deleted");
        Ok(())
    }

    /// Full representation with the owning company and the parent.
    pub async fn to_view(&self, guidebook: &GuideBook) -> Result<GuideBookView, AppError> {
        let company = self
            .companies
            .find_by_id(guidebook.company_id)
            .await?
            .ok_or_else(|| anyhow!("company {} of guidebook {} is missing", guidebook.company_id, guidebook.id))?;

        let parent = match guidebook.parent_guide_book_id {
            Some(parent_id) => self
                .guidebooks
                .find_by_id(parent_id)
                .await?
                .as_ref()
                .map(GuideBookTitle::from),
            None => None,
        };

        Ok(GuideBookView {
            id: guidebook.id,
            company: CompanySummary::from(company),
            title: guidebook.title.clone(),
            parent_guide_book: parent,
        })
    }

    // --- Validation against stored data ---

    async fn check_parent(&self, company_id: i64, parent_id: i64) -> Result<(), AppError> {
        match self.guidebooks.find_by_id(parent_id).await? {
            None => Err(AppError::field(PARENT_FIELD, "guidebook_not_found")),
            Some(parent) if parent.company_id != company_id => {
                Err(AppError::field(PARENT_FIELD, "other_company"))
            }
            Some(_) => Ok(()),
        }
    }

    // Walks up from the new parent; meeting the guidebook itself means a cycle
    async fn check_not_descendant(&self, guidebook_id: i64, parent_id: i64) -> Result<(), AppError> {
        let mut seen = HashSet::new();
        let mut current = Some(parent_id);

        while let Some(id) = current {
            if id == guidebook_id {
                return Err(AppError::field(PARENT_FIELD, "cycle"));
            }
            if !seen.insert(id) {
                break;
            }
            current = self
                .guidebooks
                .find_by_id(id)
                .await?
                .and_then(|g| g.parent_guide_book_id);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::guidebook::GuideBookChanges;

    fn service(store: &MemoryStore) -> GuideBookService {
        GuideBookService::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    fn field_code(err: &AppError) -> Option<(String, String)> {
        match err {
            AppError::ValidationError(errors) => errors
                .field_errors()
                .iter()
                .next()
                .map(|(field, errs)| (field.to_string(), errs[0].code.to_string())),
            _ => None,
        }
    }

    #[tokio::test]
    async fn root_listing_is_absent_for_companies_without_guidebooks() {
        let store = MemoryStore::new();
        let company = store.add_company("ООО").await;
        let service = service(&store);

        assert!(service.get_root_guidebooks(company.id).await.unwrap().is_none());

        service.create(company.id, "Внутренняя отделка", None).await.unwrap();
        assert!(service.get_root_guidebooks(company.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_parent_is_a_field_error() {
        let store = MemoryStore::new();
        let company = store.add_company("ООО").await;

        let err = service(&store).create(company.id, "Пол", Some(99)).await.unwrap_err();

        assert_eq!(
            field_code(&err),
            Some(("parent_guide_book".into(), "guidebook_not_found".into()))
        );
        assert_eq!(store.guidebook_count().await, 0);
    }

    #[tokio::test]
    async fn parent_from_another_company_is_rejected() {
        let store = MemoryStore::new();
        let ours = store.add_company("ООО").await;
        let theirs = store.add_company("ОАО").await;
        let service = service(&store);
        let foreign = service.create(theirs.id, "Чужой", None).await.unwrap();

        let err = service.create(ours.id, "Пол", Some(foreign.id)).await.unwrap_err();

        assert_eq!(
            field_code(&err),
            Some(("parent_guide_book".into(), "other_company".into()))
        );
    }

    #[tokio::test]
    async fn update_keeps_absent_fields_and_rejects_cycles() {
        let store = MemoryStore::new();
        let company = store.add_company("ООО").await;
        let service = service(&store);
        let root = service.create(company.id, "Корень", None).await.unwrap();
        let child = service.create(company.id, "Ветка", Some(root.id)).await.unwrap();

        let renamed = service
            .update(
                child.clone(),
                GuideBookChanges {
                    title: Some("Лист".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.title, "Лист");
        assert_eq!(renamed.parent_guide_book_id, Some(root.id));

        let err = service
            .update(
                root.clone(),
                GuideBookChanges {
                    parent_guide_book_id: Some(child.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(field_code(&err), Some(("parent_guide_book".into(), "cycle".into())));

        let err = service
            .update(
                root.clone(),
                GuideBookChanges {
                    parent_guide_book_id: Some(root.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(field_code(&err), Some(("parent_guide_book".into(), "cycle".into())));
    }

    #[tokio::test]
    async fn soft_delete_does_not_cascade() {
        let store = MemoryStore::new();
        let company = store.add_company("ООО").await;
        let service = service(&store);
        let root = service.create(company.id, "Корень", None).await.unwrap();
        let child = service.create(company.id, "Ветка", Some(root.id)).await.unwrap();

        service.soft_delete(&root).await.unwrap();

        let root = service.get_by_id(root.id).await.unwrap().unwrap();
        assert!(root.is_delete);
        let children = service.list_children(root.id).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, child.id);
        assert!(!children[0].is_delete);
    }

    #[tokio::test]
    async fn view_includes_company_and_parent_titles() {
        let store = MemoryStore::new();
        let company = store.add_company("ООО").await;
        let service = service(&store);
        let root = service.create(company.id, "Корень", None).await.unwrap();
        let child = service.create(company.id, "Ветка", Some(root.id)).await.unwrap();

        let view = service.to_view(&child).await.unwrap();

        assert_eq!(view.company.name, "ООО");
        assert_eq!(
            view.parent_guide_book,
            Some(GuideBookTitle {
                id: root.id,
                title: "Корень".into()
            })
        );
        assert!(service.to_view(&root).await.unwrap().parent_guide_book.is_none());
    }
}
