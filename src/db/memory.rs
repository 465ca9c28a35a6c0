// src/db/memory.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::common::filters::TitleFilter;
use crate::db::{CompanyRepository, GuideBookRepository, UserRepository, WorkRepository};
use crate::models::{
    auth::User,
    company::{Company, CompanyRole, CompanyRoleUser},
    guidebook::{GuideBook, NewWork, Work},
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<Uuid, User>,
    companies: BTreeMap<i64, Company>,
    company_roles: Vec<CompanyRoleUser>,
    guidebooks: BTreeMap<i64, GuideBook>,
    works: BTreeMap<i64, Work>,
    last_company_id: i64,
    last_guidebook_id: i64,
    last_work_id: i64,
}

/// Process-local storage with the same semantics as the Postgres repositories.
///
/// Rows live in `BTreeMap`s keyed by id, so iteration already follows id order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Seeding of records owned by other modules ---

    pub async fn add_user(&self, email: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.users.insert(user.id, user.clone());
        user
    }

    pub async fn add_company(&self, name: &str) -> Company {
        let mut tables = self.tables.write().await;
        tables.last_company_id += 1;
        let company = Company {
            id: tables.last_company_id,
            name: name.to_string(),
        };
        tables.companies.insert(company.id, company.clone());
        company
    }

    pub async fn assign_role(&self, user_id: Uuid, company_id: i64, role: CompanyRole) {
        self.tables.write().await.company_roles.push(CompanyRoleUser {
            user_id,
            company_id,
            role,
        });
    }

    pub async fn guidebook_count(&self) -> usize {
        self.tables.read().await.guidebooks.len()
    }

    pub async fn work_count(&self) -> usize {
        self.tables.read().await.works.len()
    }
}

fn roots_of<'a>(
    tables: &'a Tables,
    company_id: i64,
    filter: &'a TitleFilter,
) -> impl Iterator<Item = &'a GuideBook> + 'a {
    tables.guidebooks.values().filter(move |g| {
        g.company_id == company_id && g.parent_guide_book_id.is_none() && filter.matches(&g.title)
    })
}

fn works_of<'a>(
    tables: &'a Tables,
    guidebook_id: i64,
    filter: &'a TitleFilter,
) -> impl Iterator<Item = &'a Work> + 'a {
    tables
        .works
        .values()
        .filter(move |w| w.guidebook_id == guidebook_id && filter.matches(&w.title))
}

fn window<T: Clone>(items: impl Iterator<Item = T>, limit: i64, offset: i64) -> Vec<T> {
    let offset = usize::try_from(offset).unwrap_or(0);
    let limit = usize::try_from(limit).unwrap_or(0);
    items.skip(offset).take(limit).collect()
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl CompanyRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Company>, AppError> {
        Ok(self.tables.read().await.companies.get(&id).cloned())
    }

    async fn roles_of(&self, user_id: Uuid, company_id: i64) -> Result<Vec<CompanyRole>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .company_roles
            .iter()
            .filter(|r| r.user_id == user_id && r.company_id == company_id)
            .map(|r| r.role)
            .collect())
    }
}

#[async_trait]
impl GuideBookRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<GuideBook>, AppError> {
        Ok(self.tables.read().await.guidebooks.get(&id).cloned())
    }

    async fn has_roots(&self, company_id: i64) -> Result<bool, AppError> {
        let tables = self.tables.read().await;
        let any = TitleFilter::default();
        Ok(roots_of(&tables, company_id, &any).next().is_some())
    }

    async fn count_roots(&self, company_id: i64, filter: &TitleFilter) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        Ok(roots_of(&tables, company_id, filter).count() as i64)
    }

    async fn list_roots(
        &self,
        company_id: i64,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GuideBook>, AppError> {
        let tables = self.tables.read().await;
        Ok(window(
            roots_of(&tables, company_id, filter).cloned(),
            limit,
            offset,
        ))
    }

    async fn list_children(&self, parent_id: i64) -> Result<Vec<GuideBook>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .guidebooks
            .values()
            .filter(|g| g.parent_guide_book_id == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        company_id: i64,
        title: &str,
        parent_id: Option<i64>,
    ) -> Result<GuideBook, AppError> {
        let mut tables = self.tables.write().await;
        tables.last_guidebook_id += 1;
        let now = Utc::now();
        let guidebook = GuideBook {
            id: tables.last_guidebook_id,
            company_id,
            title: title.to_string(),
            parent_guide_book_id: parent_id,
            is_delete: false,
            created_at: now,
            updated_at: now,
        };
        tables.guidebooks.insert(guidebook.id, guidebook.clone());
        Ok(guidebook)
    }

    async fn save(&self, guidebook: &GuideBook) -> Result<GuideBook, AppError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .guidebooks
            .get_mut(&guidebook.id)
            .ok_or(AppError::DatabaseError(sqlx::Error::RowNotFound))?;

        stored.company_id = guidebook.company_id;
        stored.title = guidebook.title.clone();
        stored.parent_guide_book_id = guidebook.parent_guide_book_id;
        stored.is_delete = guidebook.is_delete;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if let Some(guidebook) = tables.guidebooks.get_mut(&id) {
            guidebook.is_delete = true;
            guidebook.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait]
impl WorkRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Work>, AppError> {
        Ok(self.tables.read().await.works.get(&id).cloned())
    }

    async fn has_works(&self, guidebook_id: i64) -> Result<bool, AppError> {
        let tables = self.tables.read().await;
        let any = TitleFilter::default();
        Ok(works_of(&tables, guidebook_id, &any).next().is_some())
    }

    async fn count_by_guidebook(
        &self,
        guidebook_id: i64,
        filter: &TitleFilter,
    ) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        Ok(works_of(&tables, guidebook_id, filter).count() as i64)
    }

    async fn page_by_guidebook(
        &self,
        guidebook_id: i64,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Work>, AppError> {
        let tables = self.tables.read().await;
        Ok(window(
            works_of(&tables, guidebook_id, filter).cloned(),
            limit,
            offset,
        ))
    }

    async fn list_by_guidebook(&self, guidebook_id: i64) -> Result<Vec<Work>, AppError> {
        let tables = self.tables.read().await;
        let any = TitleFilter::default();
        Ok(works_of(&tables, guidebook_id, &any).cloned().collect())
    }

    async fn create(&self, work: &NewWork) -> Result<Work, AppError> {
        let mut tables = self.tables.write().await;
        tables.last_work_id += 1;
        let now = Utc::now();
        let created = Work {
            id: tables.last_work_id,
            guidebook_id: work.guidebook_id,
            title: work.title.clone(),
            price_by_unit: work.price_by_unit,
            unit_of_measurement: work.unit_of_measurement,
            currency: work.currency,
            is_delete: false,
            created_at: now,
            updated_at: now,
        };
        tables.works.insert(created.id, created.clone());
        Ok(created)
    }

    async fn save(&self, work: &Work) -> Result<Work, AppError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .works
            .get_mut(&work.id)
            .ok_or(AppError::DatabaseError(sqlx::Error::RowNotFound))?;

        stored.guidebook_id = work.guidebook_id;
        stored.title = work.title.clone();
        stored.price_by_unit = work.price_by_unit;
        stored.unit_of_measurement = work.unit_of_measurement;
        stored.currency = work.currency;
        stored.is_delete = work.is_delete;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if let Some(work) = tables.works.get_mut(&id) {
            work.is_delete = true;
            work.updated_at = Utc::now();
        }
        Ok(())
    }
}
