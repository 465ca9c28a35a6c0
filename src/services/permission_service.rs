// src/services/permission_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::{CompanyRepository, GuideBookRepository, WorkRepository};
use crate::models::company::CompanyRole;

/// What a permission check is about. Both variants end at a guidebook's company.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionTarget {
    GuideBook(i64),
    Work(i64),
    // The request did not name a target at all
    Unresolved,
}

#[derive(Clone)]
pub struct PermissionService {
    companies: Arc<dyn CompanyRepository>,
    guidebooks: Arc<dyn GuideBookRepository>,
    works: Arc<dyn WorkRepository>,
}

impl PermissionService {
    pub fn new(
        companies: Arc<dyn CompanyRepository>,
        guidebooks: Arc<dyn GuideBookRepository>,
        works: Arc<dyn WorkRepository>,
    ) -> Self {
        Self {
            companies,
            guidebooks,
            works,
        }
    }

    // Company owning the target, `None` when any link of the chain is missing
    async fn resolve_company(&self, target: PermissionTarget) -> Result<Option<i64>, AppError> {
        let guidebook_id = match target {
            PermissionTarget::GuideBook(id) => id,
            PermissionTarget::Work(id) => match self.works.find_by_id(id).await? {
                Some(work) => work.guidebook_id,
                None => return Ok(None),
            },
            PermissionTarget::Unresolved => return Ok(None),
        };

        Ok(self
            .guidebooks
            .find_by_id(guidebook_id)
            .await?
            .map(|guidebook| guidebook.company_id))
    }

    /// Any role in the company owning the target.
    pub async fn is_member(&self, user_id: Uuid, target: PermissionTarget) -> Result<bool, AppError> {
        match self.resolve_company(target).await? {
            Some(company_id) => self.has_any_company_role(user_id, company_id).await,
            None => Ok(false),
        }
    }

    /// The `author` role in the company owning the target.
    pub async fn is_author(&self, user_id: Uuid, target: PermissionTarget) -> Result<bool, AppError> {
        match self.resolve_company(target).await? {
            Some(company_id) => {
                self.has_company_role(user_id, company_id, &[CompanyRole::Author])
                    .await
            }
            None => Ok(false),
        }
    }

    pub async fn has_any_company_role(&self, user_id: Uuid, company_id: i64) -> Result<bool, AppError> {
        let roles = self.companies.roles_of(user_id, company_id).await?;
        Ok(!roles.is_empty())
    }

    pub async fn has_company_role(
        &self,
        user_id: Uuid,
        company_id: i64,
        required: &[CompanyRole],
    ) -> Result<bool, AppError> {
        let roles = self.companies.roles_of(user_id, company_id).await?;
        Ok(roles.iter().any(|role| required.contains(role)))
    }

    // --- Guards used by the handlers ---

    pub async fn ensure_member(&self, user_id: Uuid, target: PermissionTarget) -> Result<(), AppError> {
        let allowed = self.is_member(user_id, target).await?;
        deny_unless(allowed, user_id, "membership", target)
    }

    pub async fn ensure_author(&self, user_id: Uuid, target: PermissionTarget) -> Result<(), AppError> {
        let allowed = self.is_author(user_id, target).await?;
        deny_unless(allowed, user_id, "author", target)
    }

    pub async fn ensure_any_company_role(&self, user_id: Uuid, company_id: i64) -> Result<(), AppError> {
        let allowed = self.has_any_company_role(user_id, company_id).await?;
        deny_unless(allowed, user_id, "company member", company_id)
    }

    pub async fn ensure_company_role(
        &self,
        user_id: Uuid,
        company_id: i64,
        required: &[CompanyRole],
    ) -> Result<(), AppError> {
        let allowed = self.has_company_role(user_id, company_id, required).await?;
        deny_unless(allowed, user_id, "company role", company_id)
    }
}

fn deny_unless(
    allowed: bool,
    user_id: Uuid,
    check: &str,
    target: impl std::fmt::Debug,
) -> Result<(), AppError> {
    if allowed {
        return Ok(());
    }
    tracing::warn!(%user_id, ?target, "permission denied: {} check failed", check);
    Err(AppError::PermissionDenied)
}
