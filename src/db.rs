// src/db.rs

use std::sync::Arc;

use sqlx::PgPool;

pub mod company_repo;
pub use company_repo::{CompanyRepository, PgCompanyRepository};
pub mod guidebook_repo;
pub use guidebook_repo::{GuideBookRepository, PgGuideBookRepository};
pub mod work_repo;
pub use work_repo::{PgWorkRepository, WorkRepository};
pub mod user_repo;
pub use user_repo::{PgUserRepository, UserRepository};
pub mod memory;
pub use memory::MemoryStore;

/// Every repository the services need, behind trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub companies: Arc<dyn CompanyRepository>,
    pub guidebooks: Arc<dyn GuideBookRepository>,
    pub works: Arc<dyn WorkRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            companies: Arc::new(PgCompanyRepository::new(pool.clone())),
            guidebooks: Arc::new(PgGuideBookRepository::new(pool.clone())),
            works: Arc::new(PgWorkRepository::new(pool)),
        }
    }

    pub fn in_memory(store: MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            companies: Arc::new(store.clone()),
            guidebooks: Arc::new(store.clone()),
            works: Arc::new(store),
        }
    }
}
