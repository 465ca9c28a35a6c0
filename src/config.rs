// src/config.rs

use std::{env, net::SocketAddr, time::Duration};

use anyhow::{bail, Context};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{MemoryStore, Repositories},
    services::{
        auth::AuthService, guidebook_service::GuideBookService,
        permission_service::PermissionService, work_service::WorkService,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Settings read from the environment (and `.env`, when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub storage: StorageBackend,
    pub enable_docs: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let storage = match env::var("CATALOG_STORAGE").as_deref() {
            Err(_) | Ok("postgres") => StorageBackend::Postgres,
            Ok("memory") => StorageBackend::Memory,
            Ok(other) => bail!("CATALOG_STORAGE must be 'postgres' or 'memory', got '{other}'"),
        };

        let database_url = env::var("DATABASE_URL").ok();
        if storage == StorageBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when CATALOG_STORAGE is 'postgres'");
        }

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:3000")?;

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            Err(_) => 5,
        };

        let enable_docs = match env::var("ENABLE_DOCS") {
            Ok(raw) => parse_flag(&raw).context("ENABLE_DOCS must be true or false")?,
            Err(_) => true,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            db_max_connections,
            storage,
            enable_docs,
        })
    }
}

fn parse_flag(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("not a boolean: '{other}'"),
    }
}

// Shared state of every handler
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub permission_service: PermissionService,
    pub guidebook_service: GuideBookService,
    pub work_service: WorkService,
    pub enable_docs: bool,
}

impl AppState {
    /// Wires the services over the configured storage.
    pub async fn new(config: &Config) -> anyhow::Result<(Self, Option<PgPool>)> {
        match config.storage {
            StorageBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL must be set")?;

                let db_pool = PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await
                    .context("failed to connect to the database")?;

                tracing::info!("database connection established");

                let state = Self::from_repositories(
                    Repositories::postgres(db_pool.clone()),
                    config.jwt_secret.clone(),
                    config.enable_docs,
                );
                Ok((state, Some(db_pool)))
            }
            StorageBackend::Memory => {
                tracing::warn!("using in-memory storage, data is lost on restart");
                let state = Self::from_repositories(
                    Repositories::in_memory(MemoryStore::new()),
                    config.jwt_secret.clone(),
                    config.enable_docs,
                );
                Ok((state, None))
            }
        }
    }

    pub fn from_repositories(repos: Repositories, jwt_secret: String, enable_docs: bool) -> Self {
        Self {
            auth_service: AuthService::new(repos.users, jwt_secret),
            permission_service: PermissionService::new(
                repos.companies.clone(),
                repos.guidebooks.clone(),
                repos.works.clone(),
            ),
            guidebook_service: GuideBookService::new(repos.guidebooks.clone(), repos.companies),
            work_service: WorkService::new(repos.works, repos.guidebooks),
            enable_docs,
        }
    }
}
