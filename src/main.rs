// src/main.rs

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use guidebook_api::{
    config::{AppState, Config},
    router::build_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("guidebook_api=info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let (app_state, db_pool) = AppState::new(&config).await?;

    if let Some(pool) = &db_pool {
        sqlx::migrate!()
            .run(pool)
            .await
            .context("failed to run database migrations")?;
        tracing::info!("database migrations applied");
    }

    let app = build_router(app_state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
