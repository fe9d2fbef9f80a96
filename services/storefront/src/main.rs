use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use storefront::config::StorefrontConfig;
use storefront::router::build_router;
use storefront::state::AppState;
use storefront_core::config::Config;
use storefront_core::tracing::init_tracing;
use storefront_migration::{Migrator, MigratorTrait};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = StorefrontConfig::try_from_env().context("load configuration")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;
    Migrator::up(&db, None).await.context("apply migrations")?;

    let router = build_router(AppState::from_config(db, &config));
    let addr = format!("0.0.0.0:{}", config.storefront_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!(%addr, channel = %config.default_channel, "storefront listening");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
