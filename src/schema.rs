use anyhow::Context;
use sqlx::{migrate::Migrator, PgPool};
use tracing::info;

/// Migrations under `./migrations`, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Create the `users` table if absent. Safe to run on every startup.
pub async fn bootstrap(pool: &PgPool) -> anyhow::Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("run database migrations")?;
    info!("database schema ready");
    Ok(())
}
