use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

/// 嵌入工作区根目录 `migrations/` 下的版本化 SQL 迁移。
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// 将所有未应用的迁移应用到数据库，已是最新时不做任何事。
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("数据库迁移完成");
    Ok(())
}
