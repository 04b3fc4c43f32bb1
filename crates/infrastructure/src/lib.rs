//! 基础设施层实现。
//!
//! 提供基于 PostgreSQL 的图集仓储与数据库迁移，实现领域层定义的接口。

pub mod migrations;
pub mod repository;

pub use migrations::{run_migrations, MIGRATOR};
pub use repository::{create_pg_pool, PgImageSetRepository};
