use config::DbConfig;
use domain::ImageSetId;
use infrastructure::{run_migrations, PgImageSetRepository};
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

pub const DB_NAME: &str = "imageset";

/// 一次性的 PostgreSQL 容器，已完成迁移。容器随本结构体一起销毁。
pub struct TestDb {
    pub repo: PgImageSetRepository,
    _container: ContainerAsync<Postgres>,
}

impl TestDb {
    pub async fn start() -> Self {
        let container = Postgres::default()
            .with_db_name(DB_NAME)
            .with_user("postgres")
            .with_password("postgres")
            .with_tag("14-alpine")
            .start()
            .await
            .expect("start postgres");
        let host = container.get_host().await.expect("host");
        let port = container.get_host_port_ipv4(5432u16).await.expect("port");

        let config = DbConfig {
            host: host.to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            port: port.to_string(),
            db_name: DB_NAME.to_string(),
        };

        let repo = PgImageSetRepository::open(&config)
            .await
            .expect("open repository");
        run_migrations(repo.pool()).await.expect("migrations");

        Self {
            repo,
            _container: container,
        }
    }

    pub async fn image_set_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM imagesets")
            .fetch_one(self.repo.pool())
            .await
            .expect("count imagesets")
    }

    pub async fn color_count(&self, id: ImageSetId) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM average_colors WHERE imageset_id = $1")
            .bind(i32::from(id))
            .fetch_one(self.repo.pool())
            .await
            .expect("count average colors")
    }

    /// `create_image_set` 不返回 ID，测试里按名称查回最新的一条
    pub async fn latest_id_by_name(&self, name: &str) -> ImageSetId {
        let id: i32 = sqlx::query_scalar("SELECT MAX(id) FROM imagesets WHERE name = $1")
            .bind(name)
            .fetch_one(self.repo.pool())
            .await
            .expect("lookup image set id");
        ImageSetId::from(id)
    }
}
