use std::str::FromStr;

use config::DbConfig;
use domain::{
    Color, ImageSet, ImageSetId, ImageSetRepository, RepositoryError, RepositoryFuture,
    RepositoryResult,
};
use futures::TryFutureExt;
use sqlx::{
    error::ErrorKind,
    postgres::{PgConnectOptions, PgPoolOptions},
    FromRow, PgPool,
};
use tracing::{debug, error, info, info_span, Instrument, Span};

const OP_GET: &str = "get_image_set";
const OP_CREATE: &str = "create_image_set";
const OP_SET_COLORS: &str = "set_average_colors";

pub(crate) fn map_sqlx_err(operation: &'static str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::TypeNotFound { .. } => RepositoryError::scan(operation, err.to_string()),
        sqlx::Error::Database(ref db)
            if matches!(
                db.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            ) =>
        {
            RepositoryError::constraint(
                operation,
                db.constraint().map(str::to_owned),
                db.message(),
            )
        }
        other => RepositoryError::transaction_with_source(operation, other.to_string(), other),
    }
}

/// 按配置建立连接池，连接池参数使用 sqlx 默认值
pub async fn create_pg_pool(config: &DbConfig) -> RepositoryResult<PgPool> {
    let options = PgConnectOptions::from_str(&config.connection_url()).map_err(|err| {
        RepositoryError::connection_with_source(
            format!("无效的连接串 {}", config.redacted_url()),
            err,
        )
    })?;

    PgPoolOptions::new()
        .connect_with(options)
        .await
        .map_err(|err| {
            RepositoryError::connection_with_source(
                format!("无法连接到 {}", config.redacted_url()),
                err,
            )
        })
}

#[derive(Debug, FromRow)]
struct ImageSetRecord {
    id: i32,
    name: String,
    description: String,
}

impl From<ImageSetRecord> for ImageSet {
    fn from(value: ImageSetRecord) -> Self {
        ImageSet {
            id: ImageSetId::from(value.id),
            name: value.name,
            description: value.description,
            average_colors: Vec::new(),
        }
    }
}

#[derive(Debug, FromRow)]
struct ColorRecord {
    r: i32,
    g: i32,
    b: i32,
    a: i32,
}

impl TryFrom<ColorRecord> for Color {
    type Error = RepositoryError;

    fn try_from(value: ColorRecord) -> Result<Self, Self::Error> {
        let channel = |v: i32| {
            u8::try_from(v)
                .map_err(|_| RepositoryError::scan(OP_GET, format!("通道值 {v} 超出 0-255")))
        };
        Ok(Color::new(
            channel(value.r)?,
            channel(value.g)?,
            channel(value.b)?,
            channel(value.a)?,
        ))
    }
}

/// 基于 PostgreSQL 的图集仓储。
///
/// 独占一个连接池，克隆后共享同一个池。日志写入构造时注入的 span。
#[derive(Clone)]
pub struct PgImageSetRepository {
    pool: PgPool,
    span: Span,
}

impl PgImageSetRepository {
    /// 打开连接池，日志写入默认的 `imageset_db` span
    pub async fn open(config: &DbConfig) -> RepositoryResult<Self> {
        Self::open_with_span(config, info_span!("imageset_db")).await
    }

    /// 打开连接池，日志写入调用方提供的 span
    pub async fn open_with_span(config: &DbConfig, span: Span) -> RepositoryResult<Self> {
        let url = config.redacted_url();
        let pool = create_pg_pool(config)
            .inspect_ok(|_| info!(url = %url, "图集数据库连接池已建立"))
            .inspect_err(|err| {
                error!(operation = "open", error = %err, "打开图集数据库失败");
            })
            .instrument(span.clone())
            .await?;

        Ok(Self { pool, span })
    }

    pub fn from_pool(pool: PgPool, span: Span) -> Self {
        Self { pool, span }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 关闭连接池，等待已借出的连接归还
    pub async fn close(&self) {
        self.pool.close().instrument(self.span.clone()).await;
        self.span.in_scope(|| info!("图集数据库连接池已关闭"));
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

async fn read_image_set(pool: &PgPool, id: ImageSetId) -> RepositoryResult<ImageSet> {
    let mut tx = pool.begin().await.map_err(|err| map_sqlx_err(OP_GET, err))?;

    let record = sqlx::query_as::<_, ImageSetRecord>(
        "SELECT id, name, description FROM imagesets WHERE id = $1",
    )
    .bind(i32::from(id))
    .fetch_optional(&mut *tx)
    .await
    .map_err(|err| map_sqlx_err(OP_GET, err))?
    .ok_or_else(|| RepositoryError::not_found(id))?;

    tx.commit().await.map_err(|err| map_sqlx_err(OP_GET, err))?;
    Ok(ImageSet::from(record))
}

async fn read_average_colors(pool: &PgPool, id: ImageSetId) -> RepositoryResult<Vec<Color>> {
    let mut tx = pool.begin().await.map_err(|err| map_sqlx_err(OP_GET, err))?;

    let records = sqlx::query_as::<_, ColorRecord>(
        "SELECT r, g, b, a FROM average_colors WHERE imageset_id = $1 ORDER BY id",
    )
    .bind(i32::from(id))
    .fetch_all(&mut *tx)
    .await
    .map_err(|err| map_sqlx_err(OP_GET, err))?;

    tx.commit().await.map_err(|err| map_sqlx_err(OP_GET, err))?;
    records.into_iter().map(Color::try_from).collect()
}

impl ImageSetRepository for PgImageSetRepository {
    fn get_image_set(&self, id: ImageSetId) -> RepositoryFuture<ImageSet> {
        let pool = self.pool.clone();
        let span = info_span!(parent: &self.span, "get_image_set", id = %id);
        Box::pin(
            async move {
                // 两个独立事务：第二个失败不会回滚第一个
                let mut image_set = read_image_set(&pool, id).await?;
                image_set.average_colors = read_average_colors(&pool, id).await?;
                debug!(colors = image_set.average_colors.len(), "图集读取完成");
                Ok::<_, RepositoryError>(image_set)
            }
            .inspect_err(|err| {
                error!(operation = OP_GET, error = %err, "读取图集失败");
            })
            .instrument(span),
        )
    }

    fn create_image_set(&self, image_set: &ImageSet) -> RepositoryFuture<()> {
        let pool = self.pool.clone();
        let name = image_set.name.clone();
        let description = image_set.description.clone();
        let span = info_span!(parent: &self.span, "create_image_set", name = %name);
        Box::pin(
            async move {
                let mut tx = pool
                    .begin()
                    .await
                    .map_err(|err| map_sqlx_err(OP_CREATE, err))?;

                sqlx::query("INSERT INTO imagesets (name, description) VALUES ($1, $2)")
                    .bind(&name)
                    .bind(&description)
                    .execute(&mut *tx)
                    .await
                    .map_err(|err| map_sqlx_err(OP_CREATE, err))?;

                tx.commit()
                    .await
                    .map_err(|err| map_sqlx_err(OP_CREATE, err))?;
                debug!("图集已创建");
                Ok::<_, RepositoryError>(())
            }
            .inspect_err(|err| {
                error!(operation = OP_CREATE, error = %err, "创建图集失败");
            })
            .instrument(span),
        )
    }

    fn set_average_colors(&self, id: ImageSetId, colors: &[Color]) -> RepositoryFuture<()> {
        let pool = self.pool.clone();
        let colors = colors.to_vec();
        let span = info_span!(
            parent: &self.span,
            "set_average_colors",
            id = %id,
            count = colors.len()
        );
        Box::pin(
            async move {
                let mut tx = pool
                    .begin()
                    .await
                    .map_err(|err| map_sqlx_err(OP_SET_COLORS, err))?;

                // 提前返回时事务被丢弃并回滚，整批颜色不会部分落库
                for color in &colors {
                    sqlx::query(
                        r#"
                        INSERT INTO average_colors (imageset_id, r, g, b, a)
                        VALUES ($1, $2, $3, $4, $5)
                        "#,
                    )
                    .bind(i32::from(id))
                    .bind(i32::from(color.r))
                    .bind(i32::from(color.g))
                    .bind(i32::from(color.b))
                    .bind(i32::from(color.a))
                    .execute(&mut *tx)
                    .await
                    .map_err(|err| map_sqlx_err(OP_SET_COLORS, err))?;
                }

                tx.commit()
                    .await
                    .map_err(|err| map_sqlx_err(OP_SET_COLORS, err))?;
                debug!("平均颜色已写入");
                Ok::<_, RepositoryError>(())
            }
            .inspect_err(|err| {
                error!(operation = OP_SET_COLORS, error = %err, "写入平均颜色失败");
            })
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_map_to_scan() {
        let err = map_sqlx_err(OP_GET, sqlx::Error::ColumnNotFound("description".into()));
        assert!(matches!(err, RepositoryError::Scan { operation: OP_GET, .. }));
    }

    #[test]
    fn pool_errors_map_to_transaction() {
        let err = map_sqlx_err(OP_CREATE, sqlx::Error::PoolClosed);
        assert!(matches!(
            err,
            RepositoryError::Transaction {
                operation: OP_CREATE,
                source: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn row_not_found_without_id_maps_to_transaction() {
        // 读取路径使用 fetch_optional，NotFound 由调用处携带 ID 构造
        let err = map_sqlx_err(OP_GET, sqlx::Error::RowNotFound);
        assert!(matches!(
            err,
            RepositoryError::Transaction {
                operation: OP_GET,
                ..
            }
        ));
    }

    #[test]
    fn stored_color_out_of_range_is_a_scan_error() {
        let record = ColorRecord {
            r: 0,
            g: 300,
            b: 0,
            a: 255,
        };
        let err = Color::try_from(record).unwrap_err();
        assert!(matches!(err, RepositoryError::Scan { .. }));
        assert!(err.to_string().contains("300"));
    }

    #[test]
    fn color_record_converts_in_channel_order() {
        let record = ColorRecord {
            r: 1,
            g: 2,
            b: 3,
            a: 4,
        };
        assert_eq!(Color::try_from(record).unwrap(), Color::new(1, 2, 3, 4));
    }
}
