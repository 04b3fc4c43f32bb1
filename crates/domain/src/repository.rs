use futures::future::BoxFuture;

use crate::errors::RepositoryResult;
use crate::image_set::ImageSet;
use crate::value_objects::{Color, ImageSetId};

pub type RepositoryFuture<T> = BoxFuture<'static, RepositoryResult<T>>;

/// 图集仓储接口。
///
/// 每个操作在调用方看来都是一次性完成的：要么成功，要么返回错误且
/// 该操作内的事务不会提交。
pub trait ImageSetRepository: Send + Sync {
    /// 读取图集及其平均颜色。
    ///
    /// 图集行与颜色行在两个独立事务中读取，不保证两次读取看到同一时间点的数据。
    fn get_image_set(&self, id: ImageSetId) -> RepositoryFuture<ImageSet>;

    /// 插入图集的名称与描述。不会回填数据库分配的 ID。
    fn create_image_set(&self, image_set: &ImageSet) -> RepositoryFuture<()>;

    /// 在单个事务内按输入顺序插入颜色，任一失败则整批不落库。
    fn set_average_colors(&self, id: ImageSetId, colors: &[Color]) -> RepositoryFuture<()>;
}
