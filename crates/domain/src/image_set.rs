use serde::{Deserialize, Serialize};

use crate::value_objects::{Color, ImageSetId};

/// 图集：一组带名称的图片，以及按图片汇总出的平均颜色列表。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageSet {
    /// 新建时为默认值 0，持久化后由数据库分配。
    pub id: ImageSetId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub average_colors: Vec<Color>,
}

impl ImageSet {
    /// 构造一个尚未持久化的图集。
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: ImageSetId::default(),
            name: name.into(),
            description: description.into(),
            average_colors: Vec::new(),
        }
    }
}
