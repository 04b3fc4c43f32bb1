//! 图集（image set）领域模型
//!
//! 包含图集、平均颜色等核心值对象，以及仓储接口与错误定义。

pub mod errors;
pub mod image_set;
pub mod repository;
pub mod value_objects;

// 重新导出常用类型
pub use errors::*;
pub use image_set::ImageSet;
pub use repository::*;
pub use value_objects::*;
