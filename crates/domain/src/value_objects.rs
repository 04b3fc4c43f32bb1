use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 图集唯一标识，由数据库在插入时分配。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ImageSetId(pub i32);

impl ImageSetId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ImageSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ImageSetId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<ImageSetId> for i32 {
    fn from(value: ImageSetId) -> Self {
        value.0
    }
}

/// RGBA 颜色采样，每个通道 0-255。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.r, self.g, self.b, self.a)
    }
}

/// 颜色解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("颜色需要 4 个通道 (r,g,b,a)，实际为 {0} 个")]
    ChannelCount(usize),
    #[error("无效的通道值 {value:?}: 必须是 0-255 的整数")]
    InvalidChannel { value: String },
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// 解析 `"r,g,b,a"` 形式的字符串，允许通道两侧有空白。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ColorParseError::ChannelCount(parts.len()));
        }

        let mut channels = [0u8; 4];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| ColorParseError::InvalidChannel {
                value: (*part).to_string(),
            })?;
        }

        Ok(Color::from(channels))
    }
}
