//! 仓储错误定义
//!
//! 封闭的错误种类集合，调用方按变体分支，而不是匹配错误字符串。

use thiserror::Error;

use crate::value_objects::ImageSetId;

/// 底层错误来源（驱动错误等）。
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 仓储错误类型
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// 连接池无法建立（主机不可达、认证失败、连接串非法）
    #[error("连接失败: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// 事务开始、执行或提交失败
    #[error("事务失败 ({operation}): {message}")]
    Transaction {
        operation: &'static str,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// 指定 ID 的图集不存在
    #[error("图集不存在: ID {id}")]
    NotFound { id: ImageSetId },

    /// 读取结果时列映射失败
    #[error("结果映射失败 ({operation}): {message}")]
    Scan {
        operation: &'static str,
        message: String,
    },

    /// 数据库约束被违反（外键、非空、检查约束等）
    #[error("违反约束 ({operation}): {message}")]
    Constraint {
        operation: &'static str,
        constraint: Option<String>,
        message: String,
    },
}

impl RepositoryError {
    pub fn connection_with_source(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Connection {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn transaction_with_source(
        operation: &'static str,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Transaction {
            operation,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn not_found(id: ImageSetId) -> Self {
        Self::NotFound { id }
    }

    pub fn scan(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Scan {
            operation,
            message: message.into(),
        }
    }

    pub fn constraint(
        operation: &'static str,
        constraint: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Constraint {
            operation,
            constraint,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint { .. })
    }
}

/// 仓储结果类型
pub type RepositoryResult<T> = Result<T, RepositoryError>;
