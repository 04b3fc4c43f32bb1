//! 数据库连接配置
//!
//! 从环境变量读取连接参数：
//! - `DB_HOST`
//! - `DB_USER`
//! - `DB_PASSWORD`
//! - `DB_PORT`
//!
//! 数据库名由调用方显式传入。不做校验，缺失的变量视为空字符串，
//! 由后续的连接失败暴露出来。

use serde::{Deserialize, Serialize};
use std::{env, fmt};

pub const DB_HOST: &str = "DB_HOST";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASSWORD: &str = "DB_PASSWORD";
pub const DB_PORT: &str = "DB_PORT";

/// 数据库配置
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    pub host: String,
    pub user: String,
    #[serde(skip_serializing, default)] // 密码不随配置序列化输出
    pub password: String,
    pub port: String,
    pub db_name: String,
}

impl DbConfig {
    /// 从环境变量加载配置
    pub fn from_env(db_name: impl Into<String>) -> Self {
        Self::from_lookup(db_name, |key| env::var(key).ok())
    }

    /// 从任意键值来源加载配置，未找到的键取空字符串
    pub fn from_lookup<F>(db_name: impl Into<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();
        Self {
            host: get(DB_HOST),
            user: get(DB_USER),
            password: get(DB_PASSWORD),
            port: get(DB_PORT),
            db_name: db_name.into(),
        }
    }

    /// 生成 PostgreSQL 连接串，`sslmode=disable` 固定不可配置
    pub fn connection_url(&self) -> String {
        self.format_url(&self.password)
    }

    /// 隐去密码的连接串，仅用于日志
    pub fn redacted_url(&self) -> String {
        self.format_url("***")
    }

    fn format_url(&self, password: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode=disable",
            self.user, password, self.host, self.port, self.db_name
        )
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"***")
            .field("port", &self.port)
            .field("db_name", &self.db_name)
            .finish()
    }
}
