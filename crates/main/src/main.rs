//! 图集命令行入口
//!
//! 读取环境变量中的连接参数，打开图集仓储并执行一条命令。

mod cli;

use clap::Parser;
use config::DbConfig;
use infrastructure::{run_migrations, PgImageSetRepository};
use tracing_subscriber::EnvFilter;

use crate::cli::{execute, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = DbConfig::from_env(cli.db_name);
    tracing::info!("连接数据库: {}", config.redacted_url());

    let repo = PgImageSetRepository::open(&config).await?;

    let outcome = match cli.command {
        Command::Migrate => run_migrations(repo.pool()).await.map_err(anyhow::Error::from),
        Command::Repository(command) => execute(&repo, command).await.map(|output| {
            println!("{output}");
        }),
    };

    repo.close().await;
    outcome
}
