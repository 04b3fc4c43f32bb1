//! 命令行参数与命令分发

use anyhow::Context;
use clap::{Parser, Subcommand};
use domain::{Color, ImageSet, ImageSetId, ImageSetRepository};

#[derive(Debug, Parser)]
#[command(name = "imageset", version, about = "图集数据访问工具")]
pub struct Cli {
    /// 数据库名，连接参数其余部分取自 DB_HOST / DB_USER / DB_PASSWORD / DB_PORT
    #[arg(long, env = "DB_NAME", default_value = "imageset")]
    pub db_name: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 应用所有未执行的数据库迁移
    Migrate,
    #[command(flatten)]
    Repository(RepositoryCommand),
}

#[derive(Debug, Subcommand)]
pub enum RepositoryCommand {
    /// 以 JSON 输出图集及其平均颜色
    Get { id: i32 },
    /// 新建图集
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// 为图集写入一批平均颜色，格式 r,g,b,a
    SetColors {
        id: i32,
        #[arg(required = true)]
        colors: Vec<Color>,
    },
}

/// 对仓储执行一条命令，返回要打印的文本
pub async fn execute(
    repo: &dyn ImageSetRepository,
    command: RepositoryCommand,
) -> anyhow::Result<String> {
    match command {
        RepositoryCommand::Get { id } => {
            let image_set = repo
                .get_image_set(ImageSetId::from(id))
                .await
                .with_context(|| format!("读取图集 {id} 失败"))?;
            Ok(serde_json::to_string_pretty(&image_set)?)
        }
        RepositoryCommand::Create { name, description } => {
            repo.create_image_set(&ImageSet::new(name.as_str(), description))
                .await
                .with_context(|| format!("创建图集 {name} 失败"))?;
            Ok(format!("已创建图集 {name}"))
        }
        RepositoryCommand::SetColors { id, colors } => {
            repo.set_average_colors(ImageSetId::from(id), &colors)
                .await
                .with_context(|| format!("写入图集 {id} 的平均颜色失败"))?;
            Ok(format!("已为图集 {id} 写入 {} 个平均颜色", colors.len()))
        }
    }
}
