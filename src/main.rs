// 规范化命令行工具
//
// - value：规范化单个标注值，输出 JSON 结果
// - export：批量规范化标注文件，导出 CSV 或 JSON
// - init：写出默认配置文件

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use konfuzio_normalize::config::NormalizationConfig;
use konfuzio_normalize::export::{self, ExportFormat};
use konfuzio_normalize::normalize::{DataType, NormalizationEngine, NumberMode};

#[derive(Parser, Debug)]
#[command(name = "konfuzio-normalize")]
#[command(about = "Normalize annotation values into machine-readable form")]
#[command(version)]
struct Args {
    /// 配置文件路径（默认使用用户配置目录下的 Konfuzio/normalization.json）
    #[arg(short, long, global = true, env = "KONFUZIO_NORMALIZE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 规范化单个值
    Value {
        /// 数据类型（number / positive number / percentage / date / true/false / text）
        #[arg(short = 't', long = "type")]
        data_type: String,

        /// 数字模式，缺省时由数据类型或配置决定
        #[arg(short, long, value_enum)]
        mode: Option<NumberMode>,

        /// 标注的原始文本
        offset: String,
    },
    /// 批量导出标注
    Export {
        /// 标注 JSON 文件
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// 输出文件，缺省时写到标准输出
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 写出默认配置文件（路径同 --config）
    Init {
        /// 覆盖已有配置
        #[arg(long)]
        force: bool,
    },
}

/// 加载配置并构建引擎
fn build_engine(config_path: Option<&Path>) -> Result<NormalizationEngine> {
    let config = NormalizationConfig::load(config_path)?;
    Ok(NormalizationEngine::new(&config))
}

fn main() -> Result<()> {
    // 初始化日志（写到 stderr，stdout 留给结果）
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();

    match args.command {
        Command::Value {
            data_type,
            mode,
            offset,
        } => {
            let engine = build_engine(args.config.as_deref())?;
            let (data_type, implied_mode) = DataType::from_display_name(&data_type)
                .ok_or_else(|| anyhow::anyhow!("未知的数据类型: {}", data_type))?;
            let mode = mode.or(implied_mode);

            let result = engine.normalize(&offset, data_type, mode);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Export {
            input,
            format,
            output,
        } => {
            let engine = build_engine(args.config.as_deref())?;
            let annotations = export::load_annotations(&input)?;
            let items = export::normalize_annotations(&engine, annotations);
            let rendered = export::render(&items, format)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("写入导出文件失败: {:?}", path))?;
                    tracing::info!("导出完成: {:?}", path);
                }
                None => print!("{}", rendered),
            }
        }
        Command::Init { force } => {
            // 不读取现有配置，已有文件可能无法通过校验
            let path = match args.config {
                Some(path) => path,
                None => NormalizationConfig::config_path()?,
            };
            NormalizationConfig::init(&path, force)?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
