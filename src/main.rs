//! # 菜谱上传辅助工具 — 命令行入口
//!
//! 本文件仅负责日志初始化、参数解析与配置加载。
//! 缩放逻辑在 `image_handler` 中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use clap::{Args, Parser, Subcommand};
use recipe_uploads::error::AppError;
use recipe_uploads::image_handler::{ImagePerformanceProfile, ImageSource, ResizeService};
use recipe_uploads::settings;

#[derive(Parser, Debug)]
#[command(name = "recipe-uploads", version, about = "Recipe upload helpers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 缩放图片并在标准输出打印 Base64 PNG 负载
    Resize(ResizeArgs),
}

#[derive(Args, Debug)]
struct ResizeArgs {
    file: PathBuf,
    #[arg(long)]
    max_width: Option<u32>,
    #[arg(long)]
    max_height: Option<u32>,
    #[arg(long)]
    profile: Option<String>,
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Resize(args) => run_resize(args).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            log::error!("{err}");
            ExitCode::from(2)
        }
    }
}

/// 返回值表示回调是否被触发。
async fn run_resize(args: ResizeArgs) -> Result<bool, AppError> {
    let config = settings::load_config(&args.settings)?;
    let bounds = config.default_bounds;
    let service = ResizeService::new(config);

    if let Some(profile) = &args.profile {
        service.set_performance_profile(ImagePerformanceProfile::parse(profile)?)?;
    }

    let delivered = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&delivered);
    let task = service.resize(
        ImageSource::FilePath(args.file.to_string_lossy().into_owned()),
        args.max_width.unwrap_or(bounds.max_width),
        args.max_height.unwrap_or(bounds.max_height),
        move |payload| {
            if let Ok(mut slot) = slot.lock() {
                *slot = Some(payload);
            }
        },
    );

    if let Err(err) = task.await {
        log::error!("缩放任务异常退出: {err}");
        return Ok(false);
    }

    let payload = delivered.lock().ok().and_then(|mut slot| slot.take());
    match payload {
        Some(payload) => {
            println!("{payload}");
            Ok(true)
        }
        None => Ok(false),
    }
}
