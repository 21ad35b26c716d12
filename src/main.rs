mod cli;
mod pipelines;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use colored::*;
use pipelines::{BuildArgs, LoaderOverrides};
use tracing_subscriber::EnvFilter;

/// CLI 主入口
///
/// - 负责参数解析与日志初始化
/// - 捕获错误并标准输出
/// - 调度对应的流水线
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    // 捕获顶层错误，格式化输出，避免展示 Rust 栈信息
    // 使用 {:#} 以保留完整错误链（编译器诊断原样输出）
    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

/// 日志级别：RUST_LOG 优先，其次 --debug，默认仅输出警告
fn init_tracing(debug: bool) {
    let default_level = if debug { "gowasm=debug" } else { "gowasm=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// 执行业务主流程
async fn run(cli: Cli) -> Result<()> {
    let install_dir = cli.install_dir;
    match cli.command {
        Commands::Build {
            source,
            out_dir,
            module,
            public_path,
            target_env,
            timeout,
        } => {
            let args = BuildArgs {
                source,
                out_dir,
                module,
                overrides: LoaderOverrides {
                    public_path,
                    target_env,
                    timeout_secs: timeout,
                },
            };
            pipelines::execute_build_pipeline(args, install_dir).await
        }
        Commands::Env { json } => pipelines::execute_env_pipeline(json, install_dir),
        Commands::Check { timeout } => pipelines::execute_check_pipeline(timeout, install_dir).await,
    }
}
