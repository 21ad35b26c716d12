use clap::{Parser, Subcommand};
use gowasm::TargetEnv;
use std::path::PathBuf;

/// 主程序的命令行接口（CLI）结构体
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// 安装根目录（包含 lib/wasm_exec.js、dist/gobridge.js 与编译缓存）。
    /// 未指定时根据可执行文件位置推断。
    #[arg(long, global = true)]
    pub install_dir: Option<PathBuf>,

    /// 调试模式：输出完整的编译器调用信息（参数、环境变量、工作目录）
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 所有支持的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Compile a Go source to WebAssembly and generate its loader module
    Build {
        /// Go source file to compile
        source: PathBuf,

        /// Directory the .wasm artifact is emitted into (default: dist)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Where to write the generated module (default: <out-dir>/<name>.js)
        #[arg(short, long)]
        module: Option<PathBuf>,

        /// JavaScript expression for the runtime public path
        #[arg(long)]
        public_path: Option<String>,

        /// Execution context of the generated module
        #[arg(long, value_enum)]
        target_env: Option<TargetEnv>,

        /// Kill the compiler after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Print the environment the Go compiler runs with
    Env {
        /// Print as a JSON object
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Verify the Go toolchain can be started
    Check {
        /// Kill the toolchain probe after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}
