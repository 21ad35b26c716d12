use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::bridge::TargetEnv;

/// Name of the optional project configuration file.
pub const CONFIG_FILE: &str = "gowasm.toml";

/// 项目配置结构体
/// 对应项目根目录下的 gowasm.toml 文件，所有字段均可省略
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ProjectConfig {
    pub toolchain: Option<ToolchainConfig>,
    pub bridge: Option<BridgeConfig>,
    pub output: Option<OutputConfig>,
}

/// 编译器调用配置
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ToolchainConfig {
    /// 覆盖默认的隔离缓存目录（默认位于安装目录下的 .gocache）
    pub cache_dir: Option<String>,

    /// 编译超时（秒），未设置时无限等待
    pub timeout_secs: Option<u64>,
}

/// 生成模块配置
#[derive(Deserialize, Debug, Clone, Default)]
pub struct BridgeConfig {
    /// 运行时 public path 的 JavaScript 表达式
    pub public_path: Option<String>,

    pub target_env: Option<TargetEnv>,

    /// wasm_exec.js 的路径
    pub runtime_script: Option<String>,

    /// gobridge.js 的路径
    pub bridge_entry: Option<String>,
}

/// 输出配置
#[derive(Deserialize, Debug, Clone, Default)]
pub struct OutputConfig {
    /// 产物(.wasm)的存放目录
    pub dir: Option<String>,

    /// 生成模块的写入路径
    pub module: Option<String>,
}

/// 加载当前目录下的 gowasm.toml
///
/// 文件不存在时返回 `None`（纯 CLI 模式）；文件存在但无法解析时返回错误。
pub fn load() -> Result<Option<ProjectConfig>> {
    load_from(Path::new("."))
}

pub fn load_from(dir: &Path) -> Result<Option<ProjectConfig>> {
    let config_path = dir.join(CONFIG_FILE);

    if !config_path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    let config: ProjectConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;

    Ok(Some(config))
}

/// 推断安装根目录
///
/// 可执行文件位于 `<root>/bin/` 时返回 `<root>`，否则返回可执行文件所在目录。
pub fn detect_install_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Unable to locate the running executable")?;
    install_root_for(&exe)
        .with_context(|| format!("Executable has no parent directory: {}", exe.display()))
}

fn install_root_for(exe: &Path) -> Option<PathBuf> {
    let dir = exe.parent()?;
    if dir.file_name().is_some_and(|name| name == "bin") {
        if let Some(root) = dir.parent() {
            return Some(root.to_path_buf());
        }
    }
    Some(dir.to_path_buf())
}
