use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use gowasm::config::{self, ProjectConfig};
use gowasm::{GoCompiler, Loader, TargetEnv};

/// Command-line values that take precedence over gowasm.toml.
#[derive(Debug, Default)]
pub struct LoaderOverrides {
    pub public_path: Option<String>,
    pub target_env: Option<TargetEnv>,
    pub timeout_secs: Option<u64>,
}

pub fn resolve_install_root(install_dir: Option<PathBuf>) -> Result<PathBuf> {
    match install_dir {
        Some(dir) => absolute(&dir),
        None => config::detect_install_root(),
    }
}

/// Anchor `path` to the current directory.
///
/// The compiler runs in the source's directory and webpack treats relative
/// import specifiers as packages, so every path handed on must be absolute.
fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .with_context(|| format!("Unable to resolve path: {}", path.display()))
}

/// Assemble a loader from installation defaults, gowasm.toml and CLI overrides.
///
/// Precedence: CLI > gowasm.toml > installation defaults.
pub fn create_loader(
    install_root: &Path,
    config: Option<&ProjectConfig>,
    overrides: LoaderOverrides,
) -> Result<Loader<GoCompiler>> {
    let install_root = absolute(install_root)?;
    let toolchain = config.and_then(|c| c.toolchain.as_ref());
    let bridge_config = config.and_then(|c| c.bridge.as_ref());

    let timeout = overrides
        .timeout_secs
        .or_else(|| toolchain.and_then(|t| t.timeout_secs))
        .map(Duration::from_secs);

    let mut loader = Loader::new(GoCompiler::new().with_timeout(timeout), &install_root);

    if let Some(cache_dir) = toolchain.and_then(|t| t.cache_dir.as_ref()) {
        loader = loader.with_cache_dir(absolute(Path::new(cache_dir))?);
    }

    let mut bridge = loader.bridge().clone();
    if let Some(cfg) = bridge_config {
        if let Some(script) = &cfg.runtime_script {
            bridge.runtime_script = absolute(Path::new(script))?;
        }
        if let Some(entry) = &cfg.bridge_entry {
            bridge.bridge_entry = absolute(Path::new(entry))?;
        }
    }
    if let Some(public_path) = overrides
        .public_path
        .or_else(|| bridge_config.and_then(|c| c.public_path.clone()))
    {
        bridge.public_path = public_path;
    }
    if let Some(target_env) = overrides
        .target_env
        .or_else(|| bridge_config.and_then(|c| c.target_env))
    {
        bridge.target_env = target_env;
    }

    Ok(loader.with_bridge(bridge))
}
