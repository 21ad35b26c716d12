use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;

use gowasm::config;

use super::common::{create_loader, resolve_install_root, LoaderOverrides};

pub async fn execute_check_pipeline(timeout_secs: Option<u64>, install_dir: Option<PathBuf>) -> Result<()> {
    let config = config::load()?;
    let install_root = resolve_install_root(install_dir)?;
    let loader = create_loader(
        &install_root,
        config.as_ref(),
        LoaderOverrides {
            timeout_secs,
            ..Default::default()
        },
    )?;

    let version = loader
        .check()
        .await
        .context("Environment validation failed")?;

    let bridge = loader.bridge();
    for script in [&bridge.runtime_script, &bridge.bridge_entry] {
        if !script.exists() {
            println!(
                "{} Support script not found: {}",
                "[WARN]".yellow(),
                script.display()
            );
        }
    }

    println!("{} Toolchain ready: {}", "[OK]".green().bold(), version);

    Ok(())
}
