use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use gowasm::{config, DirSink};

use super::common::{create_loader, resolve_install_root, LoaderOverrides};

/// Default directory emitted artifacts are written to.
const DEFAULT_OUT_DIR: &str = "dist";

pub struct BuildArgs {
    pub source: PathBuf,
    pub out_dir: Option<PathBuf>,
    pub module: Option<PathBuf>,
    pub overrides: LoaderOverrides,
}

/// Execute the build pipeline for one Go source
///
/// Flow:
/// 1. Load config and resolve the installation root
/// 2. Compile the source to wasm with the isolated environment
/// 3. Emit the artifact into the output directory
/// 4. Write the generated loader module
pub async fn execute_build_pipeline(args: BuildArgs, install_dir: Option<PathBuf>) -> Result<()> {
    let start_time = Instant::now();

    // --- 1. Initialize Config ---
    let config = config::load()?;
    let output_config = config.as_ref().and_then(|c| c.output.as_ref());
    let install_root = resolve_install_root(install_dir)?;

    let source = std::path::absolute(&args.source)
        .with_context(|| format!("Unable to resolve source path: {}", args.source.display()))?;
    if !source.is_file() {
        anyhow::bail!("Source file not found: {}", source.display());
    }

    println!(
        "{} Building: {}",
        "[GOWASM]".green().bold(),
        source.display()
    );

    let loader = create_loader(&install_root, config.as_ref(), args.overrides)?;

    // Output dir priority: CLI arg > Config file > dist
    let out_dir = args
        .out_dir
        .or_else(|| output_config.and_then(|o| o.dir.as_ref()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
    let mut sink = DirSink::new(out_dir);

    // --- 2/3. Compile and emit ---
    let module = loader.transform(&source, &mut sink).await?;

    for path in sink.written() {
        println!("{} Artifact emitted: {}", "[INFO]".cyan(), path.display());
    }

    // --- 4. Generated module ---
    let module_path = args
        .module
        .or_else(|| output_config.and_then(|o| o.module.as_ref()).map(PathBuf::from))
        .unwrap_or_else(|| default_module_path(sink.dir(), &module.filename));

    if let Some(parent) = module_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    tokio::fs::write(&module_path, &module.source)
        .await
        .with_context(|| format!("Failed to write module: {}", module_path.display()))?;

    let duration = start_time.elapsed();
    println!(
        "{} Build completed in {:.2}s → {}",
        "[DONE]".green().bold(),
        duration.as_secs_f64(),
        module_path.display()
    );

    Ok(())
}

/// `<out_dir>/<name>.js` next to the emitted `<name>.wasm`.
fn default_module_path(out_dir: &Path, artifact: &str) -> PathBuf {
    out_dir.join(Path::new(artifact).with_extension("js"))
}
