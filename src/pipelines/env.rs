use anyhow::Result;
use std::path::PathBuf;

use gowasm::config;

use super::common::{create_loader, resolve_install_root, LoaderOverrides};

/// Print the environment `go build` is started with.
pub fn execute_env_pipeline(json: bool, install_dir: Option<PathBuf>) -> Result<()> {
    let config = config::load()?;
    let install_root = resolve_install_root(install_dir)?;
    let loader = create_loader(&install_root, config.as_ref(), LoaderOverrides::default())?;

    let env = loader.environment();
    let vars = env.to_display_map();
    if json {
        println!("{}", serde_json::to_string_pretty(&vars)?);
    } else {
        for (name, value) in vars {
            println!("{name}={value}");
        }
    }

    Ok(())
}
