//! Replacement module synthesis.
//!
//! The generated module stands in for the Go source inside the host's
//! module graph. It never embeds the binary: it fetches the emitted file at
//! runtime, relative to the host's public path, and hands the pending
//! `ArrayBuffer` promise to the bridge library. The bridge returns a façade
//! right away and resolves exported Go functions once instantiation is done.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

/// Runtime expression webpack rewrites to the configured public path.
pub const DEFAULT_PUBLIC_PATH: &str = "__webpack_public_path__";

/// Go's `syscall/js` runtime shim, relative to the installation root.
pub const RUNTIME_SCRIPT: &str = "lib/wasm_exec.js";

/// Bridge library entry point, relative to the installation root.
pub const BRIDGE_ENTRY: &str = "dist/gobridge.js";

/// Execution context the generated module is evaluated in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetEnv {
    /// Decide at runtime: fetch only when `window` exists.
    #[default]
    Auto,
    /// Always fetch and instantiate.
    Browser,
    /// Never fetch; export an empty object (server-side rendering).
    Server,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeOptions {
    pub runtime_script: PathBuf,
    pub bridge_entry: PathBuf,
    /// JavaScript expression evaluating to the public asset base URL.
    pub public_path: String,
    pub target_env: TargetEnv,
}

impl BridgeOptions {
    /// Options pointing at the support scripts shipped with an installation.
    pub fn for_install_root(root: &Path) -> Self {
        Self {
            runtime_script: root.join(RUNTIME_SCRIPT),
            bridge_entry: root.join(BRIDGE_ENTRY),
            public_path: DEFAULT_PUBLIC_PATH.to_string(),
            target_env: TargetEnv::default(),
        }
    }
}

/// Replacement source for one compiled module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    /// Emitted artifact the module fetches.
    pub filename: String,
    pub source: String,
}

/// Synthesize the loader module for an artifact emitted as `filename`.
pub fn generate_module(filename: &str, options: &BridgeOptions) -> GeneratedModule {
    let runtime = js_string(&format!("!{}", options.runtime_script.to_string_lossy()));
    let bridge = js_string(&options.bridge_entry.to_string_lossy());
    let instantiate = format!(
        "gobridge(fetch({} + {}).then(response => response.arrayBuffer()))",
        options.public_path,
        js_string(filename)
    );

    let mut source = format!("require({runtime});\nimport gobridge from {bridge};\n\n");
    match options.target_env {
        TargetEnv::Auto => {
            source.push_str(&format!(
                "const wasm = typeof window !== \"undefined\"\n  ? {instantiate}\n  : {{}};\n\nexport default wasm;\n"
            ));
        }
        TargetEnv::Browser => {
            source.push_str(&format!("export default {instantiate};\n"));
        }
        TargetEnv::Server => {
            source.push_str("export default {};\n");
        }
    }

    GeneratedModule {
        filename: filename.to_string(),
        source,
    }
}

/// Quote `s` as a JavaScript string literal.
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}
