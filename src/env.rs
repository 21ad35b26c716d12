//! Isolated process environment for the Go compiler.
//!
//! Resolution never touches the process environment directly: callers hand
//! in the inherited toolchain roots and get back the exact variable set the
//! compiler will see.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const GOOS: &str = "js";
pub const GOARCH: &str = "wasm";
pub const GO111MODULE: &str = "on";

/// Name of the cache directory created under the installation root.
pub const CACHE_DIR_NAME: &str = ".gocache";

/// Toolchain roots inherited from the invoking process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InheritedVars {
    pub go_root: Option<OsString>,
    pub go_path: Option<OsString>,
}

impl InheritedVars {
    /// Reads `GOROOT` and `GOPATH`; nothing else from the ambient environment is used.
    pub fn from_process() -> Self {
        Self {
            go_root: std::env::var_os("GOROOT"),
            go_path: std::env::var_os("GOPATH"),
        }
    }
}

/// The full environment handed to the compiler process.
///
/// The cache directory is shared by every concurrent build of this
/// installation; `go` serializes access to it internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEnvironment {
    vars: BTreeMap<String, OsString>,
}

impl BuildEnvironment {
    pub fn get(&self, name: &str) -> Option<&OsString> {
        self.vars.get(name)
    }

    pub fn go_root(&self) -> Option<&Path> {
        self.get("GOROOT").map(Path::new)
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        self.get("GOCACHE").map(Path::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OsString)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Lossy string view, for display and JSON output.
    pub fn to_display_map(&self) -> BTreeMap<&str, String> {
        self.vars
            .iter()
            .map(|(k, v)| (k.as_str(), v.to_string_lossy().into_owned()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Build the compiler environment.
///
/// Fixed settings are applied after the inherited roots, so nothing the
/// caller passes in can change the target platform.
pub fn resolve(inherited: &InheritedVars, cache_dir: &Path) -> BuildEnvironment {
    let mut vars = BTreeMap::new();

    if let Some(root) = &inherited.go_root {
        vars.insert("GOROOT".to_string(), root.clone());
    }
    if let Some(path) = &inherited.go_path {
        vars.insert("GOPATH".to_string(), path.clone());
    }

    vars.insert("GO111MODULE".to_string(), GO111MODULE.into());
    vars.insert("GOOS".to_string(), GOOS.into());
    vars.insert("GOARCH".to_string(), GOARCH.into());
    vars.insert("GOCACHE".to_string(), cache_dir.as_os_str().to_owned());

    BuildEnvironment { vars }
}

/// Default cache location for an installation rooted at `install_root`.
pub fn default_cache_dir(install_root: &Path) -> PathBuf {
    install_root.join(CACHE_DIR_NAME)
}
