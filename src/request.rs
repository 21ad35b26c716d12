use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{BuildError, Result};

/// Extension of the compiled artifact.
pub const ARTIFACT_EXTENSION: &str = "wasm";

/// One source file to compile.
///
/// Every path here is derived from the source path, so two requests for
/// different sources never share an output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    source_path: PathBuf,
    working_dir: PathBuf,
    output_path: PathBuf,
}

impl BuildRequest {
    /// `source_path` must be absolute and name a file.
    pub fn new(source_path: impl Into<PathBuf>) -> Result<Self> {
        let source_path = source_path.into();

        if !source_path.is_absolute() || source_path.file_stem().is_none() {
            return Err(BuildError::InvalidSource { path: source_path });
        }
        let working_dir = match source_path.parent() {
            Some(dir) => dir.to_path_buf(),
            None => return Err(BuildError::InvalidSource { path: source_path }),
        };

        // widget.go -> widget.go.wasm, next to the source
        let mut output: OsString = source_path.clone().into_os_string();
        output.push(".");
        output.push(ARTIFACT_EXTENSION);

        Ok(Self {
            source_path,
            working_dir,
            output_path: PathBuf::from(output),
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Name the artifact is registered under: the source stem with `.wasm`.
    pub fn emitted_filename(&self) -> String {
        let stem = self
            .source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{stem}.{ARTIFACT_EXTENSION}")
    }
}
