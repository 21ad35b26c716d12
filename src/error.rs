use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Coarse classification of a failed build step.
///
/// The host build system only sees one failure signal per module; the kind
/// lets callers decide how loudly to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself cannot be turned into a compile (no file name, no parent dir).
    InvalidRequest,
    /// Toolchain root missing or the compiler binary could not be spawned.
    Configuration,
    /// The compiler ran and reported failure.
    Compilation,
    /// The compiler reported success but its output could not be read or emitted.
    ArtifactIo,
    /// The compiler did not finish within the configured timeout.
    Timeout,
}

/// Errors produced while compiling one source module.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid source path: {}", path.display())]
    InvalidSource { path: PathBuf },

    #[error("toolchain root is not configured: {var} is unset")]
    ToolchainNotConfigured { var: &'static str },

    #[error("failed to spawn {}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Carries the compiler's diagnostics untouched so they reach the developer as-is.
    #[error("{}", compiler_failure_message(*code, stderr))]
    CompilerFailed { code: Option<i32>, stderr: String },

    #[error("compiler exited successfully but {} could not be read", path.display())]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to emit {filename}")]
    Emit {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("compiler did not finish within {}s", after.as_secs_f64())]
    Timeout { after: Duration },
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::InvalidSource { .. } => ErrorKind::InvalidRequest,
            BuildError::ToolchainNotConfigured { .. } | BuildError::Spawn { .. } => {
                ErrorKind::Configuration
            }
            BuildError::CompilerFailed { .. } => ErrorKind::Compilation,
            BuildError::ArtifactRead { .. } | BuildError::Emit { .. } => ErrorKind::ArtifactIo,
            BuildError::Timeout { .. } => ErrorKind::Timeout,
        }
    }
}

fn compiler_failure_message(code: Option<i32>, stderr: &str) -> String {
    let stderr = stderr.trim_end();
    match (code, stderr.is_empty()) {
        (Some(code), true) => format!("go build failed with exit code {code}"),
        (None, true) => "go build was terminated by a signal".to_string(),
        (_, false) => stderr.to_string(),
    }
}

pub type Result<T, E = BuildError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiler_stderr_is_reported_verbatim() {
        let err = BuildError::CompilerFailed {
            code: Some(2),
            stderr: "./main.go:4:2: undefined: fmt.Prinln\n".to_string(),
        };
        assert_eq!(err.to_string(), "./main.go:4:2: undefined: fmt.Prinln");
        assert_eq!(err.kind(), ErrorKind::Compilation);
    }

    #[test]
    fn silent_compiler_failure_reports_exit_code() {
        let err = BuildError::CompilerFailed {
            code: Some(1),
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "go build failed with exit code 1");
    }

    #[test]
    fn spawn_and_missing_root_are_configuration_errors() {
        let missing = BuildError::ToolchainNotConfigured { var: "GOROOT" };
        let spawn = BuildError::Spawn {
            program: PathBuf::from("/nowhere/bin/go"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(missing.kind(), ErrorKind::Configuration);
        assert_eq!(spawn.kind(), ErrorKind::Configuration);
        assert!(missing.to_string().contains("GOROOT"));
    }
}
