use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{Artifact, CompilationOutcome, Compiler};
use crate::env::BuildEnvironment;
use crate::error::{BuildError, Result};
use crate::request::BuildRequest;

/// Go toolchain driver targeting `js/wasm`.
///
/// Runs `<GOROOT>/bin/go build -o <output> <source>` with a cleared
/// environment, so only the resolved variables reach the compiler.
#[derive(Debug, Clone, Default)]
pub struct GoCompiler {
    timeout: Option<Duration>,
}

impl GoCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the compiler and fail the step if it runs longer than `timeout`.
    ///
    /// `None` waits forever, leaving hung compilers to the host's own timeout.
    ///
    /// Only the `go` process itself is killed. The `compile`/`link` tools it
    /// started are not in that kill and may finish and write the output file
    /// after the step has already failed. Whatever exists at the output path
    /// when the timeout fires is removed.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn run(
        &self,
        env: &BuildEnvironment,
        cwd: Option<&Path>,
        args: &[&OsStr],
    ) -> Result<Output> {
        let root = env
            .go_root()
            .ok_or(BuildError::ToolchainNotConfigured { var: "GOROOT" })?;
        let program = go_binary(root);

        debug!(
            program = %program.display(),
            args = ?args,
            cwd = ?cwd,
            env = ?env.to_display_map(),
            "spawning go"
        );

        let mut command = Command::new(&program);
        command
            .args(args)
            .env_clear()
            .envs(env.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| BuildError::Spawn {
            program: program.clone(),
            source,
        })?;

        // Dropping the wait future on timeout kills the child via kill_on_drop.
        let waited = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| BuildError::Timeout { after: limit })?,
            None => child.wait_with_output().await,
        };

        waited.map_err(|source| BuildError::Spawn { program, source })
    }
}

impl Compiler for GoCompiler {
    async fn check_env(&self, env: &BuildEnvironment) -> Result<String> {
        let output = self.run(env, None, &[OsStr::new("version")]).await?;
        if !output.status.success() {
            return Err(failure(&output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn compile(&self, request: &BuildRequest, env: &BuildEnvironment) -> CompilationOutcome {
        let output_path = request.output_path();
        let args = [
            OsStr::new("build"),
            OsStr::new("-o"),
            output_path.as_os_str(),
            request.source_path().as_os_str(),
        ];

        info!(source = %request.source_path().display(), "compiling");
        let output = match self.run(env, Some(request.working_dir()), &args).await {
            Ok(output) => output,
            Err(err @ BuildError::Timeout { .. }) => {
                discard_partial_output(output_path).await;
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        if !output.status.success() {
            return Err(failure(&output));
        }
        if !output.stdout.is_empty() {
            debug!(stdout = %String::from_utf8_lossy(&output.stdout), "go build output");
        }

        let bytes = tokio::fs::read(output_path)
            .await
            .map_err(|source| BuildError::ArtifactRead {
                path: output_path.to_path_buf(),
                source,
            })?;

        // The bytes are already in memory; a stale file is only noise.
        if let Err(e) = tokio::fs::remove_file(output_path).await {
            warn!(
                path = %output_path.display(),
                error = %e,
                "failed to remove temporary artifact"
            );
        }

        Ok(Artifact {
            filename: request.emitted_filename(),
            bytes,
        })
    }
}

/// Location of the `go` binary inside a toolchain root.
pub fn go_binary(root: &Path) -> PathBuf {
    let name = if cfg!(target_os = "windows") {
        "go.exe"
    } else {
        "go"
    };
    root.join("bin").join(name)
}

async fn discard_partial_output(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "removed partial artifact"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            path = %path.display(),
            error = %e,
            "failed to remove partial artifact"
        ),
    }
}

fn failure(output: &Output) -> BuildError {
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        debug!(stdout = %stdout, "go stdout");
    }
    BuildError::CompilerFailed {
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
