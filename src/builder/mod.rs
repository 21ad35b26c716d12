use std::future::Future;

use crate::env::BuildEnvironment;
use crate::error::BuildError;
use crate::request::BuildRequest;

pub mod go;

/// Compiled binary captured in memory, ready to be registered with the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Name the host should publish the bytes under.
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Either a complete artifact or the reason there is none.
pub type CompilationOutcome = Result<Artifact, BuildError>;

/// Compiler invocation interface.
///
/// Implementations own the whole external-process lifecycle for one
/// request: spawn, wait, classify, and capture the output file. They keep
/// no state between calls, so one instance may serve concurrent requests.
pub trait Compiler: Send + Sync {
    /// Verify the toolchain can be started with the given environment.
    ///
    /// Returns the toolchain's self-reported version on success.
    fn check_env(
        &self,
        env: &BuildEnvironment,
    ) -> impl Future<Output = Result<String, BuildError>> + Send;

    /// Compile `request` and capture the produced binary.
    ///
    /// # Side effects
    /// - The compiler writes `request.output_path()`; it is read and removed
    ///   before this returns successfully.
    /// - Compiler-side caches under the environment's cache dir are updated.
    fn compile(
        &self,
        request: &BuildRequest,
        env: &BuildEnvironment,
    ) -> impl Future<Output = CompilationOutcome> + Send;
}
