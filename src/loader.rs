use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::bridge::{generate_module, BridgeOptions, GeneratedModule};
use crate::builder::go::GoCompiler;
use crate::builder::Compiler;
use crate::emitter::OutputSink;
use crate::env::{self, BuildEnvironment, InheritedVars};
use crate::error::{BuildError, Result};
use crate::request::BuildRequest;

/// One node-transformation step: Go source in, bridge module out.
///
/// A `Loader` holds no per-request state and can serve concurrent
/// `transform` calls for distinct sources. Those calls share the cache
/// directory, which is left to the compiler's own locking.
#[derive(Debug, Clone)]
pub struct Loader<C = GoCompiler> {
    compiler: C,
    inherited: InheritedVars,
    cache_dir: PathBuf,
    bridge: BridgeOptions,
}

impl Loader<GoCompiler> {
    /// Loader for an installation rooted at `install_root`, using the
    /// process's `GOROOT`/`GOPATH`.
    pub fn for_install_root(install_root: &Path) -> Self {
        Self::new(GoCompiler::new(), install_root)
    }
}

impl<C: Compiler> Loader<C> {
    pub fn new(compiler: C, install_root: &Path) -> Self {
        Self {
            compiler,
            inherited: InheritedVars::from_process(),
            cache_dir: env::default_cache_dir(install_root),
            bridge: BridgeOptions::for_install_root(install_root),
        }
    }

    pub fn with_inherited(mut self, inherited: InheritedVars) -> Self {
        self.inherited = inherited;
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_bridge(mut self, bridge: BridgeOptions) -> Self {
        self.bridge = bridge;
        self
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    pub fn bridge(&self) -> &BridgeOptions {
        &self.bridge
    }

    /// Environment every compile of this loader runs with.
    pub fn environment(&self) -> BuildEnvironment {
        env::resolve(&self.inherited, &self.cache_dir)
    }

    /// Ask the toolchain for its version using the resolved environment.
    pub async fn check(&self) -> Result<String> {
        self.compiler.check_env(&self.environment()).await
    }

    /// Compile `source_path`, emit the artifact into `sink`, and return the
    /// module that replaces the source.
    ///
    /// Nothing reaches `sink` unless the compiler succeeded and its output
    /// was captured.
    pub async fn transform<S>(
        &self,
        source_path: impl Into<PathBuf>,
        sink: &mut S,
    ) -> Result<GeneratedModule>
    where
        S: OutputSink + ?Sized,
    {
        let request = BuildRequest::new(source_path)?;
        let env = self.environment();
        debug!(
            source = %request.source_path().display(),
            output = %request.output_path().display(),
            "resolved build request"
        );

        let artifact = self.compiler.compile(&request, &env).await?;

        sink.emit_file(&artifact.filename, &artifact.bytes)
            .map_err(|source| BuildError::Emit {
                filename: artifact.filename.clone(),
                source,
            })?;
        info!(
            filename = %artifact.filename,
            bytes = artifact.bytes.len(),
            "emitted artifact"
        );

        Ok(generate_module(&artifact.filename, &self.bridge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Artifact, CompilationOutcome};
    use crate::emitter::MemorySink;
    use crate::error::ErrorKind;
    use std::sync::Mutex;

    /// Compiler stand-in that echoes the source path back as the artifact.
    #[derive(Default)]
    struct EchoCompiler {
        fail_with: Option<String>,
        calls: Mutex<Vec<PathBuf>>,
    }

    impl Compiler for EchoCompiler {
        async fn check_env(&self, env: &BuildEnvironment) -> Result<String> {
            env.go_root()
                .map(|root| format!("echo {}", root.display()))
                .ok_or(BuildError::ToolchainNotConfigured { var: "GOROOT" })
        }

        async fn compile(&self, request: &BuildRequest, env: &BuildEnvironment) -> CompilationOutcome {
            self.calls
                .lock()
                .unwrap()
                .push(request.source_path().to_path_buf());
            assert_eq!(env.get("GOOS").unwrap(), "js");

            if let Some(stderr) = &self.fail_with {
                return Err(BuildError::CompilerFailed {
                    code: Some(1),
                    stderr: stderr.clone(),
                });
            }
            Ok(Artifact {
                filename: request.emitted_filename(),
                bytes: request.source_path().to_string_lossy().as_bytes().to_vec(),
            })
        }
    }

    struct FailingSink;

    impl OutputSink for FailingSink {
        fn emit_file(&mut self, _filename: &str, _bytes: &[u8]) -> std::io::Result<()> {
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
        }
    }

    fn loader(compiler: EchoCompiler) -> Loader<EchoCompiler> {
        Loader::new(compiler, Path::new("/opt/gowasm")).with_inherited(InheritedVars {
            go_root: Some("/usr/local/go".into()),
            go_path: None,
        })
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn transform_emits_artifact_and_returns_bridge() {
        let loader = loader(EchoCompiler::default());
        let mut sink = MemorySink::new();

        let module = loader.transform("/proj/widget.go", &mut sink).await.unwrap();

        assert_eq!(module.filename, "widget.wasm");
        assert_eq!(sink.get("widget.wasm"), Some(&b"/proj/widget.go"[..]));
        assert!(module
            .source
            .contains("fetch(__webpack_public_path__ + \"widget.wasm\")"));
    }

    #[tokio::test]
    async fn compiler_failure_emits_nothing() {
        let loader = loader(EchoCompiler {
            fail_with: Some("./widget.go:1:1: expected 'package'".to_string()),
            ..Default::default()
        });
        let mut sink = MemorySink::new();
        let source = std::env::temp_dir().join("widget.go");

        let err = loader.transform(source, &mut sink).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Compilation);
        assert_eq!(err.to_string(), "./widget.go:1:1: expected 'package'");
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn relative_source_is_rejected_before_compiling() {
        let loader = loader(EchoCompiler::default());
        let mut sink = MemorySink::new();

        let err = loader.transform("widget.go", &mut sink).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(loader.compiler().calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sink_failure_is_artifact_error() {
        let loader = loader(EchoCompiler::default());
        let source = std::env::temp_dir().join("widget.go");

        let err = loader.transform(source, &mut FailingSink).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArtifactIo);
    }

    #[tokio::test]
    async fn concurrent_transforms_share_one_loader() {
        let loader = loader(EchoCompiler::default());
        let dir = std::env::temp_dir();
        let (mut a, mut b) = (MemorySink::new(), MemorySink::new());

        let (first, second) = tokio::join!(
            loader.transform(dir.join("alpha.go"), &mut a),
            loader.transform(dir.join("beta.go"), &mut b),
        );

        assert_eq!(first.unwrap().filename, "alpha.wasm");
        assert_eq!(second.unwrap().filename, "beta.wasm");
        assert!(a.get("alpha.wasm").is_some() && b.get("beta.wasm").is_some());
        assert_eq!(loader.compiler().calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn environment_uses_installation_cache() {
        let env = loader(EchoCompiler::default()).environment();
        assert_eq!(
            env.cache_dir(),
            Some(Path::new("/opt/gowasm").join(".gocache").as_path())
        );
    }

    #[tokio::test]
    async fn check_uses_resolved_environment() {
        let loader = loader(EchoCompiler::default());
        assert_eq!(loader.check().await.unwrap(), "echo /usr/local/go");
    }
}
