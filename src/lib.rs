//! Go → WebAssembly build step with a lazily-loading bridge module.
//!
//! [`Loader::transform`] is the whole pipeline: resolve the isolated
//! compiler environment, run `go build` for `js/wasm`, hand the captured
//! binary to an [`OutputSink`], and return the JavaScript module that
//! replaces the Go source in the host's module graph.

pub mod bridge;
pub mod builder;
pub mod config;
pub mod emitter;
pub mod env;
pub mod error;
pub mod loader;
pub mod request;

pub use bridge::{BridgeOptions, GeneratedModule, TargetEnv};
pub use builder::{go::GoCompiler, Artifact, CompilationOutcome, Compiler};
pub use emitter::{DirSink, MemorySink, OutputSink};
pub use env::{BuildEnvironment, InheritedVars};
pub use error::{BuildError, ErrorKind};
pub use loader::Loader;
pub use request::BuildRequest;
