use std::collections::BTreeMap;
use std::io::Result;
use std::path::{Path, PathBuf};

/// Host-side output registry.
///
/// The loader only chooses the file name; where the bytes end up and
/// under which URL they are served is up to the sink.
///
/// `emit_file` is synchronous and runs on the task driving `transform`.
/// Sinks that do slow I/O should hand the bytes off rather than block.
pub trait OutputSink {
    fn emit_file(&mut self, filename: &str, bytes: &[u8]) -> Result<()>;
}

/// Writes emitted files into a directory, creating it on first use.
///
/// Uses blocking `std::fs` calls. That suits the CLI, which runs one
/// transform at a time; embedders serving many concurrent builds should
/// provide their own sink.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in emission order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl OutputSink for DirSink {
    fn emit_file(&mut self, filename: &str, bytes: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(filename);
        std::fs::write(&path, bytes)?;

        self.written.push(path);
        Ok(())
    }
}

/// Keeps emitted files in memory. Re-emitting a name replaces the old bytes.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, filename: &str) -> Option<&[u8]> {
        self.files.get(filename).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl OutputSink for MemorySink {
    fn emit_file(&mut self, filename: &str, bytes: &[u8]) -> Result<()> {
        self.files.insert(filename.to_string(), bytes.to_vec());
        Ok(())
    }
}
