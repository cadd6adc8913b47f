//! Archive artifact
//!
//! A built zip plus its storage key. Moved into the upload step, which is
//! its only consumer; dropping it removes the scratch copy on disk.


use tempfile::TempDir;

use crate::domain::value_objects::ArchiveKey;

#[derive(Debug)]
pub struct ArchiveArtifact {
    key: ArchiveKey,
    bytes: Vec<u8>,
    entries: Vec<String>,
    sha256: String,
    scratch: Option<TempDir>,
}

impl ArchiveArtifact {
    pub fn new(key: ArchiveKey, bytes: Vec<u8>, entries: Vec<String>, sha256: String) -> Self {
        Self {
            key,
            bytes,
            entries,
            sha256,
            scratch: None,
        }
    }

    /// Attach the scratch directory that holds the on-disk copy
    pub fn with_scratch(mut self, scratch: TempDir) -> Self {
        self.scratch = Some(scratch);
        self
    }

    pub fn key(&self) -> &ArchiveKey {
        &self.key
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Relative paths of the archived files, sorted
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Hex SHA-256 of the archive bytes
    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Location of the scratch file, while the artifact is alive
    pub fn scratch_file(&self) -> Option<std::path::PathBuf> {
        self.scratch
            .as_ref()
            .map(|dir| dir.path().join(self.key.as_str()))
    }
}
