//! Zip Archive Builder
//!
//! Implements the ArchiveBuilder port with deflate-compressed zip files.
//! Output is byte-for-byte reproducible for identical folders: entries are
//! sorted, timestamps pinned to the zip epoch and permissions fixed.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use sha2::{Digest, Sha256};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::entities::ArchiveArtifact;
use crate::domain::ports::{ArchiveBuilder, ArchiveError};
use crate::domain::value_objects::ArchiveKey;

const ENTRY_PERMISSIONS: u32 = 0o644;

#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiveBuilder;

impl ZipArchiveBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveBuilder for ZipArchiveBuilder {
    fn build(&self, source: &Path, key: ArchiveKey) -> Result<ArchiveArtifact, ArchiveError> {
        if !source.is_dir() {
            return Err(ArchiveError::MissingFolder {
                path: source.to_path_buf(),
            });
        }

        let files = collect_files(source)?;
        tracing::debug!(source = %source.display(), files = files.len(), "collected files");

        let scratch = tempfile::Builder::new()
            .prefix("yippie-")
            .tempdir()
            .map_err(|source| ArchiveError::Io {
                path: std::env::temp_dir(),
                source,
            })?;
        let archive_path = scratch.path().join(key.as_str());

        write_zip(&archive_path, &files)?;

        let bytes = fs::read(&archive_path).map_err(|source| ArchiveError::Io {
            path: archive_path.clone(),
            source,
        })?;
        let sha256 = format!("{:x}", Sha256::digest(&bytes));
        let entries = files.into_iter().map(|(name, _)| name).collect();

        tracing::info!(
            key = %key,
            size = bytes.len(),
            path = %archive_path.display(),
            "archive written"
        );
        Ok(ArchiveArtifact::new(key, bytes, entries, sha256).with_scratch(scratch))
    }
}

/// Regular files under `root` as `(relative name, absolute path)`, sorted by name
fn collect_files(root: &Path) -> Result<Vec<(String, PathBuf)>, ArchiveError> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| ArchiveError::Walk(e.to_string()))?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| ArchiveError::Walk(e.to_string()))?;
        files.push((entry_name(relative), entry.path().to_path_buf()));
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

/// Zip entry names always use `/`
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn write_zip(path: &Path, files: &[(String, PathBuf)]) -> Result<(), ArchiveError> {
    let file = File::create(path).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(ENTRY_PERMISSIONS)
        .last_modified_time(zip::DateTime::default());

    for (name, absolute) in files {
        let content = fs::read(absolute).map_err(|source| ArchiveError::Io {
            path: absolute.clone(),
            source,
        })?;
        zip.start_file(name.as_str(), options)
            .map_err(|e| ArchiveError::Zip(e.to_string()))?;
        zip.write_all(&content).map_err(|source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }

    zip.finish().map_err(|e| ArchiveError::Zip(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::DeploymentNamespace;
    use std::io::{Cursor, Read};
    use tempfile::tempdir;

    fn key(millis: i64) -> ArchiveKey {
        ArchiveKey::new(&DeploymentNamespace::parse("demo").unwrap(), millis)
    }

    fn read_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut out = Vec::new();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            out.push((file.name().to_string(), content));
        }
        out
    }

    #[test]
    fn archives_nested_files_with_relative_paths() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("assets/css")).unwrap();
        fs::write(dir.path().join("index.html"), "<h1>hi</h1>").unwrap();
        fs::write(dir.path().join("assets/css/site.css"), "body{}").unwrap();
        fs::write(dir.path().join(".well-known"), "x").unwrap();

        let artifact = ZipArchiveBuilder.build(dir.path(), key(1)).unwrap();

        assert_eq!(
            artifact.entries(),
            &[".well-known", "assets/css/site.css", "index.html"]
        );
        let entries = read_entries(artifact.bytes());
        assert_eq!(
            entries,
            vec![
                (".well-known".to_string(), b"x".to_vec()),
                ("assets/css/site.css".to_string(), b"body{}".to_vec()),
                ("index.html".to_string(), b"<h1>hi</h1>".to_vec()),
            ]
        );
    }

    #[test]
    fn empty_folder_yields_valid_empty_archive() {
        let dir = tempdir().unwrap();
        let artifact = ZipArchiveBuilder.build(dir.path(), key(1)).unwrap();
        assert!(artifact.is_empty());
        assert!(read_entries(artifact.bytes()).is_empty());
    }

    #[test]
    fn missing_folder_is_reported() {
        let dir = tempdir().unwrap();
        let err = ZipArchiveBuilder
            .build(&dir.path().join("missing"), key(1))
            .unwrap_err();
        assert!(matches!(err, ArchiveError::MissingFolder { .. }), "{err:?}");
    }

    #[test]
    fn identical_folders_produce_identical_bytes() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "same").unwrap();
        fs::write(dir.path().join("about.html"), "also same").unwrap();

        let a = ZipArchiveBuilder.build(dir.path(), key(1)).unwrap();
        let b = ZipArchiveBuilder.build(dir.path(), key(2)).unwrap();
        assert_eq!(a.bytes(), b.bytes());
        assert_eq!(a.sha256(), b.sha256());
        assert_eq!(a.sha256().len(), 64);
    }

    #[test]
    fn scratch_file_is_removed_on_drop() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "x").unwrap();

        let artifact = ZipArchiveBuilder.build(dir.path(), key(7)).unwrap();
        let scratch = artifact.scratch_file().unwrap();
        assert!(scratch.ends_with("demo-7.zip"));
        assert!(scratch.is_file());

        drop(artifact);
        assert!(!scratch.exists());
    }
}
