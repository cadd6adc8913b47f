//! Property tests for site archiving.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read};

use proptest::prelude::*;

use yippie::domain::ports::ArchiveBuilder;
use yippie::domain::value_objects::{ArchiveKey, DeploymentNamespace};
use yippie::infrastructure::ZipArchiveBuilder;

fn relative_file() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[a-z0-9_]{1,8}").unwrap();
    proptest::collection::vec(segment, 1..=3).prop_map(|segments| segments.join("/"))
}

fn site() -> impl Strategy<Value = Vec<(String, Vec<u8>)>> {
    proptest::collection::btree_map(
        relative_file(),
        proptest::collection::vec(any::<u8>(), 0..256),
        1..8,
    )
    .prop_map(|files| files.into_iter().collect())
}

fn key(millis: i64) -> ArchiveKey {
    ArchiveKey::new(&DeploymentNamespace::parse("demo").unwrap(), millis)
}

/// Write `files` under a fresh temp dir, skipping paths that collide with a
/// directory created for another file.
fn materialize(files: &[(String, Vec<u8>)]) -> (tempfile::TempDir, BTreeMap<String, Vec<u8>>) {
    let dir = tempfile::tempdir().unwrap();
    let mut written = BTreeMap::new();
    for (rel, bytes) in files {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                continue;
            }
        }
        if path.is_dir() || std::fs::write(&path, bytes).is_err() {
            continue;
        }
        written.insert(rel.clone(), bytes.clone());
    }
    // A later directory may have shadowed an earlier file name.
    written.retain(|rel, _| dir.path().join(rel).is_file());
    (dir, written)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The archive holds exactly the files of the folder, byte for byte.
    #[test]
    fn property_entries_match_files(files in site()) {
        let (dir, expected) = materialize(&files);

        let artifact = ZipArchiveBuilder::new().build(dir.path(), key(1)).unwrap();

        let listed: BTreeSet<String> = artifact.entries().iter().cloned().collect();
        let expected_names: BTreeSet<String> = expected.keys().cloned().collect();
        prop_assert_eq!(&listed, &expected_names);

        let mut zip = zip::ZipArchive::new(Cursor::new(artifact.bytes().to_vec())).unwrap();
        let mut stored = BTreeMap::new();
        for i in 0..zip.len() {
            let mut entry = zip.by_index(i).unwrap();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            stored.insert(entry.name().to_string(), content);
        }
        prop_assert_eq!(stored, expected);
    }

    /// PROPERTY: Archiving the same folder twice yields identical bytes.
    #[test]
    fn property_archive_is_deterministic(files in site()) {
        let (dir, _) = materialize(&files);
        let builder = ZipArchiveBuilder::new();

        let first = builder.build(dir.path(), key(1)).unwrap();
        let second = builder.build(dir.path(), key(2)).unwrap();

        prop_assert_eq!(first.bytes(), second.bytes());
        prop_assert_eq!(first.sha256(), second.sha256());
    }
}
