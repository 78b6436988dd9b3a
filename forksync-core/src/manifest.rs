//! Local manifest discovery.
//!
//! The integration's `manifest.json` is not always at the repository root, so
//! the source tree is searched for it. The shallowest match wins; ties break on
//! path order so the result is deterministic.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{io_err, CoreError};
use crate::types::Version;

/// Keys every released integration manifest must carry.
pub const REQUIRED_FIELDS: [&str; 10] = [
    "name",
    "platform",
    "guid",
    "version",
    "description",
    "author",
    "email",
    "url",
    "script",
    "update_url",
];

/// Find the manifest named `file_name` under `root`, skipping `.git`.
pub fn locate(root: &Path, file_name: &str) -> Result<PathBuf, CoreError> {
    let mut best: Option<(usize, PathBuf)> = None;

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_git_dir(e));
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
            io_err(path, source)
        })?;
        if !entry.file_type().is_file() || entry.file_name() != file_name {
            continue;
        }
        let depth = entry.depth();
        if best.as_ref().map_or(true, |(d, _)| depth < *d) {
            best = Some((depth, entry.into_path()));
        }
    }

    best.map(|(_, path)| path)
        .ok_or_else(|| CoreError::ManifestNotFound {
            root: root.to_path_buf(),
            file_name: file_name.to_string(),
        })
}

/// Read the `version` field of the manifest at `path`.
pub fn read_version(path: &Path) -> Result<Version, CoreError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    version_from_json(path, &contents)
}

/// Parse the `version` field out of manifest JSON already in memory.
pub fn version_from_json(path: &Path, contents: &str) -> Result<Version, CoreError> {
    let value = parse(path, contents)?;
    let raw = value
        .get("version")
        .and_then(|v| v.as_str())
        .ok_or_else(|| CoreError::MissingField {
            path: path.to_path_buf(),
            field: "version",
        })?;
    Ok(Version::parse(raw)?)
}

/// Fail with [`CoreError::IncompleteManifest`] unless the manifest at `path`
/// has every key in [`REQUIRED_FIELDS`].
pub fn check_required_fields(path: &Path) -> Result<(), CoreError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let value = parse(path, &contents)?;
    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| value.get(field).is_none())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::IncompleteManifest {
            path: path.to_path_buf(),
            missing,
        })
    }
}

fn parse(path: &Path, contents: &str) -> Result<serde_json::Value, CoreError> {
    serde_json::from_str(contents).map_err(|e| CoreError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

fn is_git_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == ".git"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn finds_manifest_in_nested_source_dir() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "src/manifest.json", r#"{"version": "0.3"}"#);
        let found = locate(tmp.path(), "manifest.json").unwrap();
        assert!(found.ends_with("src/manifest.json"));
        assert_eq!(read_version(&found).unwrap(), Version::parse("0.3").unwrap());
    }

    #[test]
    fn shallowest_manifest_wins() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a/b/manifest.json", r#"{"version": "9.9"}"#);
        write(tmp.path(), "z/manifest.json", r#"{"version": "1.0"}"#);
        let found = locate(tmp.path(), "manifest.json").unwrap();
        assert!(found.ends_with("z/manifest.json"), "{}", found.display());
    }

    #[test]
    fn git_directory_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), ".git/manifest.json", r#"{"version": "1.0"}"#);
        let err = locate(tmp.path(), "manifest.json").unwrap_err();
        assert!(matches!(err, CoreError::ManifestNotFound { .. }));
    }

    #[test]
    fn missing_or_malformed_version_field() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "manifest.json", r#"{"name": "x"}"#);
        let err = read_version(&tmp.path().join("manifest.json")).unwrap_err();
        assert!(matches!(err, CoreError::MissingField { .. }));

        write(tmp.path(), "manifest.json", r#"{"version": "one"}"#);
        let err = read_version(&tmp.path().join("manifest.json")).unwrap_err();
        assert!(matches!(err, CoreError::Version(_)));
    }

    #[test]
    fn complete_manifest_has_every_required_field() {
        let tmp = TempDir::new().unwrap();
        let full: serde_json::Map<String, serde_json::Value> = REQUIRED_FIELDS
            .iter()
            .map(|f| (f.to_string(), serde_json::Value::from("x")))
            .collect();
        write(
            tmp.path(),
            "manifest.json",
            &serde_json::Value::Object(full).to_string(),
        );
        check_required_fields(&tmp.path().join("manifest.json")).unwrap();
    }

    #[test]
    fn missing_required_fields_are_listed_in_order() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "manifest.json",
            r#"{"name": "Demo", "platform": "steam", "guid": "g", "version": "1.0",
                "description": "d", "author": "a", "url": "u", "script": "plugin.py"}"#,
        );
        let err = check_required_fields(&tmp.path().join("manifest.json")).unwrap_err();
        match err {
            CoreError::IncompleteManifest { missing, .. } => {
                assert_eq!(missing, vec!["email", "update_url"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
