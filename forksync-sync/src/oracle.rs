//! Version oracle interface.

use std::path::Path;

use forksync_core::{manifest, RepoSlug, Version};

use crate::error::OracleError;

/// Supplies the fork's and upstream's current versions.
pub trait VersionOracle {
    /// Version recorded in the manifest under `path` in the local checkout.
    /// Fails with [`OracleError::NotFound`] if there is no manifest.
    fn read_local_version(&self, path: &Path) -> Result<Version, OracleError>;

    /// Version of the manifest named `path` in `repo` at `git_ref`.
    fn read_remote_version(
        &self,
        repo: &RepoSlug,
        git_ref: &str,
        path: &str,
    ) -> Result<Version, OracleError>;
}

/// Locate `manifest_name` under `root` and read its version.
pub fn local_manifest_version(root: &Path, manifest_name: &str) -> Result<Version, OracleError> {
    let path = manifest::locate(root, manifest_name)?;
    tracing::debug!("found local manifest at {}", path.display());
    Ok(manifest::read_version(&path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_manifest_maps_to_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = local_manifest_version(tmp.path(), "manifest.json").unwrap_err();
        assert!(matches!(err, OracleError::NotFound(_)), "{err}");
    }

    #[test]
    fn malformed_version_is_a_version_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("manifest.json"), r#"{"version": "1.x"}"#).unwrap();
        let err = local_manifest_version(tmp.path(), "manifest.json").unwrap_err();
        assert!(matches!(err, OracleError::Version(_)), "{err}");
    }
}
