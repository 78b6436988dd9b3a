//! Release-tracking descriptor (`current_version.json`).
//!
//! Written after a successful publish and read back on the next cycle as the
//! fork's recorded version. Writes use the same `.tmp` + rename pattern as the
//! config file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};
use crate::types::Version;

/// One downloadable release asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

impl ReleaseAsset {
    /// Asset named after the last segment of its download URL.
    pub fn from_url(url: &str) -> Self {
        let name = url.rsplit('/').next().unwrap_or(url).to_string();
        Self {
            name,
            browser_download_url: url.to_string(),
        }
    }
}

/// On-disk release descriptor payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDescriptor {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl ReleaseDescriptor {
    /// Descriptor for `tag` listing every `.zip` URL as an asset.
    pub fn from_download_urls<I, S>(tag: &str, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let assets = urls
            .into_iter()
            .filter(|u| u.as_ref().ends_with(".zip"))
            .map(|u| ReleaseAsset::from_url(u.as_ref()))
            .collect();
        Self {
            tag_name: tag.to_string(),
            assets,
        }
    }

    /// The recorded tag as a [`Version`].
    pub fn version(&self) -> Result<Version, CoreError> {
        Ok(Version::parse(&self.tag_name)?)
    }

    /// Serialize with the 4-space indentation the descriptor has always used.
    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever emits UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn from_json(path: &Path, contents: &str) -> Result<Self, CoreError> {
        serde_json::from_str(contents).map_err(|e| CoreError::Json {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Load the descriptor at `path`. Returns `Ok(None)` if the file does not exist.
pub fn load_at(path: &Path) -> Result<Option<ReleaseDescriptor>, CoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    ReleaseDescriptor::from_json(path, &contents).map(Some)
}

/// Save the descriptor atomically: write `<path>.tmp`, then rename.
pub fn save_at(path: &Path, descriptor: &ReleaseDescriptor) -> Result<(), CoreError> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }

    let json = descriptor.to_json_pretty()?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_descriptor_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(load_at(&tmp.path().join("current_version.json"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn save_load_and_tmp_cleanup() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("current_version.json");
        let descriptor = ReleaseDescriptor::from_download_urls(
            "0.4",
            [
                "https://github.com/o/r/releases/download/0.4/windows.zip",
                "https://github.com/o/r/releases/download/0.4/macos.zip",
            ],
        );
        save_at(&path, &descriptor).unwrap();

        assert_eq!(load_at(&path).unwrap(), Some(descriptor));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn non_zip_urls_are_ignored() {
        let d = ReleaseDescriptor::from_download_urls(
            "1.0",
            [
                "https://example.com/a/windows.zip",
                "https://example.com/a/source.tar.gz",
                "Downloads:",
            ],
        );
        assert_eq!(d.assets.len(), 1);
        assert_eq!(d.assets[0].name, "windows.zip");
    }

    #[test]
    fn json_layout_uses_four_space_indent() {
        let d = ReleaseDescriptor::from_download_urls("1.2", ["https://x/y/macos.zip"]);
        let json = d.to_json_pretty().unwrap();
        assert!(json.starts_with("{\n    \"tag_name\": \"1.2\""), "{json}");
        assert!(json.contains("\"browser_download_url\": \"https://x/y/macos.zip\""));
    }

    #[test]
    fn corrupt_descriptor_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("current_version.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_at(&path).unwrap_err();
        assert!(err.to_string().contains("current_version.json"), "{err}");
    }

    #[test]
    fn descriptor_version_parses_tag() {
        let d = ReleaseDescriptor {
            tag_name: "0.12".to_string(),
            assets: vec![],
        };
        assert_eq!(d.version().unwrap(), Version::parse("0.12.0").unwrap());
    }
}
