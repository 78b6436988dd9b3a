//! Subsets of GitHub REST payloads the sync flow reads.

use serde::{Deserialize, Serialize};

use forksync_sync::ReviewRequest;

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: String,
    pub default_branch: String,
    pub clone_url: String,
    /// Present only for forks.
    #[serde(default)]
    pub parent: Option<Box<Repository>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
}

impl From<PullRequest> for ReviewRequest {
    fn from(pr: PullRequest) -> Self {
        ReviewRequest {
            number: pr.number,
            title: pr.title,
            url: pr.html_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePull<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub base: &'a str,
    pub head: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// One entry of a directory listing from the contents API.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LicenseResponse {
    pub license: Option<LicenseInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LicenseInfo {
    pub key: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAssetEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAssetEntry {
    pub name: String,
    pub browser_download_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_fork_with_parent() {
        let json = r#"{
            "full_name": "FriendsOfGalaxy/galaxy-integration-demo",
            "default_branch": "master",
            "clone_url": "https://github.com/FriendsOfGalaxy/galaxy-integration-demo.git",
            "fork": true,
            "parent": {
                "full_name": "someone/galaxy-plugin-demo",
                "default_branch": "main",
                "clone_url": "https://github.com/someone/galaxy-plugin-demo.git"
            }
        }"#;
        let repo: Repository = serde_json::from_str(json).unwrap();
        let parent = repo.parent.unwrap();
        assert_eq!(parent.full_name, "someone/galaxy-plugin-demo");
        assert_eq!(parent.default_branch, "main");
        assert!(parent.parent.is_none());
    }

    #[test]
    fn decodes_directory_listing() {
        let json = r#"[
            {"name": "src", "path": "src", "type": "dir", "sha": "a"},
            {"name": "README.md", "path": "README.md", "type": "file", "sha": "b"},
            {"name": "lib", "path": "lib", "type": "submodule", "sha": "c"}
        ]"#;
        let entries: Vec<ContentEntry> = serde_json::from_str(json).unwrap();
        let kinds: Vec<ContentKind> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ContentKind::Dir, ContentKind::File, ContentKind::Submodule]
        );
    }

    #[test]
    fn pull_request_maps_to_review_request() {
        let json = r#"{"number": 12, "title": "Version 1.2", "html_url": "https://github.com/o/r/pull/12", "state": "open"}"#;
        let pr: PullRequest = serde_json::from_str(json).unwrap();
        let request = ReviewRequest::from(pr);
        assert_eq!(request.number, 12);
        assert_eq!(request.url, "https://github.com/o/r/pull/12");
    }

    #[test]
    fn decodes_release_and_missing_license() {
        let release: Release = serde_json::from_str(
            r#"{"tag_name": "1.2", "assets": [{"name": "windows.zip", "browser_download_url": "https://x/windows.zip", "size": 3}]}"#,
        )
        .unwrap();
        assert_eq!(release.assets[0].name, "windows.zip");

        let license: LicenseResponse = serde_json::from_str(r#"{"license": null}"#).unwrap();
        assert!(license.license.is_none());
    }
}
