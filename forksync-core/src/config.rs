//! Per-fork YAML configuration.
//!
//! A fork is described by one `forksync.yaml`, loaded once at process start
//! and passed by reference to everything that needs it.
//!
//! ```yaml
//! fork: FriendsOfGalaxy/galaxy-integration-steam
//! upstream: someone/galaxy-plugin-steam   # optional, defaults to the fork's parent
//! excluded_paths: [README.md, .github/, current_version.json]
//! ```
//!
//! Every other field has a default matching the conventions of the
//! integration forks (`master` base, `autoupdate` integration branch, ...).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{config_io_err, ConfigError};
use crate::types::{ExcludedPathSet, GitIdentity, RepoSlug};

/// Default file name looked up in the repository root.
pub const CONFIG_FILE_NAME: &str = "forksync.yaml";

pub const DEFAULT_RELEASE_FILE: &str = "current_version.json";
pub const DEFAULT_MANIFEST_NAME: &str = "manifest.json";

/// Static settings for one integration fork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkConfig {
    /// The fork on the host (`owner/name`).
    pub fork: RepoSlug,
    /// Upstream repository; resolved from the fork's parent when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<RepoSlug>,
    /// Upstream branch that carries releases; resolved on the host when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_branch: Option<String>,
    /// Directory (relative to the repository root) searched for the manifest.
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,
    #[serde(default = "default_manifest_name")]
    pub manifest_name: String,
    /// Release-tracking descriptor written after each publish.
    #[serde(default = "default_release_file")]
    pub release_file: PathBuf,
    #[serde(default = "default_base_branch")]
    pub base_branch: String,
    #[serde(default = "default_integration_branch")]
    pub integration_branch: String,
    #[serde(default = "default_fork_remote")]
    pub fork_remote: String,
    // Leading underscore keeps `hub` from picking this remote up as the
    // default push target.
    #[serde(default = "default_upstream_remote")]
    pub upstream_remote: String,
    #[serde(default = "default_excluded_paths")]
    pub excluded_paths: Vec<PathBuf>,
    #[serde(default = "default_review_label")]
    pub review_label: String,
    #[serde(default = "default_merge_message")]
    pub merge_message: String,
    #[serde(default = "default_allowed_licenses")]
    pub allowed_licenses: Vec<String>,
    #[serde(default)]
    pub bot: GitIdentity,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_source_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_manifest_name() -> String {
    DEFAULT_MANIFEST_NAME.to_string()
}
fn default_release_file() -> PathBuf {
    PathBuf::from(DEFAULT_RELEASE_FILE)
}
fn default_base_branch() -> String {
    "master".to_string()
}
fn default_integration_branch() -> String {
    "autoupdate".to_string()
}
fn default_fork_remote() -> String {
    "origin".to_string()
}
fn default_upstream_remote() -> String {
    "_upstream".to_string()
}
fn default_excluded_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("README.md"),
        PathBuf::from(".github/"),
        PathBuf::from(DEFAULT_RELEASE_FILE),
    ]
}
fn default_review_label() -> String {
    "autoupdate".to_string()
}
fn default_merge_message() -> String {
    "Merge upstream".to_string()
}
fn default_allowed_licenses() -> Vec<String> {
    vec!["mit".to_string(), "gpl-3.0".to_string()]
}
fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

impl ForkConfig {
    /// Configuration with every optional field at its default.
    pub fn new(fork: RepoSlug) -> Self {
        Self {
            fork,
            upstream: None,
            release_branch: None,
            source_root: default_source_root(),
            manifest_name: default_manifest_name(),
            release_file: default_release_file(),
            base_branch: default_base_branch(),
            integration_branch: default_integration_branch(),
            fork_remote: default_fork_remote(),
            upstream_remote: default_upstream_remote(),
            excluded_paths: default_excluded_paths(),
            review_label: default_review_label(),
            merge_message: default_merge_message(),
            allowed_licenses: default_allowed_licenses(),
            bot: GitIdentity::default(),
            api_url: default_api_url(),
        }
    }

    /// Validated excluded path set (non-empty, contains the release file).
    pub fn excluded_path_set(&self) -> Result<ExcludedPathSet, ConfigError> {
        ExcludedPathSet::new(self.excluded_paths.iter().cloned(), &self.release_file)
    }

    /// `<fork_remote>/<base_branch>`, the ref excluded paths are restored from.
    pub fn base_ref(&self) -> String {
        format!("{}/{}", self.fork_remote, self.base_branch)
    }

    /// Commit message used when recording a release descriptor.
    pub fn release_commit_message(&self) -> String {
        format!("Updated {}", self.release_file.display())
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required: [(&'static str, &str); 7] = [
            ("base_branch", &self.base_branch),
            ("integration_branch", &self.integration_branch),
            ("fork_remote", &self.fork_remote),
            ("upstream_remote", &self.upstream_remote),
            ("manifest_name", &self.manifest_name),
            ("merge_message", &self.merge_message),
            ("api_url", &self.api_url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField { field });
            }
        }
        if self.base_branch == self.integration_branch {
            return Err(ConfigError::BranchCollision(self.base_branch.clone()));
        }
        self.excluded_path_set()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// `<repo_dir>/forksync.yaml`. Pure, no I/O.
pub fn config_path_at(repo_dir: &Path) -> PathBuf {
    repo_dir.join(CONFIG_FILE_NAME)
}

/// Load and validate a config file.
///
/// Returns `ConfigError::NotFound` if absent and `ConfigError::Parse`
/// (with path + line context) if malformed.
pub fn load_at(path: &Path) -> Result<ForkConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| config_io_err(path, e))?;
    let config: ForkConfig = serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    config.validate()?;
    Ok(config)
}

/// Atomically save a config: serialize → `.tmp` sibling → `chmod 0600` → rename.
pub fn save_at(path: &Path, config: &ForkConfig) -> Result<(), ConfigError> {
    config.validate()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| config_io_err(parent, e))?;
    }
    let tmp = path.with_extension("yaml.tmp");
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp, yaml).map_err(|e| config_io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(config_io_err(path, e));
    }
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| config_io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
