//! [`VersionOracle`] reading the local checkout and the GitHub contents API.

use std::collections::VecDeque;
use std::path::Path;

use forksync_core::{manifest, RepoSlug, Version};
use forksync_sync::oracle::local_manifest_version;
use forksync_sync::{OracleError, VersionOracle};

use crate::client::GithubClient;
use crate::models::{ContentEntry, ContentKind};

pub struct GithubOracle {
    client: GithubClient,
    manifest_name: String,
}

impl GithubOracle {
    pub fn new(client: GithubClient, manifest_name: impl Into<String>) -> Self {
        Self {
            client,
            manifest_name: manifest_name.into(),
        }
    }

    /// Breadth-first search of `repo` at `git_ref` for a file named
    /// `file_name`; the shallowest match wins, siblings in listing order.
    pub fn locate_remote(
        &self,
        repo: &RepoSlug,
        git_ref: &str,
        file_name: &str,
    ) -> Result<Option<String>, OracleError> {
        let mut queue = VecDeque::from([String::new()]);
        while let Some(dir) = queue.pop_front() {
            let path = format!("repos/{}/contents/{dir}", repo.full_name());
            let entries: Vec<ContentEntry> = self.client.get(&path, &[("ref", git_ref)])?;
            for entry in entries {
                match entry.kind {
                    ContentKind::File if entry.name == file_name => {
                        tracing::info!(path = %entry.path, %repo, "found remote manifest");
                        return Ok(Some(entry.path));
                    }
                    ContentKind::Dir => queue.push_back(entry.path),
                    _ => {}
                }
            }
        }
        Ok(None)
    }
}

impl VersionOracle for GithubOracle {
    fn read_local_version(&self, path: &Path) -> Result<Version, OracleError> {
        local_manifest_version(path, &self.manifest_name)
    }

    /// `path` is either a repository path or a bare file name to search for.
    fn read_remote_version(
        &self,
        repo: &RepoSlug,
        git_ref: &str,
        path: &str,
    ) -> Result<Version, OracleError> {
        let located = if path.contains('/') {
            path.to_string()
        } else {
            self.locate_remote(repo, git_ref, path)?.ok_or_else(|| {
                OracleError::NotFound(format!("no {path} in {repo} at {git_ref}"))
            })?
        };

        let contents = self
            .client
            .get_raw(
                &format!("repos/{}/contents/{located}", repo.full_name()),
                &[("ref", git_ref)],
            )?
            .ok_or_else(|| OracleError::NotFound(format!("{located} in {repo} at {git_ref}")))?;

        Ok(manifest::version_from_json(Path::new(&located), &contents)?)
    }
}
