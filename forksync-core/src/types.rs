//! Domain types shared by every forksync crate.
//!
//! All path fields use `PathBuf`; excluded paths are always repository-relative.

use std::cmp::Ordering;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, VersionError};

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// A dotted numeric version (`1`, `1.0`, `1.2.3`, ...).
///
/// Ordering is component-wise numeric; missing trailing components count as
/// zero, so `1.0` and `1.0.0` compare (and test) equal.
#[derive(Debug, Clone)]
pub struct Version {
    text: String,
    components: Vec<u64>,
}

impl Version {
    /// Parse a version string. Only digits and dots are accepted; a tag such
    /// as `v1.2` is malformed.
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        let body = s.trim();
        if body.is_empty() {
            return Err(VersionError::InvalidFormat(s.to_string()));
        }

        let mut components = Vec::new();
        for part in body.split('.') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionError::InvalidFormat(s.to_string()));
            }
            let n = part
                .parse::<u64>()
                .map_err(|_| VersionError::InvalidFormat(s.to_string()))?;
            components.push(n);
        }

        Ok(Self {
            text: body.to_string(),
            components,
        })
    }

    /// Numeric components as parsed.
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// The textual form, surrounding whitespace removed.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.text.fmt(f)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Version::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// RepoSlug
// ---------------------------------------------------------------------------

/// `owner/name` identifier of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let mut parts = s.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(ConfigError::InvalidRepo(s.to_string())),
        }
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSlug {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for RepoSlug {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RepoSlug {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RepoSlug::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// ExcludedPathSet
// ---------------------------------------------------------------------------

/// Repository-relative paths that identify the fork and survive every
/// upstream merge.
///
/// Always non-empty and always contains the release-metadata file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedPathSet {
    paths: Vec<PathBuf>,
}

impl ExcludedPathSet {
    /// Build the set, preserving first-seen order and dropping duplicates.
    ///
    /// `release_file` must be one of the entries; otherwise every published
    /// release would look like an upstream change on the next run.
    pub fn new<I, P>(paths: I, release_file: &Path) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut out: Vec<PathBuf> = Vec::new();
        for p in paths {
            let p = p.into();
            validate_relative(&p)?;
            if !out.iter().any(|existing| same_path(existing, &p)) {
                out.push(p);
            }
        }

        if out.is_empty() {
            return Err(ConfigError::EmptyExcludedPaths);
        }
        if !out.iter().any(|p| same_path(p, release_file)) {
            return Err(ConfigError::ReleaseFileNotExcluded {
                release_file: release_file.to_path_buf(),
            });
        }
        Ok(Self { paths: out })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| same_path(p, path))
    }
}

impl<'a> IntoIterator for &'a ExcludedPathSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

fn validate_relative(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::InvalidExcludedPath {
            path: path.to_path_buf(),
            reason: "empty path",
        });
    }
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(ConfigError::InvalidExcludedPath {
                    path: path.to_path_buf(),
                    reason: "must not contain `..`",
                })
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ConfigError::InvalidExcludedPath {
                    path: path.to_path_buf(),
                    reason: "must be repository-relative",
                })
            }
        }
    }
    Ok(())
}

// `.github/` and `.github` name the same entry.
fn same_path(a: &Path, b: &Path) -> bool {
    a.components().eq(b.components())
}

// ---------------------------------------------------------------------------
// GitIdentity
// ---------------------------------------------------------------------------

/// Author identity used for commits made by the sync bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitIdentity {
    pub login: String,
    pub email: String,
}

impl Default for GitIdentity {
    fn default() -> Self {
        Self {
            login: "FriendsOfGalaxyBot".to_string(),
            email: "FriendsOfGalaxy+bot@gmail.com".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn version_parse_and_display() {
        assert_eq!(v("1.2.3").components(), &[1, 2, 3]);
        assert_eq!(v("0.10").to_string(), "0.10");
        assert_eq!(v(" 7 ").components(), &[7]);
    }

    #[test]
    fn version_rejects_malformed_input() {
        for bad in ["", "v", "v1.2", "V3", "1..2", ".1", "1.", "1.a", "1.2-beta", "-1", "1 .2"] {
            assert!(Version::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn version_numeric_not_lexical_ordering() {
        assert!(v("1.10") > v("1.9"));
        assert!(v("0.2") < v("0.10"));
        assert!(v("2") > v("1.99.99"));
    }

    #[test]
    fn trailing_zero_components_compare_equal() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1"), v("1.0"));
        assert!(v("1.0.1") > v("1.0"));
    }

    #[test]
    fn version_serde_as_string() {
        let json = serde_json::to_string(&v("3.4")).unwrap();
        assert_eq!(json, "\"3.4\"");
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v("3.4"));
        assert!(serde_json::from_str::<Version>("\"x.y\"").is_err());
    }

    #[test]
    fn repo_slug_parse() {
        let slug = RepoSlug::parse("FriendsOfGalaxy/galaxy-integration-steam").unwrap();
        assert_eq!(slug.owner, "FriendsOfGalaxy");
        assert_eq!(slug.name, "galaxy-integration-steam");
        assert_eq!(slug.full_name(), "FriendsOfGalaxy/galaxy-integration-steam");
        assert!(RepoSlug::parse("no-slash").is_err());
        assert!(RepoSlug::parse("a/b/c").is_err());
        assert!(RepoSlug::parse("/b").is_err());
    }

    #[test]
    fn excluded_paths_dedup_preserves_order() {
        let set = ExcludedPathSet::new(
            ["README.md", ".github/", ".github", "current_version.json"],
            Path::new("current_version.json"),
        )
        .unwrap();
        assert_eq!(
            set.as_slice(),
            &[
                PathBuf::from("README.md"),
                PathBuf::from(".github/"),
                PathBuf::from("current_version.json"),
            ]
        );
        assert!(set.contains(Path::new(".github")));
    }

    #[test]
    fn excluded_paths_require_release_file() {
        let err = ExcludedPathSet::new(["README.md"], Path::new("current_version.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ReleaseFileNotExcluded { .. }));
    }

    #[test]
    fn excluded_paths_reject_empty_and_escaping_entries() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            ExcludedPathSet::new(empty, Path::new("current_version.json")),
            Err(ConfigError::EmptyExcludedPaths)
        ));
        assert!(ExcludedPathSet::new(
            ["../x", "current_version.json"],
            Path::new("current_version.json")
        )
        .is_err());
        assert!(ExcludedPathSet::new(
            ["/etc/passwd", "current_version.json"],
            Path::new("current_version.json")
        )
        .is_err());
    }
}
