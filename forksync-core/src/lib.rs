//! forksync core library: domain types, fork configuration, release
//! descriptor and local manifest discovery.
//!
//! - [`types`]: `Version`, `RepoSlug`, `ExcludedPathSet`, `GitIdentity`
//! - [`config`]: `ForkConfig` load / save / validate
//! - [`release`]: `current_version.json` descriptor
//! - [`manifest`]: locate `manifest.json`, read its version
//! - [`error`]: [`ConfigError`], [`CoreError`], [`VersionError`]

pub mod config;
pub mod error;
pub mod manifest;
pub mod release;
pub mod types;

pub use config::ForkConfig;
pub use error::{ConfigError, CoreError, VersionError};
pub use release::{ReleaseAsset, ReleaseDescriptor};
pub use types::{ExcludedPathSet, GitIdentity, RepoSlug, Version};
