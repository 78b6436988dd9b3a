//! GitHub REST implementations of the sync seams.
//!
//! - [`GithubClient`]: blocking `ureq` agent with auth headers and error mapping
//! - [`GithubHost`]: pull requests and branch refs on the fork ([`ReviewHost`])
//! - [`GithubOracle`]: local manifest plus remote contents walk ([`VersionOracle`])
//! - [`fork`]: parent lookup, release branch, license and release assets
//!
//! [`ReviewHost`]: forksync_sync::ReviewHost
//! [`VersionOracle`]: forksync_sync::VersionOracle

pub mod client;
pub mod error;
pub mod fork;
pub mod host;
pub mod models;
pub mod oracle;

pub use client::GithubClient;
pub use error::GithubError;
pub use fork::{push_url, release_descriptor, resolve_fork, RELEASE_BRANCH};
pub use host::GithubHost;
pub use oracle::GithubOracle;
