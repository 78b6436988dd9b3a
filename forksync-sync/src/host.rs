//! Review-request host interface.

use serde::Serialize;

use crate::error::HostError;

/// An open request to merge `head` into `base`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRequest {
    pub number: u64,
    pub title: String,
    pub url: String,
}

/// Parameters for a new review request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReviewRequest {
    pub base: String,
    pub head: String,
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// Host that tracks review requests and the fork's remote branches.
pub trait ReviewHost {
    /// The single open request from `head` into `base`, if any.
    ///
    /// Implementations return [`HostError::DuplicateRequests`] when more than
    /// one is open.
    fn find_open_request(&self, base: &str, head: &str)
        -> Result<Option<ReviewRequest>, HostError>;

    fn update_title(&self, request: &ReviewRequest, title: &str) -> Result<(), HostError>;

    fn create_request(&self, request: &NewReviewRequest) -> Result<ReviewRequest, HostError>;

    /// Whether `branch` exists on the fork's remote.
    fn branch_exists(&self, branch: &str) -> Result<bool, HostError>;

    /// Delete `branch` on the fork's remote. Deleting a missing branch is not
    /// an error.
    fn delete_branch(&self, branch: &str) -> Result<(), HostError>;
}
