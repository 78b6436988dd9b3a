//! [`ReviewHost`] backed by the fork's pull requests and git refs.

use serde_json::json;

use forksync_core::RepoSlug;
use forksync_sync::{HostError, NewReviewRequest, ReviewHost, ReviewRequest};

use crate::client::GithubClient;
use crate::models::{CreatePull, GitRef, PullRequest};

pub struct GithubHost {
    client: GithubClient,
    fork: RepoSlug,
}

impl GithubHost {
    pub fn new(client: GithubClient, fork: RepoSlug) -> Self {
        Self { client, fork }
    }

    fn repo_path(&self, rest: &str) -> String {
        format!("repos/{}/{rest}", self.fork.full_name())
    }
}

impl ReviewHost for GithubHost {
    fn find_open_request(
        &self,
        base: &str,
        head: &str,
    ) -> Result<Option<ReviewRequest>, HostError> {
        // The pulls API wants `owner:branch` to filter by head.
        let head_filter = format!("{}:{head}", self.fork.owner);
        let pulls: Vec<PullRequest> = self.client.get(
            &self.repo_path("pulls"),
            &[("state", "open"), ("base", base), ("head", &head_filter)],
        )?;
        match pulls.len() {
            0 => Ok(None),
            1 => Ok(pulls.into_iter().next().map(ReviewRequest::from)),
            count => Err(HostError::DuplicateRequests {
                base: base.to_string(),
                head: head.to_string(),
                count,
            }),
        }
    }

    fn update_title(&self, request: &ReviewRequest, title: &str) -> Result<(), HostError> {
        let path = self.repo_path(&format!("pulls/{}", request.number));
        self.client
            .send_discard("PATCH", &path, &json!({ "title": title }))?;
        tracing::info!(number = request.number, %title, "updated pull request title");
        Ok(())
    }

    fn create_request(&self, request: &NewReviewRequest) -> Result<ReviewRequest, HostError> {
        let pr: PullRequest = self.client.send(
            "POST",
            &self.repo_path("pulls"),
            &CreatePull {
                title: &request.title,
                body: &request.body,
                base: &request.base,
                head: &request.head,
            },
        )?;
        tracing::info!(number = pr.number, url = %pr.html_url, "created pull request");

        if !request.labels.is_empty() {
            let path = self.repo_path(&format!("issues/{}/labels", pr.number));
            self.client
                .send_discard("PUT", &path, &json!({ "labels": request.labels }))?;
        }
        Ok(pr.into())
    }

    fn branch_exists(&self, branch: &str) -> Result<bool, HostError> {
        let path = self.repo_path(&format!("git/ref/heads/{branch}"));
        let found: Option<GitRef> = self.client.get_optional(&path, &[])?;
        Ok(found.is_some())
    }

    fn delete_branch(&self, branch: &str) -> Result<(), HostError> {
        let path = self.repo_path(&format!("git/refs/heads/{branch}"));
        if self.client.delete(&path)? {
            tracing::info!(%branch, fork = %self.fork, "deleted fork branch");
        } else {
            tracing::debug!(%branch, "branch already absent");
        }
        Ok(())
    }
}
