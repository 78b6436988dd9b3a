//! Blocking GitHub REST client.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::GithubError;

const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";
const USER_AGENT: &str = concat!("forksync/", env!("CARGO_PKG_VERSION"));

/// Shared `ureq` agent bound to one API root and token.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct GithubClient {
    agent: ureq::Agent,
    api_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

impl GithubClient {
    pub fn new(api_url: &str, token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: &str, url: &str, accept: &str) -> ureq::Request {
        let req = self.agent.request(method, url).set("Accept", accept);
        match &self.token {
            Some(token) => req.set("Authorization", &format!("token {token}")),
            None => req,
        }
    }

    /// GET `path` and decode the JSON body.
    pub fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, GithubError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let mut req = self.request("GET", &url, JSON_MEDIA_TYPE);
        for (k, v) in query {
            req = req.query(k, v);
        }
        let resp = req.call().map_err(|e| map_ureq_error(&url, e))?;
        decode(&url, resp)
    }

    /// Like [`get`](Self::get), with 404 mapped to `None`.
    pub fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, GithubError> {
        match self.get(path, query) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Raw file contents, `None` on 404.
    pub fn get_raw(&self, path: &str, query: &[(&str, &str)]) -> Result<Option<String>, GithubError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET raw");
        let mut req = self.request("GET", &url, RAW_MEDIA_TYPE);
        for (k, v) in query {
            req = req.query(k, v);
        }
        match req.call() {
            Ok(resp) => resp
                .into_string()
                .map(Some)
                .map_err(|e| GithubError::Decode {
                    url,
                    message: e.to_string(),
                }),
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(e) => Err(map_ureq_error(&url, e)),
        }
    }

    /// Send `body` as JSON with `method` and decode the JSON response.
    pub fn send<B, T>(&self, method: &str, path: &str, body: &B) -> Result<T, GithubError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let resp = self.send_raw(method, path, body)?;
        decode(&self.url(path), resp)
    }

    /// Send `body` as JSON and ignore the response body.
    pub fn send_discard<B: Serialize>(
        &self,
        method: &str,
        path: &str,
        body: &B,
    ) -> Result<(), GithubError> {
        self.send_raw(method, path, body).map(|_| ())
    }

    fn send_raw<B: Serialize>(
        &self,
        method: &str,
        path: &str,
        body: &B,
    ) -> Result<ureq::Response, GithubError> {
        let url = self.url(path);
        tracing::debug!(%url, method, "sending");
        self.request(method, &url, JSON_MEDIA_TYPE)
            .send_json(body)
            .map_err(|e| map_ureq_error(&url, e))
    }

    /// DELETE `path`. Returns `false` when the resource did not exist.
    pub fn delete(&self, path: &str) -> Result<bool, GithubError> {
        let url = self.url(path);
        tracing::debug!(%url, "DELETE");
        match self.request("DELETE", &url, JSON_MEDIA_TYPE).call() {
            Ok(_) => Ok(true),
            // Deleting a missing git ref answers 422 "Reference does not exist".
            Err(ureq::Error::Status(404 | 422, _)) => Ok(false),
            Err(e) => Err(map_ureq_error(&url, e)),
        }
    }
}

fn decode<T: DeserializeOwned>(url: &str, resp: ureq::Response) -> Result<T, GithubError> {
    resp.into_json().map_err(|e| GithubError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

fn map_ureq_error(url: &str, err: ureq::Error) -> GithubError {
    match err {
        ureq::Error::Status(status, resp) => {
            let body = resp.into_string().unwrap_or_default();
            let message = serde_json::from_str::<ApiMessage>(&body)
                .map(|m| m.message)
                .unwrap_or(body);
            tracing::warn!(status, %url, %message, "GitHub API error");
            GithubError::Status {
                status,
                url: url.to_string(),
                message,
            }
        }
        ureq::Error::Transport(t) => GithubError::Transport {
            url: url.to_string(),
            message: t.to_string(),
        },
    }
}
