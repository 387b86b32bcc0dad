//! GitHub contents API client
//!
//! Uses the repository contents endpoints as a makeshift data store:
//! directory listings come from `GET /repos/{owner}/{repo}/contents/{path}`
//! and every stored file is a commit created through `PUT` on the same URL.

use std::time::Duration;

use async_trait::async_trait;
use base64::prelude::*;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::core::config::GitHubStoreConfig;
use crate::core::error::AppError;
use crate::modules::storage::file_store::{
    CreatedFile, DirectoryEntry, FileStore, StoreError, StoreResult,
};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "FolioReportIntake/1.0 (failure-report-service)";

#[derive(Debug, Deserialize)]
struct CreateFileResponse {
    commit: CommitInfo,
}

#[derive(Debug, Deserialize)]
struct CommitInfo {
    sha: Option<String>,
    html_url: Option<String>,
}

/// Client for a single GitHub repository used as a file store
pub struct GitHubContentsClient {
    http_client: Client,
    api_url: String,
    raw_url: String,
    owner: String,
    repo: String,
    branch: String,
    token: String,
}

impl GitHubContentsClient {
    pub fn new(config: GitHubStoreConfig) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            raw_url: config.raw_url.trim_end_matches('/').to_string(),
            owner: config.owner,
            repo: config.repo,
            branch: config.branch,
            token: config.token,
        })
    }

    /// Repository in `owner/repo` form
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Branch used for listings and commits
    pub fn branch(&self) -> &str {
        &self.branch
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            urlencoding::encode(&self.owner),
            urlencoding::encode(&self.repo),
            encode_path(path)
        )
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }
}

#[async_trait]
impl FileStore for GitHubContentsClient {
    async fn list_directory(&self, path: &str, git_ref: &str) -> StoreResult<Vec<DirectoryEntry>> {
        let url = format!(
            "{}?ref={}",
            self.contents_url(path),
            urlencoding::encode(git_ref)
        );
        debug!("Listing '{}' at ref '{}'", path, git_ref);

        let response = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("GitHub listing request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, path, &body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("Listing body: {}", e)))?;

        parse_listing(body)
    }

    async fn create_file(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        branch: &str,
    ) -> StoreResult<CreatedFile> {
        let url = self.contents_url(path);
        let payload = json!({
            "message": message,
            "content": BASE64_STANDARD.encode(content),
            "branch": branch,
        });

        let response = self
            .request(reqwest::Method::PUT, &url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("GitHub create request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, path, &body));
        }

        let created: CreateFileResponse = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("Create file body: {}", e)))?;

        let operation_reference = created
            .commit
            .html_url
            .or(created.commit.sha)
            .ok_or_else(|| {
                StoreError::InvalidResponse("Commit has neither html_url nor sha".to_string())
            })?;

        debug!("Committed '{}' to {} ({})", path, branch, operation_reference);
        Ok(CreatedFile {
            operation_reference,
        })
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.raw_url,
            self.owner,
            self.repo,
            self.branch,
            encode_path(path)
        )
    }
}

/// Percent-encode each segment of a slash-separated repository path
fn encode_path(path: &str) -> String {
    path.trim_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Map a non-success status to a store error
fn classify_status(status: StatusCode, path: &str, body: &str) -> StoreError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| body.to_string());

    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound(path.to_string()),
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            StoreError::Conflict(format!("{}: {}", path, message))
        }
        _ => StoreError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Interpret a contents API body as a directory listing
///
/// The endpoint returns an object instead of an array when the path is a
/// file; that case lists nothing.
fn parse_listing(body: Value) -> StoreResult<Vec<DirectoryEntry>> {
    match body {
        Value::Array(_) => serde_json::from_value(body)
            .map_err(|e| StoreError::InvalidResponse(format!("Listing entries: {}", e))),
        _ => Ok(Vec::new()),
    }
}
