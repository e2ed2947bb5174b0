use async_trait::async_trait;
use base64::prelude::*;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{CreateRepositoryRequest, PutContentRequest, RemoteContent, RemoteRepository};
use crate::types::RepositoryDescriptor;
use crate::{PublishError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("archive-publisher/", env!("CARGO_PKG_VERSION"));

/// GitHub-style contents API over HTTP. The bearer token comes from the
/// caller; nothing here is hardcoded beyond header names.
pub struct GithubClient {
    http: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    id: u64,
    name: String,
    owner: OwnerResponse,
    private: bool,
    html_url: String,
    default_branch: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct OwnerResponse {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ContentEnvelope {
    content: RemoteContent,
}

impl RepoResponse {
    fn into_descriptor(self) -> RepositoryDescriptor {
        RepositoryDescriptor {
            id: self.id,
            name: self.name,
            owner: self.owner.login,
            private: self.private,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            updated_at: self.updated_at.unwrap_or_else(Utc::now),
            html_url: self.html_url,
            default_branch: self.default_branch.unwrap_or_else(|| "main".to_string()),
        }
    }
}

impl GithubClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_API_BASE)
    }

    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn request(&self, method: Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header(header::USER_AGENT, USER_AGENT)
    }

    fn transport(context: &str, err: reqwest::Error) -> PublishError {
        PublishError::Network {
            status: None,
            message: format!("{context}: {err}"),
        }
    }

    async fn check(context: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = format!("{context}: status {status}: {body}");
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PublishError::Auth(message),
            StatusCode::TOO_MANY_REQUESTS => PublishError::RateLimit(message),
            StatusCode::NOT_FOUND => PublishError::NotFound(message),
            _ => PublishError::Network {
                status: Some(status.as_u16()),
                message,
            },
        })
    }
}

#[async_trait]
impl RemoteRepository for GithubClient {
    async fn create_repository(
        &self,
        request: &CreateRepositoryRequest,
    ) -> Result<RepositoryDescriptor> {
        let url = format!("{}/user/repos", self.base_url);
        debug!(name = %request.name, "creating repository");
        let response = self
            .request(Method::POST, url)
            .json(request)
            .send()
            .await
            .map_err(|e| Self::transport("create repository", e))?;
        let response = Self::check("create repository", response).await?;
        let repo: RepoResponse = response
            .json()
            .await
            .map_err(|e| Self::transport("create repository", e))?;
        Ok(repo.into_descriptor())
    }

    async fn get_repository(&self, owner: &str, name: &str) -> Result<RepositoryDescriptor> {
        let url = format!("{}/repos/{owner}/{name}", self.base_url);
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| Self::transport("repository lookup", e))?;
        let response = Self::check("repository lookup", response).await?;
        let repo: RepoResponse = response
            .json()
            .await
            .map_err(|e| Self::transport("repository lookup", e))?;
        Ok(repo.into_descriptor())
    }

    async fn get_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Option<RemoteContent>> {
        let url = format!("{}/repos/{owner}/{repo}/contents/{path}", self.base_url);
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| Self::transport("content lookup", e))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check("content lookup", response).await?;
        let content: RemoteContent = response
            .json()
            .await
            .map_err(|e| Self::transport("content lookup", e))?;
        Ok(Some(content))
    }

    async fn put_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        request: &PutContentRequest,
    ) -> Result<RemoteContent> {
        let url = format!("{}/repos/{owner}/{repo}/contents/{path}", self.base_url);
        let mut body = json!({
            "message": request.message,
            "content": BASE64_STANDARD.encode(&request.content),
        });
        if let Some(sha) = &request.sha {
            body["sha"] = json!(sha);
        }
        let response = self
            .request(Method::PUT, url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::transport("content upload", e))?;
        let response = Self::check("content upload", response).await?;
        let envelope: ContentEnvelope = response
            .json()
            .await
            .map_err(|e| Self::transport("content upload", e))?;
        Ok(envelope.content)
    }
}
