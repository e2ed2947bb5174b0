mod client;

pub use client::{GithubClient, DEFAULT_API_BASE};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::RepositoryDescriptor;
use crate::Result;

#[derive(Debug, Clone, Serialize)]
pub struct CreateRepositoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub private: bool,
    pub auto_init: bool,
}

/// Identity of the current remote version of a file, needed to update it
/// without a conflict.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteContent {
    pub path: String,
    pub sha: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct PutContentRequest {
    pub message: String,
    /// Raw payload; the transport encodes it.
    pub content: Vec<u8>,
    /// Required when updating an existing file.
    pub sha: Option<String>,
}

/// The remote repository API the pipeline drives. Implemented over HTTP by
/// `GithubClient`; tests substitute their own.
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    async fn create_repository(
        &self,
        request: &CreateRepositoryRequest,
    ) -> Result<RepositoryDescriptor>;

    /// Doubles as the readiness probe after creation.
    async fn get_repository(&self, owner: &str, name: &str) -> Result<RepositoryDescriptor>;

    /// `Ok(None)` when the path does not exist remotely; any other failure
    /// propagates.
    async fn get_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Option<RemoteContent>>;

    async fn put_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        request: &PutContentRequest,
    ) -> Result<RemoteContent>;
}
