pub mod summary;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::PublishOptions;
use crate::extract::sanitize;
use crate::remote::{CreateRepositoryRequest, RemoteRepository};
use crate::types::{ExtractionResult, PublicationResult, RepositoryDescriptor};
use crate::upload::{with_retry, BatchUploader, RateLimiter, RetryConfig};
use crate::{PublishError, Result};

/// Stages a run moves through, strictly forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    Validating,
    Creating,
    AwaitingReady,
    Uploading,
    SummaryUpload,
    Completed,
    Failed,
}

#[derive(Debug, Clone)]
pub struct PublishReport {
    pub repository: RepositoryDescriptor,
    pub result: PublicationResult,
    pub elapsed: Duration,
    /// One human-readable line about the run.
    pub summary: String,
}

/// Drives a full publication: provision the repository, wait for it to
/// become queryable, batch-upload the files, optionally push a summary
/// document, and aggregate the outcome. Holds no state across runs.
pub struct RepositoryPublisher {
    api: Arc<dyn RemoteRepository>,
    options: PublishOptions,
}

impl RepositoryPublisher {
    pub fn new(api: Arc<dyn RemoteRepository>, options: PublishOptions) -> Self {
        Self { api, options }
    }

    pub async fn publish(&self, extraction: &ExtractionResult) -> Result<PublishReport> {
        match self.run(extraction).await {
            Ok(report) => Ok(report),
            Err(e) => {
                let state = PublishState::Failed;
                debug!(?state, error = %e, "publication aborted");
                Err(e)
            }
        }
    }

    async fn run(&self, extraction: &ExtractionResult) -> Result<PublishReport> {
        let started = Instant::now();

        let mut state = PublishState::Validating;
        debug!(?state, folder = %extraction.folder_name, "starting publication");
        let repo_name = sanitize::sanitize_repo_name(&extraction.folder_name)?;
        if extraction.files.is_empty() {
            return Err(PublishError::Validation(
                "archive contains no publishable files".to_string(),
            ));
        }

        let limiter = Arc::new(RateLimiter::new(self.options.rate_limit_delay));
        let retry = RetryConfig::new(self.options.max_retries, self.options.base_retry_delay);
        let uploader = BatchUploader::new(
            Arc::clone(&self.api),
            Arc::clone(&limiter),
            self.options.clone(),
        );

        state = PublishState::Creating;
        debug!(?state, name = %repo_name, "creating repository");
        let request = CreateRepositoryRequest {
            name: repo_name,
            description: self.options.description.clone(),
            private: self.options.private,
            auto_init: false,
        };
        let repository =
            with_retry(&retry, &limiter, || self.api.create_repository(&request)).await?;
        info!(url = %repository.html_url, "repository created");

        state = PublishState::AwaitingReady;
        debug!(?state, "waiting for repository to become queryable");
        self.await_ready(&repository).await?;

        state = PublishState::Uploading;
        debug!(?state, files = extraction.files.len(), "uploading files");
        let result = uploader
            .publish(&repository.owner, &repository.name, &extraction.files)
            .await;

        if self.options.create_readme {
            state = PublishState::SummaryUpload;
            debug!(?state, "uploading summary document");
            let readme = summary::render_summary(extraction);
            if let Err(e) = uploader
                .upload_file(
                    &repository.owner,
                    &repository.name,
                    summary::SUMMARY_FILE_NAME,
                    readme.as_bytes(),
                    Some(summary::SUMMARY_COMMIT_MESSAGE),
                )
                .await
            {
                // Best effort only; a failed summary never fails the run.
                warn!(error = %e, "summary upload failed");
            }
        }

        state = PublishState::Completed;
        let elapsed = started.elapsed();
        let summary = format!(
            "published {}/{} files to {} in {:.1}s ({} failed, {} skipped)",
            result.success_count,
            result.details.len(),
            repository.html_url,
            elapsed.as_secs_f64(),
            result.failed_count,
            result.skipped_count,
        );
        info!(?state, %summary, "publication finished");

        Ok(PublishReport {
            repository,
            result,
            elapsed,
            summary,
        })
    }

    /// Polls the repository lookup at a fixed interval until it answers or
    /// the wall-clock budget runs out. "Not found yet" keeps polling.
    async fn await_ready(&self, repository: &RepositoryDescriptor) -> Result<()> {
        let deadline = Instant::now() + self.options.readiness_timeout;
        loop {
            match self
                .api
                .get_repository(&repository.owner, &repository.name)
                .await
            {
                Ok(_) => return Ok(()),
                Err(PublishError::NotFound(_)) => {
                    debug!(name = %repository.name, "repository not ready yet");
                }
                Err(e) if e.is_retryable() => {
                    debug!(error = %e, "readiness probe failed, will retry");
                }
                Err(e) => return Err(e),
            }
            if Instant::now() + self.options.readiness_poll_interval > deadline {
                return Err(PublishError::Timeout(format!(
                    "repository {} not ready within {:?}",
                    repository.name, self.options.readiness_timeout
                )));
            }
            sleep(self.options.readiness_poll_interval).await;
        }
    }
}
