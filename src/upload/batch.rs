use std::sync::Arc;

use futures::future::join_all;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::rate_limit::RateLimiter;
use super::retry::{with_retry, RetryConfig};
use crate::config::PublishOptions;
use crate::remote::{PutContentRequest, RemoteRepository};
use crate::types::{file_extension, FileRecord, PublicationResult, UploadOutcome, UploadStatus};
use crate::Result;

/// Publishes a file list in fixed-size batches: batches run strictly in
/// order, files inside a batch upload concurrently, every call goes through
/// the shared rate limiter and the retry wrapper.
pub struct BatchUploader {
    api: Arc<dyn RemoteRepository>,
    limiter: Arc<RateLimiter>,
    retry: RetryConfig,
    options: PublishOptions,
}

impl BatchUploader {
    pub fn new(
        api: Arc<dyn RemoteRepository>,
        limiter: Arc<RateLimiter>,
        options: PublishOptions,
    ) -> Self {
        let retry = RetryConfig::new(options.max_retries, options.base_retry_delay);
        Self {
            api,
            limiter,
            retry,
            options,
        }
    }

    /// Reason to exclude `record` from the upload, if any. Excluded files
    /// are counted as skipped and never attempted.
    fn skip_reason(&self, record: &FileRecord) -> Option<String> {
        if let Some(max) = self.options.max_file_size {
            if record.size > max {
                return Some(format!("file exceeds the maximum of {max} bytes"));
            }
        }
        if let Some(allowed) = &self.options.allowed_extensions {
            // Same no-extension rule as the statistics histogram: a dotfile
            // has no extension and never matches the allow list.
            let permitted = file_extension(&record.name)
                .map(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
                .unwrap_or(false);
            if !permitted {
                return Some("extension is not in the allowed list".to_string());
            }
        }
        None
    }

    pub async fn publish(
        &self,
        owner: &str,
        repo: &str,
        files: &[FileRecord],
    ) -> PublicationResult {
        // Deterministic commit order: (directory, name), skipped files
        // keeping their place in the details list.
        let mut sorted: Vec<&FileRecord> = files.iter().collect();
        sorted.sort_by(|a, b| {
            (a.directory.as_str(), a.name.as_str()).cmp(&(b.directory.as_str(), b.name.as_str()))
        });

        let mut slots: Vec<Option<UploadOutcome>> = vec![None; sorted.len()];
        let mut pending: Vec<(usize, &FileRecord)> = Vec::new();
        for (slot, &record) in sorted.iter().enumerate() {
            match self.skip_reason(record) {
                Some(reason) => {
                    debug!(path = %record.path, %reason, "skipping file");
                    slots[slot] = Some(UploadOutcome {
                        path: record.path.clone(),
                        status: UploadStatus::Skipped,
                        size: record.size,
                        error: None,
                    });
                }
                None => pending.push((slot, record)),
            }
        }

        let batch_size = self.options.batch_size.max(1);
        let total_batches = pending.len().div_ceil(batch_size);
        for (batch_index, batch) in pending.chunks(batch_size).enumerate() {
            if batch_index > 0 {
                // Extra breather between batches, on top of the per-call
                // rate limiting.
                sleep(self.options.rate_limit_delay).await;
            }
            info!(
                batch = batch_index + 1,
                total_batches,
                files = batch.len(),
                "uploading batch"
            );
            let outcomes =
                join_all(batch.iter().map(|&(_, record)| self.upload_record(owner, repo, record)))
                    .await;
            for ((slot, _), outcome) in batch.iter().zip(outcomes) {
                slots[*slot] = Some(outcome);
            }
        }

        let mut result = PublicationResult::default();
        for outcome in slots.into_iter().flatten() {
            result.record(outcome);
        }
        result
    }

    async fn upload_record(&self, owner: &str, repo: &str, record: &FileRecord) -> UploadOutcome {
        match self
            .upload_file(owner, repo, &record.path, &record.content, None)
            .await
        {
            Ok(()) => UploadOutcome {
                path: record.path.clone(),
                status: UploadStatus::Success,
                size: record.size,
                error: None,
            },
            Err(e) => {
                warn!(path = %record.path, error = %e, "upload failed");
                UploadOutcome {
                    path: record.path.clone(),
                    status: UploadStatus::Failed,
                    size: record.size,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Single-file create-or-update through the same lookup, retry and
    /// rate-limit machinery as the batched path. Passing an explicit commit
    /// `message` also forces the existence lookup, for callers that must
    /// overwrite a prior version.
    pub async fn upload_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &[u8],
        message: Option<&str>,
    ) -> Result<()> {
        let lookup = self.options.check_existing || message.is_some();
        with_retry(&self.retry, &self.limiter, || async {
            // Fetching the current identity inside the retry loop keeps a
            // retried create from conflicting with its own first attempt.
            let sha = if lookup {
                self.api
                    .get_content(owner, repo, path)
                    .await?
                    .map(|existing| existing.sha)
            } else {
                None
            };
            let commit_message = match message {
                Some(m) => m.to_string(),
                None if sha.is_some() => format!("Update {path}"),
                None => format!("Add {path}"),
            };
            let request = PutContentRequest {
                message: commit_message,
                content: content.to_vec(),
                sha,
            };
            self.api.put_content(owner, repo, path, &request).await?;
            Ok(())
        })
        .await
    }
}
