use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Remote repository as reported by the API at creation time. Never mutated
/// locally afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    pub id: u64,
    pub name: String,
    pub owner: String,
    pub private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub html_url: String,
    pub default_branch: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Success,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub path: String,
    pub status: UploadStatus,
    pub size: u64,
    /// Present exactly when `status` is `Failed`.
    pub error: Option<String>,
}

/// Aggregate of one publication run. `details` keeps the filtered-and-sorted
/// file order regardless of upload completion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicationResult {
    pub success_count: u64,
    pub failed_count: u64,
    pub skipped_count: u64,
    pub details: Vec<UploadOutcome>,
    /// Bytes actually uploaded; skipped and failed files do not count.
    pub total_size: u64,
}

impl PublicationResult {
    pub fn record(&mut self, outcome: UploadOutcome) {
        match outcome.status {
            UploadStatus::Success => {
                self.success_count += 1;
                self.total_size += outcome.size;
            }
            UploadStatus::Failed => self.failed_count += 1,
            UploadStatus::Skipped => self.skipped_count += 1,
        }
        self.details.push(outcome);
    }
}
