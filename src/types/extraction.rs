use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FileRecord, Statistics, TreeNode};

/// Full output of one extraction run. Lives only for the duration of the
/// run; nothing here is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Sanitized identifier derived from the archive name.
    pub folder_name: String,
    pub files: Vec<FileRecord>,
    pub file_structure: TreeNode,
    pub statistics: Statistics,
    pub timestamp: DateTime<Utc>,
}
