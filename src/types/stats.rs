use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::FileRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSizeEntry {
    pub name: String,
    pub size: u64,
}

/// Aggregates derived from the final record list. Recomputing over the same
/// records always yields the same values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_files: u64,
    pub total_size: u64,
    pub total_compressed_size: u64,
    /// Lowercased extension -> file count. Files without an extension are
    /// not counted here.
    pub file_types: HashMap<String, u64>,
    pub directories: BTreeSet<String>,
    pub largest_file: Option<FileSizeEntry>,
    pub smallest_file: Option<FileSizeEntry>,
    pub average_file_size: u64,
    /// Percentage saved by compression; negative when entries grew.
    pub compression_ratio: i64,
}

impl Statistics {
    pub fn from_records(records: &[FileRecord]) -> Self {
        let mut total_size = 0u64;
        let mut total_compressed_size = 0u64;
        let mut file_types: HashMap<String, u64> = HashMap::new();
        let mut directories = BTreeSet::new();
        let mut largest_file: Option<FileSizeEntry> = None;
        let mut smallest_file: Option<FileSizeEntry> = None;

        for record in records {
            total_size += record.size;
            total_compressed_size += record.compressed_size;

            if let Some(extension) = super::file_extension(&record.name) {
                *file_types.entry(extension.to_ascii_lowercase()).or_insert(0) += 1;
            }

            // Every ancestor counts as a directory, not just the parent.
            let mut prefix = record.directory.as_str();
            while !prefix.is_empty() {
                directories.insert(prefix.to_string());
                prefix = prefix.rsplit_once('/').map(|(head, _)| head).unwrap_or("");
            }

            // Strict comparisons: the first record wins ties.
            if largest_file.as_ref().map_or(true, |f| record.size > f.size) {
                largest_file = Some(FileSizeEntry {
                    name: record.name.clone(),
                    size: record.size,
                });
            }
            if smallest_file.as_ref().map_or(true, |f| record.size < f.size) {
                smallest_file = Some(FileSizeEntry {
                    name: record.name.clone(),
                    size: record.size,
                });
            }
        }

        let total_files = records.len() as u64;
        let average_file_size = if total_files == 0 {
            0
        } else {
            (total_size as f64 / total_files as f64).round() as u64
        };
        let compression_ratio = if total_size == 0 {
            0
        } else {
            ((1.0 - total_compressed_size as f64 / total_size as f64) * 100.0).round() as i64
        };

        Self {
            total_files,
            total_size,
            total_compressed_size,
            file_types,
            directories,
            largest_file,
            smallest_file,
            average_file_size,
            compression_ratio,
        }
    }
}
