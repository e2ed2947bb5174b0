pub mod mime;
pub mod sanitize;

use std::io::{Cursor, Read};
use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::types::{content_checksum, ExtractionResult, FileRecord, Statistics, TreeNode};
use crate::{PublishError, Result};

/// The three accepted input shapes, normalized before extraction.
#[derive(Debug, Clone)]
pub enum ArchiveInput {
    /// Read from disk; name and size come from the file itself.
    Path(PathBuf),
    /// In-memory payload with a declared name.
    Bytes { name: String, data: Vec<u8> },
    /// Wrapped upload carrying a caller-declared size to cross-check.
    Upload {
        name: String,
        data: Vec<u8>,
        declared_size: u64,
    },
}

impl ArchiveInput {
    /// Pre-flight normalization of all three forms to `(name, bytes)`.
    pub async fn normalize(self) -> Result<(String, Vec<u8>)> {
        match self {
            ArchiveInput::Path(path) => {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        PublishError::Validation(format!(
                            "path {} has no usable file name",
                            path.display()
                        ))
                    })?;
                let data = tokio::fs::read(&path).await?;
                Ok((name, data))
            }
            ArchiveInput::Bytes { name, data } => Ok((name, data)),
            ArchiveInput::Upload {
                name,
                data,
                declared_size,
            } => {
                if declared_size != data.len() as u64 {
                    return Err(PublishError::Validation(format!(
                        "declared size {declared_size} does not match payload of {} bytes",
                        data.len()
                    )));
                }
                Ok((name, data))
            }
        }
    }
}

/// Decodes a ZIP archive into ordered file records plus the derived tree
/// and statistics. Individual undecodable entries are skipped; only an
/// unopenable container is fatal.
pub struct ArchiveExtractor {
    max_archive_size: u64,
}

impl ArchiveExtractor {
    pub fn new(max_archive_size: u64) -> Self {
        Self { max_archive_size }
    }

    pub async fn extract(&self, input: ArchiveInput) -> Result<ExtractionResult> {
        let (declared_name, data) = input.normalize().await?;
        sanitize::validate_archive(&declared_name, data.len() as u64, self.max_archive_size)?;
        let folder_name = sanitize::sanitize_repo_name(&declared_name)?;

        let mut archive = ZipArchive::new(Cursor::new(&data))
            .map_err(|e| PublishError::Extraction(format!("cannot open archive: {e}")))?;

        let extracted_at = Utc::now();
        let mut files = Vec::new();
        for index in 0..archive.len() {
            let mut entry = match archive.by_index(index) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(index, error = %e, "unreadable entry, skipping");
                    continue;
                }
            };
            if entry.is_dir() {
                continue;
            }
            let path = match entry.enclosed_name() {
                Some(p) => p.to_string_lossy().replace('\\', "/"),
                None => {
                    warn!(index, name = entry.name(), "entry escapes the archive root, skipping");
                    continue;
                }
            };
            if path.is_empty() {
                continue;
            }

            let size = entry.size();
            let compressed_size = entry.compressed_size();
            // The declared size comes straight from the container and can
            // lie; never preallocate more than the archive itself holds.
            let mut content = Vec::with_capacity(size.min(data.len() as u64) as usize);
            if let Err(e) = entry.read_to_end(&mut content) {
                warn!(path = %path, error = %e, "entry failed to decode, skipping");
                continue;
            }

            let (directory, name) = match path.rsplit_once('/') {
                Some((dir, base)) => (dir.to_string(), base.to_string()),
                None => (String::new(), path.clone()),
            };
            let last_modified = entry
                .last_modified()
                .and_then(|dt| {
                    Utc.with_ymd_and_hms(
                        dt.year() as i32,
                        dt.month() as u32,
                        dt.day() as u32,
                        dt.hour() as u32,
                        dt.minute() as u32,
                        dt.second() as u32,
                    )
                    .single()
                })
                .unwrap_or(extracted_at);

            debug!(path = %path, size, "extracted entry");
            files.push(FileRecord {
                checksum: content_checksum(&content),
                mime_type: mime::mime_for_name(&name).to_string(),
                path,
                name,
                content,
                size,
                compressed_size,
                directory,
                last_modified,
            });
        }

        let mut file_structure = TreeNode::root();
        for record in &files {
            file_structure.insert(record);
        }
        let statistics = Statistics::from_records(&files);

        Ok(ExtractionResult {
            folder_name,
            files,
            file_structure,
            statistics,
            timestamp: extracted_at,
        })
    }
}
