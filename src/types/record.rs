use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One extracted archive entry. The payload is opaque; everything else is
/// derived from the entry's path and container metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Slash-separated, archive-relative, never empty.
    pub path: String,
    /// Basename of `path`.
    pub name: String,
    pub content: Vec<u8>,
    /// Uncompressed size declared by the container.
    pub size: u64,
    pub compressed_size: u64,
    /// Parent path, empty for root-level files.
    pub directory: String,
    pub mime_type: String,
    pub last_modified: DateTime<Utc>,
    /// SHA-256 over the decoded payload, hex-encoded.
    pub checksum: String,
}

/// Extension of a file name: the part after the final `.`, provided both
/// the stem and the extension are non-empty. Dotfiles like `.gitignore`
/// and names without a dot have no extension.
pub fn file_extension(name: &str) -> Option<&str> {
    name.rsplit_once('.')
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
        .map(|(_, ext)| ext)
}

pub fn content_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
