mod extraction;
mod record;
mod repo;
mod stats;
mod structure;

pub use extraction::ExtractionResult;
pub use record::{content_checksum, file_extension, FileRecord};
pub use repo::{PublicationResult, RepositoryDescriptor, UploadOutcome, UploadStatus};
pub use stats::{FileSizeEntry, Statistics};
pub use structure::TreeNode;
