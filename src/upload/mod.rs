pub mod batch;
pub mod rate_limit;
pub mod retry;

pub use batch::BatchUploader;
pub use rate_limit::RateLimiter;
pub use retry::{with_retry, RetryConfig};
