use std::time::Duration;

/// Everything a publication run can be tuned with. Passed explicitly; the
/// pipeline keeps no ambient configuration.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Largest archive accepted by the pre-flight validation.
    pub max_archive_size: u64,
    /// Files larger than this are skipped, not uploaded.
    pub max_file_size: Option<u64>,
    /// When set, only files with one of these extensions are uploaded.
    pub allowed_extensions: Option<Vec<String>>,
    /// Files uploaded concurrently per batch; batches run sequentially.
    pub batch_size: usize,
    /// Total attempts per remote call, first try included.
    pub max_retries: u32,
    /// Backoff before the second attempt; doubles on each further attempt.
    pub base_retry_delay: Duration,
    /// Minimum spacing between remote calls, and the pause between batches.
    pub rate_limit_delay: Duration,
    /// Wall-clock budget for the repository to become queryable.
    pub readiness_timeout: Duration,
    pub readiness_poll_interval: Duration,
    pub private: bool,
    pub create_readme: bool,
    pub description: Option<String>,
    /// Look up each remote path first so uploads update instead of conflict.
    pub check_existing: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            max_archive_size: 100 * 1024 * 1024,
            max_file_size: None,
            allowed_extensions: None,
            batch_size: 10,
            max_retries: 3,
            base_retry_delay: Duration::from_secs(1),
            rate_limit_delay: Duration::from_secs(1),
            readiness_timeout: Duration::from_secs(30),
            readiness_poll_interval: Duration::from_secs(2),
            private: true,
            create_readme: true,
            description: None,
            check_existing: true,
        }
    }
}

impl PublishOptions {
    pub fn with_max_file_size(mut self, max: u64) -> Self {
        self.max_file_size = Some(max);
        self
    }

    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_retry_delay(mut self, delay: Duration) -> Self {
        self.base_retry_delay = delay;
        self
    }

    pub fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    pub fn with_readiness_timeout(mut self, timeout: Duration) -> Self {
        self.readiness_timeout = timeout;
        self
    }

    pub fn with_readiness_poll_interval(mut self, interval: Duration) -> Self {
        self.readiness_poll_interval = interval;
        self
    }

    pub fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    pub fn with_create_readme(mut self, create_readme: bool) -> Self {
        self.create_readme = create_readme;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_check_existing(mut self, check_existing: bool) -> Self {
        self.check_existing = check_existing;
        self
    }
}
