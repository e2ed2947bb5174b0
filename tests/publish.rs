#[cfg(test)]
mod tests {

    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use std::time::Duration;

    use archive_publisher::publisher::{summary, PublishReport, RepositoryPublisher};
    use archive_publisher::remote::{
        CreateRepositoryRequest, PutContentRequest, RemoteContent, RemoteRepository,
    };
    use archive_publisher::upload::{BatchUploader, RateLimiter};
    use archive_publisher::{
        ExtractionResult, FileRecord, PublishError, PublishOptions, RepositoryDescriptor, Result,
        Statistics, TreeNode, UploadStatus,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Mutex;

    #[derive(Debug, Clone)]
    struct RecordedPut {
        path: String,
        sha: Option<String>,
        message: String,
        content: Vec<u8>,
    }

    #[derive(Default)]
    struct MockState {
        readiness_polls: u32,
        puts: Vec<RecordedPut>,
        in_flight: usize,
        max_in_flight: usize,
    }

    struct MockRemote {
        state: Mutex<MockState>,
        /// Creation calls are rejected as unauthorized.
        fail_create: bool,
        /// Readiness probes that answer "not found" before the first success.
        not_ready_polls: u32,
        /// Paths whose uploads fail on every attempt.
        fail_paths: HashSet<String>,
        /// Pre-existing remote content, path -> sha.
        existing: HashMap<String, String>,
    }

    impl MockRemote {
        fn new() -> Self {
            Self {
                state: Mutex::new(MockState::default()),
                fail_create: false,
                not_ready_polls: 0,
                fail_paths: HashSet::new(),
                existing: HashMap::new(),
            }
        }

        fn with_failing_create(mut self) -> Self {
            self.fail_create = true;
            self
        }

        fn with_not_ready_polls(mut self, polls: u32) -> Self {
            self.not_ready_polls = polls;
            self
        }

        fn with_failing_path(mut self, path: &str) -> Self {
            self.fail_paths.insert(path.to_string());
            self
        }

        fn with_existing(mut self, path: &str, sha: &str) -> Self {
            self.existing.insert(path.to_string(), sha.to_string());
            self
        }

        fn descriptor(name: &str) -> RepositoryDescriptor {
            RepositoryDescriptor {
                id: 42,
                name: name.to_string(),
                owner: "octocat".to_string(),
                private: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
                html_url: format!("https://example.test/octocat/{name}"),
                default_branch: "main".to_string(),
            }
        }

        async fn puts(&self) -> Vec<RecordedPut> {
            self.state.lock().await.puts.clone()
        }
    }

    #[async_trait]
    impl RemoteRepository for MockRemote {
        async fn create_repository(
            &self,
            request: &CreateRepositoryRequest,
        ) -> Result<RepositoryDescriptor> {
            if self.fail_create {
                return Err(PublishError::Auth("token rejected".to_string()));
            }
            Ok(Self::descriptor(&request.name))
        }

        async fn get_repository(
            &self,
            _owner: &str,
            name: &str,
        ) -> Result<RepositoryDescriptor> {
            let mut state = self.state.lock().await;
            state.readiness_polls += 1;
            if state.readiness_polls <= self.not_ready_polls {
                return Err(PublishError::NotFound(format!("{name} not ready")));
            }
            Ok(Self::descriptor(name))
        }

        async fn get_content(
            &self,
            _owner: &str,
            _repo: &str,
            path: &str,
        ) -> Result<Option<RemoteContent>> {
            Ok(self.existing.get(path).map(|sha| RemoteContent {
                path: path.to_string(),
                sha: sha.clone(),
                size: 0,
            }))
        }

        async fn put_content(
            &self,
            _owner: &str,
            _repo: &str,
            path: &str,
            request: &PutContentRequest,
        ) -> Result<RemoteContent> {
            {
                let mut state = self.state.lock().await;
                state.in_flight += 1;
                state.max_in_flight = state.max_in_flight.max(state.in_flight);
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
            let mut state = self.state.lock().await;
            state.in_flight -= 1;
            if self.fail_paths.contains(path) {
                return Err(PublishError::Network {
                    status: Some(500),
                    message: format!("upload of {path} rejected"),
                });
            }
            state.puts.push(RecordedPut {
                path: path.to_string(),
                sha: request.sha.clone(),
                message: request.message.clone(),
                content: request.content.clone(),
            });
            Ok(RemoteContent {
                path: path.to_string(),
                sha: "new-sha".to_string(),
                size: request.content.len() as u64,
            })
        }
    }

    fn record(path: &str, size: u64) -> FileRecord {
        let (directory, name) = match path.rsplit_once('/') {
            Some((dir, base)) => (dir.to_string(), base.to_string()),
            None => (String::new(), path.to_string()),
        };
        FileRecord {
            path: path.to_string(),
            name,
            content: vec![b'x'; size as usize],
            size,
            compressed_size: size / 2,
            directory,
            mime_type: "application/octet-stream".to_string(),
            last_modified: Utc::now(),
            checksum: "0".repeat(64),
        }
    }

    fn extraction(files: Vec<FileRecord>) -> ExtractionResult {
        let mut file_structure = TreeNode::root();
        for file in &files {
            file_structure.insert(file);
        }
        let statistics = Statistics::from_records(&files);
        ExtractionResult {
            folder_name: "demo-archive".to_string(),
            files,
            file_structure,
            statistics,
            timestamp: Utc::now(),
        }
    }

    fn fast_options() -> PublishOptions {
        PublishOptions::default()
            .with_batch_size(3)
            .with_max_retries(2)
            .with_base_retry_delay(Duration::from_millis(1))
            .with_rate_limit_delay(Duration::from_millis(1))
            .with_readiness_timeout(Duration::from_millis(250))
            .with_readiness_poll_interval(Duration::from_millis(5))
            .with_create_readme(false)
    }

    async fn run(
        remote: MockRemote,
        options: PublishOptions,
        files: Vec<FileRecord>,
    ) -> (Arc<MockRemote>, Result<PublishReport>) {
        let remote = Arc::new(remote);
        let publisher = RepositoryPublisher::new(remote.clone(), options);
        let report = publisher.publish(&extraction(files)).await;
        (remote, report)
    }

    #[tokio::test]
    async fn test_batched_run_isolates_one_failing_file() {
        let files: Vec<FileRecord> = (1..=7).map(|i| record(&format!("f{i}.txt"), 10)).collect();
        // 5th file in (directory, name) order fails every attempt.
        let remote = MockRemote::new().with_failing_path("f5.txt");

        let (remote, report) = run(remote, fast_options(), files).await;
        let report = report.expect("run must not abort on per-file failures");

        let result = &report.result;
        assert_eq!(result.success_count, 6);
        assert_eq!(result.failed_count, 1);
        assert_eq!(result.skipped_count, 0);
        assert_eq!(result.total_size, 60);
        assert_eq!(result.details.len(), 7);

        let failed = &result.details[4];
        assert_eq!(failed.path, "f5.txt");
        assert_eq!(failed.status, UploadStatus::Failed);
        assert!(failed.error.as_ref().unwrap().contains("retries exhausted"));

        // 6 successes, plus 2 attempts for the failing file.
        let state = remote.state.lock().await;
        assert_eq!(state.puts.len(), 6);
        assert!(state.max_in_flight <= 3, "batch concurrency exceeded");
    }

    #[tokio::test]
    async fn test_details_keep_sorted_order() {
        let files = vec![
            record("src/z.rs", 1),
            record("a.txt", 1),
            record("src/a.rs", 1),
            record("docs/x.md", 1),
        ];
        let (_, report) = run(MockRemote::new(), fast_options(), files).await;
        let paths: Vec<_> = report
            .unwrap()
            .result
            .details
            .iter()
            .map(|d| d.path.clone())
            .collect();
        assert_eq!(paths, vec!["a.txt", "docs/x.md", "src/a.rs", "src/z.rs"]);
    }

    #[tokio::test]
    async fn test_filtered_files_are_skipped_not_attempted() {
        let files = vec![
            record("keep.md", 5),
            record("drop.txt", 5),
            record("huge.md", 5000),
            // A dotfile has no extension, so even an allow list naming
            // "gitignore" never matches it.
            record(".gitignore", 5),
        ];
        let options = fast_options()
            .with_allowed_extensions(["md", "gitignore"])
            .with_max_file_size(100);

        let (remote, report) = run(MockRemote::new(), options, files).await;
        let result = report.unwrap().result;

        assert_eq!(result.success_count, 1);
        assert_eq!(result.skipped_count, 3);
        assert_eq!(result.failed_count, 0);

        let attempted: Vec<_> = remote.puts().await.iter().map(|p| p.path.clone()).collect();
        assert_eq!(attempted, vec!["keep.md"]);

        let skipped: Vec<_> = result
            .details
            .iter()
            .filter(|d| d.status == UploadStatus::Skipped)
            .map(|d| d.path.clone())
            .collect();
        assert_eq!(skipped, vec![".gitignore", "drop.txt", "huge.md"]);
    }

    #[tokio::test]
    async fn test_readiness_tolerates_transient_not_found() {
        let remote = MockRemote::new().with_not_ready_polls(3);
        let (remote, report) = run(remote, fast_options(), vec![record("a.txt", 1)]).await;
        assert!(report.is_ok());
        assert_eq!(remote.state.lock().await.readiness_polls, 4);
    }

    #[tokio::test]
    async fn test_readiness_timeout_fails_run_before_uploads() {
        let remote = MockRemote::new().with_not_ready_polls(u32::MAX);
        let (remote, report) = run(remote, fast_options(), vec![record("a.txt", 1)]).await;
        assert!(matches!(report, Err(PublishError::Timeout(_))));
        assert!(remote.puts().await.is_empty());
    }

    #[tokio::test]
    async fn test_existing_file_is_updated_with_identity_token() {
        let remote = MockRemote::new().with_existing("config.json", "abc123");
        let files = vec![record("config.json", 4), record("new.json", 4)];
        let (remote, report) = run(remote, fast_options(), files).await;
        assert!(report.is_ok());

        let puts = remote.puts().await;
        let updated = puts.iter().find(|p| p.path == "config.json").unwrap();
        assert_eq!(updated.sha.as_deref(), Some("abc123"));
        assert!(updated.message.starts_with("Update"));

        let created = puts.iter().find(|p| p.path == "new.json").unwrap();
        assert_eq!(created.sha, None);
        assert!(created.message.starts_with("Add"));
    }

    #[tokio::test]
    async fn test_check_existing_disabled_skips_lookup() {
        let remote = MockRemote::new().with_existing("config.json", "abc123");
        let options = fast_options().with_check_existing(false);
        let (remote, report) = run(remote, options, vec![record("config.json", 4)]).await;
        assert!(report.is_ok());
        assert_eq!(remote.puts().await[0].sha, None);
    }

    #[tokio::test]
    async fn test_create_failure_aborts_run_without_uploads() {
        let remote = MockRemote::new().with_failing_create();
        let (remote, report) = run(remote, fast_options(), vec![record("a.txt", 1)]).await;

        assert!(matches!(report, Err(PublishError::Auth(_))));
        // A fatal creation error aborts the whole run: no readiness polls,
        // no uploads, no partial result.
        assert!(remote.puts().await.is_empty());
        assert_eq!(remote.state.lock().await.readiness_polls, 0);
    }

    #[tokio::test]
    async fn test_empty_file_list_is_a_validation_failure() {
        let (_, report) = run(MockRemote::new(), fast_options(), Vec::new()).await;
        assert!(matches!(report, Err(PublishError::Validation(_))));
    }

    #[tokio::test]
    async fn test_summary_document_is_uploaded_and_overwrites() {
        let remote = MockRemote::new().with_existing(summary::SUMMARY_FILE_NAME, "old-readme");
        let options = fast_options().with_create_readme(true);
        let (remote, report) = run(remote, options, vec![record("src/lib.rs", 9)]).await;
        let report = report.unwrap();

        let puts = remote.puts().await;
        let readme = puts
            .iter()
            .find(|p| p.path == summary::SUMMARY_FILE_NAME)
            .expect("summary must be uploaded");
        assert_eq!(readme.sha.as_deref(), Some("old-readme"));
        assert_eq!(readme.message, summary::SUMMARY_COMMIT_MESSAGE);

        let body = String::from_utf8(readme.content.clone()).unwrap();
        assert!(body.contains("Total files: 1"));
        assert!(body.contains("src/"));
        assert!(report.summary.contains("published 1/1 files"));
    }

    #[tokio::test]
    async fn test_summary_failure_does_not_fail_the_run() {
        let remote = MockRemote::new().with_failing_path(summary::SUMMARY_FILE_NAME);
        let options = fast_options().with_create_readme(true);
        let (_, report) = run(remote, options, vec![record("a.txt", 1)]).await;
        let report = report.expect("summary failures are best effort");
        assert_eq!(report.result.success_count, 1);
    }

    #[tokio::test]
    async fn test_uploader_partitions_into_expected_batches() {
        // 7 eligible files with batch size 3 -> ceil(7/3) = 3 batches whose
        // union is exactly the input set.
        let files: Vec<FileRecord> = (0..7).map(|i| record(&format!("f{i}.bin"), 1)).collect();
        let remote = Arc::new(MockRemote::new());
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(1)));
        let uploader = BatchUploader::new(remote.clone(), limiter, fast_options());

        let result = uploader.publish("octocat", "demo", &files).await;
        assert_eq!(result.success_count, 7);

        let puts = remote.puts().await;
        let mut uploaded: Vec<_> = puts.iter().map(|p| p.path.clone()).collect();
        uploaded.sort();
        let mut expected: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        expected.sort();
        assert_eq!(uploaded, expected);
    }
}
