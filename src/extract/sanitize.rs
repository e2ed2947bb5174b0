use crate::{PublishError, Result};

pub const MAX_REPO_NAME_LEN: usize = 100;
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// Turns an arbitrary archive name into a repository identifier matching
/// `[a-z0-9_-]+`: strip the `.zip` suffix, lowercase, replace anything else
/// with `-`, collapse runs of `-`, trim the ends. Idempotent.
pub fn sanitize_repo_name(raw: &str) -> Result<String> {
    let stem = if raw.to_ascii_lowercase().ends_with(ARCHIVE_SUFFIX) {
        &raw[..raw.len() - ARCHIVE_SUFFIX.len()]
    } else {
        raw
    };

    let mut name = String::with_capacity(stem.len());
    let mut prev_dash = false;
    for c in stem.chars() {
        let c = c.to_ascii_lowercase();
        let mapped = if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            c
        } else {
            '-'
        };
        if mapped == '-' {
            if prev_dash {
                continue;
            }
            prev_dash = true;
        } else {
            prev_dash = false;
        }
        name.push(mapped);
    }

    let name = name.trim_matches('-').to_string();
    if name.is_empty() {
        return Err(PublishError::Validation(format!(
            "archive name {raw:?} sanitizes to an empty identifier"
        )));
    }
    if name.len() > MAX_REPO_NAME_LEN {
        return Err(PublishError::Validation(format!(
            "repository name exceeds {MAX_REPO_NAME_LEN} characters"
        )));
    }
    Ok(name)
}

/// Pre-flight checks on the declared archive: single accepted extension and
/// a configured size ceiling.
pub fn validate_archive(name: &str, size: u64, max_size: u64) -> Result<()> {
    if !name.to_ascii_lowercase().ends_with(ARCHIVE_SUFFIX) {
        return Err(PublishError::Validation(format!(
            "unsupported archive extension for {name:?}, expected {ARCHIVE_SUFFIX}"
        )));
    }
    if size > max_size {
        return Err(PublishError::Validation(format!(
            "archive size {size} exceeds the maximum of {max_size} bytes"
        )));
    }
    Ok(())
}
