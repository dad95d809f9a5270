use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, SyncError};

#[expect(clippy::unwrap_used, reason = "pattern is a literal")]
static REPO_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(https?://|git@)").unwrap());

/// Accept `http(s)://` and scp-style `git@` repository URLs.
pub fn validate_repo_url(url: &str) -> Result<()> {
    let url = url.trim();
    if url.is_empty() || !REPO_URL.is_match(url) {
        return Err(SyncError::InvalidRepoUrl {
            url: url.to_string(),
        });
    }
    Ok(())
}
