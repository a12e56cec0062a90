//! Code-hosting collaborator
//!
//! The relay only needs three reads from the code host. They are expressed
//! as a trait so the run can be exercised against an in-memory host.

use crate::errors::Result;

/// Pull request metadata needed by the relay
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PullRequestInfo {
    pub number: u64,
    pub merged: bool,
    pub title: String,
    pub html_url: Option<String>,
    /// Revision the PR was opened against (pre-merge)
    pub base_sha: Option<String>,
    /// Merge commit produced by the merge (post-merge)
    pub merge_sha: Option<String>,
}

/// Read access to a repository on a code host
pub trait CodeHost {
    /// Fetch pull request metadata
    ///
    /// # Errors
    ///
    /// Returns `HostRequestFailed` for any non-success response.
    fn pull_request(&self, number: u64) -> Result<PullRequestInfo>;

    /// List every file path touched by the pull request, across all pages
    ///
    /// # Errors
    ///
    /// Returns `HostRequestFailed` for any non-success response.
    fn changed_files(&self, number: u64) -> Result<Vec<String>>;

    /// Raw text of `path` at revision `sha`; `Ok(None)` when the file does
    /// not exist at that revision
    ///
    /// # Errors
    ///
    /// Returns `HostRequestFailed` for any non-success response except 404.
    fn file_text(&self, path: &str, sha: &str) -> Result<Option<String>>;
}

impl<T: CodeHost + ?Sized> CodeHost for &T {
    fn pull_request(&self, number: u64) -> Result<PullRequestInfo> {
        (**self).pull_request(number)
    }

    fn changed_files(&self, number: u64) -> Result<Vec<String>> {
        (**self).changed_files(number)
    }

    fn file_text(&self, path: &str, sha: &str) -> Result<Option<String>> {
        (**self).file_text(path, sha)
    }
}
