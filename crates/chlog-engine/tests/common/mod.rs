#![allow(dead_code)]

use chlog_core::errors::{ExError, RelayError, Result};
use chlog_core::host::{CodeHost, PullRequestInfo};
use std::collections::HashMap;
use std::sync::Mutex;

pub const BASE: &str = "base000";
pub const MERGE: &str = "merge111";

/// In-memory code host
pub struct FakeHost {
    pub pr: PullRequestInfo,
    pub files: Vec<String>,
    contents: HashMap<(String, String), String>,
    failing_path: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn merged(number: u64) -> Self {
        Self {
            pr: PullRequestInfo {
                number,
                merged: true,
                title: "Add thing".to_string(),
                html_url: Some(format!("https://github.com/o/r/pull/{}", number)),
                base_sha: Some(BASE.to_string()),
                merge_sha: Some(MERGE.to_string()),
            },
            files: Vec::new(),
            contents: HashMap::new(),
            failing_path: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_file(mut self, path: &str, old: Option<&str>, new: Option<&str>) -> Self {
        self.files.push(path.to_string());
        if let Some(old) = old {
            self.contents
                .insert((path.to_string(), BASE.to_string()), old.to_string());
        }
        if let Some(new) = new {
            self.contents
                .insert((path.to_string(), MERGE.to_string()), new.to_string());
        }
        self
    }

    pub fn with_changed(mut self, path: &str) -> Self {
        self.files.push(path.to_string());
        self
    }

    pub fn failing_on(mut self, path: &str) -> Self {
        self.failing_path = Some(path.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl CodeHost for FakeHost {
    fn pull_request(&self, number: u64) -> Result<PullRequestInfo> {
        self.record(format!("pull_request {}", number));
        Ok(self.pr.clone())
    }

    fn changed_files(&self, number: u64) -> Result<Vec<String>> {
        self.record(format!("changed_files {}", number));
        Ok(self.files.clone())
    }

    fn file_text(&self, path: &str, sha: &str) -> Result<Option<String>> {
        self.record(format!("file_text {} {}", path, sha));
        if self.failing_path.as_deref() == Some(path) {
            return Err(ExError::from(RelayError::HostStatus {
                endpoint: "file_text".to_string(),
                status: 500,
            }));
        }
        Ok(self
            .contents
            .get(&(path.to_string(), sha.to_string()))
            .cloned())
    }
}
