//! GitHub REST client
//!
//! Only the three reads the relay needs: pull request metadata, the
//! paginated list of changed files, and raw file contents at a revision.

use crate::{user_agent, REQUEST_TIMEOUT};
use chlog_core::errors::{ExError, RelayError, Result};
use chlog_core::host::{CodeHost, PullRequestInfo};
use chlog_core_types::Sensitive;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";
const FILES_PER_PAGE: u32 = 100;

#[derive(Debug, Deserialize)]
struct PullPayload {
    merged: Option<bool>,
    merged_at: Option<String>,
    title: Option<String>,
    html_url: Option<String>,
    base: Option<RevisionPayload>,
    merge_commit_sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RevisionPayload {
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FilePayload {
    filename: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl PullPayload {
    fn into_info(self, number: u64) -> PullRequestInfo {
        let merged_at = non_empty(self.merged_at);
        PullRequestInfo {
            number,
            merged: self.merged.unwrap_or(false) || merged_at.is_some(),
            title: self.title.unwrap_or_default(),
            html_url: non_empty(self.html_url),
            base_sha: non_empty(self.base.and_then(|b| b.sha)),
            merge_sha: non_empty(self.merge_commit_sha),
        }
    }
}

/// Read-only client for one repository
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base: Url,
    owner: String,
    name: String,
}

impl GitHubClient {
    /// Build a client for `repository` (`owner/name`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when the API URL or repository is malformed
    /// or the token cannot be used as a header value.
    pub fn new(api_base: &str, repository: &str, token: &Sensitive<String>) -> Result<Self> {
        let api_base = Url::parse(api_base.trim_end_matches('/')).map_err(|e| {
            ExError::from(RelayError::InvalidConfig {
                name: "GITHUB_API_URL".to_string(),
                reason: e.to_string(),
            })
        })?;
        if api_base.cannot_be_a_base() {
            return Err(RelayError::InvalidConfig {
                name: "GITHUB_API_URL".to_string(),
                reason: "not a base URL".to_string(),
            }
            .into());
        }

        let (owner, name) = match repository.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                (owner.to_string(), name.to_string())
            }
            _ => {
                return Err(RelayError::InvalidConfig {
                    name: "GITHUB_REPOSITORY".to_string(),
                    reason: format!("expected owner/name, got '{}'", repository),
                }
                .into())
            }
        };

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose())).map_err(|_| {
            ExError::from(RelayError::InvalidConfig {
                name: "GITHUB_TOKEN".to_string(),
                reason: "contains characters not allowed in a header".to_string(),
            })
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(user_agent())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                ExError::from(RelayError::InvalidConfig {
                    name: "http client".to_string(),
                    reason: e.to_string(),
                })
            })?;

        Ok(Self {
            http,
            api_base,
            owner,
            name,
        })
    }

    /// `{api_base}/repos/{owner}/{name}/{tail...}`, each segment encoded
    fn endpoint<'a, I>(&self, tail: I) -> Result<Url>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.api_base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ExError::from(RelayError::InvalidConfig {
                    name: "GITHUB_API_URL".to_string(),
                    reason: "not a base URL".to_string(),
                })
            })?;
            segments
                .pop_if_empty()
                .extend(["repos", self.owner.as_str(), self.name.as_str()])
                .extend(tail);
        }
        Ok(url)
    }

    fn send(&self, op: &str, request: reqwest::blocking::RequestBuilder) -> Result<Response> {
        request.send().map_err(|e| {
            ExError::from(RelayError::HostUnreachable {
                endpoint: op.to_string(),
                reason: e.to_string(),
            })
        })
    }

    fn get_json<T: DeserializeOwned>(&self, op: &str, url: Url, query: &[(&str, String)]) -> Result<T> {
        let response = self.send(op, self.http.get(url).query(query))?;
        let response = ensure_success(op, response)?;
        response.json::<T>().map_err(|e| {
            ExError::from(RelayError::HostDecode {
                endpoint: op.to_string(),
                reason: e.to_string(),
            })
        })
    }
}

fn ensure_success(op: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(RelayError::HostStatus {
            endpoint: op.to_string(),
            status: status.as_u16(),
        }
        .into())
    }
}

impl CodeHost for GitHubClient {
    fn pull_request(&self, number: u64) -> Result<PullRequestInfo> {
        let number_segment = number.to_string();
        let url = self.endpoint(["pulls", number_segment.as_str()])?;
        let payload: PullPayload = self.get_json("pull_request", url, &[])?;
        let info = payload.into_info(number);
        debug!(
            pr_number = number,
            merged = info.merged,
            has_base = info.base_sha.is_some(),
            has_merge = info.merge_sha.is_some(),
            "pull request fetched"
        );
        Ok(info)
    }

    fn changed_files(&self, number: u64) -> Result<Vec<String>> {
        let number_segment = number.to_string();
        let mut files = Vec::new();
        let mut page = 1u32;
        loop {
            let url = self.endpoint(["pulls", number_segment.as_str(), "files"])?;
            let batch: Vec<FilePayload> = self.get_json(
                "changed_files",
                url,
                &[
                    ("per_page", FILES_PER_PAGE.to_string()),
                    ("page", page.to_string()),
                ],
            )?;
            if batch.is_empty() {
                break;
            }
            files.extend(
                batch
                    .into_iter()
                    .filter_map(|item| non_empty(item.filename)),
            );
            page += 1;
        }
        debug!(pr_number = number, files = files.len(), pages = page - 1, "changed files listed");
        Ok(files)
    }

    fn file_text(&self, path: &str, sha: &str) -> Result<Option<String>> {
        let url = self.endpoint(std::iter::once("contents").chain(path.split('/')))?;
        let request = self
            .http
            .get(url)
            .header(ACCEPT, RAW_MEDIA_TYPE)
            .query(&[("ref", sha)]);
        let response = self.send("file_text", request)?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(path = %path, sha = %sha, "file absent at revision");
            return Ok(None);
        }
        let response = ensure_success("file_text", response)?;
        response.text().map(Some).map_err(|e| {
            ExError::from(RelayError::HostDecode {
                endpoint: "file_text".to_string(),
                reason: e.to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> GitHubClient {
        GitHubClient::new(base, "space/station", &Sensitive::new("t".to_string())).unwrap()
    }

    #[test]
    fn test_endpoint_encodes_each_segment() {
        let url = client("https://api.github.com")
            .endpoint(["contents", "Resources", "Change log", "Ünï.yml"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/space/station/contents/Resources/Change%20log/%C3%9Cn%C3%AF.yml"
        );
    }

    #[test]
    fn test_endpoint_keeps_enterprise_prefix() {
        let url = client("https://ghe.example.com/api/v3/")
            .endpoint(["pulls", "7"])
            .unwrap();
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/repos/space/station/pulls/7");
    }

    #[test]
    fn test_malformed_repository_is_rejected() {
        let token = Sensitive::new("t".to_string());
        for repo in ["station", "/station", "space/", "a/b/c"] {
            let err = GitHubClient::new(DEFAULT_API_URL, repo, &token).unwrap_err();
            assert!(err.kind().is_configuration(), "{} accepted", repo);
        }
    }

    #[test]
    fn test_merged_at_alone_means_merged() {
        let payload: PullPayload = serde_json::from_value(serde_json::json!({
            "merged_at": "2024-05-01T00:00:00Z",
            "title": null,
            "base": {"sha": "abc"},
            "merge_commit_sha": ""
        }))
        .unwrap();
        let info = payload.into_info(3);
        assert!(info.merged);
        assert_eq!(info.title, "");
        assert_eq!(info.base_sha.as_deref(), Some("abc"));
        assert_eq!(info.merge_sha, None);
    }
}
