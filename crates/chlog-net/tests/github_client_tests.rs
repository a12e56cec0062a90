#![allow(clippy::unwrap_used, clippy::expect_used)]

use chlog_core::errors::{ExErrorKind, Result};
use chlog_core::host::CodeHost;
use chlog_core_types::Sensitive;
use chlog_net::GitHubClient;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run a blocking client call off the async runtime
async fn call<T, F>(base: String, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&GitHubClient) -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let client = GitHubClient::new(&base, "space/station", &Sensitive::new("tok".to_string()))?;
        f(&client)
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pull_request_sends_github_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/space/station/pulls/42"))
        .and(header("authorization", "Bearer tok"))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("x-github-api-version", "2022-11-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 42,
            "merged": true,
            "title": "Add thing",
            "html_url": "https://github.com/space/station/pull/42",
            "base": {"sha": "aaa"},
            "merge_commit_sha": "bbb"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let info = call(server.uri(), |c| c.pull_request(42)).await.unwrap();

    assert!(info.merged);
    assert_eq!(info.title, "Add thing");
    assert_eq!(info.base_sha.as_deref(), Some("aaa"));
    assert_eq!(info.merge_sha.as_deref(), Some("bbb"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unmerged_pull_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/space/station/pulls/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "merged": false,
            "merged_at": null,
            "base": {"sha": "aaa"},
            "merge_commit_sha": null
        })))
        .mount(&server)
        .await;

    let info = call(server.uri(), |c| c.pull_request(5)).await.unwrap();

    assert!(!info.merged);
    assert_eq!(info.merge_sha, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_changed_files_follows_pages_until_empty() {
    let server = MockServer::start().await;
    let files_path = "/repos/space/station/pulls/9/files";
    Mock::given(method("GET"))
        .and(path(files_path))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"filename": "Resources/Changelog/Changelog.yml"},
            {"status": "removed"},
            {"filename": "src/lib.rs"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(files_path))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"filename": "Resources/Changelog/Admin.yml"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(files_path))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let files = call(server.uri(), |c| c.changed_files(9)).await.unwrap();

    assert_eq!(
        files,
        vec![
            "Resources/Changelog/Changelog.yml",
            "src/lib.rs",
            "Resources/Changelog/Admin.yml",
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_file_text_requests_raw_contents_at_ref() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/space/station/contents/Resources/Changelog/Changelog.yml"))
        .and(query_param("ref", "bbb"))
        .and(header("accept", "application/vnd.github.raw"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Entries: []\n"))
        .mount(&server)
        .await;

    let text = call(server.uri(), |c| {
        c.file_text("Resources/Changelog/Changelog.yml", "bbb")
    })
    .await
    .unwrap();

    assert_eq!(text.as_deref(), Some("Entries: []\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_file_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let text = call(server.uri(), |c| c.file_text("Resources/Changelog/New.yml", "aaa"))
        .await
        .unwrap();

    assert_eq!(text, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_is_fatal_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = call(server.uri(), |c| c.file_text("Resources/Changelog/Changelog.yml", "aaa"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::HostRequestFailed);
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.op(), Some("file_text"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_not_found_pull_request_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = call(server.uri(), |c| c.pull_request(1)).await.unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::HostRequestFailed);
    assert_eq!(err.status(), Some(404));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_undecodable_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = call(server.uri(), |c| c.pull_request(1)).await.unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::HostResponseInvalid);
}
