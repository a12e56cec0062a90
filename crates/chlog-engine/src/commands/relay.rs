//! Relay of a merged pull request's changelog edits.
//!
//! ## Pipeline (in order):
//! 1. Fetch PR metadata; skip unless merged with both revisions known
//! 2. List changed files and keep the changelog files
//! 3. For each file, fetch both revisions, parse, and diff the entries
//! 4. Skip when no file has a delta
//! 5. Render the announcement and hand it to the deliverer
//!
//! Every fetch happens before the first delivery, so a code-host failure
//! never leaves a partial announcement behind.

use chlog_core::delivery::{Deliverer, DeliveryReport, Sleeper, WebhookTransport};
use chlog_core::diff::diff_entries;
use chlog_core::errors::Result;
use chlog_core::filter::ChangelogFilter;
use chlog_core::host::{CodeHost, PullRequestInfo};
use chlog_core::model::ChangelogFileDelta;
use chlog_core::parse::parse_entries;
use chlog_core::render::{build_message_lines, Labels, PullRequestRef};
use chlog_core::{log_op_end, log_op_error, log_op_start};
use chlog_core_types::schema::EVENT_SKIP;
use chlog_core_types::RunId;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

/// Settings of one relay run
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// `owner/name`
    pub repository: String,
    pub pr_number: u64,
    pub filter: ChangelogFilter,
    pub labels: Labels,
    pub run_id: RunId,
}

impl RelayConfig {
    pub fn new(repository: impl Into<String>, pr_number: u64) -> Self {
        Self {
            repository: repository.into(),
            pr_number,
            filter: ChangelogFilter::default(),
            labels: Labels::default(),
            run_id: RunId::new(),
        }
    }

    pub fn with_filter(mut self, filter: ChangelogFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Link used when the code host does not provide one
    fn fallback_pr_url(&self) -> String {
        format!(
            "https://github.com/{}/pull/{}",
            self.repository, self.pr_number
        )
    }
}

/// Why a run ended without sending anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoWebhook,
    NotMerged,
    MissingRevisions,
    NoChangelogFiles,
    NoEntryDelta,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = match self {
            SkipReason::NoWebhook => "No DISCORD_WEBHOOK_URL set, skipping Discord send",
            SkipReason::NotMerged => "PR is not merged, skipping",
            SkipReason::MissingRevisions => "Missing base.sha or merge_commit_sha, skipping",
            SkipReason::NoChangelogFiles => "No changelog files changed in PR, skipping",
            SkipReason::NoEntryDelta => {
                "Changelog files changed but no Entries delta detected, skipping"
            }
        };
        f.write_str(line)
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    Delivered(DeliveryReport),
    Skipped(SkipReason),
}

/// Diff every changelog file between the two revisions
///
/// Files without a delta are left out. Order follows `paths`.
///
/// # Errors
///
/// Propagates code-host failures and unparsable documents, tagged with the
/// file path.
pub fn collect_deltas<H: CodeHost>(
    host: &H,
    paths: &[String],
    base_sha: &str,
    merge_sha: &str,
) -> Result<Vec<ChangelogFileDelta>> {
    let mut deltas = Vec::new();
    for path in paths {
        let old_text = host
            .file_text(path, base_sha)
            .map_err(|e| e.with_path(path.as_str()))?;
        let new_text = host
            .file_text(path, merge_sha)
            .map_err(|e| e.with_path(path.as_str()))?;

        let old = parse_entries(old_text.as_deref()).map_err(|e| e.with_path(path.as_str()))?;
        let new = parse_entries(new_text.as_deref()).map_err(|e| e.with_path(path.as_str()))?;

        let diff = diff_entries(&old, &new);
        debug!(
            path = %path,
            old_entries = old.len(),
            new_entries = new.len(),
            changed = !diff.is_empty(),
            "changelog file compared"
        );
        if let Some(delta) = ChangelogFileDelta::from_changes(path.as_str(), diff) {
            deltas.push(delta);
        }
    }
    Ok(deltas)
}

/// Run the whole relay for one pull request
///
/// # Errors
///
/// Returns the first code-host, document or delivery error. Skip
/// conditions are not errors.
pub fn run_relay<H, T, S>(
    host: &H,
    deliverer: &Deliverer<T, S>,
    config: &RelayConfig,
) -> Result<RelayOutcome>
where
    H: CodeHost,
    T: WebhookTransport,
    S: Sleeper,
{
    let start = Instant::now();
    log_op_start!(
        "run_relay",
        run_id = %config.run_id,
        pr_number = config.pr_number
    );

    match relay(host, deliverer, config) {
        Ok(outcome) => {
            let delivered_chunks = match &outcome {
                RelayOutcome::Delivered(report) => report.chunk_count(),
                RelayOutcome::Skipped(_) => 0,
            };
            log_op_end!(
                "run_relay",
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = %config.run_id,
                chunks = delivered_chunks
            );
            Ok(outcome)
        }
        Err(err) => {
            log_op_error!(
                "run_relay",
                &err,
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = %config.run_id
            );
            Err(err)
        }
    }
}

fn relay<H, T, S>(
    host: &H,
    deliverer: &Deliverer<T, S>,
    config: &RelayConfig,
) -> Result<RelayOutcome>
where
    H: CodeHost,
    T: WebhookTransport,
    S: Sleeper,
{
    let pr = host.pull_request(config.pr_number)?;
    if !pr.merged {
        return Ok(skip(SkipReason::NotMerged));
    }
    let (Some(base_sha), Some(merge_sha)) = (pr.base_sha.as_deref(), pr.merge_sha.as_deref())
    else {
        return Ok(skip(SkipReason::MissingRevisions));
    };

    let changed = host.changed_files(config.pr_number)?;
    let changelog_files = config.filter.select(changed);
    if changelog_files.is_empty() {
        return Ok(skip(SkipReason::NoChangelogFiles));
    }
    info!(files = changelog_files.len(), "changelog files touched");

    let deltas = collect_deltas(host, &changelog_files, base_sha, merge_sha)?;
    if deltas.is_empty() {
        return Ok(skip(SkipReason::NoEntryDelta));
    }

    let lines = build_message_lines(&pull_request_ref(&pr, config), &deltas, &config.labels);
    let report = deliverer.deliver(&lines)?;
    Ok(RelayOutcome::Delivered(report))
}

fn skip(reason: SkipReason) -> RelayOutcome {
    info!(event = EVENT_SKIP, reason = ?reason, "{}", reason);
    RelayOutcome::Skipped(reason)
}

fn pull_request_ref(pr: &PullRequestInfo, config: &RelayConfig) -> PullRequestRef {
    PullRequestRef {
        number: config.pr_number,
        title: pr.title.clone(),
        url: pr
            .html_url
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| config.fallback_pr_url()),
    }
}
