//! Relay command
//!
//! Usage: chlog-relay [--dry-run] (settings usually come from the CI
//! environment; every variable has a matching flag)

use crate::commands::dry_run::StdoutTransport;
use chlog_core::delivery::Deliverer;
use chlog_core::errors::{ExError, RelayError, Result};
use chlog_core::filter::ChangelogFilter;
use chlog_core::render::{Labels, Locale};
use chlog_core_types::Sensitive;
use chlog_engine::{run_relay, RelayConfig, RelayOutcome, SkipReason};
use chlog_net::github::DEFAULT_API_URL;
use chlog_net::{DiscordWebhook, GitHubClient};
use clap::Args;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Args)]
pub struct RelayArgs {
    /// Discord webhook URL; the run is skipped when unset
    #[arg(long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Token for the GitHub REST API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Number of the merged pull request
    #[arg(long, env = "PR_NUMBER")]
    pub pr_number: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Directory holding the changelog files
    #[arg(long, env = "CHANGELOG_DIR", default_value = ChangelogFilter::DEFAULT_DIR)]
    pub changelog_dir: String,

    #[arg(long, env = "CHANGELOG_EXT", default_value = ChangelogFilter::DEFAULT_EXT)]
    pub changelog_ext: String,

    /// Pause between consecutive Discord messages, in seconds
    #[arg(long, env = "DISCORD_MESSAGE_DELAY_SECONDS", default_value = "2.0")]
    pub message_delay: String,

    /// Label language: uk or en
    #[arg(long, env = "CHANGELOG_LOCALE", default_value = "uk")]
    pub locale: String,

    /// Log output: pretty or json
    #[arg(long, env = "CHLOG_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Print the messages to stdout instead of posting them
    #[arg(long)]
    pub dry_run: bool,
}

impl RelayArgs {
    /// True when there is nowhere to deliver, so nothing else is validated
    pub fn skips_delivery(&self) -> bool {
        !self.dry_run
            && self
                .webhook_url
                .as_deref()
                .map_or(true, |url| url.trim().is_empty())
    }
}

/// Validated settings of one run
#[derive(Debug)]
pub struct Settings {
    /// `None` only in dry-run mode
    pub webhook_url: Option<Sensitive<String>>,
    pub github_token: Sensitive<String>,
    pub repository: String,
    pub pr_number: u64,
    pub api_url: String,
    pub filter: ChangelogFilter,
    pub message_delay: Duration,
    pub labels: Labels,
    pub dry_run: bool,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    present(value).ok_or_else(|| {
        ExError::from(RelayError::MissingConfig {
            name: name.to_string(),
        })
    })
}

fn invalid(name: &str, reason: impl Into<String>) -> ExError {
    RelayError::InvalidConfig {
        name: name.to_string(),
        reason: reason.into(),
    }
    .into()
}

/// Seconds as written in the environment; negative values mean no pause
pub fn parse_message_delay(raw: &str) -> Result<Duration> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("DISCORD_MESSAGE_DELAY_SECONDS", format!("'{}' is not a number", raw)))?;
    if !secs.is_finite() {
        return Err(invalid("DISCORD_MESSAGE_DELAY_SECONDS", "must be finite"));
    }
    Duration::try_from_secs_f64(secs.max(0.0))
        .map_err(|e| invalid("DISCORD_MESSAGE_DELAY_SECONDS", e.to_string()))
}

impl Settings {
    /// Validate raw arguments
    ///
    /// `Ok(None)` means there is no webhook to post to and the run should be
    /// skipped. That check comes before every other one.
    ///
    /// # Errors
    ///
    /// Returns `MissingConfig` or `InvalidConfig` for unusable settings.
    pub fn resolve(args: RelayArgs) -> Result<Option<Self>> {
        if args.skips_delivery() {
            return Ok(None);
        }
        let webhook_url = Sensitive::from_optional(args.webhook_url);

        let github_token = Sensitive::from_optional(args.github_token).ok_or_else(|| {
            ExError::from(RelayError::MissingConfig {
                name: "GITHUB_TOKEN".to_string(),
            })
        })?;
        let repository = required(args.repository, "GITHUB_REPOSITORY")?;
        let pr_raw = required(args.pr_number, "PR_NUMBER")?;
        let pr_number = pr_raw
            .parse::<u64>()
            .map_err(|_| invalid("PR_NUMBER", format!("'{}' is not a pull request number", pr_raw)))?;

        let message_delay = parse_message_delay(&args.message_delay)?;
        let locale = args
            .locale
            .parse::<Locale>()
            .map_err(|reason| invalid("CHANGELOG_LOCALE", reason))?;

        Ok(Some(Self {
            webhook_url,
            github_token,
            repository,
            pr_number,
            api_url: present(Some(args.api_url)).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            filter: ChangelogFilter::new(args.changelog_dir, args.changelog_ext),
            message_delay,
            labels: Labels::for_locale(locale),
            dry_run: args.dry_run,
        }))
    }

    fn relay_config(&self) -> RelayConfig {
        RelayConfig::new(self.repository.clone(), self.pr_number)
            .with_filter(self.filter.clone())
            .with_labels(self.labels.clone())
    }
}

/// Execute the relay command
///
/// # Errors
///
/// Returns configuration, code-host and delivery errors unchanged.
pub fn execute(args: RelayArgs) -> Result<RelayOutcome> {
    let Some(settings) = Settings::resolve(args)? else {
        return Ok(RelayOutcome::Skipped(SkipReason::NoWebhook));
    };
    let config = settings.relay_config();
    info!(
        run_id = %config.run_id,
        repository = %settings.repository,
        pr_number = settings.pr_number,
        dry_run = settings.dry_run,
        "relay configured"
    );

    let host = GitHubClient::new(&settings.api_url, &settings.repository, &settings.github_token)?;

    match (&settings.webhook_url, settings.dry_run) {
        (Some(url), false) => {
            let deliverer =
                Deliverer::new(DiscordWebhook::new(url)?).with_message_delay(settings.message_delay);
            run_relay(&host, &deliverer, &config)
        }
        _ => {
            let deliverer =
                Deliverer::new(StdoutTransport::default()).with_message_delay(Duration::ZERO);
            run_relay(&host, &deliverer, &config)
        }
    }
}
