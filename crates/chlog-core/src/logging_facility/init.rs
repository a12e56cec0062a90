//! Logging initialization
//!
//! Installs the global tracing subscriber for the selected profile.

use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "chlog_core=info,chlog_net=info,chlog_engine=info,chlog_cli=info";

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output, the default for local runs
    Development,
    /// JSON lines, one object per event, for CI log ingestion
    Production,
    /// No output; tests install the capture layer instead
    Test,
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(Profile::Development),
            "json" | "prod" | "production" => Ok(Profile::Production),
            "test" | "off" => Ok(Profile::Test),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Call once at startup. `RUST_LOG` overrides the default filter. Later
/// calls are ignored, and so is a subscriber that was already installed by
/// someone else.
///
/// Logs go to stderr so that `--dry-run` output on stdout stays clean.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = || {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        };
        match profile {
            Profile::Development => {
                let _ = tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter())
                    .finish()
                    .try_init();
            }
            Profile::Production => {
                let _ = tracing_subscriber::fmt()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter())
                    .finish()
                    .try_init();
            }
            Profile::Test => {
                let _ = tracing_subscriber::registry().try_init();
            }
        }
    });
}
