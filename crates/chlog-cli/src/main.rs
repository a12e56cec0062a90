//! chlog CLI
//!
//! Announces the changelog entries a merged pull request added or changed
//! on a Discord webhook. Designed to run as a CI step after merge.

use chlog_core::errors::ExError;
use chlog_core::logging_facility::{self, Profile};
use chlog_engine::{RelayOutcome, SkipReason};
use clap::Parser;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "chlog-relay", version)]
#[command(about = "Relay changelog edits of a merged PR to a Discord webhook", long_about = None)]
struct Cli {
    #[command(flatten)]
    relay: commands::relay::RelayArgs,
}

/// Process exit status for a failed run
fn exit_code(err: &ExError) -> i32 {
    if err.kind().is_configuration() {
        2
    } else {
        1
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.relay.skips_delivery() {
        println!("{}", SkipReason::NoWebhook);
        return;
    }

    let profile = match cli.relay.log_format.parse::<Profile>() {
        Ok(profile) => profile,
        Err(reason) => {
            eprintln!("Error: CHLOG_LOG_FORMAT is invalid: {}", reason);
            std::process::exit(2);
        }
    };
    logging_facility::init(profile);
    let dry_run = cli.relay.dry_run;

    match commands::relay::execute(cli.relay) {
        Ok(RelayOutcome::Skipped(reason)) => println!("{}", reason),
        Ok(RelayOutcome::Delivered(report)) if dry_run => {
            println!("Dry run: {} message(s) not sent", report.chunk_count());
        }
        Ok(RelayOutcome::Delivered(report)) => {
            println!("Sent {} message(s) to Discord", report.chunk_count());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(exit_code(&e));
        }
    }
}
