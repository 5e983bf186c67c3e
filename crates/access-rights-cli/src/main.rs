// Copyright 2026 CESSDA ERIC
// SPDX-License-Identifier: Apache-2.0

//! access-rights-check — verify a CESSDA catalogue record's Access Rights term.

use anyhow::Result;
use clap::Parser;

use access_rights::{AccessRightsChecker, CheckError, CheckerConfig, Verdict};

/// Exit status when the detail URL is structurally invalid.
const EXIT_INVALID_REFERENCE: i32 = 3;

/// Exit status for unusable configuration, matching clap's usage errors.
const EXIT_USAGE: i32 = 2;

#[derive(Parser)]
#[command(
    name = "access-rights-check",
    about = "Check that a CESSDA Data Catalogue record uses an approved Access Rights term",
    version,
    after_help = "Exit status: 0 = pass, 1 = fail or indeterminate, 2 = usage error, 3 = invalid detail URL."
)]
struct Cli {
    /// Catalogue detail URL (e.g. https://datacatalogue.cessda.eu/detail/abc123?lang=en)
    url: String,

    /// OAI-PMH GetRecord URL prefix, identifier appended [default: $ACCESS_RIGHTS_METADATA_URL or CESSDA]
    #[arg(long)]
    metadata_url: Option<String>,

    /// Access Rights vocabulary endpoint [default: $ACCESS_RIGHTS_VOCABULARY_URL or CESSDA]
    #[arg(long)]
    vocabulary_url: Option<String>,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Print the result as a JSON object instead of the bare verdict
    #[arg(long)]
    json: bool,
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn exit_code(verdict: Verdict) -> i32 {
    if verdict.is_pass() {
        0
    } else {
        1
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);

    let config = match CheckerConfig::resolve(
        cli.metadata_url.as_deref(),
        cli.vocabulary_url.as_deref(),
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("  Error: {e}");
            std::process::exit(EXIT_USAGE);
        }
    };

    let checker = AccessRightsChecker::new(config)?;
    let verdict = match checker.check_record(&cli.url).await {
        Ok(verdict) => verdict,
        Err(e @ CheckError::InvalidReference { .. }) => {
            tracing::error!("{}", access_rights::logging::log_safe(&e.to_string()));
            eprintln!("  Error: {e}");
            std::process::exit(EXIT_INVALID_REFERENCE);
        }
        Err(e) => return Err(e.into()),
    };

    if cli.json {
        println!(
            "{}",
            serde_json::json!({ "url": cli.url, "verdict": verdict })
        );
    } else {
        println!("{verdict}");
    }

    std::process::exit(exit_code(verdict));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(Verdict::Pass), 0);
        assert_eq!(exit_code(Verdict::Fail), 1);
        assert_eq!(exit_code(Verdict::Indeterminate), 1);
    }

    #[test]
    fn test_url_is_required() {
        let err = Cli::try_parse_from(["access-rights-check"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), EXIT_USAGE);
    }
}
