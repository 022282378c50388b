//! usercleanup entry point.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use usercleanup::cli::Cli;
use usercleanup::dynamodb::{create_client, DynamoDbStore};
use usercleanup::prelude::*;
use usercleanup::prompt::stdin_prompter;
use usercleanup::session::run_session;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the prompts.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.global.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let aws_config = cli.aws_config();

    if !cli.global.is_silent() {
        aprintln!("{}", p_c("DynamoDB User Cleanup"));
        aprintln!("{}", "=".repeat(40));
        aprintln!("{}", p_r("WARNING: This will permanently delete user data!"));
        aprintln!("Use this only for testing purposes.");
        aprintln!("{}", "=".repeat(40));
        aprintln!("{} {}", p_b("Target:"), aws_config.target_display());
        aprintln!();
    }

    let client = create_client(&aws_config).await;
    let store = DynamoDbStore::new(client);
    let mut prompter = stdin_prompter();

    let outcome = run_session(&cli.session_request(), &store, prompter.as_mut()).await?;
    tracing::debug!(?outcome, "Session finished");

    if outcome.is_failure() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
