//! CLI command handlers.

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use asc_analytics_core::{AnalyticsClient, AuthSession, CodeProvider, Credentials, MetricQuery};
use tracing::info;

use crate::cli::MetricsArgs;

/// Environment variable holding the Apple ID password.
pub const PASSWORD_ENV_VAR: &str = "ASC_PASSWORD";

pub async fn run_metadata_command(username: &str) -> Result<()> {
    let client = login_client(username).await?;

    let metadata = client.get_metadata().await?;
    print_json(&metadata)
}

pub async fn run_metrics_command(username: &str, args: &MetricsArgs) -> Result<()> {
    let client = login_client(username).await?;

    let mut query = MetricQuery::new(
        args.app_id.clone(),
        args.metrics.clone(),
        args.start_date,
        args.end_date,
    );
    if let Some(dimension) = &args.dimension {
        query = query.with_dimension(dimension);
    }

    let series = client.get_metric_series(&query).await?;
    print_json(&series)
}

/// Logs in and wraps the session in an analytics client.
///
/// The password comes from the environment rather than an argument so it
/// never shows up in shell history or process listings.
async fn login_client(username: &str) -> Result<AnalyticsClient> {
    let password = std::env::var(PASSWORD_ENV_VAR)
        .with_context(|| format!("set {PASSWORD_ENV_VAR} to the Apple ID password"))?;
    if password.is_empty() {
        bail!("{PASSWORD_ENV_VAR} is set but empty");
    }

    let credentials = Credentials::new(username, password);
    let mut session = AuthSession::new();
    session.login(&credentials, &StdinCodePrompt).await?;
    info!("logged in; querying analytics");

    Ok(AnalyticsClient::new(session))
}

/// Interactive verification-code prompt.
struct StdinCodePrompt;

impl CodeProvider for StdinCodePrompt {
    fn provide(&self, prompt: &str) -> String {
        // Prompt on stderr so piped stdout stays pure JSON.
        eprint!("{prompt}");
        let _ = io::stderr().flush();

        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            return String::new();
        }
        line.trim().to_string()
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(value).context("could not render response as JSON")?;
    println!("{rendered}");
    Ok(())
}
