//! CLI argument definitions using clap derive macros.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Query App Store Connect analytics from the command line.
///
/// Logs in with an Apple ID (password read from ASC_PASSWORD, verification
/// code prompted interactively when the account requires one) and prints
/// the requested analytics as JSON on stdout.
#[derive(Parser, Debug)]
#[command(name = "asc-analytics")]
#[command(author, version, about)]
pub struct Cli {
    /// Apple ID to log in with
    #[arg(short, long)]
    pub username: String,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print API metadata: available measures, dimensions and date ranges
    Metadata,
    /// Print a daily time-series for one app's metrics
    Metrics(MetricsArgs),
}

#[derive(clap::Args, Debug)]
pub struct MetricsArgs {
    /// Numeric app identifier (adam id)
    #[arg(short, long)]
    pub app_id: String,

    /// Metric to fetch; repeat for several (e.g. -m units -m pageViewCount)
    #[arg(short, long = "metric", required = true)]
    pub metrics: Vec<String>,

    /// Dimension to group by (top 10 values, descending)
    #[arg(short, long)]
    pub dimension: Option<String>,

    /// First day of the window (YYYY-MM-DD)
    #[arg(short, long)]
    pub start_date: NaiveDate,

    /// Last day of the window (YYYY-MM-DD)
    #[arg(short, long)]
    pub end_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_cli_metadata_subcommand_parses() {
        let cli = Cli::try_parse_from(["asc-analytics", "-u", "dev@example.com", "metadata"])
            .unwrap();
        assert_eq!(cli.username, "dev@example.com");
        assert!(matches!(cli.command, Command::Metadata));
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_cli_username_is_required() {
        let result = Cli::try_parse_from(["asc-analytics", "metadata"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_subcommand_is_required() {
        let result = Cli::try_parse_from(["asc-analytics", "-u", "dev@example.com"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingSubcommand);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let cli = Cli::try_parse_from(["asc-analytics", "-u", "a@b.c", "-v", "metadata"]).unwrap();
        assert_eq!(cli.verbose, 1);

        let cli = Cli::try_parse_from(["asc-analytics", "-u", "a@b.c", "-vv", "metadata"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let cli = Cli::try_parse_from(["asc-analytics", "-u", "a@b.c", "-q", "metadata"]).unwrap();
        assert!(cli.quiet);

        let cli =
            Cli::try_parse_from(["asc-analytics", "-u", "a@b.c", "--quiet", "metadata"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        // --help causes early exit, so we check it returns an error with Help kind
        let result = Cli::try_parse_from(["asc-analytics", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        // --version causes early exit, so we check it returns an error with Version kind
        let result = Cli::try_parse_from(["asc-analytics", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let result =
            Cli::try_parse_from(["asc-analytics", "-u", "a@b.c", "--invalid-flag", "metadata"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    // ==================== Metrics Subcommand Tests ====================

    fn parse_metrics(extra: &[&str]) -> Result<Cli, clap::Error> {
        let mut argv = vec![
            "asc-analytics",
            "-u",
            "dev@example.com",
            "metrics",
            "-a",
            "123",
            "-m",
            "units",
            "-s",
            "2024-01-01",
            "-e",
            "2024-01-31",
        ];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv)
    }

    #[test]
    fn test_cli_metrics_parses_all_required_args() {
        let cli = parse_metrics(&[]).unwrap();
        let Command::Metrics(args) = cli.command else {
            panic!("expected the metrics subcommand");
        };
        assert_eq!(args.app_id, "123");
        assert_eq!(args.metrics, vec!["units".to_string()]);
        assert!(args.dimension.is_none());
        assert_eq!(args.start_date, date(2024, 1, 1));
        assert_eq!(args.end_date, date(2024, 1, 31));
    }

    #[test]
    fn test_cli_metrics_metric_flag_repeats() {
        let cli = parse_metrics(&["-m", "pageViewCount"]).unwrap();
        let Command::Metrics(args) = cli.command else {
            panic!("expected the metrics subcommand");
        };
        assert_eq!(
            args.metrics,
            vec!["units".to_string(), "pageViewCount".to_string()]
        );
    }

    #[test]
    fn test_cli_metrics_dimension_flag_sets_dimension() {
        let cli = parse_metrics(&["-d", "source"]).unwrap();
        let Command::Metrics(args) = cli.command else {
            panic!("expected the metrics subcommand");
        };
        assert_eq!(args.dimension.as_deref(), Some("source"));
    }

    #[test]
    fn test_cli_metrics_rejects_malformed_date() {
        let result = Cli::try_parse_from([
            "asc-analytics",
            "-u",
            "dev@example.com",
            "metrics",
            "-a",
            "123",
            "-m",
            "units",
            "-s",
            "01/01/2024",
            "-e",
            "2024-01-31",
        ]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_metrics_requires_at_least_one_metric() {
        let result = Cli::try_parse_from([
            "asc-analytics",
            "-u",
            "dev@example.com",
            "metrics",
            "-a",
            "123",
            "-s",
            "2024-01-01",
            "-e",
            "2024-01-31",
        ]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_metrics_requires_app_id() {
        let result = Cli::try_parse_from([
            "asc-analytics",
            "-u",
            "dev@example.com",
            "metrics",
            "-m",
            "units",
            "-s",
            "2024-01-01",
            "-e",
            "2024-01-31",
        ]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
