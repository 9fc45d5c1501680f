//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// SPDash - survey insights dashboard for training workshops
///
/// Fetch survey responses from a remote JSON endpoint, aggregate the
/// per-question means, derive insights, and render a Markdown or JSON
/// dashboard report.
///
/// Examples:
///   spdash --endpoint https://script.google.com/macros/s/DEPLOYMENT/exec
///   spdash --endpoint https://example.com/responses --format json -o dash.json
///   spdash --endpoint https://example.com/responses --total-trainees 14
///   spdash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Survey endpoint URL serving the JSON response array
    ///
    /// Can also be set via SPDASH_ENDPOINT env var or .spdash.toml config.
    #[arg(short, long, value_name = "URL", env = "SPDASH_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Output file path for the report
    #[arg(short, long, default_value = "survey_report.md", value_name = "FILE")]
    pub output: PathBuf,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .spdash.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Total number of workshop trainees (for the response rate)
    #[arg(long, value_name = "COUNT")]
    pub total_trainees: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Omit the feedback wall section from the report
    #[arg(long)]
    pub no_wall: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: fetch and summarize the responses without writing a report
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .spdash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref endpoint) = self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err("Endpoint URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(total) = self.total_trainees {
            if total == 0 {
                return Err("Total trainees must be at least 1".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            endpoint: Some("https://example.com/exec".to_string()),
            output: PathBuf::from("survey_report.md"),
            format: OutputFormat::Markdown,
            config: None,
            total_trainees: None,
            timeout: None,
            no_wall: false,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_passes_for_defaults() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.endpoint = Some("script.google.com/exec".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_trainees() {
        let mut args = make_args();
        args.total_trainees = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
