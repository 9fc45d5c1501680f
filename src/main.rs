//! SPDash - Survey Insights Dashboard
//!
//! A CLI tool that fetches workshop survey responses from a remote JSON
//! endpoint, aggregates per-question means, derives insights, and renders
//! a dashboard report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (fetch, parse, config, write failure)

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod source;

use anyhow::{bail, Context, Result};
use cli::{Args, OutputFormat};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use models::{FeedbackWall, Report, ReportMetadata};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("SPDash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_dashboard(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Dashboard run failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .spdash.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".spdash.toml");

    if path.exists() {
        eprintln!("⚠️  .spdash.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .spdash.toml")?;

    println!("✅ Created .spdash.toml with default settings.");
    println!("   Edit it to set the survey endpoint and cohort size.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete dashboard workflow.
async fn run_dashboard(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let endpoint = config.source.endpoint.clone();
    if endpoint.is_empty() {
        bail!("No survey endpoint configured. Pass --endpoint or set source.endpoint in .spdash.toml");
    }

    let total_trainees = config.cohort.total_trainees;
    if total_trainees == 0 {
        bail!("cohort.total_trainees must be at least 1");
    }

    // Step 1: Fetch the responses (single attempt, no retry)
    println!("📥 Fetching survey responses...");
    println!("   Endpoint: {}", endpoint);

    let survey_source = source::SurveySource::new(&endpoint, config.source.timeout_seconds)
        .context("Failed to create HTTP client")?;

    let spinner = make_spinner(args.quiet);
    spinner.set_message("Waiting for the survey endpoint...");

    let fetch_result = survey_source.fetch().await;
    spinner.finish_and_clear();

    let raw = fetch_result.context("Failed to fetch survey responses")?;
    info!("Received {} raw records", raw.len());

    let records = source::normalize(&raw);

    // Handle --dry-run: summarize the fetch and exit
    if args.dry_run {
        return handle_dry_run(&records, total_trainees);
    }

    // Step 2: Aggregate. The record set is replaced wholesale and the
    // means are memoized on its version, so a rerun over the same
    // snapshot costs nothing.
    let mut record_set = analysis::RecordSet::new();
    record_set.replace(records);

    if record_set.is_empty() {
        warn!("Endpoint returned zero responses");
    }

    let mut memo = analysis::MemoizedAggregate::new();
    let means = memo.get(&record_set);

    // Step 3: Derive insights (only when there is data)
    let insights = means.as_ref().map(analysis::derive_insights);

    // Step 4: Build the report
    println!("\n📝 Generating report...");

    let wall = if config.report.include_wall {
        FeedbackWall::from_records(record_set.records())
    } else {
        FeedbackWall::default()
    };

    let metadata = ReportMetadata::new(endpoint, record_set.len(), total_trainees);
    let response_rate = metadata.response_rate_percent;
    let report = Report {
        metadata,
        means,
        insights,
        wall,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => {
            report::generate_markdown_report(&report, &config.report.title)
        }
    };

    std::fs::write(&args.output, &output)
        .with_context(|| format!("Failed to write report to {}", args.output.display()))?;

    // Print summary
    println!("\n📊 Survey Summary:");
    println!(
        "   Responses: {} / {} trainees ({}%)",
        report.metadata.record_count, report.metadata.total_trainees, response_rate
    );

    match &report.insights {
        Some(insights) => {
            println!("   Confidence growth: {:+.1}", insights.confidence_growth);
            println!(
                "   Top competency: {} ({:.1})",
                insights.top_competency.name, insights.top_competency.score
            );
        }
        None => {
            println!("   ⚠️  No responses yet — nothing to aggregate.");
        }
    }

    if config.report.include_wall && !report.wall.is_empty() {
        println!(
            "   Feedback wall: {} touching moments, {} suggestions",
            report.wall.touching.len(),
            report.wall.suggestions.len()
        );
    }

    println!(
        "\n✅ Dashboard complete! Report saved to: {}",
        args.output.display()
    );

    Ok(())
}

/// Handle --dry-run: print what was fetched without writing a report.
fn handle_dry_run(records: &[models::SurveyRecord], total_trainees: usize) -> Result<()> {
    println!("\n🔍 Dry run: no report will be written.\n");

    if records.is_empty() {
        println!("   No responses received.");
    } else {
        let rate = (records.len() as f64 / total_trainees as f64 * 100.0).round();
        println!(
            "   Received {} responses from {} trainees ({}%).",
            records.len(),
            total_trainees,
            rate
        );
        for record in records {
            let comments = [&record.q14, &record.q15]
                .iter()
                .filter(|c| c.is_some())
                .count();
            println!("     📄 學員 #{} ({} comments)", record.id, comments);
        }
    }

    println!("\n✅ Dry run complete.");
    Ok(())
}

/// Create the fetch spinner (hidden in quiet mode).
fn make_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .spdash.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
