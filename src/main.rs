use analytics::{BaselineMetric, FunnelStep, MicroInsight};
use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use configuration::{LoggingSettings, Settings};
use core_types::{CompareMode, TimeRange};
use dashboard::{Dashboard, DashboardReport, IngestSummary};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// The main entry point for the funnel dashboard.
fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = configuration::load_config_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let _log_guard = init_tracing(&settings.logging);

    // Execute the appropriate command
    match cli.command {
        Commands::Report(args) => handle_report(args, settings),
        Commands::Ingest(args) => handle_ingest(args, settings),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Funnel analytics for the quoting dashboard.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = configuration::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dashboard report for an event export.
    Report(ReportArgs),
    /// Parse an event export and summarize what would be accepted.
    Ingest(IngestArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// A JSON array of funnel events, already scoped to one account.
    #[arg(long)]
    events: PathBuf,

    /// The reporting window (7d, 30d, 90d or all).
    #[arg(long)]
    range: Option<TimeRange>,

    /// The comparison mode (off or rolling_avg).
    #[arg(long)]
    compare: Option<CompareMode>,

    /// Keep only events of this account.
    #[arg(long)]
    account: Option<String>,

    /// Report only this baseline metric (depositConversion, avgQuoteValue,
    /// totalDeposits or quotesCompleted). Repeatable; defaults to all.
    #[arg(long = "metric")]
    metrics: Vec<BaselineMetric>,

    /// Reference instant (RFC 3339). Defaults to the current time.
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Parser)]
struct IngestArgs {
    /// A JSON array of funnel events.
    #[arg(long)]
    events: PathBuf,

    /// Keep only events of this account.
    #[arg(long)]
    account: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_report(args: ReportArgs, settings: Settings) -> anyhow::Result<()> {
    let mut dashboard_settings = settings.dashboard;
    if let Some(range) = args.range {
        dashboard_settings.time_range = range;
    }
    if let Some(compare) = args.compare {
        dashboard_settings.compare_mode = compare;
    }
    if args.account.is_some() {
        dashboard_settings.account_id = args.account;
    }

    let dashboard = Dashboard::new(dashboard_settings).with_metrics(args.metrics);
    let ingested = dashboard
        .ingest(&args.events)
        .with_context(|| format!("Failed to ingest {}", args.events.display()))?;
    log_ingest(&ingested.summary);

    let now = args.now.unwrap_or_else(Utc::now);
    let report = dashboard.build(&ingested.events, now);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print_report(&report),
    }
    Ok(())
}

fn handle_ingest(args: IngestArgs, settings: Settings) -> anyhow::Result<()> {
    let account = args.account.or(settings.dashboard.account_id);
    let ingested = dashboard::load_events(&args.events, account.as_deref())
        .with_context(|| format!("Failed to ingest {}", args.events.display()))?;
    log_ingest(&ingested.summary);
    println!("{}", serde_json::to_string_pretty(&ingested.summary)?);
    Ok(())
}

fn log_ingest(summary: &IngestSummary) {
    tracing::info!(
        total = summary.total,
        accepted = summary.accepted,
        skipped = summary.skipped,
        other_account = summary.other_account,
        "Event export ingested."
    );
}

/// Installs the global subscriber: stderr always, plus a daily log file when
/// a directory is configured. The returned guard must live until exit.
fn init_tracing(logging: &LoggingSettings) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match &logging.directory {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "funnel-dashboard.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    guard
}

// ==============================================================================
// Table Output
// ==============================================================================

fn print_report(report: &DashboardReport) {
    println!(
        "Funnel report ({}, compare: {}) at {}",
        report.time_range,
        report.compare_mode,
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    let m = &report.metrics;
    let mut metrics = Table::new();
    metrics.set_header(vec!["Metric", "Value"]);
    metrics.add_row(vec!["Quotes started".to_string(), m.quotes_started.to_string()]);
    metrics.add_row(vec!["Quotes completed".to_string(), m.quotes_completed.to_string()]);
    metrics.add_row(vec!["Deposit conversion".to_string(), pct(m.deposit_conversion_rate)]);
    metrics.add_row(vec!["Reveal to deposit".to_string(), pct(m.reveal_to_deposit_conversion)]);
    metrics.add_row(vec!["Avg quote value".to_string(), money(m.avg_quote_value)]);
    metrics.add_row(vec!["Deposits collected".to_string(), money(m.total_deposits_collected)]);
    metrics.add_row(vec!["Pending quotes".to_string(), m.pending_quotes_count.to_string()]);
    metrics.add_row(vec!["Pending quote value".to_string(), money(m.pending_quote_value)]);
    println!("{metrics}");

    if report.gates.funnel.has_minimum_data {
        println!("{}", funnel_table(&report.funnel_steps));
    } else {
        println!("{}", report.gates.funnel.message);
    }

    if !report.gates.trend_chart.has_minimum_data {
        println!("{}", report.gates.trend_chart.message);
    }

    if !report.baselines.is_empty() {
        let mut baselines = Table::new();
        baselines.set_header(vec!["Baseline", "Comparison"]);
        for baseline in &report.baselines {
            baselines.add_row(vec![baseline.metric.to_string(), baseline.comparison.message.clone()]);
        }
        println!("{baselines}");
    }

    print_insights(&report.insights);
}

fn funnel_table(steps: &[FunnelStep]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Step", "Count", "From previous"]);
    for step in steps {
        table.add_row(vec![
            step.label.clone(),
            step.count.to_string(),
            step.conversion_from_previous.map(pct).unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}

fn print_insights(insights: &[MicroInsight]) {
    for insight in insights {
        println!("* {}", insight.text);
    }
}

fn pct(value: Decimal) -> String {
    format!("{}%", value.round_dp(1))
}

fn money(value: Decimal) -> String {
    format!("${}", value.round_dp(2))
}
