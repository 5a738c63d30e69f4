use std::path::PathBuf;

use anyhow::{ensure, Context};
use chrono::NaiveDate;
use clap::Parser;
use medibot_analytics::{analyze_store, descriptor, load_store_str};
use medibot_core::{
    AnalysisRequest, AnalyticsConfig, AnalyticsReport, DateRange, HealthStatus, MetricKind,
    ReportTemplate, ReportTrend, TimeWindow,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "medibot-cli",
    about = "Summarize health-metric trends and correlations from a sample store JSON file."
)]
struct Args {
    /// Path to the sample store JSON document.
    #[arg(short, long)]
    input: PathBuf,

    /// Trailing window: 1w, 1m, 3m, 6m, 1y or all.
    #[arg(short, long, default_value = "1m")]
    window: TimeWindow,

    /// First day of an explicit date range (YYYY-MM-DD). Replaces --window.
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// Last day of the date range, inclusive.
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Comma-separated metrics, e.g. bloodPressure,heartRate.
    #[arg(short, long, value_delimiter = ',')]
    metrics: Vec<MetricKind>,

    /// Preset selection: comprehensive, basic, cardiac or diabetes.
    #[arg(short, long)]
    template: Option<ReportTemplate>,

    /// JSON file overriding analytics thresholds.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the full report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read config file {path:?}"))?;
            serde_json::from_str::<AnalyticsConfig>(&raw)
                .with_context(|| format!("Invalid config file {path:?}"))?
        }
        None => AnalyticsConfig::default(),
    };

    let mut request = match args.template {
        Some(template) => AnalysisRequest::from_template(template, args.window),
        None => AnalysisRequest {
            window: args.window,
            ..AnalysisRequest::default()
        },
    };
    if !args.metrics.is_empty() {
        request.metrics = args.metrics.clone();
    }
    if let (Some(start), Some(end)) = (args.from, args.to) {
        ensure!(start <= end, "--from {start} is after --to {end}");
        request.range = Some(DateRange::new(start, end));
    }

    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Could not read file {:?}", args.input))?;
    let store = load_store_str(&data, &config)
        .with_context(|| format!("Could not load sample store from {:?}", args.input))?;

    let report = analyze_store(&store, &request, &config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &AnalyticsReport) {
    let period = match report.range {
        Some(range) => format!("{} to {}", range.start, range.end),
        None => report.window.label().to_string(),
    };
    println!(
        "Generated at: {}\nPeriod: {period}\nEnough data: {}",
        report.generated_at,
        if report.has_enough_data { "yes" } else { "no" }
    );

    if !report.has_enough_data {
        println!("Keep tracking your metrics regularly to unlock meaningful insights.");
    }

    for metric in &report.metrics {
        println!(
            "\n== {} ({} readings, {})",
            metric.label,
            metric.sample_count,
            trend_label(metric.direction)
        );
        for status in &metric.statuses {
            println!(
                "  {}: {} {} [{}]",
                status.label,
                status.value,
                metric.unit,
                status_label(status.status)
            );
        }
        if let Some(insight) = &metric.insight {
            println!("  {insight}");
        }
    }

    if !report.correlations.is_empty() {
        println!("\n== Correlations");
    }
    for entry in &report.correlations {
        let pair = &entry.correlation;
        println!(
            "  {} & {}: {} ({} shared dates)",
            descriptor(pair.metric_a).label,
            descriptor(pair.metric_b).label,
            entry.description,
            pair.points.len()
        );
        if let Some(insight) = &entry.insight {
            println!("    {insight}");
        }
    }

    if !report.insights.is_empty() {
        println!("\n== Insights");
    }
    for insight in &report.insights {
        println!("  - {insight}");
    }
}

fn trend_label(trend: ReportTrend) -> &'static str {
    match trend {
        ReportTrend::Neutral => "steady",
        ReportTrend::Improving => "improving",
        ReportTrend::Worsening => "worsening",
        ReportTrend::Increasing => "increasing",
        ReportTrend::Decreasing => "decreasing",
    }
}

fn status_label(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Low => "low",
        HealthStatus::Normal => "normal",
        HealthStatus::High => "high",
        HealthStatus::Neutral => "no reference range",
    }
}
