//! Health-metric analytics: sample store to `AnalyticsReport`.
//!
//! The pipeline filters each series to a time window, summarizes it,
//! correlates selected metric pairs on shared dates and writes narrative
//! insights. Every step is a pure function of its inputs.

pub mod correlation;
pub mod insight;
pub mod registry;
pub mod stats;
pub mod store;
pub mod window;

use chrono::{DateTime, Utc};
use medibot_core::{
    AnalysisRequest, AnalyticsConfig, AnalyticsError, AnalyticsReport, CorrelationReport,
    MetricReport, MetricSeries, SampleStore,
};
use tracing::info;

pub use correlation::{correlate, correlate_selected, metric_pairs, pearson};
pub use insight::{correlation_description, correlation_insight, metric_insight, report_insights};
pub use registry::{descriptor, status_indicator, validate_reading, MetricDescriptor};
pub use stats::{compute_statistics, moving_average, report_trend, trend_chart};
pub use store::{load_store_str, load_store_value};
pub use window::{
    cutoff, filter_between, filter_series, filter_store, filter_store_between, has_enough_data,
};

/// Load a store document from JSON and analyze it as of now.
pub fn analyze_store_str(
    store_json: &str,
    request: &AnalysisRequest,
    config: &AnalyticsConfig,
) -> Result<AnalyticsReport, AnalyticsError> {
    let store = load_store_str(store_json, config)?;
    Ok(analyze_store(&store, request, config))
}

/// Analyze a store as of the current time.
pub fn analyze_store(
    store: &SampleStore,
    request: &AnalysisRequest,
    config: &AnalyticsConfig,
) -> AnalyticsReport {
    analyze_store_at(store, request, config, Utc::now())
}

/// Analyze a store as of `now`. An explicit date range in the request
/// replaces the trailing window.
pub fn analyze_store_at(
    store: &SampleStore,
    request: &AnalysisRequest,
    config: &AnalyticsConfig,
    now: DateTime<Utc>,
) -> AnalyticsReport {
    let filtered = match request.range {
        Some(range) => filter_store_between(store, range),
        None => filter_store(store, request.window, now),
    };
    let selection = correlation::dedup_selection(&request.metrics);

    let metrics: Vec<MetricReport> = selection
        .iter()
        .map(|kind| {
            let series = filtered
                .series(*kind)
                .cloned()
                .unwrap_or_else(|| MetricSeries::new(*kind));
            metric_report(&series, request.include_insights, config)
        })
        .collect();

    let correlations: Vec<CorrelationReport> = correlate_selected(&filtered, &selection, config)
        .into_iter()
        .map(|correlation| CorrelationReport {
            description: correlation_description(&correlation.coefficient),
            insight: request.include_insights.then(|| {
                correlation_insight(
                    correlation.metric_a,
                    correlation.metric_b,
                    &correlation.coefficient,
                )
            }),
            correlation,
        })
        .collect();

    let enough_data = has_enough_data(&filtered, config);
    let insights = report_insights(&filtered, request);

    info!(
        window = %request.window,
        range = ?request.range,
        metrics = metrics.len(),
        correlations = correlations.len(),
        insights = insights.len(),
        has_enough_data = enough_data,
        "assembled analytics report"
    );

    AnalyticsReport {
        generated_at: now,
        window: request.window,
        range: request.range,
        has_enough_data: enough_data,
        metrics,
        correlations,
        insights,
    }
}

/// Statistics, statuses, chart lines and insight for one filtered series.
pub fn metric_report(
    series: &MetricSeries,
    include_insight: bool,
    config: &AnalyticsConfig,
) -> MetricReport {
    let meta = descriptor(series.kind);
    let statistics = compute_statistics(series);
    let statuses = statistics
        .value()
        .map(|summary| stats::recent_statuses(series.kind, summary))
        .unwrap_or_default();
    let insight = include_insight.then(|| metric_insight(series.kind, &statistics));

    MetricReport {
        kind: series.kind,
        label: meta.label.to_string(),
        unit: meta.unit.to_string(),
        sample_count: series.len(),
        statistics,
        statuses,
        trend: trend_chart(series, config),
        direction: report_trend(series),
        insight,
    }
}
