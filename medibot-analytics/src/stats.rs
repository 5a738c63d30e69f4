//! Descriptive statistics, smoothing and trend-chart lines.

use medibot_core::{
    AnalyticsConfig, ComponentStatus, MetricKind, MetricSeries, MetricStatistics, Outcome,
    ReadingComponent, ReportTrend, SummaryStats, TrendChart, TrendLine,
};
use tracing::debug;

use crate::registry::{component_label, component_value, descriptor, status_indicator};

/// Readings averaged as "recent" by the report trend.
const RECENT_TREND_READINGS: usize = 3;
/// Percent deviation from the period average that counts as a trend.
const REPORT_TREND_THRESHOLD: f64 = 5.0;

/// Statistics over a series, sorted by date first.
pub fn compute_statistics(series: &MetricSeries) -> Outcome<MetricStatistics> {
    let sorted = series.sorted();

    let statistics = match series.kind {
        MetricKind::BloodPressure => {
            let systolic = summarize(&component_values(&sorted, ReadingComponent::Systolic));
            let diastolic = summarize(&component_values(&sorted, ReadingComponent::Diastolic));
            match (systolic, diastolic) {
                (Some(systolic), Some(diastolic)) => Some(MetricStatistics::BloodPressure {
                    systolic,
                    diastolic,
                }),
                _ => None,
            }
        }
        _ => summarize(&component_values(&sorted, ReadingComponent::Value))
            .map(MetricStatistics::Single),
    };

    match statistics {
        Some(statistics) => Outcome::Ok(statistics),
        None => {
            debug!(metric = %series.kind, "no readings to summarize");
            Outcome::InsufficientData
        }
    }
}

/// Min, max, rounded mean, latest value and trend over `values` in order.
pub fn summarize(values: &[f64]) -> Option<SummaryStats> {
    let first = *values.first()?;
    let last = *values.last()?;

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let sum: f64 = values.iter().sum();

    Some(SummaryStats {
        min,
        max,
        average: round1(sum / values.len() as f64),
        recent: last,
        trend_percent: trend_percent(first, last),
    })
}

/// Percent change from `first` to `last`, one decimal place. A zero
/// baseline reports 0.
pub fn trend_percent(first: f64, last: f64) -> f64 {
    if first == 0.0 {
        return 0.0;
    }
    round1((last - first) / first * 100.0)
}

/// Trailing moving average. The first `window - 1` values pass through
/// unchanged.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 {
        return values.to_vec();
    }

    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            if index + 1 < window {
                *value
            } else {
                let span = &values[index + 1 - window..=index];
                span.iter().sum::<f64>() / window as f64
            }
        })
        .collect()
}

/// Raw and smoothed chart lines for a series.
pub fn trend_chart(series: &MetricSeries, config: &AnalyticsConfig) -> TrendChart {
    let sorted = series.sorted();
    let meta = descriptor(series.kind);

    let labels = sorted
        .samples
        .iter()
        .filter(|sample| {
            meta.components
                .iter()
                .all(|component| component_value(&sample.reading, *component).is_some())
        })
        .map(|sample| sample.date.format("%Y-%m-%d").to_string())
        .collect();

    let raw: Vec<TrendLine> = meta
        .components
        .iter()
        .map(|component| TrendLine {
            label: line_label(series.kind, *component),
            values: component_values(&sorted, *component),
            smoothed: false,
        })
        .collect();

    let mut lines = raw.clone();
    if config.moving_average {
        lines.extend(raw.into_iter().map(|line| TrendLine {
            label: smoothed_label(series.kind, &line.label),
            values: moving_average(&line.values, config.moving_average_window),
            smoothed: true,
        }));
    }

    TrendChart { labels, lines }
}

/// Mean of the latest three readings against the mean of the whole series,
/// by date. Blood pressure follows systolic. Fewer than three readings, a
/// zero average or a change within 5% is neutral.
pub fn report_trend(series: &MetricSeries) -> ReportTrend {
    let extract = descriptor(series.kind).extract;
    let values: Vec<f64> = series
        .sorted()
        .samples
        .iter()
        .filter_map(|sample| extract(&sample.reading))
        .collect();

    if values.len() < RECENT_TREND_READINGS {
        return ReportTrend::Neutral;
    }

    let average = values.iter().sum::<f64>() / values.len() as f64;
    if average == 0.0 {
        return ReportTrend::Neutral;
    }
    let recent = values[values.len() - RECENT_TREND_READINGS..].iter().sum::<f64>()
        / RECENT_TREND_READINGS as f64;
    let change = (recent - average) / average * 100.0;

    if change.abs() <= REPORT_TREND_THRESHOLD {
        return ReportTrend::Neutral;
    }

    match series.kind {
        MetricKind::Sleep | MetricKind::Weight if change > 0.0 => ReportTrend::Increasing,
        MetricKind::Sleep | MetricKind::Weight => ReportTrend::Decreasing,
        _ if change < 0.0 => ReportTrend::Improving,
        _ => ReportTrend::Worsening,
    }
}

/// Status of the latest value per component.
pub fn recent_statuses(kind: MetricKind, statistics: &MetricStatistics) -> Vec<ComponentStatus> {
    let status = |component: ReadingComponent, value: f64| ComponentStatus {
        label: component_label(component).to_string(),
        value,
        status: status_indicator(kind, value, component),
    };

    match statistics {
        MetricStatistics::Single(stats) => vec![status(ReadingComponent::Value, stats.recent)],
        MetricStatistics::BloodPressure {
            systolic,
            diastolic,
        } => vec![
            status(ReadingComponent::Systolic, systolic.recent),
            status(ReadingComponent::Diastolic, diastolic.recent),
        ],
    }
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn component_values(series: &MetricSeries, component: ReadingComponent) -> Vec<f64> {
    series
        .samples
        .iter()
        .filter_map(|sample| component_value(&sample.reading, component))
        .collect()
}

fn line_label(kind: MetricKind, component: ReadingComponent) -> String {
    match component {
        ReadingComponent::Value => descriptor(kind).label.to_string(),
        other => component_label(other).to_string(),
    }
}

fn smoothed_label(kind: MetricKind, base: &str) -> String {
    match kind {
        MetricKind::BloodPressure => format!("{base} (Avg)"),
        _ => format!("{base} (Moving Avg)"),
    }
}
