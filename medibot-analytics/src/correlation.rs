//! Pearson correlation between metric pairs sharing dates.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use medibot_core::{
    AnalyticsConfig, CorrelationDirection, CorrelationResult, CorrelationStrength, MetricKind,
    MetricSeries, Outcome, PairedPoint, SampleStore,
};
use tracing::debug;

use crate::registry::descriptor;

/// Pairs `a` and `b` on shared dates and computes their coefficient.
///
/// Each series contributes one value per date; a later sample on the same
/// date replaces an earlier one. Points are ordered by date.
pub fn correlate(a: &MetricSeries, b: &MetricSeries, config: &AnalyticsConfig) -> CorrelationResult {
    let values_a = values_by_date(a);
    let values_b = values_by_date(b);

    let points: Vec<PairedPoint> = values_a
        .iter()
        .filter_map(|(date, x)| {
            values_b.get(date).map(|y| PairedPoint {
                x: *x,
                y: *y,
                date: *date,
            })
        })
        .collect();

    let coefficient = if points.len() < config.min_correlation_points.max(2) {
        debug!(
            metric_a = %a.kind,
            metric_b = %b.kind,
            paired = points.len(),
            "not enough shared dates for correlation"
        );
        Outcome::InsufficientData
    } else {
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        let outcome = pearson(&xs, &ys);
        if outcome == Outcome::Degenerate {
            debug!(metric_a = %a.kind, metric_b = %b.kind, "zero variance, correlation undefined");
        }
        outcome
    };

    CorrelationResult {
        metric_a: a.kind,
        metric_b: b.kind,
        points,
        coefficient,
    }
}

/// Sum-based Pearson coefficient, clamped to `[-1, 1]`.
///
/// Needs two equally long inputs of at least two values. `Degenerate` when
/// either series holds one repeated value or the denominator is exactly
/// zero; a varying series at a large offset still correlates.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Outcome<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return Outcome::InsufficientData;
    }
    if is_constant(xs) || is_constant(ys) {
        return Outcome::Degenerate;
    }

    let n = xs.len() as f64;
    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();
    let sum_xx: f64 = xs.iter().map(|x| x * x).sum();
    let sum_yy: f64 = ys.iter().map(|y| y * y).sum();

    let spread_x = n * sum_xx - sum_x * sum_x;
    let spread_y = n * sum_yy - sum_y * sum_y;

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = (spread_x * spread_y).sqrt();
    if denominator <= 0.0 || !denominator.is_finite() {
        return Outcome::Degenerate;
    }

    Outcome::Ok((numerator / denominator).clamp(-1.0, 1.0))
}

pub fn strength(coefficient: f64) -> CorrelationStrength {
    match coefficient.abs() {
        r if r < 0.2 => CorrelationStrength::VeryWeak,
        r if r < 0.4 => CorrelationStrength::Weak,
        r if r < 0.6 => CorrelationStrength::Moderate,
        r if r < 0.8 => CorrelationStrength::Strong,
        _ => CorrelationStrength::VeryStrong,
    }
}

/// Zero counts as negative.
pub fn direction(coefficient: f64) -> CorrelationDirection {
    if coefficient > 0.0 {
        CorrelationDirection::Positive
    } else {
        CorrelationDirection::Negative
    }
}

/// Unordered pairs of the selection, in selection order, whose series both
/// hold at least `min_correlation_points` samples.
pub fn metric_pairs(
    store: &SampleStore,
    selected: &[MetricKind],
    config: &AnalyticsConfig,
) -> Vec<(MetricKind, MetricKind)> {
    let selection = dedup_selection(selected);
    let has_samples = |kind: MetricKind| store.sample_count(kind) >= config.min_correlation_points;

    let mut pairs = Vec::new();
    for (i, first) in selection.iter().enumerate() {
        for second in &selection[i + 1..] {
            if has_samples(*first) && has_samples(*second) {
                pairs.push((*first, *second));
            }
        }
    }
    pairs
}

pub fn correlate_selected(
    store: &SampleStore,
    selected: &[MetricKind],
    config: &AnalyticsConfig,
) -> Vec<CorrelationResult> {
    metric_pairs(store, selected, config)
        .into_iter()
        .filter_map(|(a, b)| Some(correlate(store.series(a)?, store.series(b)?, config)))
        .collect()
}

pub(crate) fn dedup_selection(selected: &[MetricKind]) -> Vec<MetricKind> {
    let mut seen = Vec::with_capacity(selected.len());
    for kind in selected {
        if !seen.contains(kind) {
            seen.push(*kind);
        }
    }
    seen
}

fn values_by_date(series: &MetricSeries) -> BTreeMap<NaiveDate, f64> {
    let extract = descriptor(series.kind).extract;
    series
        .samples
        .iter()
        .filter_map(|sample| extract(&sample.reading).map(|value| (sample.date, value)))
        .collect()
}

/// Repeated values can leave rounding noise in the sums, so they are
/// detected before the formula runs.
fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}
