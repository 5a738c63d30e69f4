//! Time-window and date-range filtering.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use medibot_core::{AnalyticsConfig, DateRange, MetricSeries, SampleStore, TimeWindow};

/// Earliest instant kept by `window`, or `None` when everything is kept.
///
/// Month and year steps are calendar-aware and clamp to the last valid day
/// of the target month: 2024-03-31 minus one month is 2024-02-29. A step
/// that leaves chrono's representable range also yields `None`.
pub fn cutoff(window: TimeWindow, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match window {
        TimeWindow::OneWeek => now.checked_sub_signed(Duration::days(7)),
        TimeWindow::OneMonth => now.checked_sub_months(Months::new(1)),
        TimeWindow::ThreeMonths => now.checked_sub_months(Months::new(3)),
        TimeWindow::SixMonths => now.checked_sub_months(Months::new(6)),
        TimeWindow::OneYear => now.checked_sub_months(Months::new(12)),
        TimeWindow::All => None,
    }
}

/// Keeps samples at or after the window's cutoff.
pub fn filter_series(series: &MetricSeries, window: TimeWindow, now: DateTime<Utc>) -> MetricSeries {
    let Some(cutoff) = cutoff(window, now) else {
        return series.clone();
    };

    MetricSeries::with_samples(
        series.kind,
        series
            .samples
            .iter()
            .filter(|sample| sample.instant() >= cutoff)
            .cloned()
            .collect(),
    )
}

pub fn filter_store(store: &SampleStore, window: TimeWindow, now: DateTime<Utc>) -> SampleStore {
    store
        .iter()
        .map(|series| filter_series(series, window, now))
        .collect()
}

/// Keeps samples dated within `[start, end]`.
pub fn filter_between(series: &MetricSeries, start: NaiveDate, end: NaiveDate) -> MetricSeries {
    let range = DateRange::new(start, end);
    MetricSeries::with_samples(
        series.kind,
        series
            .samples
            .iter()
            .filter(|sample| range.contains(sample.date))
            .cloned()
            .collect(),
    )
}

/// Applies an explicit date range to every series.
pub fn filter_store_between(store: &SampleStore, range: DateRange) -> SampleStore {
    store
        .iter()
        .map(|series| filter_between(series, range.start, range.end))
        .collect()
}

/// True once any series has more than `enough_data_samples` readings.
pub fn has_enough_data(store: &SampleStore, config: &AnalyticsConfig) -> bool {
    store
        .iter()
        .any(|series| series.len() > config.enough_data_samples)
}
