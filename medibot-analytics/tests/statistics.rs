use chrono::NaiveDate;
use medibot_analytics::stats::{recent_statuses, summarize, trend_percent};
use medibot_analytics::{
    compute_statistics, moving_average, report_trend, status_indicator, trend_chart,
};
use medibot_core::{
    AnalyticsConfig, HealthStatus, MetricKind, MetricSeries, MetricStatistics, Outcome, Reading,
    ReadingComponent, ReportTrend, Sample,
};

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid test date")
}

fn single_series(kind: MetricKind, points: &[(&str, f64)]) -> MetricSeries {
    MetricSeries::with_samples(
        kind,
        points
            .iter()
            .map(|(day, value)| Sample::new(date(day), Reading::Single(*value)))
            .collect(),
    )
}

fn blood_pressure(points: &[(&str, f64, f64)]) -> MetricSeries {
    MetricSeries::with_samples(
        MetricKind::BloodPressure,
        points
            .iter()
            .map(|(day, systolic, diastolic)| {
                Sample::new(
                    date(day),
                    Reading::BloodPressure {
                        systolic: *systolic,
                        diastolic: *diastolic,
                    },
                )
            })
            .collect(),
    )
}

#[test]
fn blood_pressure_components_are_summarized_independently() {
    let series = blood_pressure(&[
        ("2024-01-01", 120.0, 80.0),
        ("2024-01-08", 130.0, 85.0),
        ("2024-01-15", 125.0, 82.0),
    ]);

    let Outcome::Ok(MetricStatistics::BloodPressure {
        systolic,
        diastolic,
    }) = compute_statistics(&series)
    else {
        panic!("expected blood pressure statistics");
    };

    assert_eq!(systolic.min, 120.0);
    assert_eq!(systolic.max, 130.0);
    assert_eq!(systolic.average, 125.0);
    assert_eq!(systolic.recent, 125.0);

    assert_eq!(diastolic.min, 80.0);
    assert_eq!(diastolic.max, 85.0);
    assert_eq!(diastolic.average, 82.3);
    assert_eq!(diastolic.recent, 82.0);
}

#[test]
fn samples_are_sorted_by_date_before_summarizing() {
    let series = single_series(
        MetricKind::HeartRate,
        &[("2024-01-15", 80.0), ("2024-01-01", 60.0), ("2024-01-08", 70.0)],
    );

    let Outcome::Ok(MetricStatistics::Single(stats)) = compute_statistics(&series) else {
        panic!("expected single-value statistics");
    };

    assert_eq!(stats.recent, 80.0);
    assert_eq!(stats.trend_percent, 33.3);
    assert_eq!(stats.average, 70.0);
}

#[test]
fn identical_values_have_flat_trend() {
    let stats = summarize(&[72.0, 72.0, 72.0, 72.0]).expect("non-empty input");
    assert_eq!(stats.trend_percent, 0.0);
    assert_eq!(stats.min, stats.max);
}

#[test]
fn zero_baseline_reports_zero_trend() {
    assert_eq!(trend_percent(0.0, 8.0), 0.0);
    assert_eq!(trend_percent(8.0, 6.0), -25.0);
    assert_eq!(trend_percent(7.0, 6.0), -14.3);
}

#[test]
fn empty_series_is_insufficient() {
    let series = MetricSeries::new(MetricKind::Weight);
    assert_eq!(compute_statistics(&series), Outcome::InsufficientData);
}

#[test]
fn single_sample_is_enough_for_statistics() {
    let series = single_series(MetricKind::Weight, &[("2024-01-01", 70.5)]);
    let Outcome::Ok(MetricStatistics::Single(stats)) = compute_statistics(&series) else {
        panic!("expected single-value statistics");
    };
    assert_eq!(stats.min, 70.5);
    assert_eq!(stats.max, 70.5);
    assert_eq!(stats.trend_percent, 0.0);
}

#[test]
fn moving_average_keeps_leading_values() {
    assert_eq!(
        moving_average(&[10.0, 20.0, 30.0, 40.0], 3),
        vec![10.0, 20.0, 20.0, 30.0]
    );
}

#[test]
fn moving_average_short_input_is_unchanged() {
    assert_eq!(moving_average(&[5.0, 9.0], 3), vec![5.0, 9.0]);
    assert_eq!(moving_average(&[], 3), Vec::<f64>::new());
    assert_eq!(moving_average(&[1.0, 2.0, 3.0], 1), vec![1.0, 2.0, 3.0]);
    assert_eq!(moving_average(&[1.0, 2.0, 3.0], 0), vec![1.0, 2.0, 3.0]);
}

#[test]
fn status_indicator_uses_normal_ranges() {
    assert_eq!(
        status_indicator(MetricKind::HeartRate, 55.0, ReadingComponent::Value),
        HealthStatus::Low
    );
    assert_eq!(
        status_indicator(MetricKind::HeartRate, 100.0, ReadingComponent::Value),
        HealthStatus::Normal
    );
    assert_eq!(
        status_indicator(MetricKind::BloodGlucose, 120.0, ReadingComponent::Value),
        HealthStatus::High
    );
    assert_eq!(
        status_indicator(MetricKind::Weight, 80.0, ReadingComponent::Value),
        HealthStatus::Neutral
    );
    assert_eq!(
        status_indicator(MetricKind::BloodPressure, 85.0, ReadingComponent::Diastolic),
        HealthStatus::High
    );
    assert_eq!(
        status_indicator(MetricKind::BloodPressure, 85.0, ReadingComponent::Systolic),
        HealthStatus::Low
    );
}

#[test]
fn recent_statuses_cover_each_component() {
    let series = blood_pressure(&[("2024-01-01", 118.0, 78.0), ("2024-01-02", 142.0, 76.0)]);
    let statistics = compute_statistics(&series);
    let statuses = recent_statuses(MetricKind::BloodPressure, statistics.value().unwrap());

    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0].label, "Systolic");
    assert_eq!(statuses[0].status, HealthStatus::High);
    assert_eq!(statuses[1].label, "Diastolic");
    assert_eq!(statuses[1].status, HealthStatus::Normal);
}

#[test]
fn trend_chart_adds_smoothed_lines_when_enabled() {
    let series = single_series(
        MetricKind::Sleep,
        &[
            ("2024-01-03", 6.0),
            ("2024-01-01", 7.0),
            ("2024-01-02", 8.0),
            ("2024-01-04", 9.0),
        ],
    );

    let chart = trend_chart(&series, &AnalyticsConfig::default());
    assert_eq!(
        chart.labels,
        vec!["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"]
    );
    assert_eq!(chart.lines.len(), 2);
    assert_eq!(chart.lines[0].label, "Sleep");
    assert_eq!(chart.lines[0].values, vec![7.0, 8.0, 6.0, 9.0]);
    assert_eq!(chart.lines[1].label, "Sleep (Moving Avg)");
    assert!(chart.lines[1].smoothed);
    assert_eq!(chart.lines[1].values, vec![7.0, 8.0, 7.0, 23.0 / 3.0]);

    let plain = AnalyticsConfig {
        moving_average: false,
        ..AnalyticsConfig::default()
    };
    assert_eq!(trend_chart(&series, &plain).lines.len(), 1);
}

fn daily_trend(kind: MetricKind, values: &[f64]) -> ReportTrend {
    let days: Vec<String> = (1..=values.len()).map(|d| format!("2024-01-{d:02}")).collect();
    let points: Vec<(&str, f64)> = days
        .iter()
        .map(String::as_str)
        .zip(values.iter().copied())
        .collect();
    report_trend(&single_series(kind, &points))
}

#[test]
fn report_trend_compares_recent_readings_with_the_average() {
    assert_eq!(
        daily_trend(MetricKind::HeartRate, &[60.0, 60.0, 60.0, 100.0, 100.0, 100.0]),
        ReportTrend::Worsening
    );
    assert_eq!(
        daily_trend(MetricKind::BloodGlucose, &[130.0, 130.0, 130.0, 90.0, 90.0, 90.0]),
        ReportTrend::Improving
    );
    assert_eq!(
        daily_trend(MetricKind::Weight, &[70.0, 70.0, 70.0, 80.0, 80.0, 80.0]),
        ReportTrend::Increasing
    );
    assert_eq!(
        daily_trend(MetricKind::Sleep, &[8.0, 8.0, 8.0, 6.0, 6.0, 6.0]),
        ReportTrend::Decreasing
    );

    // Within 5% of the average.
    assert_eq!(daily_trend(MetricKind::HeartRate, &[70.0, 72.0, 71.0, 73.0]), ReportTrend::Neutral);
    // Too few readings.
    assert_eq!(daily_trend(MetricKind::HeartRate, &[60.0, 100.0]), ReportTrend::Neutral);
}

#[test]
fn report_trend_follows_systolic_for_blood_pressure() {
    let series = blood_pressure(&[
        ("2024-01-01", 150.0, 80.0),
        ("2024-01-02", 150.0, 80.0),
        ("2024-01-03", 150.0, 80.0),
        ("2024-01-04", 110.0, 80.0),
        ("2024-01-05", 110.0, 80.0),
        ("2024-01-06", 110.0, 80.0),
    ]);
    assert_eq!(report_trend(&series), ReportTrend::Improving);
}

#[test]
fn zero_baseline_still_yields_statistics() {
    let series = single_series(MetricKind::Sleep, &[("2024-01-01", 0.0), ("2024-01-02", 6.0)]);
    let Outcome::Ok(MetricStatistics::Single(stats)) = compute_statistics(&series) else {
        panic!("a zero first reading is not degenerate");
    };
    assert_eq!(stats.trend_percent, 0.0);
    assert_eq!(stats.average, 3.0);
}
