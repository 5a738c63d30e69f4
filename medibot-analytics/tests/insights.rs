use medibot_analytics::{correlation_description, correlation_insight, metric_insight};
use medibot_core::{MetricKind, MetricStatistics, Outcome, SummaryStats};

fn summary(average: f64, recent: f64, trend_percent: f64) -> SummaryStats {
    SummaryStats {
        min: average.min(recent),
        max: average.max(recent),
        average,
        recent,
        trend_percent,
    }
}

fn single(average: f64, recent: f64, trend_percent: f64) -> Outcome<MetricStatistics> {
    Outcome::Ok(MetricStatistics::Single(summary(average, recent, trend_percent)))
}

fn blood_pressure(systolic: SummaryStats, diastolic: SummaryStats) -> Outcome<MetricStatistics> {
    Outcome::Ok(MetricStatistics::BloodPressure {
        systolic,
        diastolic,
    })
}

#[test]
fn heart_rate_above_range() {
    assert_eq!(
        metric_insight(MetricKind::HeartRate, &single(72.5, 110.0, 10.0)),
        "Your heart rate has averaged 72.5 BPM. Your most recent reading of 110 BPM is higher than the typical range. Your heart rate has increased by 10.0% over this period."
    );
}

#[test]
fn blood_glucose_below_range() {
    assert_eq!(
        metric_insight(MetricKind::BloodGlucose, &single(88.0, 65.0, -12.5)),
        "Your blood glucose has averaged 88 mg/dL. Your most recent reading of 65 mg/dL is lower than the typical range. Your blood glucose has decreased by 12.5% over this period."
    );
}

#[test]
fn weight_wording() {
    assert_eq!(
        metric_insight(MetricKind::Weight, &single(70.3, 70.0, 0.0)),
        "Your weight has averaged 70.3 kg. Your most recent measurement of 70 kg shows stable weight maintenance over this period."
    );
    assert_eq!(
        metric_insight(MetricKind::Weight, &single(71.0, 72.0, 2.1)),
        "Your weight has averaged 71 kg. Your most recent measurement of 72 kg shows an increase of 2.1% over this period."
    );
}

#[test]
fn sleep_wording() {
    assert_eq!(
        metric_insight(MetricKind::Sleep, &single(6.5, 6.0, -14.3)),
        "Your sleep duration has averaged 6.5 hours. Your most recent sleep record of 6 hours is shorter than recommended. Your sleep duration has decreased by 14.3% over this period."
    );
    assert_eq!(
        metric_insight(MetricKind::Sleep, &single(9.5, 10.0, 0.0)),
        "Your sleep duration has averaged 9.5 hours. Your most recent sleep record of 10 hours is longer than typical. Your sleep duration has remained consistent over this period."
    );
}

#[test]
fn blood_pressure_ranges() {
    assert_eq!(
        metric_insight(
            MetricKind::BloodPressure,
            &blood_pressure(summary(115.0, 118.0, 2.0), summary(75.0, 78.0, 1.0))
        ),
        "Your blood pressure readings average 115/75 mmHg over this period. Your most recent reading of 118/78 mmHg is within the normal range."
    );
    assert_eq!(
        metric_insight(
            MetricKind::BloodPressure,
            &blood_pressure(summary(95.0, 85.0, -5.0), summary(60.0, 55.0, -5.0))
        ),
        "Your blood pressure readings average 95/60 mmHg over this period. Your most recent reading of 85/55 mmHg is lower than the typical range."
    );
    // A high component wins over a low one.
    assert!(metric_insight(
        MetricKind::BloodPressure,
        &blood_pressure(summary(95.0, 85.0, 0.0), summary(80.0, 85.0, 0.0))
    )
    .ends_with("is above the recommended range."));
}

#[test]
fn missing_statistics() {
    assert_eq!(
        metric_insight(MetricKind::HeartRate, &Outcome::InsufficientData),
        "More heart rate readings are needed to analyze this period."
    );
    assert_eq!(
        metric_insight(MetricKind::BloodPressure, &single(120.0, 120.0, 0.0)),
        "Analysis not available for this metric."
    );
}

#[test]
fn correlation_descriptions() {
    assert_eq!(
        correlation_description(&Outcome::Ok(-0.85)),
        "very strong negative correlation (r = -0.85)"
    );
    assert_eq!(
        correlation_description(&Outcome::Ok(0.5)),
        "moderate positive correlation (r = 0.50)"
    );
    assert_eq!(
        correlation_description(&Outcome::Degenerate),
        "Insufficient data"
    );
    assert_eq!(
        correlation_description(&Outcome::InsufficientData),
        "Insufficient data"
    );
}

#[test]
fn sleep_and_blood_pressure_texts_in_either_order() {
    let negative = correlation_insight(
        MetricKind::Sleep,
        MetricKind::BloodPressure,
        &Outcome::Ok(-0.6),
    );
    assert!(negative.starts_with("Better sleep quality appears to be associated with lower blood pressure"));
    assert_eq!(
        negative,
        correlation_insight(MetricKind::BloodPressure, MetricKind::Sleep, &Outcome::Ok(-0.6))
    );

    assert!(correlation_insight(MetricKind::Sleep, MetricKind::BloodPressure, &Outcome::Ok(0.4))
        .starts_with("Unexpectedly, more sleep appears to correlate with higher blood pressure"));
    assert!(correlation_insight(MetricKind::Sleep, MetricKind::BloodPressure, &Outcome::Ok(0.3))
        .starts_with("There doesn't seem to be a strong relationship"));
}

#[test]
fn weight_and_blood_pressure_texts() {
    assert!(correlation_insight(MetricKind::Weight, MetricKind::BloodPressure, &Outcome::Ok(0.9))
        .starts_with("There appears to be a relationship between weight and blood pressure"));
    assert!(correlation_insight(MetricKind::BloodPressure, MetricKind::Weight, &Outcome::Ok(-0.9))
        .starts_with("Your data doesn't show a strong correlation between weight and blood pressure"));
}

#[test]
fn generic_pair_texts() {
    assert_eq!(
        correlation_insight(MetricKind::HeartRate, MetricKind::Weight, &Outcome::Ok(0.75)),
        "The strong positive correlation suggests that as Heart Rate increases, Weight tends to increase as well."
    );
    assert_eq!(
        correlation_insight(MetricKind::HeartRate, MetricKind::BloodGlucose, &Outcome::Ok(-0.5)),
        "The moderate negative correlation suggests that as Heart Rate increases, Blood Glucose tends to decrease."
    );
    assert_eq!(
        correlation_insight(MetricKind::HeartRate, MetricKind::BloodGlucose, &Outcome::Ok(0.0)),
        "The weak negative correlation suggests that as Heart Rate increases, Blood Glucose tends to decrease."
    );
    assert_eq!(
        correlation_insight(MetricKind::HeartRate, MetricKind::Weight, &Outcome::Degenerate),
        "More data points needed to determine correlation."
    );
}
