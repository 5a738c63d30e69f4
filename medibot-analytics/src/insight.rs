//! Narrative text for metric statistics and correlations.

use medibot_core::{
    AnalysisRequest, CorrelationDirection, HealthStatus, MetricKind, MetricSeries,
    MetricStatistics, Outcome, ReadingComponent, SampleStore, SummaryStats,
};

use crate::correlation::{direction, strength};
use crate::registry::{component_value, descriptor, status_indicator};

/// Phrases for the three trend directions, with the percentage appended to
/// the first two.
struct TrendWording {
    up: &'static str,
    down: &'static str,
    flat: &'static str,
}

const TREND_HAS: TrendWording = TrendWording {
    up: "increased by",
    down: "decreased by",
    flat: "remained stable",
};

const TREND_SLEEP: TrendWording = TrendWording {
    up: "increased by",
    down: "decreased by",
    flat: "remained consistent",
};

const TREND_WEIGHT: TrendWording = TrendWording {
    up: "an increase of",
    down: "a decrease of",
    flat: "stable weight maintenance",
};

/// Summary paragraph for one metric's statistics.
pub fn metric_insight(kind: MetricKind, statistics: &Outcome<MetricStatistics>) -> String {
    let Some(statistics) = statistics.value() else {
        return format!(
            "More {} readings are needed to analyze this period.",
            descriptor(kind).label.to_lowercase()
        );
    };

    match (kind, statistics) {
        (
            MetricKind::BloodPressure,
            MetricStatistics::BloodPressure {
                systolic,
                diastolic,
            },
        ) => blood_pressure_insight(systolic, diastolic),
        (MetricKind::HeartRate, MetricStatistics::Single(stats)) => {
            reading_insight(kind, "heart rate", stats)
        }
        (MetricKind::BloodGlucose, MetricStatistics::Single(stats)) => {
            reading_insight(kind, "blood glucose", stats)
        }
        (MetricKind::Weight, MetricStatistics::Single(stats)) => format!(
            "Your weight has averaged {} kg. Your most recent measurement of {} kg shows {} over this period.",
            number(stats.average),
            number(stats.recent),
            trend_phrase(stats.trend_percent, &TREND_WEIGHT),
        ),
        (MetricKind::Sleep, MetricStatistics::Single(stats)) => {
            let range = match status_indicator(kind, stats.recent, ReadingComponent::Value) {
                HealthStatus::Normal | HealthStatus::Neutral => "within the recommended range",
                HealthStatus::High => "longer than typical",
                HealthStatus::Low => "shorter than recommended",
            };
            format!(
                "Your sleep duration has averaged {} hours. Your most recent sleep record of {} hours is {range}. Your sleep duration has {} over this period.",
                number(stats.average),
                number(stats.recent),
                trend_phrase(stats.trend_percent, &TREND_SLEEP),
            )
        }
        _ => "Analysis not available for this metric.".to_string(),
    }
}

fn blood_pressure_insight(systolic: &SummaryStats, diastolic: &SummaryStats) -> String {
    let kind = MetricKind::BloodPressure;
    let systolic_status = status_indicator(kind, systolic.recent, ReadingComponent::Systolic);
    let diastolic_status = status_indicator(kind, diastolic.recent, ReadingComponent::Diastolic);

    let range = if systolic_status == HealthStatus::Normal && diastolic_status == HealthStatus::Normal
    {
        "within the normal range"
    } else if systolic_status == HealthStatus::High || diastolic_status == HealthStatus::High {
        "above the recommended range"
    } else {
        "lower than the typical range"
    };

    format!(
        "Your blood pressure readings average {}/{} mmHg over this period. Your most recent reading of {}/{} mmHg is {range}.",
        number(systolic.average),
        number(diastolic.average),
        number(systolic.recent),
        number(diastolic.recent),
    )
}

fn reading_insight(kind: MetricKind, noun: &str, stats: &SummaryStats) -> String {
    let unit = descriptor(kind).unit;
    let range = match status_indicator(kind, stats.recent, ReadingComponent::Value) {
        HealthStatus::Normal | HealthStatus::Neutral => "within the normal range",
        HealthStatus::High => "higher than the typical range",
        HealthStatus::Low => "lower than the typical range",
    };

    format!(
        "Your {noun} has averaged {} {unit}. Your most recent reading of {} {unit} is {range}. Your {noun} has {} over this period.",
        number(stats.average),
        number(stats.recent),
        trend_phrase(stats.trend_percent, &TREND_HAS),
    )
}

fn trend_phrase(trend: f64, wording: &TrendWording) -> String {
    if trend > 0.0 {
        format!("{} {:.1}%", wording.up, trend)
    } else if trend < 0.0 {
        format!("{} {:.1}%", wording.down, trend.abs())
    } else {
        wording.flat.to_string()
    }
}

/// Short label such as `moderate positive correlation (r = 0.50)`.
pub fn correlation_description(coefficient: &Outcome<f64>) -> String {
    match coefficient.value() {
        Some(r) => format!(
            "{} {} correlation (r = {:.2})",
            strength(*r).label(),
            direction(*r).label(),
            r
        ),
        None => "Insufficient data".to_string(),
    }
}

/// Interpretation of a correlation, with hand-written text for the
/// sleep/blood pressure and weight/blood pressure pairs.
pub fn correlation_insight(a: MetricKind, b: MetricKind, coefficient: &Outcome<f64>) -> String {
    let Some(r) = coefficient.value().copied() else {
        return "More data points needed to determine correlation.".to_string();
    };

    if is_pair(a, b, MetricKind::Sleep, MetricKind::BloodPressure) {
        return if r < -0.3 {
            "Better sleep quality appears to be associated with lower blood pressure readings, which aligns with research showing sleep's importance for cardiovascular health."
        } else if r > 0.3 {
            "Unexpectedly, more sleep appears to correlate with higher blood pressure in your data. This could be worth discussing with a healthcare provider."
        } else {
            "There doesn't seem to be a strong relationship between your sleep and blood pressure based on available data."
        }
        .to_string();
    }

    if is_pair(a, b, MetricKind::Weight, MetricKind::BloodPressure) {
        return if r > 0.3 {
            "There appears to be a relationship between weight and blood pressure, which is consistent with medical research showing that weight management can help control blood pressure."
        } else {
            "Your data doesn't show a strong correlation between weight and blood pressure, which may indicate other factors have more influence on your blood pressure."
        }
        .to_string();
    }

    let coarse = match r.abs() {
        v if v < 0.3 => "weak",
        v if v < 0.7 => "moderate",
        _ => "strong",
    };
    let label_a = descriptor(a).label;
    let label_b = descriptor(b).label;

    match direction(r) {
        CorrelationDirection::Positive => format!(
            "The {coarse} positive correlation suggests that as {label_a} increases, {label_b} tends to increase as well."
        ),
        CorrelationDirection::Negative => format!(
            "The {coarse} negative correlation suggests that as {label_a} increases, {label_b} tends to decrease."
        ),
    }
}

fn is_pair(a: MetricKind, b: MetricKind, first: MetricKind, second: MetricKind) -> bool {
    (a == first && b == second) || (a == second && b == first)
}

/// Display without a trailing `.0` on whole numbers.
fn number(value: f64) -> String {
    format!("{}", value + 0.0)
}

/// Latest readings averaged by the vital-sign report rules.
const RECENT_READINGS: usize = 3;
const RECENT_SLEEP_READINGS: usize = 5;
/// Samples per series before weight and blood pressure are compared.
const CO_TREND_READINGS: usize = 5;
/// Relative change, first three readings against the last three.
const CO_TREND_THRESHOLD: f64 = 0.03;
/// A report with fewer specific insights gets the general ones appended.
const MIN_REPORT_INSIGHTS: usize = 2;

const REPORT_INSUFFICIENT: &str = "Insufficient data to generate insights. Continue tracking your health metrics regularly to receive personalized insights.";
const GENERAL_INSIGHTS: [&str; 2] = [
    "Consistent monitoring of your health metrics can reveal important patterns over time. Try to record measurements at similar times each day for the most accurate trends.",
    "Consider discussing your health tracking data with your healthcare provider at your next appointment.",
];

/// Report-wide insights over the selected metrics of a filtered store.
///
/// Empty when the request turns insights off. A store without any series
/// of three readings gets a single "insufficient data" note.
pub fn report_insights(store: &SampleStore, request: &AnalysisRequest) -> Vec<String> {
    if !request.include_insights {
        return Vec::new();
    }
    if !store.iter().any(|series| series.len() >= RECENT_READINGS) {
        return vec![REPORT_INSUFFICIENT.to_string()];
    }

    let selected = |kind: MetricKind| request.metrics.contains(&kind);
    let mut insights: Vec<&'static str> = Vec::new();

    if selected(MetricKind::BloodPressure) {
        let series = store.series(MetricKind::BloodPressure);
        let systolic =
            series.and_then(|s| recent_mean(s, ReadingComponent::Systolic, RECENT_READINGS));
        let diastolic =
            series.and_then(|s| recent_mean(s, ReadingComponent::Diastolic, RECENT_READINGS));
        if let (Some(systolic), Some(diastolic)) = (systolic, diastolic) {
            insights.push(blood_pressure_note(systolic, diastolic));
        }
    }

    if selected(MetricKind::BloodGlucose) {
        if let Some(note) = store
            .series(MetricKind::BloodGlucose)
            .and_then(|s| recent_mean(s, ReadingComponent::Value, RECENT_READINGS))
            .and_then(glucose_note)
        {
            insights.push(note);
        }
    }

    if selected(MetricKind::HeartRate) {
        if let Some(note) = store
            .series(MetricKind::HeartRate)
            .and_then(|s| recent_mean(s, ReadingComponent::Value, RECENT_READINGS))
            .and_then(heart_rate_note)
        {
            insights.push(note);
        }
    }

    if selected(MetricKind::Sleep) {
        if let Some(note) = store
            .series(MetricKind::Sleep)
            .and_then(|s| recent_mean(s, ReadingComponent::Value, RECENT_SLEEP_READINGS))
            .and_then(sleep_note)
        {
            insights.push(note);
        }
    }

    if selected(MetricKind::Weight) && selected(MetricKind::BloodPressure) {
        if let Some(note) = co_trend_note(store) {
            insights.push(note);
        }
    }

    if insights.len() < MIN_REPORT_INSIGHTS {
        insights.extend(GENERAL_INSIGHTS);
    }

    insights.into_iter().map(str::to_string).collect()
}

fn blood_pressure_note(systolic: f64, diastolic: f64) -> &'static str {
    if systolic > 140.0 || diastolic > 90.0 {
        "Recent blood pressure readings appear elevated. Consider discussing these results with your healthcare provider."
    } else if systolic > 120.0 || diastolic > 80.0 {
        "Your recent blood pressure readings suggest pre-hypertension. Regular monitoring and lifestyle habits may help maintain healthier levels."
    } else if systolic < 90.0 || diastolic < 60.0 {
        "Your recent blood pressure readings are lower than typical ranges. If you're experiencing dizziness or fatigue, consult with your healthcare provider."
    } else {
        "Your blood pressure appears to be within normal ranges. Keep up your healthy habits!"
    }
}

fn glucose_note(average: f64) -> Option<&'static str> {
    if average > 180.0 {
        Some("Recent blood glucose readings are elevated. Consider discussing diabetes management with your healthcare provider.")
    } else if average > 130.0 {
        Some("Your recent blood glucose readings are higher than target range. Regular exercise and diet management may help.")
    } else if average < 70.0 {
        Some("Your recent blood glucose readings are below normal range, which can lead to hypoglycemia. Keep quick-acting carbohydrates accessible.")
    } else {
        None
    }
}

fn heart_rate_note(average: f64) -> Option<&'static str> {
    if average > 100.0 {
        Some("Your recent resting heart rate is elevated. This can be normal during stress or exercise, but if persistent, consider consulting your healthcare provider.")
    } else if average < 60.0 {
        Some("Your resting heart rate is lower than typical ranges. This can be normal for athletes but may warrant discussion with your healthcare provider if you're experiencing symptoms.")
    } else {
        None
    }
}

/// Six to seven hours gets no note.
fn sleep_note(average: f64) -> Option<&'static str> {
    if average < 6.0 {
        Some("You've been averaging less than 6 hours of sleep. Insufficient sleep can impact many aspects of health including metabolism and immune function.")
    } else if average > 9.0 {
        Some("You've been averaging more than 9 hours of sleep. While individual needs vary, excessive sleep can sometimes be associated with other health conditions.")
    } else if average >= 7.0 {
        Some("Your sleep duration appears to be within recommended ranges. Quality sleep contributes to better overall health.")
    } else {
        None
    }
}

fn co_trend_note(store: &SampleStore) -> Option<&'static str> {
    let weight = store.series(MetricKind::Weight)?;
    let pressure = store.series(MetricKind::BloodPressure)?;
    if weight.len() < CO_TREND_READINGS || pressure.len() < CO_TREND_READINGS {
        return None;
    }

    let weight_change = early_to_late_change(weight, ReadingComponent::Value)?;
    let pressure_change = early_to_late_change(pressure, ReadingComponent::Systolic)?;

    if weight_change > CO_TREND_THRESHOLD && pressure_change > CO_TREND_THRESHOLD {
        Some("There appears to be a correlation between weight increase and blood pressure elevation in your data. Weight management strategies may help improve both metrics.")
    } else if weight_change < -CO_TREND_THRESHOLD && pressure_change < -CO_TREND_THRESHOLD {
        Some("Your data shows a positive trend - both weight and blood pressure appear to be decreasing together. Keep up the good work!")
    } else {
        None
    }
}

fn component_values(series: &MetricSeries, component: ReadingComponent) -> Vec<f64> {
    series
        .sorted()
        .samples
        .iter()
        .filter_map(|sample| component_value(&sample.reading, component))
        .collect()
}

/// Mean of the latest `count` readings by date, when there are that many.
fn recent_mean(series: &MetricSeries, component: ReadingComponent, count: usize) -> Option<f64> {
    let values = component_values(series, component);
    if values.len() < count {
        return None;
    }
    mean(&values[values.len() - count..])
}

/// Relative change from the mean of the first three readings to the mean of
/// the last three.
fn early_to_late_change(series: &MetricSeries, component: ReadingComponent) -> Option<f64> {
    let values = component_values(series, component);
    if values.len() < RECENT_READINGS {
        return None;
    }
    let early = mean(&values[..RECENT_READINGS])?;
    let late = mean(&values[values.len() - RECENT_READINGS..])?;
    (early != 0.0).then(|| (late - early) / early)
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}
