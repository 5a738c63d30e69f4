//! Data model shared by the Medibot health-metric analytics crates.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Thresholds and toggles for an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Add moving-average lines to trend charts.
    pub moving_average: bool,
    /// Number of readings averaged by the smoothing line.
    pub moving_average_window: usize,
    /// Shared dates required before a correlation is computed.
    pub min_correlation_points: usize,
    /// A store has enough data once any series holds more samples than this.
    pub enough_data_samples: usize,
    /// Drop readings outside the plausible range while loading a store.
    pub reject_implausible: bool,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            moving_average: true,
            moving_average_window: 3,
            min_correlation_points: 3,
            enough_data_samples: 3,
            reject_implausible: true,
        }
    }
}

/// Tracked health measurement categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    BloodPressure,
    HeartRate,
    BloodGlucose,
    Weight,
    Sleep,
}

impl MetricKind {
    pub const ALL: [MetricKind; 5] = [
        MetricKind::BloodPressure,
        MetricKind::HeartRate,
        MetricKind::BloodGlucose,
        MetricKind::Weight,
        MetricKind::Sleep,
    ];

    /// Key used by the sample store document.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::BloodPressure => "bloodPressure",
            MetricKind::HeartRate => "heartRate",
            MetricKind::BloodGlucose => "bloodGlucose",
            MetricKind::Weight => "weight",
            MetricKind::Sleep => "sleep",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = AnalyticsError;

    /// Accepts the store's camelCase keys as well as snake_case and kebab-case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "bloodpressure" => Ok(MetricKind::BloodPressure),
            "heartrate" => Ok(MetricKind::HeartRate),
            "bloodglucose" => Ok(MetricKind::BloodGlucose),
            "weight" => Ok(MetricKind::Weight),
            "sleep" => Ok(MetricKind::Sleep),
            _ => Err(AnalyticsError::UnknownMetric(s.to_string())),
        }
    }
}

/// Measured value(s) of one sample.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Reading {
    Single(f64),
    BloodPressure { systolic: f64, diastolic: f64 },
}

/// Which part of a reading a value came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReadingComponent {
    Value,
    Systolic,
    Diastolic,
}

/// One observation of a metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    pub date: NaiveDate,
    pub reading: Reading,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl Sample {
    pub fn new(date: NaiveDate, reading: Reading) -> Self {
        Self {
            date,
            reading,
            notes: None,
            recorded_at: None,
        }
    }

    /// Point in time used for window filtering: the precise timestamp when
    /// recorded, otherwise midnight UTC of the sample date.
    pub fn instant(&self) -> DateTime<Utc> {
        self.recorded_at
            .unwrap_or_else(|| Utc.from_utc_datetime(&self.date.and_time(NaiveTime::MIN)))
    }
}

/// Samples of a single metric kind in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricSeries {
    pub kind: MetricKind,
    pub samples: Vec<Sample>,
}

impl MetricSeries {
    pub fn new(kind: MetricKind) -> Self {
        Self {
            kind,
            samples: Vec::new(),
        }
    }

    pub fn with_samples(kind: MetricKind, samples: Vec<Sample>) -> Self {
        Self { kind, samples }
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Copy of the series ordered by date. Samples sharing a date keep their
    /// insertion order.
    pub fn sorted(&self) -> MetricSeries {
        let mut samples = self.samples.clone();
        samples.sort_by_key(|sample| sample.date);
        MetricSeries {
            kind: self.kind,
            samples,
        }
    }
}

/// Read-only snapshot of every series for one user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SampleStore {
    series: BTreeMap<MetricKind, MetricSeries>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a series, replacing any existing series of the same kind.
    pub fn insert(&mut self, series: MetricSeries) {
        self.series.insert(series.kind, series);
    }

    pub fn series(&self, kind: MetricKind) -> Option<&MetricSeries> {
        self.series.get(&kind)
    }

    /// Number of samples recorded for `kind`, zero when absent.
    pub fn sample_count(&self, kind: MetricKind) -> usize {
        self.series(kind).map_or(0, MetricSeries::len)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricSeries> {
        self.series.values()
    }

    pub fn is_empty(&self) -> bool {
        self.series.values().all(MetricSeries::is_empty)
    }
}

impl FromIterator<MetricSeries> for SampleStore {
    fn from_iter<I: IntoIterator<Item = MetricSeries>>(iter: I) -> Self {
        let mut store = SampleStore::new();
        for series in iter {
            store.insert(series);
        }
        store
    }
}

/// Trailing period an analysis covers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    #[serde(rename = "1w")]
    OneWeek,
    #[default]
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "all")]
    All,
}

impl TimeWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::OneWeek => "1w",
            TimeWindow::OneMonth => "1m",
            TimeWindow::ThreeMonths => "3m",
            TimeWindow::SixMonths => "6m",
            TimeWindow::OneYear => "1y",
            TimeWindow::All => "all",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeWindow::OneWeek => "1 Week",
            TimeWindow::OneMonth => "1 Month",
            TimeWindow::ThreeMonths => "3 Months",
            TimeWindow::SixMonths => "6 Months",
            TimeWindow::OneYear => "1 Year",
            TimeWindow::All => "All Time",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1w" => Ok(TimeWindow::OneWeek),
            "1m" => Ok(TimeWindow::OneMonth),
            "3m" => Ok(TimeWindow::ThreeMonths),
            "6m" => Ok(TimeWindow::SixMonths),
            "1y" => Ok(TimeWindow::OneYear),
            "all" => Ok(TimeWindow::All),
            _ => Err(AnalyticsError::UnknownWindow(s.to_string())),
        }
    }
}

/// Result of a computation that may lack the data it needs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    Ok(T),
    /// Too few samples or paired points.
    InsufficientData,
    /// Enough data, but no variance to compute from.
    Degenerate,
}

impl<T> Outcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::InsufficientData => Outcome::InsufficientData,
            Outcome::Degenerate => Outcome::Degenerate,
        }
    }
}

/// Position of a value relative to its normal range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Low,
    Normal,
    High,
    /// The metric defines no normal range.
    Neutral,
}

/// Descriptive statistics over one numeric sequence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SummaryStats {
    pub min: f64,
    pub max: f64,
    /// Mean rounded to one decimal place.
    pub average: f64,
    /// Value of the latest sample.
    pub recent: f64,
    /// Change from first to last value in percent, one decimal place.
    /// Zero when the first value is zero.
    pub trend_percent: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatistics {
    Single(SummaryStats),
    BloodPressure {
        systolic: SummaryStats,
        diastolic: SummaryStats,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl CorrelationStrength {
    pub fn label(self) -> &'static str {
        match self {
            CorrelationStrength::VeryWeak => "very weak",
            CorrelationStrength::Weak => "weak",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Strong => "strong",
            CorrelationStrength::VeryStrong => "very strong",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationDirection {
    Positive,
    Negative,
}

impl CorrelationDirection {
    pub fn label(self) -> &'static str {
        match self {
            CorrelationDirection::Positive => "positive",
            CorrelationDirection::Negative => "negative",
        }
    }
}

/// Two metric values observed on the same date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PairedPoint {
    pub x: f64,
    pub y: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrelationResult {
    pub metric_a: MetricKind,
    pub metric_b: MetricKind,
    pub points: Vec<PairedPoint>,
    pub coefficient: Outcome<f64>,
}

/// One plotted line of a trend chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendLine {
    pub label: String,
    pub values: Vec<f64>,
    /// True for moving-average lines.
    pub smoothed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrendChart {
    /// Sample dates formatted `%Y-%m-%d`, ascending.
    pub labels: Vec<String>,
    pub lines: Vec<TrendLine>,
}

/// Recent readings against the period average, as shown by the report
/// generator. Vitals read lower as better; sleep and weight only report a
/// direction.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportTrend {
    #[default]
    Neutral,
    Improving,
    Worsening,
    Increasing,
    Decreasing,
}

/// Status of the most recent value of one reading component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentStatus {
    pub label: String,
    pub value: f64,
    pub status: HealthStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricReport {
    pub kind: MetricKind,
    pub label: String,
    pub unit: String,
    pub sample_count: usize,
    pub statistics: Outcome<MetricStatistics>,
    #[serde(default)]
    pub statuses: Vec<ComponentStatus>,
    #[serde(default)]
    pub trend: TrendChart,
    #[serde(default)]
    pub direction: ReportTrend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrelationReport {
    #[serde(flatten)]
    pub correlation: CorrelationResult,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
}

/// Preset metric selections offered by the report generator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportTemplate {
    Comprehensive,
    Basic,
    Cardiac,
    Diabetes,
}

impl ReportTemplate {
    pub fn metrics(self) -> Vec<MetricKind> {
        match self {
            ReportTemplate::Comprehensive => MetricKind::ALL.to_vec(),
            ReportTemplate::Basic => vec![
                MetricKind::BloodPressure,
                MetricKind::HeartRate,
                MetricKind::Weight,
            ],
            ReportTemplate::Cardiac => vec![MetricKind::BloodPressure, MetricKind::HeartRate],
            ReportTemplate::Diabetes => vec![MetricKind::BloodGlucose, MetricKind::Weight],
        }
    }

    pub fn includes_insights(self) -> bool {
        !matches!(self, ReportTemplate::Basic)
    }
}

impl FromStr for ReportTemplate {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "comprehensive" => Ok(ReportTemplate::Comprehensive),
            "basic" => Ok(ReportTemplate::Basic),
            "cardiac" => Ok(ReportTemplate::Cardiac),
            "diabetes" => Ok(ReportTemplate::Diabetes),
            other => Err(AnalyticsError::Other(format!("unknown report template {other}"))),
        }
    }
}

/// Inclusive calendar date range picked in the report generator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Empty when `start` is after `end`.
    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// What to analyze: the window, the selected metrics and whether to write
/// narrative insights. An explicit `range` replaces the trailing window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisRequest {
    pub window: TimeWindow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<DateRange>,
    pub metrics: Vec<MetricKind>,
    pub include_insights: bool,
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self {
            window: TimeWindow::OneMonth,
            range: None,
            metrics: vec![
                MetricKind::BloodPressure,
                MetricKind::HeartRate,
                MetricKind::Weight,
            ],
            include_insights: true,
        }
    }
}

impl AnalysisRequest {
    pub fn from_template(template: ReportTemplate, window: TimeWindow) -> Self {
        Self {
            window,
            range: None,
            metrics: template.metrics(),
            include_insights: template.includes_insights(),
        }
    }
}

/// Assembled output of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsReport {
    pub generated_at: DateTime<Utc>,
    pub window: TimeWindow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<DateRange>,
    pub has_enough_data: bool,
    pub metrics: Vec<MetricReport>,
    pub correlations: Vec<CorrelationReport>,
    /// Report-wide observations over the selected metrics.
    #[serde(default)]
    pub insights: Vec<String>,
}

impl AnalyticsReport {
    pub fn metric(&self, kind: MetricKind) -> Option<&MetricReport> {
        self.metrics.iter().find(|report| report.kind == kind)
    }

    /// Looks up a pair in either order.
    pub fn correlation(&self, a: MetricKind, b: MetricKind) -> Option<&CorrelationReport> {
        self.correlations.iter().find(|report| {
            let c = &report.correlation;
            (c.metric_a == a && c.metric_b == b) || (c.metric_a == b && c.metric_b == a)
        })
    }
}

/// Errors raised at the boundaries (loading, parsing). Analytical shortfalls
/// are reported through [`Outcome`] instead.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("could not parse input: {0}")]
    Parse(String),
    #[error("unknown metric kind: {0}")]
    UnknownMetric(String),
    #[error("unknown time window: {0} (expected 1w, 1m, 3m, 6m, 1y or all)")]
    UnknownWindow(String),
    #[error("invalid {kind} sample: {reason}")]
    InvalidSample { kind: MetricKind, reason: String },
    #[error("{0}")]
    Other(String),
}
