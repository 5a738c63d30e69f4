//! Static descriptors for each metric kind.

use medibot_core::{AnalyticsError, HealthStatus, MetricKind, Reading, ReadingComponent};

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn classify(self, value: f64) -> HealthStatus {
        if value < self.min {
            HealthStatus::Low
        } else if value > self.max {
            HealthStatus::High
        } else {
            HealthStatus::Normal
        }
    }
}

/// Reference interval(s) for a metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceRange {
    None,
    Scalar(Bounds),
    BloodPressure { systolic: Bounds, diastolic: Bounds },
}

impl ReferenceRange {
    /// Bounds for one reading component. Blood pressure reads `Value` as
    /// systolic.
    pub fn bounds(self, component: ReadingComponent) -> Option<Bounds> {
        match (self, component) {
            (ReferenceRange::None, _) => None,
            (ReferenceRange::Scalar(bounds), _) => Some(bounds),
            (ReferenceRange::BloodPressure { diastolic, .. }, ReadingComponent::Diastolic) => {
                Some(diastolic)
            }
            (ReferenceRange::BloodPressure { systolic, .. }, _) => Some(systolic),
        }
    }
}

/// Everything the engine needs to know about one metric kind.
#[derive(Debug, Clone, Copy)]
pub struct MetricDescriptor {
    pub kind: MetricKind,
    pub label: &'static str,
    pub unit: &'static str,
    pub normal_range: ReferenceRange,
    /// Readings outside this range are treated as data-entry errors.
    pub plausible_range: ReferenceRange,
    /// Store document fields holding a single value, in lookup order.
    /// Empty for blood pressure, which reads `systolic` and `diastolic`.
    pub value_fields: &'static [&'static str],
    /// Components reported by statistics and charts.
    pub components: &'static [ReadingComponent],
    /// Value used when this metric takes part in a correlation.
    pub extract: fn(&Reading) -> Option<f64>,
}

const SINGLE: &[ReadingComponent] = &[ReadingComponent::Value];
const SYSTOLIC_DIASTOLIC: &[ReadingComponent] =
    &[ReadingComponent::Systolic, ReadingComponent::Diastolic];

static DESCRIPTORS: [MetricDescriptor; 5] = [
    MetricDescriptor {
        kind: MetricKind::BloodPressure,
        label: "Blood Pressure",
        unit: "mmHg",
        normal_range: ReferenceRange::BloodPressure {
            systolic: Bounds::new(90.0, 120.0),
            diastolic: Bounds::new(60.0, 80.0),
        },
        plausible_range: ReferenceRange::BloodPressure {
            systolic: Bounds::new(60.0, 250.0),
            diastolic: Bounds::new(40.0, 150.0),
        },
        value_fields: &[],
        components: SYSTOLIC_DIASTOLIC,
        extract: extract_systolic,
    },
    MetricDescriptor {
        kind: MetricKind::HeartRate,
        label: "Heart Rate",
        unit: "BPM",
        normal_range: ReferenceRange::Scalar(Bounds::new(60.0, 100.0)),
        plausible_range: ReferenceRange::Scalar(Bounds::new(35.0, 220.0)),
        value_fields: &["value", "hours"],
        components: SINGLE,
        extract: extract_single,
    },
    MetricDescriptor {
        kind: MetricKind::BloodGlucose,
        label: "Blood Glucose",
        unit: "mg/dL",
        normal_range: ReferenceRange::Scalar(Bounds::new(70.0, 99.0)),
        plausible_range: ReferenceRange::Scalar(Bounds::new(30.0, 600.0)),
        value_fields: &["value", "hours"],
        components: SINGLE,
        extract: extract_single,
    },
    MetricDescriptor {
        kind: MetricKind::Weight,
        label: "Weight",
        unit: "kg",
        normal_range: ReferenceRange::None,
        plausible_range: ReferenceRange::Scalar(Bounds::new(20.0, 500.0)),
        value_fields: &["value", "hours"],
        components: SINGLE,
        extract: extract_single,
    },
    MetricDescriptor {
        kind: MetricKind::Sleep,
        label: "Sleep",
        unit: "hours",
        normal_range: ReferenceRange::Scalar(Bounds::new(7.0, 9.0)),
        plausible_range: ReferenceRange::Scalar(Bounds::new(0.0, 24.0)),
        value_fields: &["hours", "value"],
        components: SINGLE,
        extract: extract_single,
    },
];

/// Descriptor lookup keyed by kind.
pub fn descriptor(kind: MetricKind) -> &'static MetricDescriptor {
    let index = match kind {
        MetricKind::BloodPressure => 0,
        MetricKind::HeartRate => 1,
        MetricKind::BloodGlucose => 2,
        MetricKind::Weight => 3,
        MetricKind::Sleep => 4,
    };
    &DESCRIPTORS[index]
}

fn extract_single(reading: &Reading) -> Option<f64> {
    component_value(reading, ReadingComponent::Value)
}

fn extract_systolic(reading: &Reading) -> Option<f64> {
    component_value(reading, ReadingComponent::Systolic)
}

/// Reads one component. `None` when the reading has a different shape.
pub fn component_value(reading: &Reading, component: ReadingComponent) -> Option<f64> {
    match (reading, component) {
        (Reading::Single(value), ReadingComponent::Value) => Some(*value),
        (Reading::BloodPressure { systolic, .. }, ReadingComponent::Systolic) => Some(*systolic),
        (Reading::BloodPressure { diastolic, .. }, ReadingComponent::Diastolic) => {
            Some(*diastolic)
        }
        _ => None,
    }
}

pub fn component_label(component: ReadingComponent) -> &'static str {
    match component {
        ReadingComponent::Value => "Recent",
        ReadingComponent::Systolic => "Systolic",
        ReadingComponent::Diastolic => "Diastolic",
    }
}

/// Classifies a value against the kind's normal range.
pub fn status_indicator(kind: MetricKind, value: f64, component: ReadingComponent) -> HealthStatus {
    match descriptor(kind).normal_range.bounds(component) {
        Some(bounds) => bounds.classify(value),
        None => HealthStatus::Neutral,
    }
}

/// Rejects readings of the wrong shape or outside the plausible range.
pub fn validate_reading(kind: MetricKind, reading: &Reading) -> Result<(), AnalyticsError> {
    let invalid = |reason: String| AnalyticsError::InvalidSample { kind, reason };
    let plausible = descriptor(kind).plausible_range;

    match (kind, reading) {
        (MetricKind::BloodPressure, Reading::BloodPressure { systolic, diastolic }) => {
            check_component(plausible, ReadingComponent::Systolic, *systolic).map_err(invalid)?;
            check_component(plausible, ReadingComponent::Diastolic, *diastolic)
                .map_err(invalid)?;
            if systolic <= diastolic {
                return Err(invalid(
                    "systolic must be greater than diastolic".to_string(),
                ));
            }
            Ok(())
        }
        (MetricKind::BloodPressure, Reading::Single(_)) => Err(invalid(
            "expected systolic and diastolic values".to_string(),
        )),
        (_, Reading::Single(value)) => {
            check_component(plausible, ReadingComponent::Value, *value).map_err(invalid)
        }
        (_, Reading::BloodPressure { .. }) => {
            Err(invalid("expected a single value".to_string()))
        }
    }
}

fn check_component(
    range: ReferenceRange,
    component: ReadingComponent,
    value: f64,
) -> Result<(), String> {
    let name = match component {
        ReadingComponent::Value => "value",
        ReadingComponent::Systolic => "systolic",
        ReadingComponent::Diastolic => "diastolic",
    };

    if !value.is_finite() {
        return Err(format!("{name} is not a finite number"));
    }

    match range.bounds(component) {
        Some(bounds) if !bounds.contains(value) => Err(format!(
            "{name} {value} must be between {} and {}",
            bounds.min, bounds.max
        )),
        _ => Ok(()),
    }
}
