//! Sample store document to `SampleStore` loader.

use chrono::{DateTime, NaiveDate, Utc};
use medibot_core::{
    AnalyticsConfig, AnalyticsError, MetricKind, MetricSeries, Reading, Sample, SampleStore,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::registry::{descriptor, validate_reading};

/// Load a store snapshot from a JSON string.
pub fn load_store_str(json: &str, config: &AnalyticsConfig) -> Result<SampleStore, AnalyticsError> {
    let value: Value =
        serde_json::from_str(json).map_err(|err| AnalyticsError::Parse(err.to_string()))?;
    load_store_value(&value, config)
}

/// Load a store snapshot from a `serde_json::Value` keyed by metric name.
///
/// Keys that are not metric kinds are ignored, as are entries without a
/// usable date or value. With `reject_implausible`, readings outside the
/// plausible range are dropped as well.
pub fn load_store_value(
    document: &Value,
    config: &AnalyticsConfig,
) -> Result<SampleStore, AnalyticsError> {
    let metrics = document.as_object().ok_or_else(|| {
        AnalyticsError::Parse("expected an object keyed by metric name".to_string())
    })?;

    let mut store = SampleStore::new();

    for (key, entries) in metrics {
        let Ok(kind) = key.parse::<MetricKind>() else {
            debug!(key = %key, "ignoring non-metric field");
            continue;
        };

        let Some(entries) = entries.as_array() else {
            warn!(metric = %kind, "metric field is not an array, skipping");
            continue;
        };

        let mut series = MetricSeries::new(kind);
        for (index, entry) in entries.iter().enumerate() {
            let sample = match parse_sample(kind, entry) {
                Ok(sample) => sample,
                Err(reason) => {
                    warn!(metric = %kind, index, %reason, "skipping unreadable sample");
                    continue;
                }
            };

            if config.reject_implausible {
                if let Err(err) = validate_reading(kind, &sample.reading) {
                    warn!(metric = %kind, index, error = %err, "skipping implausible sample");
                    continue;
                }
            }

            series.push(sample);
        }

        store.insert(series);
    }

    Ok(store)
}

/// Parse one sample object for `kind`.
pub fn parse_sample(kind: MetricKind, entry: &Value) -> Result<Sample, String> {
    if !entry.is_object() {
        return Err("sample is not an object".to_string());
    }

    let recorded_at = entry.get("timestamp").and_then(parse_timestamp);
    let date = entry
        .get("date")
        .and_then(Value::as_str)
        .and_then(parse_date)
        .or_else(|| recorded_at.map(|ts| ts.date_naive()))
        .ok_or_else(|| "missing or malformed date".to_string())?;

    let reading = parse_reading(kind, entry)?;

    Ok(Sample {
        date,
        reading,
        notes: entry
            .get("notes")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string),
        recorded_at,
    })
}

fn parse_reading(kind: MetricKind, entry: &Value) -> Result<Reading, String> {
    if kind == MetricKind::BloodPressure {
        let systolic = numeric_field(entry, "systolic");
        let diastolic = numeric_field(entry, "diastolic");
        return match (systolic, diastolic) {
            (Some(systolic), Some(diastolic)) => Ok(Reading::BloodPressure {
                systolic,
                diastolic,
            }),
            _ => Err("missing systolic or diastolic value".to_string()),
        };
    }

    descriptor(kind)
        .value_fields
        .iter()
        .find_map(|field| numeric_field(entry, field))
        .map(Reading::Single)
        .ok_or_else(|| "missing numeric value".to_string())
}

/// Accepts JSON numbers and numeric strings, as written by the entry form.
fn numeric_field(entry: &Value, field: &str) -> Option<f64> {
    let value = entry.get(field)?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|text| text.trim().parse::<f64>().ok()))
        .filter(|number| number.is_finite())
}

/// `YYYY-MM-DD`, or an RFC 3339 timestamp reduced to its UTC date.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(value).map(|dt| dt.date_naive()))
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// RFC 3339 string or a document-store timestamp object
/// `{ "seconds": .., "nanoseconds": .. }`.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    if let Some(text) = value.as_str() {
        return parse_datetime(text);
    }

    let seconds = value
        .get("seconds")
        .or_else(|| value.get("_seconds"))
        .and_then(Value::as_i64)?;
    let nanos = value
        .get("nanoseconds")
        .or_else(|| value.get("_nanoseconds"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    DateTime::from_timestamp(seconds, u32::try_from(nanos).ok()?)
}
