use chrono::{NaiveDate, TimeZone, Utc};
use medibot_analytics::store::parse_sample;
use medibot_analytics::{load_store_str, load_store_value, validate_reading};
use medibot_core::{AnalyticsConfig, AnalyticsError, MetricKind, Reading};
use serde_json::json;

#[test]
fn loads_each_metric_shape() {
    let document = json!({
        "userId": "abc123",
        "bloodPressure": [{ "date": "2024-01-01", "systolic": 118, "diastolic": 76 }],
        "heartRate": [{ "date": "2024-01-01", "value": 64 }],
        "blood_glucose": [{ "date": "2024-01-01", "value": "92" }],
        "weight": [{ "date": "2024-01-01", "value": 70.4, "notes": "  morning  " }],
        "sleep": [{ "date": "2024-01-01", "hours": 7.5 }, { "date": "2024-01-02", "value": 6 }]
    });

    let store = load_store_value(&document, &AnalyticsConfig::default()).expect("store loads");

    let bp = store.series(MetricKind::BloodPressure).expect("blood pressure");
    assert_eq!(
        bp.samples[0].reading,
        Reading::BloodPressure {
            systolic: 118.0,
            diastolic: 76.0
        }
    );
    assert_eq!(
        store.series(MetricKind::BloodGlucose).expect("glucose").samples[0].reading,
        Reading::Single(92.0)
    );
    assert_eq!(
        store.series(MetricKind::Weight).expect("weight").samples[0].notes.as_deref(),
        Some("morning")
    );
    assert_eq!(store.sample_count(MetricKind::Sleep), 2);
    assert_eq!(
        store.series(MetricKind::Sleep).expect("sleep").samples[0].reading,
        Reading::Single(7.5)
    );
}

#[test]
fn unreadable_and_implausible_samples_are_skipped() {
    let document = json!({
        "heartRate": [
            { "date": "2024-01-01", "value": 64 },
            { "date": "not a date", "value": 70 },
            { "date": "2024-01-03" },
            { "date": "2024-01-04", "value": 400 },
            "garbage"
        ],
        "bloodPressure": [
            { "date": "2024-01-01", "systolic": 80, "diastolic": 90 },
            { "date": "2024-01-02", "systolic": 120 }
        ]
    });

    let store = load_store_value(&document, &AnalyticsConfig::default()).expect("store loads");
    assert_eq!(store.sample_count(MetricKind::HeartRate), 1);
    assert_eq!(store.sample_count(MetricKind::BloodPressure), 0);

    let lenient = AnalyticsConfig {
        reject_implausible: false,
        ..AnalyticsConfig::default()
    };
    let store = load_store_value(&document, &lenient).expect("store loads");
    assert_eq!(store.sample_count(MetricKind::HeartRate), 2);
    assert_eq!(store.sample_count(MetricKind::BloodPressure), 1);
}

#[test]
fn timestamps_are_read_from_strings_and_objects() {
    let from_object = parse_sample(
        MetricKind::Weight,
        &json!({ "date": "2024-03-01", "value": 70, "timestamp": { "seconds": 1709251200, "nanoseconds": 0 } }),
    )
    .expect("sample parses");
    assert_eq!(
        from_object.recorded_at,
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).single()
    );

    let from_string = parse_sample(
        MetricKind::Weight,
        &json!({ "value": 70, "timestamp": "2024-03-01T18:30:00+02:00" }),
    )
    .expect("sample parses");
    assert_eq!(from_string.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(
        from_string.recorded_at,
        Utc.with_ymd_and_hms(2024, 3, 1, 16, 30, 0).single()
    );
}

#[test]
fn rfc3339_dates_reduce_to_calendar_dates() {
    let sample = parse_sample(
        MetricKind::HeartRate,
        &json!({ "date": "2024-05-06T07:08:09Z", "value": 61 }),
    )
    .expect("sample parses");
    assert_eq!(sample.date, NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
}

#[test]
fn invalid_documents_are_parse_errors() {
    let config = AnalyticsConfig::default();
    assert!(matches!(
        load_store_str("{ not json", &config),
        Err(AnalyticsError::Parse(_))
    ));
    assert!(matches!(
        load_store_str("[1, 2, 3]", &config),
        Err(AnalyticsError::Parse(_))
    ));
}

#[test]
fn non_array_metric_fields_are_ignored() {
    let store = load_store_str(r#"{ "weight": { "date": "2024-01-01" } }"#, &AnalyticsConfig::default())
        .expect("store loads");
    assert_eq!(store.sample_count(MetricKind::Weight), 0);
}

#[test]
fn validation_follows_entry_form_limits() {
    assert!(validate_reading(MetricKind::HeartRate, &Reading::Single(35.0)).is_ok());
    assert!(validate_reading(MetricKind::HeartRate, &Reading::Single(221.0)).is_err());
    assert!(validate_reading(MetricKind::Sleep, &Reading::Single(0.0)).is_ok());
    assert!(validate_reading(MetricKind::Weight, &Reading::Single(f64::NAN)).is_err());
    assert!(validate_reading(MetricKind::BloodGlucose, &Reading::Single(601.0)).is_err());

    let err = validate_reading(
        MetricKind::BloodPressure,
        &Reading::BloodPressure {
            systolic: 100.0,
            diastolic: 100.0,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AnalyticsError::InvalidSample {
            kind: MetricKind::BloodPressure,
            ..
        }
    ));
    assert!(err.to_string().contains("greater than diastolic"));

    assert!(validate_reading(MetricKind::Weight, &Reading::BloodPressure {
        systolic: 120.0,
        diastolic: 80.0
    })
    .is_err());
}
