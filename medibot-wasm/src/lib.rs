//! Framework-neutral WASM <-> JavaScript bridge for the analytics engine.

use medibot_core::{
    AnalysisRequest, AnalyticsConfig, AnalyticsError, DateRange, MetricKind, ReportTemplate,
    TimeWindow,
};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsAnalysisRequest {
    #[serde(default)]
    window: Option<TimeWindow>,
    /// `{ "start": "YYYY-MM-DD", "end": "YYYY-MM-DD" }`, inclusive.
    #[serde(default)]
    range: Option<DateRange>,
    #[serde(default)]
    metrics: Option<Vec<MetricKind>>,
    #[serde(default)]
    template: Option<ReportTemplate>,
    #[serde(default)]
    include_insights: Option<bool>,
}

impl From<JsAnalysisRequest> for AnalysisRequest {
    fn from(req: JsAnalysisRequest) -> Self {
        let window = req.window.unwrap_or_default();
        let mut base = match req.template {
            Some(template) => AnalysisRequest::from_template(template, window),
            None => AnalysisRequest {
                window,
                ..AnalysisRequest::default()
            },
        };
        base.range = req.range;
        if let Some(metrics) = req.metrics {
            base.metrics = metrics;
        }
        if let Some(include) = req.include_insights {
            base.include_insights = include;
        }
        base
    }
}

#[derive(Deserialize)]
struct JsAnalyticsConfig {
    #[serde(default)]
    moving_average: Option<bool>,
    #[serde(default)]
    moving_average_window: Option<usize>,
    #[serde(default)]
    min_correlation_points: Option<usize>,
    #[serde(default)]
    enough_data_samples: Option<usize>,
    #[serde(default)]
    reject_implausible: Option<bool>,
}

impl From<JsAnalyticsConfig> for AnalyticsConfig {
    fn from(cfg: JsAnalyticsConfig) -> Self {
        let mut base = AnalyticsConfig::default();
        if let Some(enabled) = cfg.moving_average {
            base.moving_average = enabled;
        }
        if let Some(window) = cfg.moving_average_window {
            base.moving_average_window = window;
        }
        if let Some(points) = cfg.min_correlation_points {
            base.min_correlation_points = points;
        }
        if let Some(samples) = cfg.enough_data_samples {
            base.enough_data_samples = samples;
        }
        if let Some(reject) = cfg.reject_implausible {
            base.reject_implausible = reject;
        }
        base
    }
}

/// Analyze a sample store document (the object keyed by metric name) and
/// return the report as a plain JS object.
#[wasm_bindgen]
pub fn analyze_metrics(
    store: JsValue,
    request: Option<JsValue>,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let store_value = from_value::<serde_json::Value>(store)
        .map_err(|err| JsValue::from_str(&format!("Could not read sample store: {err}")))?;

    let request = match request {
        Some(js_request) => {
            let req: JsAnalysisRequest = from_value(js_request)
                .map_err(|err| JsValue::from_str(&format!("Could not read request: {err}")))?;
            AnalysisRequest::from(req)
        }
        None => AnalysisRequest::default(),
    };

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsAnalyticsConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Could not read config: {err}")))?;
            AnalyticsConfig::from(cfg)
        }
        None => AnalyticsConfig::default(),
    };

    let store = medibot_analytics::load_store_value(&store_value, &cfg)
        .map_err(|err| JsValue::from_str(&format_analytics_error(err)))?;
    let report = medibot_analytics::analyze_store(&store, &request, &cfg);

    to_value(&report).map_err(|err| JsValue::from_str(&format!("Could not serialize report: {err}")))
}

fn format_analytics_error(err: AnalyticsError) -> String {
    format!("Analytics error: {err}")
}
