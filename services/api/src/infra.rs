use chrono::NaiveDate;
use mediation_predictor::workflows::mediation::features::parse_date;
use mediation_predictor::workflows::mediation::MediationPredictor;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) predictor: Arc<MediationPredictor>,
}

/// Blank strings count as absent so an emptied date input falls back to today.
pub(crate) fn parse_form_date(raw: Option<&str>) -> Result<Option<NaiveDate>, String> {
    raw.filter(|value| !value.trim().is_empty())
        .map(parse_date)
        .transpose()
}

/// Minimal escaping for text and attribute values in rendered HTML.
pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
