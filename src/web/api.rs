//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content. Control values arrive as
//! query parameters (`site`, `low`, `high`); invalid values produce a 400.

use std::collections::HashMap;
use std::io::Cursor;

use anyhow::{Context, Result};
use serde::Serialize;
use tiny_http::{Response, StatusCode};

use crate::analytics::{logger, reporter};
use crate::charts::ChartSpec;
use crate::config;
use crate::dashboard::{self, ControlState, Layout};

use super::{AppState, content_type_json, error_response};

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

/// Both charts plus the control state they were computed for.
#[derive(Serialize)]
struct ChartsResponse {
    controls: ControlState,
    pie: ChartSpec,
    scatter: ChartSpec,
}

/// Health API response.
#[derive(Serialize)]
struct HealthResponse {
    dataset_path: String,
    records: usize,
    sites: Vec<String>,
    min_payload: f64,
    max_payload: f64,
    config_exists: bool,
    logging_enabled: bool,
    log_exists: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type HttpResponse = Response<Cursor<Vec<u8>>>;

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<HttpResponse> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

fn bad_request(err: &anyhow::Error) -> HttpResponse {
    error_response(StatusCode(400), &format!("{err:#}"))
}

/// Decode the query string of `url` into a key → value map.
fn query_params(url: &str) -> HashMap<String, String> {
    let Some((_, query)) = url.split_once('?') else {
        return HashMap::new();
    };
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// Parse an optional numeric parameter. Absent or empty means `None`.
fn number_param(params: &HashMap<String, String>, key: &str) -> Result<Option<f64>> {
    match params.get(key).map(|v| v.trim()) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .with_context(|| format!("query parameter '{key}' is not a number: '{raw}'")),
    }
}

/// Read `site`, `low` and `high` from the query string.
fn control_state(state: AppState<'_>, params: &HashMap<String, String>) -> Result<ControlState> {
    let low = number_param(params, "low")?;
    let high = number_param(params, "high")?;
    ControlState::from_raw(
        state.dataset,
        params.get("site").map(String::as_str),
        low,
        high,
    )
}

fn pie_for(state: AppState<'_>, controls: &ControlState) -> ChartSpec {
    logger::logged_callback(&state.config.logging, "web", &controls.site, None, || {
        dashboard::proportion_chart(state.dataset, &controls.site)
    })
}

fn scatter_for(state: AppState<'_>, controls: &ControlState) -> ChartSpec {
    logger::logged_callback(
        &state.config.logging,
        "web",
        &controls.site,
        Some(controls.payload_range),
        || dashboard::scatter_chart(state.dataset, &controls.site, controls.payload_range),
    )
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/layout` — controls and bindings for the frontend.
pub fn get_layout(state: AppState<'_>) -> Result<HttpResponse> {
    let layout = Layout::from_dataset(state.dataset, &state.config.slider);
    json_response(&layout)
}

/// `GET /api/charts/pie?site=S` — proportion chart for the selected site.
pub fn get_pie_chart(state: AppState<'_>, url: &str) -> Result<HttpResponse> {
    let params = query_params(url);
    let controls = match ControlState::from_raw(
        state.dataset,
        params.get("site").map(String::as_str),
        None,
        None,
    ) {
        Ok(controls) => controls,
        Err(e) => return Ok(bad_request(&e)),
    };

    json_response(&pie_for(state, &controls))
}

/// `GET /api/charts/scatter?site=S&low=L&high=H` — payload scatter chart.
pub fn get_scatter_chart(state: AppState<'_>, url: &str) -> Result<HttpResponse> {
    let controls = match control_state(state, &query_params(url)) {
        Ok(controls) => controls,
        Err(e) => return Ok(bad_request(&e)),
    };

    json_response(&scatter_for(state, &controls))
}

/// `GET /api/charts?site=S&low=L&high=H` — both charts at once.
pub fn get_charts(state: AppState<'_>, url: &str) -> Result<HttpResponse> {
    let controls = match control_state(state, &query_params(url)) {
        Ok(controls) => controls,
        Err(e) => return Ok(bad_request(&e)),
    };

    let resp = ChartsResponse {
        pie: pie_for(state, &controls),
        scatter: scatter_for(state, &controls),
        controls,
    };
    json_response(&resp)
}

/// `GET /api/history?days=N` — interaction report.
pub fn get_history(state: AppState<'_>, url: &str) -> Result<HttpResponse> {
    let params = query_params(url);
    let days = match params.get("days") {
        None => None,
        Some(raw) => match raw.parse::<u32>() {
            Ok(days) => Some(days),
            Err(_) => {
                let err = anyhow::anyhow!("query parameter 'days' is not a whole number: '{raw}'");
                return Ok(bad_request(&err));
            }
        },
    };

    let report = reporter::compute_history(&state.config.logging, days);
    json_response(&report)
}

/// `GET /api/health` — dataset and configuration summary.
pub fn get_health(state: AppState<'_>) -> Result<HttpResponse> {
    let config_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let log_exists = logger::interaction_log_path(&state.config.logging)
        .map(|p| p.exists())
        .unwrap_or(false);

    let resp = HealthResponse {
        dataset_path: state.config.data.path.clone(),
        records: state.dataset.len(),
        sites: state.dataset.sites().into_iter().map(String::from).collect(),
        min_payload: state.dataset.min_payload(),
        max_payload: state.dataset.max_payload(),
        config_exists,
        logging_enabled: state.config.logging.enabled,
        log_exists,
    };

    json_response(&resp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use crate::config::LaunchdashConfig;
    use crate::dataset::{Dataset, LaunchRecord};

    fn sample_dataset() -> Dataset {
        Dataset::from_records(vec![
            LaunchRecord::new("CCAFS LC-40", 500.0, 0, "v1.0"),
            LaunchRecord::new("CCAFS LC-40", 500.0, 1, "v1.0"),
            LaunchRecord::new("KSC LC-39A", 3000.0, 1, "FT"),
        ])
        .unwrap()
    }

    fn quiet_config() -> LaunchdashConfig {
        let mut config = LaunchdashConfig::default();
        config.logging.enabled = false;
        config
    }

    fn body_json(resp: HttpResponse) -> serde_json::Value {
        let mut body = String::new();
        resp.into_reader().read_to_string(&mut body).unwrap();
        serde_json::from_str(&body).unwrap()
    }

    #[test]
    fn query_params_decodes_site_names() {
        let params = query_params("/api/charts/pie?site=CCAFS%20LC-40&low=0");
        assert_eq!(params["site"], "CCAFS LC-40");
        assert_eq!(params["low"], "0");

        let params = query_params("/api/charts/pie?site=KSC+LC-39A");
        assert_eq!(params["site"], "KSC LC-39A");

        assert!(query_params("/api/charts").is_empty());
    }

    #[test]
    fn number_param_handles_missing_empty_and_invalid() {
        let params = query_params("/x?low=&high=abc&mid=2.5");
        assert_eq!(number_param(&params, "low").unwrap(), None);
        assert_eq!(number_param(&params, "absent").unwrap(), None);
        assert_eq!(number_param(&params, "mid").unwrap(), Some(2.5));
        assert!(number_param(&params, "high").is_err());
    }

    #[test]
    fn pie_for_specific_site() {
        let dataset = sample_dataset();
        let config = quiet_config();
        let state = AppState { dataset: &dataset, config: &config };

        let resp = get_pie_chart(state, "/api/charts/pie?site=CCAFS%20LC-40").unwrap();
        assert_eq!(resp.status_code(), StatusCode(200));
        let json = body_json(resp);
        assert_eq!(json["kind"], "pie");
        assert_eq!(json["title"], "Total Success Launches for site CCAFS LC-40");
        assert_eq!(json["entries"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn scatter_defaults_to_full_range() {
        let dataset = sample_dataset();
        let config = quiet_config();
        let state = AppState { dataset: &dataset, config: &config };

        let json = body_json(get_scatter_chart(state, "/api/charts/scatter").unwrap());
        assert_eq!(json["title"], "Launch Success Rate For All Sites");
        let series = json["series"].as_array().unwrap();
        let points: usize = series
            .iter()
            .map(|s| s["points"].as_array().unwrap().len())
            .sum();
        assert_eq!(points, 3);
    }

    #[test]
    fn inverted_range_is_bad_request() {
        let dataset = sample_dataset();
        let config = quiet_config();
        let state = AppState { dataset: &dataset, config: &config };

        let resp = get_scatter_chart(state, "/api/charts/scatter?low=5000&high=100").unwrap();
        assert_eq!(resp.status_code(), StatusCode(400));
        let json = body_json(resp);
        assert!(json["error"].as_str().unwrap().contains("greater than"));
    }

    #[test]
    fn unknown_site_is_bad_request() {
        let dataset = sample_dataset();
        let config = quiet_config();
        let state = AppState { dataset: &dataset, config: &config };

        let resp = get_pie_chart(state, "/api/charts/pie?site=Boca%20Chica").unwrap();
        assert_eq!(resp.status_code(), StatusCode(400));
    }

    #[test]
    fn charts_returns_both_with_controls() {
        let dataset = sample_dataset();
        let config = quiet_config();
        let state = AppState { dataset: &dataset, config: &config };

        let json = body_json(get_charts(state, "/api/charts?site=ALL&low=0&high=1000").unwrap());
        assert_eq!(json["controls"]["site"], "ALL");
        assert_eq!(json["controls"]["payload_range"]["high"], 1000.0);
        assert_eq!(json["pie"]["kind"], "pie");
        // Range filter applies to the scatter chart only.
        assert_eq!(json["pie"]["entries"].as_array().unwrap().len(), 3);
        assert_eq!(json["scatter"]["series"][0]["points"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn layout_lists_all_sites_option_first() {
        let dataset = sample_dataset();
        let config = quiet_config();
        let state = AppState { dataset: &dataset, config: &config };

        let json = body_json(get_layout(state).unwrap());
        assert_eq!(json["site_options"][0]["value"], "ALL");
        assert_eq!(json["site_options"][0]["label"], "All Sites");
        assert_eq!(json["site_options"].as_array().unwrap().len(), 3);
        assert_eq!(json["slider"]["value"][0], 500.0);
        assert_eq!(json["slider"]["value"][1], 3000.0);
    }

    #[test]
    fn layout_uses_configured_slider_step() {
        let dataset = sample_dataset();
        let mut config = quiet_config();
        config.slider.step = 500.0;
        config.slider.max = 12000.0;
        let state = AppState { dataset: &dataset, config: &config };

        let json = body_json(get_layout(state).unwrap());
        assert_eq!(json["slider"]["step"], 500.0);
        assert_eq!(json["slider"]["max"], 12000.0);
        assert_eq!(json["slider"]["marks"][1], 12000.0);
    }

    #[test]
    fn history_rejects_bad_days() {
        let dataset = sample_dataset();
        let config = quiet_config();
        let state = AppState { dataset: &dataset, config: &config };

        let resp = get_history(state, "/api/history?days=week").unwrap();
        assert_eq!(resp.status_code(), StatusCode(400));
    }
}
