/// Dashboard callback and binding tests.
///
/// Drives the two chart callbacks the way a host does: through raw control
/// values, the binding table, and the layout description.
use launchdash::config::schema::SliderConfig;
use launchdash::dashboard::{
    self, BINDINGS, Callback, ControlState, Layout, PAYLOAD_SLIDER, PIE_CHART, SCATTER_CHART,
    SITE_DROPDOWN,
};
use launchdash::dataset::{Dataset, LaunchRecord};
use launchdash::filter::{PayloadRange, SiteSelection};

fn three_launches() -> Dataset {
    Dataset::from_records(vec![
        LaunchRecord::new("CCAFS LC-40", 500.0, 0, "v1.0"),
        LaunchRecord::new("CCAFS LC-40", 500.0, 1, "v1.0"),
        LaunchRecord::new("KSC LC-39A", 3000.0, 1, "FT"),
    ])
    .unwrap()
}

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

#[test]
fn proportion_chart_for_all_sites() {
    let dataset = three_launches();
    let chart = dashboard::proportion_chart(&dataset, &SiteSelection::All);

    let pie = chart.as_pie().unwrap();
    assert_eq!(pie.title, "Success Count for all launch sites");
    assert_eq!(pie.entries.len(), 3);
    let slices = pie.slices();
    assert_eq!(slices[0].label, "CCAFS LC-40");
    assert_eq!(slices[0].value, 1.0);
    assert_eq!(slices[1].label, "KSC LC-39A");
    assert_eq!(slices[1].value, 1.0);
}

#[test]
fn proportion_chart_for_one_site() {
    let dataset = three_launches();
    let site = SiteSelection::Site("CCAFS LC-40".to_string());
    let chart = dashboard::proportion_chart(&dataset, &site);

    let pie = chart.as_pie().unwrap();
    assert_eq!(pie.title, "Total Success Launches for site CCAFS LC-40");
    let labels: Vec<&str> = pie.entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["0", "1"]);
    assert_eq!(pie.total(), 2.0);
}

#[test]
fn scatter_chart_applies_range_and_site() {
    let dataset = three_launches();
    let range = PayloadRange::new(0.0, 1000.0).unwrap();

    let all = dashboard::scatter_chart(&dataset, &SiteSelection::All, range);
    assert_eq!(all.as_scatter().unwrap().point_count(), 2);

    let ksc = SiteSelection::Site("KSC LC-39A".to_string());
    let chart = dashboard::scatter_chart(&dataset, &ksc, range);
    let scatter = chart.as_scatter().unwrap();
    assert_eq!(scatter.title, "Launch Success Rate For KSC LC-39A");
    assert_eq!(scatter.point_count(), 0);
}

#[test]
fn callbacks_are_idempotent() {
    let dataset = three_launches();
    let state = ControlState::from_raw(&dataset, Some("CCAFS LC-40"), Some(0.0), Some(800.0))
        .unwrap();

    assert_eq!(state.render(&dataset), state.render(&dataset));
}

// ---------------------------------------------------------------------------
// Control state
// ---------------------------------------------------------------------------

#[test]
fn initial_state_covers_whole_dataset() {
    let dataset = three_launches();
    let state = ControlState::initial(&dataset);

    assert_eq!(state.site, SiteSelection::All);
    assert_eq!(state.payload_range.low, 500.0);
    assert_eq!(state.payload_range.high, 3000.0);

    let charts = state.render(&dataset);
    assert_eq!(charts.scatter.as_scatter().unwrap().point_count(), 3);
}

#[test]
fn from_raw_defaults_missing_values() {
    let dataset = three_launches();
    let state = ControlState::from_raw(&dataset, None, None, Some(1000.0)).unwrap();

    assert!(state.site.is_all());
    assert_eq!(state.payload_range, PayloadRange::new(500.0, 1000.0).unwrap());
}

#[test]
fn from_raw_rejects_unknown_site() {
    let dataset = three_launches();
    let err = ControlState::from_raw(&dataset, Some("Boca Chica"), None, None).unwrap_err();
    assert!(err.to_string().contains("unknown launch site"));
}

#[test]
fn from_raw_rejects_inverted_range() {
    let dataset = three_launches();
    assert!(ControlState::from_raw(&dataset, Some("ALL"), Some(2000.0), Some(1000.0)).is_err());
}

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

#[test]
fn bindings_declare_inputs_and_outputs() {
    assert_eq!(BINDINGS.len(), 2);

    let pie = BINDINGS
        .iter()
        .find(|b| b.callback == Callback::Proportion)
        .unwrap();
    assert_eq!(pie.output, PIE_CHART);
    assert_eq!(pie.inputs, &[SITE_DROPDOWN]);

    let scatter = BINDINGS
        .iter()
        .find(|b| b.callback == Callback::Scatter)
        .unwrap();
    assert_eq!(scatter.output, SCATTER_CHART);
    assert!(scatter.depends_on(SITE_DROPDOWN));
    assert!(scatter.depends_on(PAYLOAD_SLIDER));
}

#[test]
fn site_change_refreshes_both_charts() {
    assert_eq!(
        dashboard::affected_outputs(SITE_DROPDOWN),
        vec![PIE_CHART, SCATTER_CHART]
    );
}

#[test]
fn slider_change_refreshes_scatter_only() {
    assert_eq!(
        dashboard::affected_outputs(PAYLOAD_SLIDER),
        vec![SCATTER_CHART]
    );
    assert!(dashboard::affected_outputs("unknown-control").is_empty());
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[test]
fn layout_lists_sites_after_all_option() {
    let dataset = three_launches();
    let layout = Layout::from_dataset(&dataset, &SliderConfig::default());

    assert_eq!(layout.title, "SpaceX Launch Records Dashboard");
    assert_eq!(layout.default_site, "ALL");
    let values: Vec<&str> = layout
        .site_options
        .iter()
        .map(|o| o.value.as_str())
        .collect();
    assert_eq!(values, vec!["ALL", "CCAFS LC-40", "KSC LC-39A"]);
    assert_eq!(layout.site_options[0].label, "All Sites");
    assert_eq!(layout.bindings.len(), 2);
}

#[test]
fn layout_slider_uses_config_bounds_and_dataset_value() {
    let dataset = three_launches();
    let slider = SliderConfig {
        min: 0.0,
        max: 10000.0,
        step: 1000.0,
    };
    let layout = Layout::from_dataset(&dataset, &slider);

    assert_eq!(layout.slider.min, 0.0);
    assert_eq!(layout.slider.max, 10000.0);
    assert_eq!(layout.slider.step, 1000.0);
    assert_eq!(layout.slider.marks, vec![0.0, 10000.0]);
    assert_eq!(layout.slider.value, [500.0, 3000.0]);
}

#[test]
fn layout_serializes_bindings_for_the_frontend() {
    let dataset = three_launches();
    let layout = Layout::from_dataset(&dataset, &SliderConfig::default());

    let json = serde_json::to_value(&layout).unwrap();
    assert_eq!(json["bindings"][0]["callback"], "proportion");
    assert_eq!(json["bindings"][1]["output"], SCATTER_CHART);
    assert_eq!(json["bindings"][1]["inputs"][1], PAYLOAD_SLIDER);
}
