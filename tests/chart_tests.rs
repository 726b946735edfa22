/// Chart builder tests.
///
/// Builds pie and scatter charts from filtered views and checks titles,
/// field bindings, slice merging, and booster grouping.
use launchdash::charts::{
    self, BOOSTER_FIELD, CLASS_COUNT_FIELD, CLASS_FIELD, ChartSpec, PAYLOAD_FIELD,
    ProportionInput, SITE_FIELD,
};
use launchdash::dataset::{Dataset, LaunchRecord};
use launchdash::filter::{SiteSelection, aggregate_outcome_counts, filter_by_range, filter_by_site};

fn sample() -> Dataset {
    Dataset::from_records(vec![
        LaunchRecord::new("CCAFS LC-40", 500.0, 0, "v1.0"),
        LaunchRecord::new("CCAFS LC-40", 500.0, 1, "v1.0"),
        LaunchRecord::new("KSC LC-39A", 3000.0, 1, "FT"),
        LaunchRecord::new("VAFB SLC-4E", 9600.0, 1, "FT"),
        LaunchRecord::new("KSC LC-39A", 5300.0, 0, "B4"),
    ])
    .unwrap()
}

// ---------------------------------------------------------------------------
// Proportion chart
// ---------------------------------------------------------------------------

#[test]
fn all_sites_pie_uses_per_record_outcomes() {
    let dataset = sample();
    let records = filter_by_site(dataset.records(), &SiteSelection::All);
    let chart = charts::build_proportion_chart(&ProportionInput::All(records));

    assert_eq!(chart.title(), "Success Count for all launch sites");
    let pie = chart.as_pie().unwrap();
    assert_eq!(pie.names, SITE_FIELD);
    assert_eq!(pie.values, CLASS_FIELD);
    // One entry per record, no pre-aggregation.
    assert_eq!(pie.entries.len(), dataset.len());

    let slices = pie.slices();
    let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["CCAFS LC-40", "KSC LC-39A", "VAFB SLC-4E"]);
    let values: Vec<f64> = slices.iter().map(|s| s.value).collect();
    assert_eq!(values, vec![1.0, 1.0, 1.0]);
    assert!((slices[0].fraction - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn single_site_pie_uses_aggregated_counts() {
    let dataset = sample();
    let site = SiteSelection::Site("KSC LC-39A".to_string());
    let counts = aggregate_outcome_counts(filter_by_site(dataset.records(), &site));
    let chart = charts::build_proportion_chart(&ProportionInput::Site {
        site: "KSC LC-39A",
        counts,
    });

    assert_eq!(chart.title(), "Total Success Launches for site KSC LC-39A");
    let pie = chart.as_pie().unwrap();
    assert_eq!(pie.names, CLASS_FIELD);
    assert_eq!(pie.values, CLASS_COUNT_FIELD);

    let entries: Vec<(&str, f64)> = pie
        .entries
        .iter()
        .map(|e| (e.label.as_str(), e.value))
        .collect();
    assert_eq!(entries, vec![("0", 1.0), ("1", 1.0)]);
    assert_eq!(pie.total(), 2.0);
}

#[test]
fn pie_with_all_failures_has_zero_fractions() {
    let dataset = Dataset::from_records(vec![
        LaunchRecord::new("CCAFS LC-40", 500.0, 0, "v1.0"),
        LaunchRecord::new("KSC LC-39A", 600.0, 0, "v1.0"),
    ])
    .unwrap();
    let chart = charts::build_proportion_chart(&ProportionInput::All(
        dataset.records().iter().collect(),
    ));

    let slices = chart.as_pie().unwrap().slices();
    assert_eq!(slices.len(), 2);
    assert!(slices.iter().all(|s| s.value == 0.0 && s.fraction == 0.0));
}

// ---------------------------------------------------------------------------
// Scatter chart
// ---------------------------------------------------------------------------

#[test]
fn scatter_groups_points_by_booster() {
    let dataset = sample();
    let records = filter_by_range(dataset.records(), 0.0, 10000.0);
    let chart = charts::build_scatter_chart(&records, &SiteSelection::All);

    assert_eq!(chart.title(), "Launch Success Rate For All Sites");
    let scatter = chart.as_scatter().unwrap();
    assert_eq!(scatter.x, PAYLOAD_FIELD);
    assert_eq!(scatter.y, CLASS_FIELD);
    assert_eq!(scatter.color, BOOSTER_FIELD);
    assert_eq!(scatter.point_count(), 5);

    let names: Vec<&str> = scatter.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["v1.0", "FT", "B4"]);
    let ft: Vec<(f64, f64)> = scatter.series[1]
        .points
        .iter()
        .map(|p| (p.x, p.y))
        .collect();
    assert_eq!(ft, vec![(3000.0, 1.0), (9600.0, 1.0)]);
}

#[test]
fn scatter_title_names_selected_site() {
    let dataset = sample();
    let site = SiteSelection::Site("VAFB SLC-4E".to_string());
    let records = filter_by_site(dataset.records(), &site);
    let chart = charts::build_scatter_chart(&records, &site);

    assert_eq!(chart.title(), "Launch Success Rate For VAFB SLC-4E");
    assert_eq!(chart.as_scatter().unwrap().point_count(), 1);
}

#[test]
fn empty_view_gives_empty_scatter() {
    let chart = charts::build_scatter_chart(&[], &SiteSelection::All);
    let scatter = chart.as_scatter().unwrap();
    assert!(scatter.series.is_empty());
    assert_eq!(scatter.point_count(), 0);
}

#[test]
fn chart_spec_serializes_with_kind_tag() {
    let dataset = sample();
    let records: Vec<&LaunchRecord> = dataset.records().iter().collect();
    let chart = charts::build_scatter_chart(&records, &SiteSelection::All);

    let json = serde_json::to_value(&chart).unwrap();
    assert_eq!(json["kind"], "scatter");
    assert_eq!(json["x"], PAYLOAD_FIELD);

    let back: ChartSpec = serde_json::from_value(json).unwrap();
    assert_eq!(back, chart);
}
