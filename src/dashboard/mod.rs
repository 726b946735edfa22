//! Reactive binding layer.
//!
//! The dashboard has two controls and two charts:
//!
//! | control          | feeds                                   |
//! |------------------|-----------------------------------------|
//! | `site-dropdown`  | `success-pie-chart`, `success-payload-scatter-chart` |
//! | `payload-slider` | `success-payload-scatter-chart`         |
//!
//! The callbacks are ordinary functions over `&Dataset`; [`BINDINGS`]
//! declares which named inputs each one reads so a host (the web frontend,
//! the CLI) can decide what to recompute when a control changes.

use anyhow::Result;
use serde::Serialize;

use crate::charts::{self, ChartSpec, ProportionInput};
use crate::config::schema::SliderConfig;
use crate::dataset::Dataset;
use crate::filter::{self, ALL_SITES, PayloadRange, SiteSelection};

pub const SITE_DROPDOWN: &str = "site-dropdown";
pub const PAYLOAD_SLIDER: &str = "payload-slider";
pub const PIE_CHART: &str = "success-pie-chart";
pub const SCATTER_CHART: &str = "success-payload-scatter-chart";

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

/// Site selector → proportion chart.
///
/// All sites: per-record outcome codes grouped by site. One site: that
/// site's launches counted per outcome code. The payload range is not
/// applied.
pub fn proportion_chart(dataset: &Dataset, site: &SiteSelection) -> ChartSpec {
    let records = filter::filter_by_site(dataset.records(), site);
    let input = match site {
        SiteSelection::All => ProportionInput::All(records),
        SiteSelection::Site(name) => ProportionInput::Site {
            site: name,
            counts: filter::aggregate_outcome_counts(records),
        },
    };
    charts::build_proportion_chart(&input)
}

/// Site selector + payload range → scatter chart.
///
/// The range filter runs first, then the site filter.
pub fn scatter_chart(dataset: &Dataset, site: &SiteSelection, range: PayloadRange) -> ChartSpec {
    let in_range = filter::filter_by_range(dataset.records(), range.low, range.high);
    let records = filter::filter_by_site(in_range, site);
    charts::build_scatter_chart(&records, site)
}

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

/// Which callback an output is produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Callback {
    Proportion,
    Scatter,
}

/// Declares the named inputs a callback reads and the output it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub callback: Callback,
    pub output: &'static str,
    pub inputs: &'static [&'static str],
}

impl Binding {
    /// Whether a change to `control` requires recomputing this output.
    pub fn depends_on(&self, control: &str) -> bool {
        self.inputs.contains(&control)
    }
}

pub const BINDINGS: [Binding; 2] = [
    Binding {
        callback: Callback::Proportion,
        output: PIE_CHART,
        inputs: &[SITE_DROPDOWN],
    },
    Binding {
        callback: Callback::Scatter,
        output: SCATTER_CHART,
        inputs: &[SITE_DROPDOWN, PAYLOAD_SLIDER],
    },
];

/// Outputs that must be refreshed after `control` changes.
pub fn affected_outputs(control: &str) -> Vec<&'static str> {
    BINDINGS
        .iter()
        .filter(|b| b.depends_on(control))
        .map(|b| b.output)
        .collect()
}

// ---------------------------------------------------------------------------
// Control state
// ---------------------------------------------------------------------------

/// Snapshot of both controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlState {
    pub site: SiteSelection,
    pub payload_range: PayloadRange,
}

/// Both charts for one control state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCharts {
    pub pie: ChartSpec,
    pub scatter: ChartSpec,
}

impl ControlState {
    /// The state the dashboard opens with: all sites, full payload range.
    pub fn initial(dataset: &Dataset) -> Self {
        Self {
            site: SiteSelection::All,
            payload_range: PayloadRange {
                low: dataset.min_payload(),
                high: dataset.max_payload(),
            },
        }
    }

    /// Build a state from raw control values as a host receives them.
    ///
    /// A missing site means all sites; missing bounds default to the
    /// dataset's payload bounds. Unknown sites and inverted or non-finite
    /// ranges are rejected.
    pub fn from_raw(
        dataset: &Dataset,
        site: Option<&str>,
        low: Option<f64>,
        high: Option<f64>,
    ) -> Result<Self> {
        let site = SiteSelection::parse(site.unwrap_or(ALL_SITES));
        if let SiteSelection::Site(name) = &site
            && !dataset.has_site(name)
        {
            anyhow::bail!("unknown launch site: {name}");
        }

        let payload_range = PayloadRange::new(
            low.unwrap_or(dataset.min_payload()),
            high.unwrap_or(dataset.max_payload()),
        )?;

        Ok(Self {
            site,
            payload_range,
        })
    }

    /// Run both callbacks.
    pub fn render(&self, dataset: &Dataset) -> DashboardCharts {
        DashboardCharts {
            pie: proportion_chart(dataset, &self.site),
            scatter: scatter_chart(dataset, &self.site, self.payload_range),
        }
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// One entry of the site selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteOption {
    pub label: String,
    pub value: String,
}

/// Description of the range slider control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderLayout {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Labelled tick positions.
    pub marks: Vec<f64>,
    /// Initial `[low, high]` selection.
    pub value: [f64; 2],
}

/// Everything a host needs to build the controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: String,
    pub site_options: Vec<SiteOption>,
    pub default_site: String,
    pub slider: SliderLayout,
    pub bindings: Vec<Binding>,
}

impl Layout {
    pub fn from_dataset(dataset: &Dataset, slider: &SliderConfig) -> Self {
        let mut site_options = vec![SiteOption {
            label: "All Sites".to_string(),
            value: ALL_SITES.to_string(),
        }];
        site_options.extend(dataset.sites().into_iter().map(|site| SiteOption {
            label: site.to_string(),
            value: site.to_string(),
        }));

        Self {
            title: "SpaceX Launch Records Dashboard".to_string(),
            site_options,
            default_site: ALL_SITES.to_string(),
            slider: SliderLayout {
                min: slider.min,
                max: slider.max,
                step: slider.step,
                marks: vec![slider.min, slider.max],
                value: [dataset.min_payload(), dataset.max_payload()],
            },
            bindings: BINDINGS.to_vec(),
        }
    }
}
