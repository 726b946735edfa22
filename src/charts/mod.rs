//! Chart builders: filtered views in, serializable chart specs out.
//!
//! A [`ChartSpec`] describes *what* to draw (kind, title, field bindings and
//! data) and leaves rendering to the host. The embedded web frontend draws
//! them as SVG; the CLI prints them as JSON or a table.

use serde::{Deserialize, Serialize};

use crate::dataset::LaunchRecord;
use crate::filter::{OutcomeCount, SiteSelection};

// Column names as they appear in the dataset file, used as axis/legend labels.
pub const SITE_FIELD: &str = "Launch Site";
pub const PAYLOAD_FIELD: &str = "Payload Mass (kg)";
pub const CLASS_FIELD: &str = "class";
pub const BOOSTER_FIELD: &str = "Booster Version Category";
pub const CLASS_COUNT_FIELD: &str = "count of class";

// ---------------------------------------------------------------------------
// Chart specs
// ---------------------------------------------------------------------------

/// A chart ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Pie(PieChart),
    Scatter(ScatterChart),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            Self::Pie(pie) => &pie.title,
            Self::Scatter(scatter) => &scatter.title,
        }
    }

    pub fn as_pie(&self) -> Option<&PieChart> {
        match self {
            Self::Pie(pie) => Some(pie),
            Self::Scatter(_) => None,
        }
    }

    pub fn as_scatter(&self) -> Option<&ScatterChart> {
        match self {
            Self::Scatter(scatter) => Some(scatter),
            Self::Pie(_) => None,
        }
    }
}

/// Proportion (pie) chart.
///
/// `entries` are raw name/value pairs; entries that share a label belong to
/// the same slice and their values add up. See [`PieChart::slices`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChart {
    pub title: String,
    /// Field the slice labels come from.
    pub names: String,
    /// Field the slice values come from.
    pub values: String,
    pub entries: Vec<PieEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieEntry {
    pub label: String,
    pub value: f64,
}

/// One drawn slice after merging entries by label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    /// Share of the whole pie, `0.0..=1.0`. Zero when the pie sums to zero.
    pub fraction: f64,
}

impl PieChart {
    /// Merge entries by label (first-seen order) and compute each slice's
    /// share of the total.
    pub fn slices(&self) -> Vec<PieSlice> {
        let mut slices: Vec<PieSlice> = Vec::new();
        for entry in &self.entries {
            match slices.iter_mut().find(|s| s.label == entry.label) {
                Some(slice) => slice.value += entry.value,
                None => slices.push(PieSlice {
                    label: entry.label.clone(),
                    value: entry.value,
                    fraction: 0.0,
                }),
            }
        }

        let total: f64 = slices.iter().map(|s| s.value).sum();
        if total > 0.0 {
            for slice in &mut slices {
                slice.fraction = slice.value / total;
            }
        }
        slices
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value).sum()
    }
}

/// Scatter chart of payload mass against outcome, colored by booster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterChart {
    pub title: String,
    pub x: String,
    pub y: String,
    pub color: String,
    /// One series per color value, in first-seen order.
    pub series: Vec<ScatterSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub name: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

impl ScatterChart {
    /// Total number of plotted points across all series.
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Input to the proportion chart, depending on the selector mode.
#[derive(Debug, Clone)]
pub enum ProportionInput<'a> {
    /// Every site: per-record outcome codes, labelled by site.
    All(Vec<&'a LaunchRecord>),
    /// One site: pre-aggregated outcome counts.
    Site {
        site: &'a str,
        counts: Vec<OutcomeCount>,
    },
}

/// Build the proportion (pie) chart.
pub fn build_proportion_chart(input: &ProportionInput<'_>) -> ChartSpec {
    let pie = match input {
        ProportionInput::All(records) => PieChart {
            title: "Success Count for all launch sites".to_string(),
            names: SITE_FIELD.to_string(),
            values: CLASS_FIELD.to_string(),
            entries: records
                .iter()
                .map(|r| PieEntry {
                    label: r.site.clone(),
                    value: f64::from(r.outcome_class),
                })
                .collect(),
        },
        ProportionInput::Site { site, counts } => PieChart {
            title: format!("Total Success Launches for site {site}"),
            names: CLASS_FIELD.to_string(),
            values: CLASS_COUNT_FIELD.to_string(),
            entries: counts
                .iter()
                .map(|c| PieEntry {
                    label: c.outcome_class.to_string(),
                    value: c.count as f64,
                })
                .collect(),
        },
    };
    ChartSpec::Pie(pie)
}

/// Build the payload/outcome scatter chart.
pub fn build_scatter_chart(records: &[&LaunchRecord], selection: &SiteSelection) -> ChartSpec {
    let title = match selection {
        SiteSelection::All => "Launch Success Rate For All Sites".to_string(),
        SiteSelection::Site(site) => format!("Launch Success Rate For {site}"),
    };

    let mut series: Vec<ScatterSeries> = Vec::new();
    for record in records {
        let point = ScatterPoint {
            x: record.payload_mass_kg,
            y: f64::from(record.outcome_class),
        };
        match series
            .iter_mut()
            .find(|s| s.name == record.booster_version_category)
        {
            Some(s) => s.points.push(point),
            None => series.push(ScatterSeries {
                name: record.booster_version_category.clone(),
                points: vec![point],
            }),
        }
    }

    ChartSpec::Scatter(ScatterChart {
        title,
        x: PAYLOAD_FIELD.to_string(),
        y: CLASS_FIELD.to_string(),
        color: BOOSTER_FIELD.to_string(),
        series,
    })
}
