//! Filter engine: control values in, record subsets out.
//!
//! Every function here is pure. Views borrow from the [`Dataset`] and are
//! rebuilt from scratch on each call; nothing is cached between calls.
//!
//! [`Dataset`]: crate::dataset::Dataset

use std::collections::BTreeMap;
use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::dataset::LaunchRecord;

/// Selector value meaning "every launch site".
pub const ALL_SITES: &str = "ALL";

// ---------------------------------------------------------------------------
// Control values
// ---------------------------------------------------------------------------

/// Value of the launch-site selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// Map a raw selector value to a selection. `ALL` is the synthetic
    /// all-sites value; anything else names a site.
    pub fn parse(value: &str) -> Self {
        if value == ALL_SITES {
            Self::All
        } else {
            Self::Site(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The raw selector value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_SITES,
            Self::Site(site) => site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SiteSelection {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SiteSelection> for String {
    fn from(value: SiteSelection) -> Self {
        value.as_str().to_string()
    }
}

/// Value of the payload range selector, in kilograms.
///
/// Construct through [`PayloadRange::new`] at input boundaries; it rejects
/// inverted or non-finite ranges instead of silently matching nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() {
            anyhow::bail!("payload range bounds must be finite numbers, got [{low}, {high}]");
        }
        if low > high {
            anyhow::bail!("invalid payload range: low ({low}) is greater than high ({high})");
        }
        Ok(Self { low, high })
    }

    /// Whether `mass` lies in the closed interval `[low, high]`.
    pub fn contains(&self, mass: f64) -> bool {
        self.low <= mass && mass <= self.high
    }
}

impl fmt::Display for PayloadRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] kg", self.low, self.high)
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Records whose payload mass lies in `[low, high]`, in original order.
///
/// An inverted range (`low > high`) matches nothing.
pub fn filter_by_range<'a, I>(records: I, low: f64, high: f64) -> Vec<&'a LaunchRecord>
where
    I: IntoIterator<Item = &'a LaunchRecord>,
{
    records
        .into_iter()
        .filter(|r| low <= r.payload_mass_kg && r.payload_mass_kg <= high)
        .collect()
}

/// Records launched from the selected site, in original order.
///
/// [`SiteSelection::All`] returns every record unchanged.
pub fn filter_by_site<'a, I>(records: I, selection: &SiteSelection) -> Vec<&'a LaunchRecord>
where
    I: IntoIterator<Item = &'a LaunchRecord>,
{
    match selection {
        SiteSelection::All => records.into_iter().collect(),
        SiteSelection::Site(site) => records.into_iter().filter(|r| &r.site == site).collect(),
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Number of launches sharing one `(site, outcome_class)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCount {
    pub site: String,
    pub outcome_class: u8,
    pub count: usize,
}

/// Group records by `(site, outcome_class)` and count each group.
///
/// Groups come out sorted by site, then outcome class.
pub fn aggregate_outcome_counts<'a, I>(records: I) -> Vec<OutcomeCount>
where
    I: IntoIterator<Item = &'a LaunchRecord>,
{
    let mut groups: BTreeMap<(&str, u8), usize> = BTreeMap::new();
    for record in records {
        *groups
            .entry((record.site.as_str(), record.outcome_class))
            .or_default() += 1;
    }

    groups
        .into_iter()
        .map(|((site, outcome_class), count)| OutcomeCount {
            site: site.to_string(),
            outcome_class,
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
