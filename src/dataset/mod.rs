//! Launch record table loaded once at startup.
//!
//! The CSV is read with the `csv` crate into strongly typed
//! [`LaunchRecord`]s. Only the four columns the dashboard uses are mapped;
//! any other columns in the file (flight number, mission outcome, ...) are
//! ignored.
//!
//! A [`Dataset`] is immutable after construction. The composition root owns
//! it and hands out `&Dataset` to every callback.

pub mod fetch;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One row of the launch dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    #[serde(rename = "Launch Site")]
    pub site: String,
    #[serde(rename = "Payload Mass (kg)")]
    pub payload_mass_kg: f64,
    /// Launch outcome code: `1` for success, `0` for failure.
    #[serde(rename = "class")]
    pub outcome_class: u8,
    #[serde(rename = "Booster Version Category")]
    pub booster_version_category: String,
}

impl LaunchRecord {
    pub fn new(
        site: impl Into<String>,
        payload_mass_kg: f64,
        outcome_class: u8,
        booster_version_category: impl Into<String>,
    ) -> Self {
        Self {
            site: site.into(),
            payload_mass_kg,
            outcome_class,
            booster_version_category: booster_version_category.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// The full, read-only launch table plus the payload bounds observed at load.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<LaunchRecord>,
    min_payload: f64,
    max_payload: f64,
}

impl Dataset {
    /// Load the dataset from a CSV file on disk.
    ///
    /// Any failure (missing file, missing column, unparsable row, empty
    /// table) is returned as an error; callers treat it as fatal.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open dataset {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("failed to load dataset {}", path.display()))
    }

    /// Parse CSV content (with a header row) from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (i, row) in rdr.deserialize::<LaunchRecord>().enumerate() {
            // Row numbers are 1-based and skip the header line.
            let record = row.with_context(|| format!("invalid record on line {}", i + 2))?;
            records.push(record);
        }

        Self::from_records(records)
    }

    /// Build a dataset from already-parsed records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Result<Self> {
        let (min_payload, max_payload) =
            payload_bounds(&records).context("dataset contains no launch records")?;

        Ok(Self {
            records,
            min_payload,
            max_payload,
        })
    }

    /// All records in file order.
    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Smallest payload mass in the table.
    pub fn min_payload(&self) -> f64 {
        self.min_payload
    }

    /// Largest payload mass in the table.
    pub fn max_payload(&self) -> f64 {
        self.max_payload
    }

    /// Distinct launch sites in first-seen order.
    pub fn sites(&self) -> Vec<&str> {
        let mut sites: Vec<&str> = Vec::new();
        for record in &self.records {
            if !sites.contains(&record.site.as_str()) {
                sites.push(&record.site);
            }
        }
        sites
    }

    /// Whether `site` names a launch site present in the table.
    pub fn has_site(&self, site: &str) -> bool {
        self.records.iter().any(|r| r.site == site)
    }
}

/// Min and max payload mass, or `None` for an empty slice.
fn payload_bounds(records: &[LaunchRecord]) -> Option<(f64, f64)> {
    let first = records.first()?.payload_mass_kg;
    let bounds = records
        .iter()
        .map(|r| r.payload_mass_kg)
        .fold((first, first), |(lo, hi), m| (lo.min(m), hi.max(m)));
    Some(bounds)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
