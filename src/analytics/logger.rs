use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::charts::ChartSpec;
use crate::config::schema::LoggingConfig;
use crate::filter::{PayloadRange, SiteSelection};

// ---------------------------------------------------------------------------
// Interaction log entry (JSONL analytics)
// ---------------------------------------------------------------------------

/// A single entry in the interaction log (`~/.launchdash/interactions.jsonl`).
///
/// One line is written per chart callback, whether it came from the web
/// dashboard or the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionLogEntry {
    pub timestamp: String,
    /// Where the request came from: `"web"` or `"cli"`.
    pub source: String,
    /// Chart kind: `"pie"` or `"scatter"`.
    pub chart: String,
    /// Raw selector value (`ALL` or a site name).
    pub site: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub high: Option<f64>,
    /// Pie entries or scatter points in the produced chart.
    pub data_points: usize,
    pub duration_us: u64,
}

impl InteractionLogEntry {
    pub fn new(
        source: &str,
        chart: &ChartSpec,
        site: &SiteSelection,
        range: Option<PayloadRange>,
        elapsed: Duration,
    ) -> Self {
        let (kind, data_points) = match chart {
            ChartSpec::Pie(pie) => ("pie", pie.entries.len()),
            ChartSpec::Scatter(scatter) => ("scatter", scatter.point_count()),
        };

        Self {
            timestamp: Utc::now().to_rfc3339(),
            source: source.to_string(),
            chart: kind.to_string(),
            site: site.as_str().to_string(),
            low: range.map(|r| r.low),
            high: range.map(|r| r.high),
            data_points,
            duration_us: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging functions
// ---------------------------------------------------------------------------

/// Append an entry to the interaction log.
///
/// Best-effort: does nothing when logging is disabled, and write failures
/// are ignored so they never fail a chart request.
pub fn log_interaction(config: &LoggingConfig, entry: &InteractionLogEntry) {
    if !config.enabled {
        return;
    }
    let Some(path) = interaction_log_path(config) else {
        return;
    };
    let _ = append_log_entry(&path, entry);
}

/// Run a chart callback, timing it and logging the result.
pub fn logged_callback<F>(
    config: &LoggingConfig,
    source: &str,
    site: &SiteSelection,
    range: Option<PayloadRange>,
    callback: F,
) -> ChartSpec
where
    F: FnOnce() -> ChartSpec,
{
    let started = Instant::now();
    let chart = callback();
    let entry = InteractionLogEntry::new(source, &chart, site, range, started.elapsed());
    log_interaction(config, &entry);
    chart
}

// ---------------------------------------------------------------------------
// Reading log entries
// ---------------------------------------------------------------------------

/// Read all entries from the log at `path`.
///
/// Silently skips malformed lines. Returns an empty vec if the file does not
/// exist or cannot be read.
pub fn read_all_entries(path: &Path) -> Vec<InteractionLogEntry> {
    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    let reader = BufReader::new(file);
    reader
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<InteractionLogEntry>(&line).ok())
        .collect()
}

/// Read log entries filtered to a time window (last N days).
///
/// If `days` is `None`, returns all entries.
pub fn read_entries_since_days(path: &Path, days: Option<u32>) -> Vec<InteractionLogEntry> {
    let entries = read_all_entries(path);

    let Some(days) = days else {
        return entries;
    };

    let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
    let cutoff_str = cutoff.to_rfc3339();

    entries
        .into_iter()
        .filter(|e| e.timestamp >= cutoff_str)
        .collect()
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn append_log_entry(path: &Path, entry: &InteractionLogEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Return the path to the interaction log file.
pub fn interaction_log_path(config: &LoggingConfig) -> Option<PathBuf> {
    match &config.path {
        Some(path) => Some(PathBuf::from(path)),
        None => crate::config::launchdash_home().map(|dir| dir.join("interactions.jsonl")),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
