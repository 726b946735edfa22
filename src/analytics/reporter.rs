//! Interaction reporter — aggregates the interaction log.
//!
//! Produces a [`HistoryReport`]: how often each chart was rendered, which
//! site selections were made, average callback latency, and a per-day
//! breakdown.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::analytics::logger::{self, InteractionLogEntry};
use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Summary of the interaction log.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HistoryReport {
    pub total_interactions: usize,
    pub pie_renders: usize,
    pub scatter_renders: usize,
    pub avg_duration_us: f64,
    /// Selections ordered by count (descending), then by name.
    pub sites: Vec<SiteUsage>,
    /// Days in ascending order.
    pub daily: Vec<DailyUsage>,
}

/// How often a selector value was used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteUsage {
    pub site: String,
    pub count: usize,
}

/// Interactions on a single calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyUsage {
    pub date: String,
    pub interactions: usize,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Read the configured log and aggregate entries from the last `days` days
/// (all entries when `None`).
pub fn compute_history(config: &LoggingConfig, days: Option<u32>) -> HistoryReport {
    let Some(path) = logger::interaction_log_path(config) else {
        return HistoryReport::default();
    };
    let entries = logger::read_entries_since_days(&path, days);
    build_report(&entries)
}

fn build_report(entries: &[InteractionLogEntry]) -> HistoryReport {
    if entries.is_empty() {
        return HistoryReport::default();
    }

    let pie_renders = entries.iter().filter(|e| e.chart == "pie").count();
    let scatter_renders = entries.iter().filter(|e| e.chart == "scatter").count();
    let total_us: u64 = entries.iter().map(|e| e.duration_us).sum();

    HistoryReport {
        total_interactions: entries.len(),
        pie_renders,
        scatter_renders,
        avg_duration_us: total_us as f64 / entries.len() as f64,
        sites: compute_site_usage(entries),
        daily: compute_daily_usage(entries),
    }
}

fn compute_site_usage(entries: &[InteractionLogEntry]) -> Vec<SiteUsage> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(&entry.site).or_default() += 1;
    }

    let mut usage: Vec<SiteUsage> = counts
        .into_iter()
        .map(|(site, count)| SiteUsage {
            site: site.to_string(),
            count,
        })
        .collect();

    usage.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.site.cmp(&b.site)));
    usage
}

fn compute_daily_usage(entries: &[InteractionLogEntry]) -> Vec<DailyUsage> {
    let mut daily: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in entries {
        let date = entry.timestamp.get(..10).unwrap_or("unknown");
        *daily.entry(date).or_default() += 1;
    }

    daily
        .into_iter()
        .map(|(date, interactions)| DailyUsage {
            date: date.to_string(),
            interactions,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(timestamp: &str, chart: &str, site: &str, duration_us: u64) -> InteractionLogEntry {
        InteractionLogEntry {
            timestamp: timestamp.to_string(),
            source: "web".to_string(),
            chart: chart.to_string(),
            site: site.to_string(),
            low: None,
            high: None,
            data_points: 3,
            duration_us,
        }
    }

    fn sample_entries() -> Vec<InteractionLogEntry> {
        vec![
            entry("2025-01-15T10:00:00+00:00", "pie", "ALL", 100),
            entry("2025-01-15T10:00:01+00:00", "scatter", "ALL", 300),
            entry("2025-01-15T10:05:00+00:00", "pie", "KSC LC-39A", 50),
            entry("2025-01-16T09:00:00+00:00", "scatter", "KSC LC-39A", 150),
            entry("2025-01-16T09:01:00+00:00", "scatter", "KSC LC-39A", 200),
        ]
    }

    #[test]
    fn report_totals() {
        let report = build_report(&sample_entries());
        assert_eq!(report.total_interactions, 5);
        assert_eq!(report.pie_renders, 2);
        assert_eq!(report.scatter_renders, 3);
        assert!((report.avg_duration_us - 160.0).abs() < f64::EPSILON);
    }

    #[test]
    fn site_usage_sorted_by_count() {
        let report = build_report(&sample_entries());
        assert_eq!(
            report.sites,
            vec![
                SiteUsage { site: "KSC LC-39A".to_string(), count: 3 },
                SiteUsage { site: "ALL".to_string(), count: 2 },
            ]
        );
    }

    #[test]
    fn daily_usage_grouped_by_date() {
        let report = build_report(&sample_entries());
        assert_eq!(report.daily.len(), 2);
        assert_eq!(report.daily[0].date, "2025-01-15");
        assert_eq!(report.daily[0].interactions, 3);
        assert_eq!(report.daily[1].date, "2025-01-16");
    }

    #[test]
    fn empty_log_gives_empty_report() {
        let report = build_report(&[]);
        assert_eq!(report.total_interactions, 0);
        assert_eq!(report.avg_duration_us, 0.0);
        assert!(report.sites.is_empty());
    }
}
