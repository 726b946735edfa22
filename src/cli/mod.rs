//! CLI command implementations for launchdash.
//!
//! Provides subcommand handlers for:
//! - `launchdash serve` — run the web dashboard
//! - `launchdash summary` — per-site launch and outcome summary
//! - `launchdash pie` / `launchdash scatter` — run a chart callback and print it
//! - `launchdash fetch` — download the dataset
//! - `launchdash history` — interaction log report
//! - `launchdash health` — dataset and config status
//! - `launchdash config show|init|set|reset` — configuration management

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::analytics::logger;
use crate::analytics::reporter::{self, HistoryReport};
use crate::charts::{ChartSpec, PieChart, ScatterChart};
use crate::config::{self, LaunchdashConfig};
use crate::dashboard::{self, ControlState};
use crate::dataset::{Dataset, fetch};
use crate::filter;
use crate::web::{self, AppState};

/// Output format for report and chart commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Load the dataset from `data` if given, else from the configured path.
pub fn load_dataset(cfg: &LaunchdashConfig, data: Option<&Path>) -> Result<Dataset> {
    let path = data
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cfg.data.dataset_path());
    Dataset::load(&path).with_context(|| {
        format!(
            "could not load launch data (run `launchdash fetch` to download it to {})",
            path.display()
        )
    })
}

// ---------------------------------------------------------------------------
// launchdash serve
// ---------------------------------------------------------------------------

/// Options for `launchdash serve` that override the configuration.
#[derive(Debug, Clone, Default)]
pub struct ServeOptions {
    pub addr: Option<String>,
    pub data: Option<PathBuf>,
    pub no_browser: bool,
}

/// Load the dataset once and serve the dashboard until interrupted.
pub fn run_serve(options: ServeOptions) -> Result<()> {
    let mut cfg = config::load();
    if options.no_browser {
        cfg.server.open_browser = false;
    }
    if let Some(data) = &options.data {
        cfg.data.path = data.to_string_lossy().into_owned();
    }

    let dataset = load_dataset(&cfg, None)?;
    let addr = options.addr.unwrap_or_else(|| cfg.server.addr());

    web::serve(
        &addr,
        AppState {
            dataset: &dataset,
            config: &cfg,
        },
    )
}

// ---------------------------------------------------------------------------
// launchdash summary
// ---------------------------------------------------------------------------

/// Launch counts and payload extent for one site.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SiteSummary {
    pub site: String,
    pub launches: usize,
    pub successes: usize,
    pub failures: usize,
    pub success_rate_pct: f64,
    pub min_payload: f64,
    pub max_payload: f64,
}

/// Per-site summaries in first-seen site order.
pub fn site_summaries(dataset: &Dataset) -> Vec<SiteSummary> {
    let counts = filter::aggregate_outcome_counts(dataset.records());

    dataset
        .sites()
        .into_iter()
        .map(|site| {
            let records = filter::filter_by_site(
                dataset.records(),
                &filter::SiteSelection::Site(site.to_string()),
            );
            let site_counts = counts.iter().filter(|c| c.site == site);
            let (successes, failures) =
                site_counts.fold((0, 0), |(s, f), c| match c.outcome_class {
                    1 => (s + c.count, f),
                    _ => (s, f + c.count),
                });
            let launches = records.len();
            let payloads = records.iter().map(|r| r.payload_mass_kg);

            SiteSummary {
                site: site.to_string(),
                launches,
                successes,
                failures,
                success_rate_pct: pct(successes, launches),
                min_payload: payloads.clone().fold(f64::INFINITY, f64::min),
                max_payload: payloads.fold(f64::NEG_INFINITY, f64::max),
            }
        })
        .collect()
}

/// Show per-site launch outcomes.
pub fn run_summary(data: Option<&Path>, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let dataset = load_dataset(&cfg, data)?;
    let summaries = site_summaries(&dataset);

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "records": dataset.len(),
                "min_payload": dataset.min_payload(),
                "max_payload": dataset.max_payload(),
                "sites": summaries,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Csv => write_summary_csv(io::stdout().lock(), &summaries)?,
        OutputFormat::Table => print_summary_table(&dataset, &summaries),
    }

    Ok(())
}

fn write_summary_csv<W: Write>(out: W, summaries: &[SiteSummary]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record([
        "site",
        "launches",
        "successes",
        "failures",
        "success_rate_pct",
        "min_payload",
        "max_payload",
    ])?;
    for s in summaries {
        wtr.write_record([
            s.site.clone(),
            s.launches.to_string(),
            s.successes.to_string(),
            s.failures.to_string(),
            format!("{:.1}", s.success_rate_pct),
            s.min_payload.to_string(),
            s.max_payload.to_string(),
        ])?;
    }
    wtr.flush().context("failed to write CSV output")?;
    Ok(())
}

fn print_summary_table(dataset: &Dataset, summaries: &[SiteSummary]) {
    println!("{}", "SpaceX Launch Records".bold().cyan());
    println!("{}", "=".repeat(72));
    println!("  {} {}", "Launches:     ".bold(), dataset.len());
    println!(
        "  {} {} – {} kg",
        "Payload range:".bold(),
        dataset.min_payload(),
        dataset.max_payload()
    );
    println!();

    println!(
        "  {:<16} {:>8} {:>9} {:>9} {:>8} {:>16}",
        "Site", "Launches", "Success", "Failure", "Rate", "Payload (kg)"
    );
    println!("  {}", "-".repeat(70));

    for (i, s) in summaries.iter().enumerate() {
        let line = format!(
            "  {:<16} {:>8} {:>9} {:>9} {:>7.1}% {:>16}",
            truncate(&s.site, 16),
            s.launches,
            s.successes,
            s.failures,
            s.success_rate_pct,
            format!("{}–{}", s.min_payload, s.max_payload),
        );
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

// ---------------------------------------------------------------------------
// launchdash pie | scatter
// ---------------------------------------------------------------------------

/// Run the proportion chart callback for `site` and print the result.
pub fn run_pie(data: Option<&Path>, site: Option<&str>, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let dataset = load_dataset(&cfg, data)?;
    let controls = ControlState::from_raw(&dataset, site, None, None)?;

    let chart = logger::logged_callback(&cfg.logging, "cli", &controls.site, None, || {
        dashboard::proportion_chart(&dataset, &controls.site)
    });
    print_chart(&chart, format)
}

/// Run the scatter chart callback for `site` and `[low, high]` and print it.
pub fn run_scatter(
    data: Option<&Path>,
    site: Option<&str>,
    low: Option<f64>,
    high: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let cfg = config::load();
    let dataset = load_dataset(&cfg, data)?;
    let controls = ControlState::from_raw(&dataset, site, low, high)?;

    let chart = logger::logged_callback(
        &cfg.logging,
        "cli",
        &controls.site,
        Some(controls.payload_range),
        || dashboard::scatter_chart(&dataset, &controls.site, controls.payload_range),
    );
    print_chart(&chart, format)
}

fn print_chart(chart: &ChartSpec, format: OutputFormat) -> Result<()> {
    match (format, chart) {
        (OutputFormat::Json, _) => println!("{}", serde_json::to_string_pretty(chart)?),
        (OutputFormat::Csv, ChartSpec::Pie(pie)) => write_pie_csv(io::stdout().lock(), pie)?,
        (OutputFormat::Csv, ChartSpec::Scatter(scatter)) => {
            write_scatter_csv(io::stdout().lock(), scatter)?
        }
        (OutputFormat::Table, ChartSpec::Pie(pie)) => print_pie_table(pie),
        (OutputFormat::Table, ChartSpec::Scatter(scatter)) => print_scatter_table(scatter),
    }
    Ok(())
}

fn print_pie_table(pie: &PieChart) {
    println!("{}", pie.title.bold().cyan());
    println!("{}", "=".repeat(50));

    let slices = pie.slices();
    if slices.is_empty() {
        println!("{}", "No data for this selection.".yellow());
        return;
    }

    println!("  {:<20} {:>10} {:>8}", pie.names, pie.values, "Share");
    println!("  {}", "-".repeat(40));
    for slice in &slices {
        let bar = "█".repeat((slice.fraction * 20.0).round() as usize);
        println!(
            "  {:<20} {:>10} {:>7.1}% {}",
            truncate(&slice.label, 20),
            slice.value,
            slice.fraction * 100.0,
            bar.green()
        );
    }
}

fn write_pie_csv<W: Write>(out: W, pie: &PieChart) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["label", "value", "fraction"])?;
    for slice in pie.slices() {
        wtr.write_record([
            slice.label,
            slice.value.to_string(),
            format!("{:.4}", slice.fraction),
        ])?;
    }
    wtr.flush().context("failed to write CSV output")?;
    Ok(())
}

fn print_scatter_table(scatter: &ScatterChart) {
    println!("{}", scatter.title.bold().cyan());
    println!("{}", "=".repeat(50));

    if scatter.series.is_empty() {
        println!("{}", "No launches in this payload range.".yellow());
        return;
    }

    println!(
        "  {:<12} {:>7} {:>10} {:>18}",
        "Booster", "Points", "Successes", scatter.x
    );
    println!("  {}", "-".repeat(50));
    for series in &scatter.series {
        let successes = series.points.iter().filter(|p| p.y >= 1.0).count();
        let lo = series.points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let hi = series.points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        println!(
            "  {:<12} {:>7} {:>10} {:>18}",
            truncate(&series.name, 12),
            series.points.len(),
            successes,
            format!("{lo}–{hi}"),
        );
    }
    println!();
    println!(
        "  {} {} points",
        "Total:".dimmed(),
        scatter.point_count()
    );
}

fn write_scatter_csv<W: Write>(out: W, scatter: &ScatterChart) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["booster_version_category", "payload_mass_kg", "class"])?;
    for series in &scatter.series {
        for p in &series.points {
            wtr.write_record([series.name.clone(), p.x.to_string(), p.y.to_string()])?;
        }
    }
    wtr.flush().context("failed to write CSV output")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// launchdash fetch
// ---------------------------------------------------------------------------

/// Download the dataset to `output` (default: the configured data path).
pub fn run_fetch(url: Option<&str>, output: Option<&Path>) -> Result<()> {
    let cfg = config::load();
    let url = url.unwrap_or(&cfg.data.source_url);
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cfg.data.dataset_path());

    println!("{} {}", "Downloading".bold(), url.dimmed());
    let summary = fetch::fetch_dataset(url, &output)?;
    println!(
        "{} Wrote {} ({} bytes, {} launches, {} sites)",
        "✓".green().bold(),
        output.display(),
        format_number(summary.bytes),
        summary.records,
        summary.sites
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// launchdash history
// ---------------------------------------------------------------------------

/// Show the interaction log report.
pub fn run_history(format: OutputFormat, days: Option<u32>) -> Result<()> {
    let cfg = config::load();
    let report = reporter::compute_history(&cfg.logging, days);

    if report.total_interactions == 0 {
        println!(
            "{}",
            "No interactions logged yet. Use the dashboard or `launchdash pie` to record some."
                .yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Csv => write_history_csv(io::stdout().lock(), &report)?,
        OutputFormat::Table => print_history_table(&report),
    }

    Ok(())
}

fn print_history_table(report: &HistoryReport) {
    println!("{}", "launchdash Interaction History".bold().cyan());
    println!("{}", "=".repeat(50));
    println!(
        "  {} {}",
        "Interactions:".bold(),
        format_number(report.total_interactions)
    );
    println!(
        "  {} pie {}  scatter {}",
        "Charts:      ".bold(),
        report.pie_renders,
        report.scatter_renders
    );
    println!(
        "  {} {:.0} µs",
        "Avg latency: ".bold(),
        report.avg_duration_us
    );
    println!();

    println!("{}", "Site selections".bold().cyan());
    for usage in &report.sites {
        println!("  {:<20} {:>8}", truncate(&usage.site, 20), usage.count);
    }
    println!();

    println!("{}", "Daily".bold().cyan());
    for day in &report.daily {
        println!("  {:<12} {:>8}", day.date, day.interactions);
    }
}

fn write_history_csv<W: Write>(out: W, report: &HistoryReport) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["date", "interactions"])?;
    for day in &report.daily {
        wtr.write_record([day.date.clone(), day.interactions.to_string()])?;
    }
    wtr.flush().context("failed to write CSV output")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// launchdash health
// ---------------------------------------------------------------------------

/// Check dataset, configuration, and log status.
pub fn run_health() -> Result<()> {
    println!("{}", "launchdash Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();

    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.launchdash/config.toml found"
        } else {
            "not found (run `launchdash config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".launchdash.toml found"
        } else {
            "none (optional)"
        },
    );

    match load_dataset(&cfg, None) {
        Ok(dataset) => print_health_item(
            "Dataset",
            true,
            &format!(
                "{}: {} launches, {} sites, payload {}–{} kg",
                cfg.data.path,
                dataset.len(),
                dataset.sites().len(),
                dataset.min_payload(),
                dataset.max_payload()
            ),
        ),
        Err(e) => print_health_item("Dataset", false, &format!("{e:#}")),
    }

    print_info_item("Server", &format!("http://{}", cfg.server.addr()));

    let log_path = logger::interaction_log_path(&cfg.logging);
    let log_entries = log_path
        .as_deref()
        .map(|p| logger::read_all_entries(p).len())
        .unwrap_or(0);
    print_health_item(
        "Interaction log",
        cfg.logging.enabled,
        &if cfg.logging.enabled {
            format!("{} entries", log_entries)
        } else {
            "disabled".to_string()
        },
    );

    Ok(())
}

/// Marker shown in front of a `launchdash health` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HealthStatus {
    Ok,
    Failed,
    /// Reported setting, nothing was checked.
    Info,
}

fn health_line(name: &str, status: HealthStatus, detail: &str) -> String {
    let marker = match status {
        HealthStatus::Ok => "✓".green().bold(),
        HealthStatus::Failed => "✗".red().bold(),
        HealthStatus::Info => "·".dimmed(),
    };
    format!("  {} {:<18} {}", marker, name, detail.dimmed())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        HealthStatus::Ok
    } else {
        HealthStatus::Failed
    };
    println!("{}", health_line(name, status, detail));
}

fn print_info_item(name: &str, detail: &str) {
    println!("{}", health_line(name, HealthStatus::Info, detail));
}

// ---------------------------------------------------------------------------
// launchdash config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective launchdash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.launchdash/config.toml", global_exists);
    print_source(".launchdash.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "LAUNCHDASH_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.launchdash/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Percentage of `part` in `whole`, 0.0 when `whole` is zero.
fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

/// Format a number with comma separators for readability.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
