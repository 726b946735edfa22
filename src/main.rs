use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use launchdash::cli;

#[derive(Debug, Parser)]
#[command(name = "launchdash")]
#[command(about = "Interactive SpaceX launch records dashboard")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the interactive dashboard over HTTP
    Serve {
        /// Listen address (default: server.host:server.port from config)
        #[arg(long)]
        addr: Option<String>,
        /// Path to the launch records CSV
        #[arg(long)]
        data: Option<PathBuf>,
        /// Do not open a browser window on startup
        #[arg(long)]
        no_browser: bool,
    },
    /// Show per-site launch counts and outcomes
    Summary {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        /// Path to the launch records CSV
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Compute the success proportion chart for a site selection
    Pie {
        /// Launch site, or ALL (default)
        #[arg(long)]
        site: Option<String>,
        /// Output format: json (default), table, csv
        #[arg(long, default_value = "json")]
        format: String,
        /// Path to the launch records CSV
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Compute the payload vs. outcome scatter chart
    Scatter {
        /// Launch site, or ALL (default)
        #[arg(long)]
        site: Option<String>,
        /// Lower payload bound in kg (default: dataset minimum)
        #[arg(long, allow_hyphen_values = true)]
        low: Option<f64>,
        /// Upper payload bound in kg (default: dataset maximum)
        #[arg(long, allow_hyphen_values = true)]
        high: Option<f64>,
        /// Output format: json (default), table, csv
        #[arg(long, default_value = "json")]
        format: String,
        /// Path to the launch records CSV
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Download the launch records CSV
    Fetch {
        /// Source URL (default: data.source_url from config)
        #[arg(long)]
        url: Option<String>,
        /// Destination file (default: data.path from config)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show dashboard interaction history
    History {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        /// Only include the last N days of data
        #[arg(long)]
        days: Option<u32>,
    },
    /// Check dataset, config, and log status
    Health,
    /// Manage launchdash configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default ~/.launchdash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `server.port 9000`
    Set { key: String, value: String },
    /// Restore the default configuration
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Serve {
            addr,
            data,
            no_browser,
        } => cli::run_serve(cli::ServeOptions {
            addr,
            data,
            no_browser,
        }),
        Commands::Summary { format, data } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_summary(data.as_deref(), fmt)
        }
        Commands::Pie { site, format, data } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_pie(data.as_deref(), site.as_deref(), fmt)
        }
        Commands::Scatter {
            site,
            low,
            high,
            format,
            data,
        } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_scatter(data.as_deref(), site.as_deref(), low, high, fmt)
        }
        Commands::Fetch { url, output } => cli::run_fetch(url.as_deref(), output.as_deref()),
        Commands::History { format, days } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_history(fmt, days)
        }
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
