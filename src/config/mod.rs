/// Configuration system for launchdash.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::LaunchdashConfig::default()`]
/// 2. **User global config** — `~/.launchdash/config.toml`
/// 3. **Project local config** — `.launchdash.toml` in the current working directory
/// 4. **Environment variables** — `LAUNCHDASH_*` overrides (highest precedence)
///
/// Later layers override earlier ones key by key: each file is merged into
/// the running TOML tree before deserialization, so a file that only sets
/// `server.port` leaves every other value untouched.
///
/// # Usage
///
/// ```rust,ignore
/// use launchdash::config;
///
/// let cfg = config::load();
/// let dataset = Dataset::load(&cfg.data.dataset_path())?;
/// ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::LaunchdashConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved launchdash configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> LaunchdashConfig {
    let layers: Vec<toml::Value> = [global_config_path(), project_config_path()]
        .into_iter()
        .filter_map(load_toml_file)
        .collect();

    let mut config = resolve(&layers);
    apply_env_overrides(&mut config);
    config
}

/// Load a TOML file as a raw value tree (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed. Malformed files are ignored so a broken config
/// never keeps the dashboard from starting.
fn load_toml_file(path: Option<PathBuf>) -> Option<toml::Value> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge file layers (lowest precedence first) over the defaults.
///
/// Falls back to the defaults when the merged tree no longer matches the
/// schema (e.g. a wrongly typed value).
fn resolve(layers: &[toml::Value]) -> LaunchdashConfig {
    let Ok(mut merged) = toml::Value::try_from(LaunchdashConfig::default()) else {
        return LaunchdashConfig::default();
    };

    for layer in layers {
        merge_value(&mut merged, layer);
    }

    merged.try_into().unwrap_or_default()
}

/// Recursively merge `overlay` into `base`. Tables merge key by key; any
/// other value in the overlay replaces the base value.
fn merge_value(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base_table.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Directory holding the global config and the interaction log.
pub fn launchdash_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".launchdash"))
}

/// Path to the user global config: `~/.launchdash/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    launchdash_home().map(|dir| dir.join("config.toml"))
}

/// Path to the project local config: `.launchdash.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".launchdash.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `LAUNCHDASH_DATA` — dataset CSV path
/// - `LAUNCHDASH_SOURCE_URL` — dataset download URL
/// - `LAUNCHDASH_HOST` — server bind host
/// - `LAUNCHDASH_PORT` — server bind port
/// - `LAUNCHDASH_OPEN_BROWSER` — open the dashboard on start (`1`/`true`/`yes`/`on`)
/// - `LAUNCHDASH_LOGGING` — interaction log on/off
fn apply_env_overrides(config: &mut LaunchdashConfig) {
    if let Ok(val) = std::env::var("LAUNCHDASH_DATA")
        && !val.is_empty()
    {
        config.data.path = val;
    }
    if let Ok(val) = std::env::var("LAUNCHDASH_SOURCE_URL")
        && !val.is_empty()
    {
        config.data.source_url = val;
    }
    if let Ok(val) = std::env::var("LAUNCHDASH_HOST")
        && !val.is_empty()
    {
        config.server.host = val;
    }
    if let Ok(val) = std::env::var("LAUNCHDASH_PORT")
        && let Ok(port) = val.parse::<u16>()
    {
        config.server.port = port;
    }
    if let Ok(val) = std::env::var("LAUNCHDASH_OPEN_BROWSER") {
        config.server.open_browser = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("LAUNCHDASH_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.launchdash/config.toml`.
///
/// Creates the `~/.launchdash/` directory if it doesn't exist. Returns an
/// error if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.launchdash/ directory")?;
    }

    fs::write(&path, LaunchdashConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Starts from the existing global file (or the defaults when there is
/// none), updates the dotted key, and writes the result back.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let mut root: toml::Value = if path.exists() {
        let content = fs::read_to_string(&path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        toml::Value::try_from(LaunchdashConfig::default())
            .context("failed to serialize default config")?
    };

    set_toml_value(&mut root, key, value)?;

    // Refuse to write a file that no longer deserializes.
    let _: LaunchdashConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The new value takes the type of the value it replaces; unknown leaves are
/// stored as strings.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("invalid config key: '{key}'");
    }

    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(s: &str) -> toml::Value {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn resolve_without_layers_is_default() {
        assert_eq!(resolve(&[]), LaunchdashConfig::default());
    }

    #[test]
    fn resolve_merges_key_by_key() {
        let global = layer("[server]\nport = 9000\nopen_browser = false\n");
        let project = layer("[server]\nport = 9100\n[data]\npath = \"local.csv\"\n");

        let config = resolve(&[global, project]);
        assert_eq!(config.server.port, 9100);
        // Set only in the global layer, survives the project layer.
        assert!(!config.server.open_browser);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.data.path, "local.csv");
    }

    #[test]
    fn resolve_ignores_mistyped_layer() {
        let bad = layer("[server]\nport = \"not a number\"\n");
        assert_eq!(resolve(&[bad]), LaunchdashConfig::default());
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn set_toml_value_updates_string() {
        let mut root = layer("[data]\npath = \"a.csv\"\n");
        set_toml_value(&mut root, "data.path", "b.csv").unwrap();
        assert_eq!(root["data"]["path"].as_str(), Some("b.csv"));
    }

    #[test]
    fn set_toml_value_updates_bool() {
        let mut root = layer("[server]\nopen_browser = true\n");
        set_toml_value(&mut root, "server.open_browser", "off").unwrap();
        assert_eq!(root["server"]["open_browser"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_updates_integer() {
        let mut root = layer("[server]\nport = 8050\n");
        set_toml_value(&mut root, "server.port", "9000").unwrap();
        assert_eq!(root["server"]["port"].as_integer(), Some(9000));
        assert!(set_toml_value(&mut root, "server.port", "high").is_err());
    }

    #[test]
    fn set_toml_value_updates_float() {
        let mut root = layer("[slider]\nstep = 1000.0\n");
        set_toml_value(&mut root, "slider.step", "500").unwrap();
        assert_eq!(root["slider"]["step"].as_float(), Some(500.0));
    }

    #[test]
    fn set_toml_value_rejects_invalid_key() {
        let mut root = layer("[data]\npath = \"a.csv\"\n");
        assert!(set_toml_value(&mut root, "nonexistent.key", "value").is_err());
        assert!(set_toml_value(&mut root, "data..path", "value").is_err());
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let toml_str = show_effective_config().unwrap();
        let _: LaunchdashConfig = toml::from_str(&toml_str).unwrap();
    }
}
