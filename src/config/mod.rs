mod settings;

pub use settings::{ApiSettings, Config, DisplaySettings, OutputSettings};

use crate::error::{BillsError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that overrides `api.token`
pub const TOKEN_ENV: &str = "VENDOR_BILLS_TOKEN";

/// Get the config directory path (XDG config dir, or ~/.vendor-bills/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "vendor-bills") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        BillsError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".vendor-bills"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve the configured output dir; relative paths live under the config dir
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    let path = expand_path(output_dir);
    if path.is_absolute() {
        path
    } else {
        config_dir.join(path)
    }
}

/// Load config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(BillsError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    let config: Config =
        toml::from_str(&content).map_err(|e| BillsError::ConfigParse { path: path.clone(), source: e })?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load config.toml when present, falling back to defaults
pub fn load_config_or_default(config_dir: &Path) -> Result<Config> {
    if config_dir.join("config.toml").exists() {
        load_config(config_dir)
    } else {
        debug!(dir = %config_dir.display(), "no config.toml, using defaults");
        Ok(Config::default())
    }
}

/// API token: the environment wins over config.toml
pub fn resolve_token(api: &ApiSettings) -> Option<String> {
    std::env::var(TOKEN_ENV)
        .ok()
        .filter(|t| !t.trim().is_empty())
        .or_else(|| api.token.clone().filter(|t| !t.trim().is_empty()))
}

/// Create the config directory with a template config.toml
pub fn init_config_dir(config_dir: &Path) -> Result<()> {
    if config_dir.exists() {
        return Err(BillsError::AlreadyInitialized(config_dir.to_path_buf()));
    }

    fs::create_dir_all(config_dir)?;
    fs::create_dir_all(config_dir.join("output"))?;
    fs::write(config_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[api]
base_url = "http://localhost:8000/api"
company_id = "1"
# token = "..."             # or set VENDOR_BILLS_TOKEN
timeout_secs = 10

[display]
currency_symbol = "₹"

[reconcile]
# Show placeholder figures for lines that report a quantity but no pricing
estimate_missing = true
# "missing": a total of 0 from the API falls back to the sum of the lines
# "authoritative": a total the API explicitly sent as 0 is kept
zero_totals = "missing"

[output]
output_dir = "output"       # relative to this directory, or an absolute/~ path
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_with_defaults() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.api.company_id.as_deref(), Some("1"));
        assert_eq!(config.display.currency_symbol, "₹");
        assert!(config.reconcile.estimate_missing);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.output.output_dir, "output");
    }

    #[test]
    fn relative_output_dir_resolves_against_config_dir() {
        let dir = Path::new("/tmp/vb-config");
        assert_eq!(resolve_output_dir("output", dir), dir.join("output"));
        assert_eq!(resolve_output_dir("/srv/bills", dir), PathBuf::from("/srv/bills"));
    }
}
