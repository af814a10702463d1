//! Optional config file loading. Search order: ./vnscrape.toml, then
//! $XDG_CONFIG_HOME/vnscrape/config.toml (or ~/.config/vnscrape/config.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file contents. All fields optional; only present keys override defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// Section listing URL (page 1). Later pages append `-p{N}`.
    pub section_url: Option<String>,
    /// Number of articles to collect.
    pub target_count: Option<usize>,
    /// Directory for the output files. Relative to CWD.
    pub output_dir: Option<PathBuf>,
    pub csv_file: Option<String>,
    pub json_file: Option<String>,
    pub text_file: Option<String>,
    /// HTTP User-Agent header.
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Pause after each article, in seconds.
    pub article_delay_secs: Option<u64>,
    /// Pause between listing pages, in seconds.
    pub page_delay_secs: Option<u64>,
}

const LOCAL_FILE_NAME: &str = "vnscrape.toml";
const APP_DIR: &str = "vnscrape";
const USER_FILE_NAME: &str = "config.toml";

/// Candidate config files in priority order: `<cwd>/vnscrape.toml`, then the user config file.
pub fn config_search_paths(cwd: &Path) -> Vec<PathBuf> {
    std::iter::once(cwd.join(LOCAL_FILE_NAME))
        .chain(dirs::config_dir().map(|d| d.join(APP_DIR).join(USER_FILE_NAME)))
        .collect()
}

/// Read and parse one config file. Errors name the offending path.
pub fn load_config_from(path: &Path) -> Result<Config, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    toml::from_str(&text).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
}

/// Load the first config file found on the search path. No file at all is Ok(None); a file
/// that exists but cannot be read or parsed is an error, and later candidates are not tried.
pub fn load_config() -> Result<Option<Config>, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine current directory: {}", e))?;
    config_search_paths(&cwd)
        .into_iter()
        .find(|p| p.is_file())
        .map(|p| load_config_from(&p))
        .transpose()
}
