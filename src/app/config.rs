// src/app/config.rs
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::heatmap::range::DEFAULT_MONTHS_BACK;
use crate::pageviews::edge::{CACHE_TTL, DEFAULT_ALLOWED_ORIGINS};
use crate::theme::Theme;

const APP_DIR: &str = "post-heatmap";
const CONFIG_FILE: &str = "config.toml";

/// Everything read from `config.toml`. Missing tables and keys take their
/// defaults, so a partial file is fine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub heatmap: HeatmapConfig,
    pub pageviews: PageViewsConfig,
    pub edge: EdgeConfig,
    pub theme: Theme,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeatmapConfig {
    pub months_back: u32,
    /// Activity export produced by the site build. Unset means
    /// `<data_dir>/post-heatmap/heatmap.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        HeatmapConfig {
            months_back: DEFAULT_MONTHS_BACK,
            data_path: None,
        }
    }
}

impl HeatmapConfig {
    pub fn resolved_data_path(&self) -> Option<PathBuf> {
        self.data_path
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR).join("heatmap.json")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageViewsConfig {
    pub endpoint: String,
    pub cache_ttl_secs: u64,
}

impl Default for PageViewsConfig {
    fn default() -> Self {
        PageViewsConfig {
            endpoint: "http://127.0.0.1:8787/".to_string(),
            cache_ttl_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EdgeConfig {
    pub bind: String,
    pub allowed_origins: Vec<String>,
    pub cache_ttl_secs: u64,
    /// JSON snapshot `{ "/path/": views }` served by `serve`.
    pub counts_path: PathBuf,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        EdgeConfig {
            bind: "127.0.0.1:8787".to_string(),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect(),
            cache_ttl_secs: CACHE_TTL.as_secs(),
            counts_path: PathBuf::from("pageviews.json"),
        }
    }
}

impl Config {
    /// Load from `path` (or the default location), falling back to defaults
    /// if the file is missing or broken. A missing default file is created.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Ok(p) => p,
                Err(e) => {
                    warn!("{e}; using default config");
                    return Self::default();
                }
            },
        };

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                if let Err(e) = Self::create_default(&path) {
                    warn!(path = %path.display(), "could not write default config: {e}");
                }
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), "{e}; using default config");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Write the default config to `path` unless a file is already there.
    pub fn create_default(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Ok(());
        }
        Self::default().save(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_content = toml::to_string_pretty(self)?;
        fs::write(path, add_config_comments(&toml_content))?;
        Ok(())
    }

    /// `~/.config/post-heatmap/config.toml` (platform equivalent).
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let mut dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        dir.push(APP_DIR);
        Ok(dir.join(CONFIG_FILE))
    }
}

fn add_config_comments(toml_content: &str) -> String {
    format!(
        r##"# post-heatmap configuration
#
# [heatmap]    months_back sets how far the calendar reaches back;
#              data_path points at the activity export (JSON list of
#              {{ date, count, titles, urls }} records).
# [pageviews]  endpoint of the page-view service used by `views`.
# [edge]       settings for `serve`: bind address, allowed CORS origins,
#              cache lifetime and the view-count snapshot file.
# [theme]      terminal colors. Colors can be named ("red", "light_blue"),
#              hex strings ("#7bc96f"), RGB arrays ([255, 128, 0]) or
#              terminal indexes (42).

{}"##,
        toml_content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load(Some(&path));
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# post-heatmap configuration"));
        assert!(written.contains(r##"hex strings ("#7bc96f")"##));
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[heatmap]\nmonths_back = 6\n\n[edge]\nbind = \"0.0.0.0:9000\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.heatmap.months_back, 6);
        assert_eq!(config.edge.bind, "0.0.0.0:9000");
        assert_eq!(config.edge.cache_ttl_secs, 300);
        assert_eq!(config.pageviews, PageViewsConfig::default());
    }

    #[test]
    fn broken_file_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "months_back = [").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
        assert_eq!(Config::load(Some(&path)), Config::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "months_back = [");
    }
}
