use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Global configuration loaded from `~/.config/httpdata/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpdataConfig {
    /// Idle libcurl handles kept for connection reuse between fetches.
    pub max_idle_handles: usize,
    /// User-Agent sent unless the request sets its own. None = `httpdata/<version>`.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Optional connect-phase timeout in seconds (None = transport default).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Deadline the CLI puts on each fetch context (None = no deadline).
    /// The core itself never imposes a timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for HttpdataConfig {
    fn default() -> Self {
        Self {
            max_idle_handles: 8,
            user_agent: None,
            connect_timeout_secs: None,
            request_timeout_secs: None,
        }
    }
}

impl HttpdataConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("httpdata")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HttpdataConfig> {
    load_or_init_at(&config_path()?)
}

/// Like `load_or_init` for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<HttpdataConfig> {
    if !path.exists() {
        let default_cfg = HttpdataConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: HttpdataConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = HttpdataConfig::default();
        assert_eq!(cfg.max_idle_handles, 8);
        assert!(cfg.user_agent.is_none());
        assert!(cfg.connect_timeout().is_none());
        assert!(cfg.request_timeout().is_none());
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            max_idle_handles = 2
            user_agent = "terraform"
            connect_timeout_secs = 5
            request_timeout_secs = 30
        "#;
        let cfg: HttpdataConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.max_idle_handles, 2);
        assert_eq!(cfg.user_agent.as_deref(), Some("terraform"));
        assert_eq!(cfg.connect_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn config_toml_optional_fields_missing() {
        let cfg: HttpdataConfig = toml::from_str("max_idle_handles = 1").unwrap();
        assert_eq!(cfg.max_idle_handles, 1);
        assert!(cfg.user_agent.is_none());
        assert!(cfg.request_timeout_secs.is_none());
    }

    #[test]
    fn load_or_init_creates_then_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let created = load_or_init_at(&path).unwrap();
        assert_eq!(created, HttpdataConfig::default());
        assert!(path.exists());

        fs::write(&path, "max_idle_handles = 3\nrequest_timeout_secs = 9\n").unwrap();
        let loaded = load_or_init_at(&path).unwrap();
        assert_eq!(loaded.max_idle_handles, 3);
        assert_eq!(loaded.request_timeout_secs, Some(9));
    }

    #[test]
    fn load_or_init_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_idle_handles = \"many\"").unwrap();
        let err = load_or_init_at(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parse"));
    }
}
