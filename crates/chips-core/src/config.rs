//! Configuration parsing for the broker-chips pipeline.
//!
//! The runner reads its settings from a single JSON config file describing
//! where per-date archives live, the name of the date index, and the
//! resolver/engine tuning knobs.
//!
//! # Example config
//!
//! ```json
//! {
//!   "app": { "module_name": "chips", "log_path": "/tmp/log" },
//!   "source": { "kind": "http", "base_url": "https://example.com/data/chips" },
//!   "date_index": "dates.json",
//!   "cache_capacity": 32,
//!   "batch_size": 5
//! }
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ChipsError;

/// Default number of opened archives kept by the resolver cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// Default number of per-date fetches in flight at once.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Default file name of the date index, relative to the source root.
pub const DEFAULT_DATE_INDEX: &str = "dates.json";

/// Top-level application config, deserialized from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Module metadata (name, log path).
    pub app: Option<ModuleMeta>,

    /// Where archives and the date index are fetched from.
    pub source: SourceConfig,

    /// Date index file name (default: `dates.json`).
    pub date_index: Option<String>,

    /// Resolver cache capacity in archives (default: 32).
    pub cache_capacity: Option<usize>,

    /// Concurrent per-date fetches (default: 5).
    pub batch_size: Option<usize>,
}

/// Module metadata block.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleMeta {
    pub module_name: Option<String>,
    pub log_path: Option<String>,
}

/// Archive source selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Static file host serving `{date}.zip` and the date index.
    Http { base_url: String },
    /// Local directory holding `{date}.zip` and the date index.
    Dir { path: PathBuf },
}

impl AppConfig {
    pub fn effective_date_index(&self) -> String {
        self.date_index.clone().unwrap_or_else(|| DEFAULT_DATE_INDEX.to_string())
    }

    /// Cache capacity, never below one entry.
    pub fn effective_cache_capacity(&self) -> usize {
        self.cache_capacity.unwrap_or(DEFAULT_CACHE_CAPACITY).max(1)
    }

    /// Batch size, never below one fetch.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE).max(1)
    }

    /// Returns the module name, defaulting to `"chips"`.
    pub fn module_name(&self) -> String {
        self.app
            .as_ref()
            .and_then(|m| m.module_name.clone())
            .unwrap_or_else(|| "chips".to_string())
    }

    /// Returns the log path.
    pub fn log_path(&self) -> Option<String> {
        self.app.as_ref().and_then(|m| m.log_path.clone())
    }
}

/// Parse a JSON config document.
pub fn parse_config(content: &str) -> Result<AppConfig, ChipsError> {
    serde_json::from_str(content).map_err(|e| ChipsError::Config(e.to_string()))
}

/// Load and parse a JSON config file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_config(&content)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn http_source_with_defaults() {
        let cfg = parse_config(r#"{"source": {"kind": "http", "base_url": "https://host/data"}}"#).unwrap();
        match &cfg.source {
            SourceConfig::Http { base_url } => assert_eq!(base_url, "https://host/data"),
            other => panic!("expected Http, got {other:?}"),
        }
        assert_eq!(cfg.effective_date_index(), "dates.json");
        assert_eq!(cfg.effective_cache_capacity(), DEFAULT_CACHE_CAPACITY);
        assert_eq!(cfg.effective_batch_size(), DEFAULT_BATCH_SIZE);
        assert_eq!(cfg.module_name(), "chips");
        assert!(cfg.log_path().is_none());
    }

    #[test]
    fn dir_source_with_overrides() {
        let cfg = parse_config(
            r#"{
                "app": {"module_name": "chips_eod", "log_path": "/tmp/log"},
                "source": {"kind": "dir", "path": "/srv/chips"},
                "date_index": "index.json",
                "cache_capacity": 0,
                "batch_size": 8
            }"#,
        )
        .unwrap();
        assert!(matches!(cfg.source, SourceConfig::Dir { .. }));
        assert_eq!(cfg.effective_date_index(), "index.json");
        assert_eq!(cfg.effective_cache_capacity(), 1);
        assert_eq!(cfg.effective_batch_size(), 8);
        assert_eq!(cfg.module_name(), "chips_eod");
        assert_eq!(cfg.log_path().as_deref(), Some("/tmp/log"));
    }

    #[test]
    fn unknown_source_kind_is_config_error() {
        let err = parse_config(r#"{"source": {"kind": "ftp", "host": "x"}}"#).unwrap_err();
        assert!(matches!(err, ChipsError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"source": {{"kind": "dir", "path": "data"}}, "batch_size": 2}}"#).unwrap();
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.effective_batch_size(), 2);
    }
}
