//! Runtime settings.
//!
//! Layered: built-in defaults, then an optional TOML file (`bazaar.toml` in the
//! working directory, or the `--config` path), then `BAZAAR__*` environment
//! variables, e.g. `BAZAAR__REQUEST_TIMEOUT_SECS=5`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::market_data::adapters::http::HttpSource;
use crate::market_data::adapters::{SnapshotSource, SourceError};
use crate::market_data::normaliser::{Normaliser, DEFAULT_DIRECT_MAP_MIN_KEYS};

/// One candidate bazaar endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSettings {
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Endpoints tried in order until one yields a usable snapshot
    pub sources: Vec<SourceSettings>,
    /// Per-request timeout; a timed-out source is skipped
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Debug copy of the last successful response body; empty disables it
    pub raw_response_path: String,
    /// Directory for result and raw-data files
    pub output_dir: String,
    /// A bare top-level map needs more keys than this to be read as items
    pub direct_map_min_keys: usize,
    /// Default tracing filter when RUST_LOG is unset
    pub log_filter: String,
}

fn default_sources() -> Vec<SourceSettings> {
    [
        ("https://api.hypixel.net/skyblock/bazaar", "Hypixel Direct API (skyblock/bazaar)"),
        ("https://api.hypixel.net/resources/skyblock/bazaar", "Hypixel Resources API (resources/skyblock/bazaar)"),
        ("https://sky.shiiyu.moe/api/v2/bazaar", "SkyCrypt API (sky.shiiyu.moe)"),
        ("https://api.slothpixel.me/api/skyblock/bazaar", "Slothpixel API"),
        ("https://api.hysky.dev/bazaar", "HySky API"),
    ]
    .into_iter()
    .map(|(url, description)| SourceSettings { url: url.into(), description: description.into() })
    .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            request_timeout_secs: 10,
            user_agent: concat!("bazaar-rs/", env!("CARGO_PKG_VERSION")).to_string(),
            raw_response_path: "last_bazaar_response.json".to_string(),
            output_dir: ".".to_string(),
            direct_map_min_keys: DEFAULT_DIRECT_MAP_MIN_KEYS,
            log_filter: "bazaar_rs=info".to_string(),
        }
    }
}

impl Settings {
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match config_path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("bazaar").required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("BAZAAR").separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn raw_response_path(&self) -> Option<PathBuf> {
        (!self.raw_response_path.is_empty()).then(|| PathBuf::from(&self.raw_response_path))
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }

    pub fn normaliser(&self) -> Normaliser {
        Normaliser::new(self.direct_map_min_keys)
    }

    pub fn build_sources(&self) -> Result<Vec<Box<dyn SnapshotSource>>, SourceError> {
        self.sources
            .iter()
            .map(|s| {
                let source = HttpSource::new(&s.url, &s.description, self.request_timeout(), &self.user_agent)?;
                Ok(Box::new(source) as Box<dyn SnapshotSource>)
            })
            .collect()
    }
}
