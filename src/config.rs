use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::params::RawAlgoParams;
use crate::runtime::dataset_cache::{DatasetKey, ProcessMode};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub dataset: DatasetConfig,
    /// Kept loosely typed; `AlgoParams::from_raw` validates it per run.
    #[serde(default)]
    pub algo_params: RawAlgoParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub pretty: bool,
}

/// Where the tick file came from, used to key the dataset cache.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub interval: String,
    pub source: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Parse a candle interval string (e.g. "1s", "1m", "1h", "1d", "1w", "1M") into milliseconds.
pub fn parse_interval_ms(s: &str) -> Result<u64> {
    if s.len() < 2 {
        bail!("invalid interval '{}': expected format like '1m'", s);
    }

    let (num_str, suffix) = s.split_at(s.len() - 1);
    let n: u64 = num_str.parse().with_context(|| {
        format!(
            "invalid interval '{}': quantity must be a positive integer",
            s
        )
    })?;
    if n == 0 {
        bail!("invalid interval '{}': quantity must be > 0", s);
    }

    let unit_ms = match suffix {
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        "w" => 7 * 86_400_000,
        "M" => 30 * 86_400_000,
        _ => bail!(
            "invalid interval '{}': unsupported suffix '{}', expected one of s/m/h/d/w/M",
            s,
            suffix
        ),
    };

    n.checked_mul(unit_ms)
        .with_context(|| format!("invalid interval '{}': value is too large", s))
}

impl DatasetConfig {
    pub fn interval_ms(&self) -> Result<u64> {
        parse_interval_ms(&self.interval)
    }

    /// Cache key for a batch run over `file_name`, or over the live symbol
    /// when one is configured.
    pub fn key_for(&self, day: &str, file_name: &str) -> DatasetKey {
        let (mode, source_name) = match &self.symbol {
            Some(symbol) if !symbol.trim().is_empty() => {
                (ProcessMode::MostRecent, symbol.trim().to_ascii_uppercase())
            }
            _ => (ProcessMode::Batch, file_name.to_string()),
        };
        DatasetKey {
            day: day.to_string(),
            mode,
            interval: self.interval.clone(),
            source_name,
            source: self.source.clone(),
        }
    }
}

impl Config {
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("failed to parse config")?;
        config
            .dataset
            .interval_ms()
            .context("dataset.interval is invalid")?;
        Ok(config)
    }

    /// Load `.env`, then the TOML file at `path` (or `config/default.toml`).
    /// `TICK_ANALYTICS_LOG` overrides `logging.level`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;

        let mut config = Self::from_toml_str(&config_str)
            .with_context(|| format!("invalid config in {}", config_path.display()))?;

        if let Ok(level) = std::env::var("TICK_ANALYTICS_LOG") {
            if !level.trim().is_empty() {
                config.logging.level = level.trim().to_string();
            }
        }
        Ok(config)
    }
}
