use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use tick_analytics::config::Config;
use tick_analytics::model::tick::Tick;
use tick_analytics::params::AlgoParams;
use tick_analytics::runtime::dataset_cache::DatasetCache;
use tick_analytics::runtime::engine_registry::{EngineId, EngineRegistry};

const USAGE: &str = "usage: tick-analytics <ticks.json> [config.toml]";

fn read_ticks(path: &Path) -> Result<Vec<Tick>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse ticks in {}", path.display()))
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(ticks_path) = args.next().map(PathBuf::from) else {
        bail!(USAGE);
    };
    let config_path = args.next().map(PathBuf::from);

    let config = match Config::load(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    // Logs go to stderr so stdout carries only the result.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::try_new(&config.logging.level)
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            }),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .json()
        .init();

    let params = AlgoParams::from_raw(&config.algo_params).context("invalid [algo_params]")?;
    let ticks = read_ticks(&ticks_path)?;

    let file_name = ticks_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let day = ticks
        .first()
        .map(|t| t.day_key().to_string())
        .unwrap_or_default();
    let dataset = config.dataset.key_for(&day, &file_name);

    tracing::info!(
        file = %ticks_path.display(),
        dataset = %dataset,
        ticks = ticks.len(),
        "Starting tick-analytics"
    );

    let mut cache = DatasetCache::new();
    cache.store(dataset.clone(), ticks);

    let engine_id = EngineId {
        request_type: "analysis".to_string(),
        symbol: dataset.source_name.clone(),
        source: config.dataset.source.clone(),
        algorithm: params.noise_strategy.label().to_string(),
        chart_id: None,
    };
    let mut registry = EngineRegistry::new();
    let result = registry
        .start(engine_id, &dataset, &cache, &params)
        .context("analytics run failed")?;

    let out = if config.output.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{}", out);
    Ok(())
}
