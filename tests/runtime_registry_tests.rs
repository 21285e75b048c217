use tick_analytics::error::AnalyticsError;
use tick_analytics::model::tick::Tick;
use tick_analytics::params::{AlgoParams, RawAlgoParams};
use tick_analytics::runtime::dataset_cache::{DatasetCache, DatasetKey, ProcessMode};
use tick_analytics::runtime::engine_registry::{EngineId, EngineRegistry};

fn tick(minute: u32, close: f64) -> Tick {
    Tick::new(
        format!("2025-04-01 10:{:02}:00", minute),
        close - 0.1,
        close + 0.1,
        close - 0.2,
        close,
        1000.0,
    )
}

fn key(mode: ProcessMode) -> DatasetKey {
    DatasetKey {
        day: "2025-04-01".to_string(),
        mode,
        interval: "1m".to_string(),
        source_name: "SPY".to_string(),
        source: "alpaca".to_string(),
    }
}

fn engine_id(chart: Option<&str>) -> EngineId {
    EngineId {
        request_type: "analysis".to_string(),
        symbol: "SPY".to_string(),
        source: "alpaca".to_string(),
        algorithm: "NW3".to_string(),
        chart_id: chart.map(str::to_string),
    }
}

fn params() -> AlgoParams {
    let raw: RawAlgoParams = serde_json::from_value(serde_json::json!({
        "noiseWindow": "NW3",
        "noiseWindowLength": 3,
        "atrMultiplier": 0.5,
        "altThreshold": 0.6,
        "hugRatio": 0.7,
        "sma1Period": 2,
        "ema1Period": 2,
        "ema2Period": 3,
        "maAvgType": "default",
        "rsiPeriod": 2,
        "adxPeriod": 2,
        "macdShortPeriod": 2,
        "macdLongPeriod": 3,
        "macdSignalPeriod": 2,
        "minCandleBodyDist": 50,
        "slopePeriodByRawPrice": 1,
        "slopePeriodBySMA": 1,
        "slopePeriodByEMA": 1,
        "volumeTrendLookback": 2,
        "volumeTrendMinTrend": 0.5,
        "volumeTrendMinSurge": 1.0,
        "bearEngTolerance": 0.001,
        "bullExhThreshold": 2.0
    }))
    .unwrap();
    AlgoParams::from_raw(&raw).unwrap()
}

#[test]
fn dataset_key_renders_colon_separated() {
    assert_eq!(
        key(ProcessMode::MostRecent).to_string(),
        "2025-04-01:most-recent:1m:SPY:alpaca"
    );
    assert_eq!(key(ProcessMode::Batch).to_string(), "2025-04-01:batch:1m:SPY:alpaca");
}

#[test]
/// Live datasets grow as new ticks arrive.
fn most_recent_mode_appends() {
    let mut cache = DatasetCache::new();
    assert_eq!(cache.store(key(ProcessMode::MostRecent), vec![tick(0, 100.0)]), 1);
    assert_eq!(
        cache.store(key(ProcessMode::MostRecent), vec![tick(1, 100.5), tick(2, 101.0)]),
        3
    );
    let stored = cache.get(&key(ProcessMode::MostRecent)).unwrap();
    assert_eq!(stored[2].timestamp, "2025-04-01 10:02:00");
}

#[test]
/// Batch datasets are replaced on every store.
fn batch_mode_replaces() {
    let mut cache = DatasetCache::new();
    cache.store(key(ProcessMode::Batch), vec![tick(0, 100.0), tick(1, 100.5)]);
    assert_eq!(cache.store(key(ProcessMode::Batch), vec![tick(5, 99.0)]), 1);
    assert_eq!(
        cache.get(&key(ProcessMode::Batch)).unwrap()[0].timestamp,
        "2025-04-01 10:05:00"
    );
    // modes are part of the identity
    assert!(cache.get(&key(ProcessMode::MostRecent)).is_none());
    assert_eq!(cache.len(), 1);
}

#[test]
fn engine_id_falls_back_to_na_without_chart() {
    assert_eq!(engine_id(None).to_string(), "analysis:SPY:alpaca:NW3:n/a");
    assert_eq!(engine_id(Some("c1")).to_string(), "analysis:SPY:alpaca:NW3:c1");
}

#[test]
/// Starting an engine id that is already live replaces its result instead
/// of running two side by side.
fn restart_replaces_existing_engine() {
    let mut cache = DatasetCache::new();
    let dataset = key(ProcessMode::MostRecent);
    cache.store(dataset.clone(), (0..4).map(|m| tick(m, 100.0 + m as f64)).collect());

    let mut registry = EngineRegistry::new();
    let first_len = registry
        .start(engine_id(None), &dataset, &cache, &params())
        .unwrap()
        .extended_ticks
        .len();
    assert_eq!(first_len, 4);

    cache.store(dataset.clone(), vec![tick(4, 104.0), tick(5, 105.0)]);
    let second_len = registry
        .start(engine_id(None), &dataset, &cache, &params())
        .unwrap()
        .extended_ticks
        .len();
    assert_eq!(second_len, 6);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.dataset(&engine_id(None)), Some(&dataset));
}

#[test]
fn stop_removes_engine() {
    let mut cache = DatasetCache::new();
    let dataset = key(ProcessMode::Batch);
    cache.store(dataset.clone(), vec![tick(0, 100.0), tick(1, 101.0)]);

    let mut registry = EngineRegistry::new();
    registry
        .start(engine_id(Some("a")), &dataset, &cache, &params())
        .unwrap();
    registry
        .start(engine_id(Some("b")), &dataset, &cache, &params())
        .unwrap();
    assert_eq!(
        registry.engine_ids(),
        vec![
            "analysis:SPY:alpaca:NW3:a".to_string(),
            "analysis:SPY:alpaca:NW3:b".to_string()
        ]
    );

    assert!(registry.stop(&engine_id(Some("a"))).is_some());
    assert!(registry.result(&engine_id(Some("a"))).is_none());
    assert!(registry.stop(&engine_id(Some("a"))).is_none());
    assert!(registry.result(&engine_id(Some("b"))).is_some());
}

#[test]
fn unknown_dataset_is_an_error() {
    let cache = DatasetCache::new();
    let mut registry = EngineRegistry::new();
    let err = registry
        .start(engine_id(None), &key(ProcessMode::Batch), &cache, &params())
        .unwrap_err();
    assert!(matches!(err, AnalyticsError::DatasetNotFound(_)));
    assert!(registry.is_empty());
}
