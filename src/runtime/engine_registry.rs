use std::collections::HashMap;
use std::fmt;

use crate::engine::{run, AnalyticsResult};
use crate::error::AnalyticsError;
use crate::params::AlgoParams;

use super::dataset_cache::{DatasetCache, DatasetKey};

/// Identity of one logical analytics engine, e.g. one chart's live feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EngineId {
    pub request_type: String,
    pub symbol: String,
    pub source: String,
    pub algorithm: String,
    pub chart_id: Option<String>,
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}",
            self.request_type,
            self.symbol,
            self.source,
            self.algorithm,
            self.chart_id.as_deref().unwrap_or("n/a")
        )
    }
}

#[derive(Debug)]
struct EngineEntry {
    dataset: DatasetKey,
    result: AnalyticsResult,
}

/// Latest result per engine id. Owned by the caller; there is no global
/// registry.
#[derive(Debug, Default)]
pub struct EngineRegistry {
    engines: HashMap<EngineId, EngineEntry>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run over the cached dataset and keep the result under `id`, replacing
    /// whatever that id held before.
    pub fn start(
        &mut self,
        id: EngineId,
        dataset: &DatasetKey,
        cache: &DatasetCache,
        params: &AlgoParams,
    ) -> Result<&AnalyticsResult, AnalyticsError> {
        let ticks = cache
            .get(dataset)
            .ok_or_else(|| AnalyticsError::DatasetNotFound(dataset.to_string()))?;
        let result = run(ticks, params)?;

        if self.engines.remove(&id).is_some() {
            tracing::info!(engine = %id, "Replacing running engine");
        }
        tracing::info!(engine = %id, dataset = %dataset, "Engine started");

        let entry = self.engines.entry(id).or_insert(EngineEntry {
            dataset: dataset.clone(),
            result,
        });
        Ok(&entry.result)
    }

    pub fn stop(&mut self, id: &EngineId) -> Option<AnalyticsResult> {
        let entry = self.engines.remove(id)?;
        tracing::info!(engine = %id, "Engine stopped");
        Some(entry.result)
    }

    pub fn result(&self, id: &EngineId) -> Option<&AnalyticsResult> {
        self.engines.get(id).map(|e| &e.result)
    }

    pub fn dataset(&self, id: &EngineId) -> Option<&DatasetKey> {
        self.engines.get(id).map(|e| &e.dataset)
    }

    /// Engine ids in deterministic lexical order.
    pub fn engine_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.engines.keys().map(ToString::to_string).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
