use std::collections::HashMap;
use std::fmt;

use crate::model::tick::Tick;

/// How new data for an existing dataset is merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessMode {
    /// Live feed: ticks are appended to what is already cached.
    MostRecent,
    /// Historical analysis: a store replaces the dataset wholesale.
    Batch,
}

impl ProcessMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MostRecent => "most-recent",
            Self::Batch => "batch",
        }
    }
}

impl fmt::Display for ProcessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one cached tick series.
///
/// `source_name` is the ticker for live data and the stored file name for
/// batch data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetKey {
    pub day: String,
    pub mode: ProcessMode,
    pub interval: String,
    pub source_name: String,
    pub source: String,
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}",
            self.day, self.mode, self.interval, self.source_name, self.source
        )
    }
}

#[derive(Debug, Default)]
pub struct DatasetCache {
    datasets: HashMap<DatasetKey, Vec<Tick>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `ticks` into the dataset per its mode; returns the stored length.
    pub fn store(&mut self, key: DatasetKey, ticks: Vec<Tick>) -> usize {
        let mode = key.mode;
        let label = key.to_string();
        let entry = self.datasets.entry(key).or_default();
        match mode {
            ProcessMode::MostRecent => entry.extend(ticks),
            ProcessMode::Batch => *entry = ticks,
        }
        tracing::debug!(dataset = %label, len = entry.len(), "Dataset stored");
        entry.len()
    }

    pub fn get(&self, key: &DatasetKey) -> Option<&[Tick]> {
        self.datasets.get(key).map(Vec::as_slice)
    }

    pub fn remove(&mut self, key: &DatasetKey) -> Option<Vec<Tick>> {
        self.datasets.remove(key)
    }

    pub fn clear(&mut self) {
        self.datasets.clear();
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}
