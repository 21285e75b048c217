use std::collections::BTreeMap;

use serde::Serialize;

use super::extended::ExtendedTick;
use super::tick::Tick;

/// A contiguous slice of ticks, identified by its first and last timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickWindow<T> {
    pub start: String,
    pub end: String,
    pub data: Vec<T>,
}

pub type NoiseWindow = TickWindow<ExtendedTick>;
pub type DirectionBlock = TickWindow<Tick>;

/// Windows keyed by start timestamp. Ordered so serialized output is stable.
pub type WindowMap<T> = BTreeMap<String, TickWindow<T>>;

pub trait Timestamped {
    fn timestamp(&self) -> &str;
}

impl Timestamped for Tick {
    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl Timestamped for ExtendedTick {
    fn timestamp(&self) -> &str {
        ExtendedTick::timestamp(self)
    }
}

impl<T: Timestamped + Clone> TickWindow<T> {
    /// Build a window from a non-empty slice; `None` for an empty one.
    pub fn from_slice(data: &[T]) -> Option<Self> {
        let first = data.first()?;
        let last = data.last()?;
        Some(Self {
            start: first.timestamp().to_string(),
            end: last.timestamp().to_string(),
            data: data.to_vec(),
        })
    }
}

/// Insert unless a window with the same start already exists (first wins).
pub fn insert_first<T: Timestamped + Clone>(map: &mut WindowMap<T>, data: &[T]) {
    let Some(window) = TickWindow::from_slice(data) else {
        return;
    };
    map.entry(window.start.clone()).or_insert(window);
}
