//! Per-day percentile bucketing of candle volume and candle size.
//!
//! Each histogram splits the day's observed `[low, high]` range into 100
//! equal-width buckets plus one extra slot for the maximum, so a value's
//! bucket index doubles as its 0-100 rank within the day.

use serde::Serialize;

use crate::model::tick::Tick;

pub const BUCKET_COUNT: usize = 101;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Histogram {
    pub low: f64,
    pub high: f64,
    pub bucket_width: f64,
    pub buckets: Vec<u32>,
}

impl Histogram {
    pub fn build(values: &[f64]) -> Self {
        let Some(first) = values.first() else {
            return Self {
                low: 0.0,
                high: 0.0,
                bucket_width: 0.0,
                buckets: vec![0; BUCKET_COUNT],
            };
        };
        let (low, high) = values
            .iter()
            .fold((*first, *first), |(lo, hi), v| (lo.min(*v), hi.max(*v)));

        let mut hist = Self {
            low,
            high,
            bucket_width: (high - low) / 100.0,
            buckets: vec![0; BUCKET_COUNT],
        };
        for v in values {
            let idx = hist.bucket_of(*v);
            hist.buckets[idx] += 1;
        }
        hist
    }

    /// `floor((value - low) / width)`, clamped to `[0, 100]`. A zero-width
    /// histogram (one tick, or a flat day) puts everything in bucket 0; the
    /// day's maximum always takes the extra slot 100.
    pub fn bucket_of(&self, value: f64) -> usize {
        if self.bucket_width <= 0.0 {
            return 0;
        }
        if value >= self.high {
            return BUCKET_COUNT - 1;
        }
        let raw = ((value - self.low) / self.bucket_width).floor();
        if raw.is_nan() || raw < 0.0 {
            0
        } else {
            (raw as usize).min(BUCKET_COUNT - 1)
        }
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|c| u64::from(*c)).sum()
    }
}

/// Volume and candle-size histograms for one trading day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyDistribution {
    pub volume: Histogram,
    pub wick: Histogram,
    pub body: Histogram,
}

impl DailyDistribution {
    pub fn build(day: &[Tick]) -> Self {
        let volumes: Vec<f64> = day.iter().map(|t| t.volume).collect();
        let wicks: Vec<f64> = day.iter().map(Tick::range).collect();
        let bodies: Vec<f64> = day.iter().map(Tick::body).collect();
        Self {
            volume: Histogram::build(&volumes),
            wick: Histogram::build(&wicks),
            body: Histogram::build(&bodies),
        }
    }

    pub fn volume_percentile(&self, tick: &Tick) -> usize {
        self.volume.bucket_of(tick.volume)
    }

    pub fn wick_percentile(&self, tick: &Tick) -> usize {
        self.wick.bucket_of(tick.range())
    }

    pub fn body_percentile(&self, tick: &Tick) -> usize {
        self.body.bucket_of(tick.body())
    }
}
