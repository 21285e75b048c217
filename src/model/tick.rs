use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// One OHLCV candle as delivered by the upstream feed, already sorted by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Tick {
    pub fn new(
        timestamp: impl Into<String>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn is_green(&self) -> bool {
        self.close > self.open
    }

    pub fn is_red(&self) -> bool {
        self.open > self.close
    }

    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// Trading-day key: the `YYYY-MM-DD` prefix of the timestamp.
    pub fn day_key(&self) -> &str {
        self.timestamp.get(..10).unwrap_or(&self.timestamp)
    }

    /// Check the OHLCV shape invariants. `index` is only used for the error.
    pub fn validate(&self, index: usize) -> Result<(), AnalyticsError> {
        let fields = [self.open, self.high, self.low, self.close, self.volume];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(malformed(index, "non-finite price or volume"));
        }
        if self.high < self.low {
            return Err(malformed(index, "high below low"));
        }
        if self.high < self.open.max(self.close) {
            return Err(malformed(index, "high below open/close"));
        }
        if self.low > self.open.min(self.close) {
            return Err(malformed(index, "low above open/close"));
        }
        if self.volume < 0.0 {
            return Err(malformed(index, "negative volume"));
        }
        Ok(())
    }
}

fn malformed(index: usize, reason: &str) -> AnalyticsError {
    AnalyticsError::MalformedTick {
        index,
        reason: reason.to_string(),
    }
}
