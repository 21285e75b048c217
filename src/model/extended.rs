use serde::Serialize;

use super::tick::Tick;

/// Tick plus the day-local fields that need no tunable parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseExtendedTick {
    #[serde(flatten)]
    pub tick: Tick,
    pub original_index: usize,
    pub percent_change: Option<f64>,
    pub absolute_change: Option<f64>,
    pub vwap: Option<f64>,
    pub is_green: bool,
    pub is_prev_green: Option<bool>,
    pub is_next_green: Option<bool>,
    pub candle_body_fullness: f64,
    pub is_candle_full_80: bool,
    pub candle_body_dist_percentile: usize,
    pub candle_wick_dist_percentile: usize,
    pub candle_volume_dist_percentile: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossDirection {
    Bullish,
    Bearish,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmaCrossing {
    pub crossing: bool,
    pub direction: CrossDirection,
}

impl EmaCrossing {
    pub const NONE: EmaCrossing = EmaCrossing {
        crossing: false,
        direction: CrossDirection::None,
    };
}

/// Fully enriched tick: base fields plus every parameterized classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedTick {
    #[serde(flatten)]
    pub base: BaseExtendedTick,
    pub moving_avg: Option<f64>,
    pub fast_ema: Option<f64>,
    pub slow_ema: Option<f64>,
    pub ema_crossing: EmaCrossing,
    pub bollinger_breakout: bool,
    pub is_body_crossing: bool,
    pub is_wick_crossing: bool,
    pub crosses_body_at_percent: Option<f64>,
    pub bearish_engulfing_score: Option<f64>,
    pub is_bullish_exhaustion: Option<bool>,
    pub volume_trend_score: Option<f64>,
    pub price_slope: Option<f64>,
    pub sma_slope: Option<f64>,
    pub ema_slope: Option<f64>,
}

impl From<BaseExtendedTick> for ExtendedTick {
    /// Empty parameterized fields; pass 2 fills them in.
    fn from(base: BaseExtendedTick) -> Self {
        Self {
            base,
            moving_avg: None,
            fast_ema: None,
            slow_ema: None,
            ema_crossing: EmaCrossing::NONE,
            bollinger_breakout: false,
            is_body_crossing: false,
            is_wick_crossing: false,
            crosses_body_at_percent: None,
            bearish_engulfing_score: None,
            is_bullish_exhaustion: None,
            volume_trend_score: None,
            price_slope: None,
            sma_slope: None,
            ema_slope: None,
        }
    }
}

impl ExtendedTick {
    pub fn tick(&self) -> &Tick {
        &self.base.tick
    }

    pub fn timestamp(&self) -> &str {
        &self.base.tick.timestamp
    }
}
