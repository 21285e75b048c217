use crate::model::tick::Tick;

/// Per-tick price fed into the moving averages (`maAvgType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBasis {
    Close,
    TypicalPrice,
    OhlcAverage,
}

impl PriceBasis {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "default" | "close" => Some(Self::Close),
            "typicalPrice" => Some(Self::TypicalPrice),
            "OHLCAverage" => Some(Self::OhlcAverage),
            _ => None,
        }
    }

    pub fn price(self, tick: &Tick) -> f64 {
        match self {
            Self::Close => tick.close,
            Self::TypicalPrice => (tick.high + tick.low + tick.close) / 3.0,
            Self::OhlcAverage => (tick.open + tick.high + tick.low + tick.close) / 4.0,
        }
    }
}
