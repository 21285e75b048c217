use serde::Serialize;

use super::Series;
use crate::model::tick::Tick;
use crate::params::BollingerParams;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerSeries {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

impl BollingerSeries {
    /// Close strictly above the upper band.
    pub fn is_breakout(&self, index: usize, close: f64) -> bool {
        matches!(self.upper.get(index), Some(Some(upper)) if close > *upper)
    }
}

/// Rolling mean ± `multiplier` population standard deviations of the close.
pub fn bollinger(ticks: &[Tick], params: BollingerParams) -> BollingerSeries {
    let n = ticks.len();
    let mut out = BollingerSeries {
        upper: vec![None; n],
        middle: vec![None; n],
        lower: vec![None; n],
    };
    let period = params.period;
    if period == 0 || n < period {
        return out;
    }

    for i in (period - 1)..n {
        let closes = ticks[i + 1 - period..=i].iter().map(|t| t.close);
        let mean = closes.clone().sum::<f64>() / period as f64;
        let variance = closes
            .map(|c| {
                let d = c - mean;
                d * d
            })
            .sum::<f64>()
            / period as f64;
        let std_dev = variance.sqrt();

        out.upper[i] = Some(mean + params.multiplier * std_dev);
        out.middle[i] = Some(mean);
        out.lower[i] = Some(mean - params.multiplier * std_dev);
    }
    out
}
