//! Two-pass tick enrichment.
//!
//! Pass 1 ([`base_extend`]) needs nothing but the ticks: per-day
//! distributions, change vs. the previous tick, cumulative VWAP and neighbour
//! colours. Pass 2 ([`extend`]) folds in the parameterized indicator series
//! and candle classifiers.

use crate::candle;
use crate::distribution::DailyDistribution;
use crate::indicator::bollinger::BollingerSeries;
use crate::indicator::ema::ema_crossing;
use crate::indicator::slope::relative_slope;
use crate::indicator::Series;
use crate::model::extended::{BaseExtendedTick, ExtendedTick};
use crate::model::tick::Tick;
use crate::params::AlgoParams;
use crate::session::day_ranges;
use crate::volume_trend::volume_trend_score;

const FULL_CANDLE_SHARE: f64 = 0.8;

/// Whole-array series pass 2 reads from.
#[derive(Debug, Clone, Copy)]
pub struct SeriesBundle<'a> {
    pub sma: &'a [Option<f64>],
    pub ema_fast: &'a [Option<f64>],
    pub ema_slow: &'a [Option<f64>],
    pub bollinger: &'a BollingerSeries,
}

/// Running state carried across the whole array while days are folded in.
#[derive(Debug, Default)]
struct VwapAccumulator {
    price_volume: f64,
    volume: f64,
}

impl VwapAccumulator {
    fn push(&mut self, tick: &Tick) -> Option<f64> {
        let typical = (tick.high + tick.low + tick.close) / 3.0;
        self.price_volume += typical * tick.volume;
        self.volume += tick.volume;
        if self.volume > 0.0 {
            Some(self.price_volume / self.volume)
        } else {
            None
        }
    }
}

/// Pass 1. Cannot fail; an empty input yields an empty output.
pub fn base_extend(ticks: &[Tick]) -> Vec<BaseExtendedTick> {
    let mut vwap = VwapAccumulator::default();
    let mut out = Vec::with_capacity(ticks.len());

    for (_day, range) in day_ranges(ticks) {
        let dist = DailyDistribution::build(&ticks[range.clone()]);
        for i in range {
            let tick = &ticks[i];
            let prev = i.checked_sub(1).map(|p| &ticks[p]);
            let next = ticks.get(i + 1);

            let absolute_change = prev.map(|p| tick.open - p.open);
            let percent_change = prev
                .filter(|p| p.open != 0.0)
                .map(|p| (tick.open - p.open) / p.open * 100.0);

            out.push(BaseExtendedTick {
                tick: tick.clone(),
                original_index: i,
                percent_change,
                absolute_change,
                vwap: vwap.push(tick),
                is_green: tick.is_green(),
                is_prev_green: prev.map(Tick::is_green),
                is_next_green: next.map(Tick::is_green),
                candle_body_fullness: candle::body_fullness(tick),
                is_candle_full_80: candle::is_full_by(tick, FULL_CANDLE_SHARE),
                candle_body_dist_percentile: dist.body_percentile(tick),
                candle_wick_dist_percentile: dist.wick_percentile(tick),
                candle_volume_dist_percentile: dist.volume_percentile(tick),
            });
        }
    }
    out
}

/// Pass 2. `None` when there is nothing to extend.
///
/// Parameters were validated when `params` was built, so per-tick evaluation
/// never has to look for a missing knob.
pub fn extend(
    base: &[BaseExtendedTick],
    series: SeriesBundle<'_>,
    params: &AlgoParams,
) -> Option<Vec<ExtendedTick>> {
    if base.is_empty() {
        return None;
    }

    let closes: Series = base.iter().map(|b| Some(b.tick.close)).collect();
    let volumes: Vec<f64> = base.iter().map(|b| b.tick.volume).collect();
    let price_slope = relative_slope(&closes, params.slope_periods.raw_price);
    let sma_slope = relative_slope(series.sma, params.slope_periods.sma);
    let ema_slope = relative_slope(series.ema_fast, params.slope_periods.ema);

    let extended = base
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let tick = &b.tick;
            let moving_avg = series.sma.get(i).copied().flatten();
            let mut ext = ExtendedTick::from(b.clone());

            ext.moving_avg = moving_avg;
            ext.fast_ema = series.ema_fast.get(i).copied().flatten();
            ext.slow_ema = series.ema_slow.get(i).copied().flatten();
            ext.ema_crossing = ema_crossing(series.ema_fast, series.ema_slow, i);
            ext.bollinger_breakout = series.bollinger.is_breakout(i, tick.close);
            if let Some(avg) = moving_avg {
                ext.is_body_crossing = candle::body_crosses(tick, avg);
                ext.is_wick_crossing = candle::wick_crosses(tick, avg);
                ext.crosses_body_at_percent = candle::body_crossing_percent(tick, avg);
            }
            ext.bearish_engulfing_score = i.checked_sub(1).map(|p| {
                candle::bearish_engulfing_score(
                    &base[p].tick,
                    tick,
                    params.bear_engulfing_tolerance,
                )
            });
            ext.is_bullish_exhaustion =
                candle::is_bullish_exhaustion(tick, params.bull_exhaustion_ratio);
            ext.volume_trend_score = volume_trend_score(&volumes, i, &params.volume_trend);
            ext.price_slope = price_slope[i];
            ext.sma_slope = sma_slope[i];
            ext.ema_slope = ema_slope[i];
            ext
        })
        .collect();
    Some(extended)
}
