use serde::Serialize;

use crate::model::extended::ExtendedTick;
use crate::model::window::{insert_first, WindowMap};
use crate::noise_window::lookback_window;
use crate::params::AlgoParams;
use crate::session::is_early_session;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedCrossing {
    /// Timestamps of the tick after each confirmed candidate.
    pub confirmed_signals: Vec<String>,
    /// Noisy lookback windows that discarded a candidate, by start timestamp.
    pub negating_windows: WindowMap<ExtendedTick>,
}

/// Body crossing on a large-bodied candle outside the opening minutes.
fn is_candidate(tick: &ExtendedTick, params: &AlgoParams) -> bool {
    tick.is_body_crossing
        && (tick.base.candle_body_dist_percentile as f64) > params.min_candle_body_dist
        && !(params.exclude_early_session && is_early_session(tick.timestamp()))
}

/// The candle's colour carries into the next one.
fn is_confirmed(tick: &ExtendedTick) -> bool {
    tick.base.is_next_green == Some(tick.base.is_green)
}

/// Scan for moving-average body crossings that are not preceded by chop.
///
/// The last tick is never a candidate because confirmation needs its
/// successor. Noise vetoes are applied before confirmation, so a window can
/// end up in `negating_windows` for a candidate that would not have
/// confirmed anyway.
pub fn detect_confirmed_crossings(ticks: &[ExtendedTick], params: &AlgoParams) -> ConfirmedCrossing {
    let mut out = ConfirmedCrossing::default();
    let mut raw: Vec<usize> = Vec::new();

    for i in 0..ticks.len().saturating_sub(1) {
        if !is_candidate(&ticks[i], params) {
            continue;
        }
        let window = lookback_window(ticks, i, params.noise_window_length);
        if params.noise_strategy.is_noisy(window, &params.noise) {
            insert_first(&mut out.negating_windows, window);
        } else {
            raw.push(i);
        }
    }

    out.confirmed_signals = raw
        .into_iter()
        .filter(|i| is_confirmed(&ticks[*i]))
        .map(|i| ticks[i + 1].timestamp().to_string())
        .collect();
    out
}
