//! Single- and two-candle geometry classifiers.

use crate::model::tick::Tick;

const EXHAUSTION_MAX_BODY_SHARE: f64 = 0.4;
const WICK_EPSILON: f64 = 1e-9;

/// Body size as a percentage of the full range; 0 for a zero-range candle.
pub fn body_fullness(tick: &Tick) -> f64 {
    let range = tick.range();
    if range > 0.0 {
        tick.body() / range * 100.0
    } else {
        0.0
    }
}

/// Body covers at least `share` (0-1) of the range.
pub fn is_full_by(tick: &Tick, share: f64) -> bool {
    tick.body() >= tick.range() * share
}

/// Green candle opens at/below `avg` and closes at/above it; red the reverse.
pub fn body_crosses(tick: &Tick, avg: f64) -> bool {
    if tick.is_green() {
        tick.open <= avg && tick.close >= avg
    } else if tick.is_red() {
        tick.open >= avg && tick.close <= avg
    } else {
        false
    }
}

/// The high/low span contains `avg`. Dojis never count.
pub fn wick_crosses(tick: &Tick, avg: f64) -> bool {
    if tick.is_green() || tick.is_red() {
        tick.low <= avg && tick.high >= avg
    } else {
        false
    }
}

/// Where along the body the average sits, as a percentage measured from the
/// open of a green candle or the close of a red one.
pub fn body_crossing_percent(tick: &Tick, avg: f64) -> Option<f64> {
    let body = tick.body();
    if body == 0.0 {
        return None;
    }
    let below = if tick.is_green() {
        avg - tick.open
    } else {
        avg - tick.close
    };
    Some(below / body * 100.0)
}

/// Confidence in [0, 1] that `cur` bearishly engulfs `prev`.
///
/// Returns 0 (not `None`) when `prev` is not green or `cur` is not red.
pub fn bearish_engulfing_score(prev: &Tick, cur: &Tick, gap_tolerance: f64) -> f64 {
    if !prev.is_green() || !cur.is_red() {
        return 0.0;
    }
    let prev_body = prev.close - prev.open;
    let cur_body = cur.open - cur.close;

    let overlap = cur.open.min(prev.close) - cur.close.max(prev.open);
    let engulfed = (overlap.max(0.0) / prev_body).min(1.0);
    let size_ratio = (cur_body / prev_body).min(2.0);

    let mut score = 0.6 * engulfed + 0.2 * (size_ratio / 2.0);
    if cur.open > prev.close * (1.0 + gap_tolerance) {
        score += 0.1;
    }
    if cur.close < prev.open {
        score += 0.1;
    }
    score.clamp(0.0, 1.0)
}

/// Small body with an upper wick dominating the lower one by more than `ratio`.
/// `None` for a zero-range candle.
pub fn is_bullish_exhaustion(tick: &Tick, ratio: f64) -> Option<bool> {
    let range = tick.range();
    if range <= 0.0 {
        return None;
    }
    let small_body = tick.body() < range * EXHAUSTION_MAX_BODY_SHARE;
    let wick_ratio = tick.upper_wick() / tick.lower_wick().max(WICK_EPSILON);
    Some(small_body && wick_ratio > ratio)
}
