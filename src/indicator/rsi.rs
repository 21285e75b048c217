use super::Series;
use crate::model::tick::Tick;

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// Wilder RSI over closing prices. The first value lands at index `period`,
/// seeded by the simple average of the first `period` deltas.
pub fn rsi(ticks: &[Tick], period: usize) -> Series {
    let n = ticks.len();
    let mut out = vec![None; n];
    if period == 0 || n <= period {
        return out;
    }
    let p = period as f64;

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=period {
        let delta = ticks[i].close - ticks[i - 1].close;
        if delta >= 0.0 {
            gains += delta;
        } else {
            losses -= delta;
        }
    }
    let mut avg_gain = gains / p;
    let mut avg_loss = losses / p;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in (period + 1)..n {
        let delta = ticks[i].close - ticks[i - 1].close;
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }
    out
}
