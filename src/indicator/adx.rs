use serde::Serialize;

use super::Series;
use crate::model::tick::Tick;

/// Average Directional Index with its directional indicators.
///
/// Warm-up: `plus_di`/`minus_di`/`dx` start at `period`, `adx` at `2 * period - 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdxSeries {
    pub adx: Series,
    pub plus_di: Series,
    pub minus_di: Series,
    pub dx: Series,
}

impl AdxSeries {
    fn empty(len: usize) -> Self {
        Self {
            adx: vec![None; len],
            plus_di: vec![None; len],
            minus_di: vec![None; len],
            dx: vec![None; len],
        }
    }
}

struct DirectionalMove {
    true_range: f64,
    plus_dm: f64,
    minus_dm: f64,
}

fn directional_move(prev: &Tick, cur: &Tick) -> DirectionalMove {
    let true_range = (cur.high - cur.low)
        .max((cur.high - prev.close).abs())
        .max((cur.low - prev.close).abs());
    let up = cur.high - prev.high;
    let down = prev.low - cur.low;
    DirectionalMove {
        true_range,
        plus_dm: if up > down && up > 0.0 { up } else { 0.0 },
        minus_dm: if down > up && down > 0.0 { down } else { 0.0 },
    }
}

/// Wilder running-sum step: `s - s / n + x`.
fn wilder_sum(prev: f64, raw: f64, period: f64) -> f64 {
    prev - prev / period + raw
}

fn ratio_pct(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        100.0 * num / den
    } else {
        0.0
    }
}

pub fn adx(ticks: &[Tick], period: usize) -> AdxSeries {
    let n = ticks.len();
    let mut out = AdxSeries::empty(n);
    if period == 0 || n <= period {
        return out;
    }
    let p = period as f64;

    // Raw moves are defined from index 1; the first smoothed value at `period`
    // is the plain sum of moves 1..=period.
    let moves: Vec<DirectionalMove> = ticks
        .windows(2)
        .map(|w| directional_move(&w[0], &w[1]))
        .collect();

    let mut tr_s: f64 = moves[..period].iter().map(|m| m.true_range).sum();
    let mut plus_s: f64 = moves[..period].iter().map(|m| m.plus_dm).sum();
    let mut minus_s: f64 = moves[..period].iter().map(|m| m.minus_dm).sum();

    let mut dx_sum = 0.0;
    let mut adx_prev: Option<f64> = None;

    for i in period..n {
        if i > period {
            let m = &moves[i - 1];
            tr_s = wilder_sum(tr_s, m.true_range, p);
            plus_s = wilder_sum(plus_s, m.plus_dm, p);
            minus_s = wilder_sum(minus_s, m.minus_dm, p);
        }

        let plus_di = ratio_pct(plus_s, tr_s);
        let minus_di = ratio_pct(minus_s, tr_s);
        let dx = ratio_pct((plus_di - minus_di).abs(), plus_di + minus_di);
        out.plus_di[i] = Some(plus_di);
        out.minus_di[i] = Some(minus_di);
        out.dx[i] = Some(dx);

        // ADX seeds with the mean of the first `period` DX values, then
        // smooths with the Wilder average.
        let seed_end = 2 * period - 1;
        if i < seed_end {
            dx_sum += dx;
        } else if i == seed_end {
            dx_sum += dx;
            adx_prev = Some(dx_sum / p);
        } else if let Some(prev) = adx_prev {
            adx_prev = Some((prev * (p - 1.0) + dx) / p);
        }
        out.adx[i] = adx_prev;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending(n: usize) -> Vec<Tick> {
        (0..n)
            .map(|i| {
                let base = 100.0 + i as f64;
                Tick::new(format!("t{}", i), base, base + 1.5, base - 0.5, base + 1.0, 10.0)
            })
            .collect()
    }

    #[test]
    fn warmup_boundaries() {
        let series = adx(&trending(12), 3);
        assert!(series.plus_di[..3].iter().all(Option::is_none));
        assert!(series.plus_di[3].is_some());
        assert!(series.adx[..5].iter().all(Option::is_none));
        assert!(series.adx[5].is_some());
        assert!(series.adx[11].is_some());
    }

    #[test]
    fn steady_uptrend_is_all_plus_direction() {
        let series = adx(&trending(12), 3);
        assert_eq!(series.minus_di[6], Some(0.0));
        assert!((series.dx[6].unwrap() - 100.0).abs() < 1e-9);
        assert!((series.adx[11].unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn short_input_is_all_none() {
        let series = adx(&trending(3), 3);
        assert!(series.adx.iter().all(Option::is_none));
        assert_eq!(series.adx.len(), 3);
    }

    #[test]
    fn flat_market_has_zero_dx() {
        let ticks: Vec<Tick> = (0..8)
            .map(|i| Tick::new(format!("t{}", i), 10.0, 10.0, 10.0, 10.0, 1.0))
            .collect();
        let series = adx(&ticks, 2);
        assert_eq!(series.dx[4], Some(0.0));
        assert_eq!(series.adx[4], Some(0.0));
    }
}
