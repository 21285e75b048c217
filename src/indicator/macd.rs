use serde::Serialize;

use super::ema::Ema;
use super::Series;
use crate::model::tick::Tick;
use crate::params::MacdPeriods;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdSeries {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

/// MACD over closing prices. The MACD line exists once both EMAs are warm;
/// the signal line is an SMA-seeded EMA over the defined part of that line.
pub fn macd(ticks: &[Tick], periods: MacdPeriods) -> MacdSeries {
    let n = ticks.len();
    let mut out = MacdSeries {
        macd: vec![None; n],
        signal: vec![None; n],
        histogram: vec![None; n],
    };

    let mut short = Ema::new(periods.short);
    let mut long = Ema::new(periods.long);
    let mut signal = Ema::new(periods.signal);

    for (i, tick) in ticks.iter().enumerate() {
        let s = short.push(tick.close);
        let l = long.push(tick.close);
        let (Some(s), Some(l)) = (s, l) else {
            continue;
        };
        let line = s - l;
        out.macd[i] = Some(line);
        if let Some(sig) = signal.push(line) {
            out.signal[i] = Some(sig);
            out.histogram[i] = Some(line - sig);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<Tick> {
        (0..n)
            .map(|i| {
                let c = 100.0 + i as f64;
                Tick::new(format!("t{}", i), c, c, c, c, 1.0)
            })
            .collect()
    }

    #[test]
    fn warmup_follows_long_then_signal_period() {
        let out = macd(
            &ramp(12),
            MacdPeriods {
                short: 2,
                long: 4,
                signal: 3,
            },
        );
        assert!(out.macd[..3].iter().all(Option::is_none));
        assert!(out.macd[3].is_some());
        assert!(out.signal[..5].iter().all(Option::is_none));
        assert!(out.signal[5].is_some());
        assert!(out.histogram[4].is_none());
        assert!(out.histogram[5].is_some());
    }

    #[test]
    fn uptrend_has_positive_macd() {
        let out = macd(
            &ramp(20),
            MacdPeriods {
                short: 3,
                long: 6,
                signal: 3,
            },
        );
        assert!(out.macd[19].unwrap() > 0.0);
    }

    #[test]
    fn constant_price_has_flat_macd() {
        let ticks: Vec<Tick> = (0..10)
            .map(|i| Tick::new(format!("t{}", i), 5.0, 5.0, 5.0, 5.0, 1.0))
            .collect();
        let out = macd(
            &ticks,
            MacdPeriods {
                short: 2,
                long: 3,
                signal: 2,
            },
        );
        assert_eq!(out.macd[9], Some(0.0));
        assert_eq!(out.histogram[9], Some(0.0));
    }
}
