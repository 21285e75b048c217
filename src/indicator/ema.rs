use super::price_basis::PriceBasis;
use super::sma::Sma;
use super::Series;
use crate::model::extended::{CrossDirection, EmaCrossing};
use crate::model::tick::Tick;

/// Exponential Moving Average, seeded with the SMA of the first `period` values.
///
/// `(value - prev) * k + prev` is `value * k + prev * (1 - k)` rearranged; it
/// keeps a constant input an exact fixed point.
#[derive(Debug, Clone)]
pub struct Ema {
    multiplier: f64,
    ema: Option<f64>,
    initial_sma: Sma,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "EMA period must be > 0");
        Self {
            multiplier: 2.0 / (period as f64 + 1.0),
            ema: None,
            initial_sma: Sma::new(period),
        }
    }

    /// Push a new value, return the current EMA if enough data.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.ema = match self.ema {
            Some(prev) => Some((value - prev) * self.multiplier + prev),
            None => self.initial_sma.push(value),
        };
        self.ema
    }

    pub fn is_ready(&self) -> bool {
        self.ema.is_some()
    }
}

pub fn ema_series(values: &[f64], period: usize) -> Series {
    let mut ema = Ema::new(period);
    values.iter().map(|v| ema.push(*v)).collect()
}

/// The seed averages the chosen basis over the first `period` ticks; every
/// later step feeds the close.
pub fn ema_of_ticks(ticks: &[Tick], period: usize, basis: PriceBasis) -> Series {
    let mut ema = Ema::new(period);
    ticks
        .iter()
        .map(|t| {
            let price = if ema.is_ready() { t.close } else { basis.price(t) };
            ema.push(price)
        })
        .collect()
}

/// Fast/slow crossover at `index`. Needs both series defined at `index - 1`
/// and `index`; otherwise reports no crossing.
pub fn ema_crossing(fast: &[Option<f64>], slow: &[Option<f64>], index: usize) -> EmaCrossing {
    if index == 0 {
        return EmaCrossing::NONE;
    }
    let (Some(Some(pf)), Some(Some(f)), Some(Some(ps)), Some(Some(s))) = (
        fast.get(index - 1),
        fast.get(index),
        slow.get(index - 1),
        slow.get(index),
    ) else {
        return EmaCrossing::NONE;
    };

    let direction = if pf <= ps && f > s {
        CrossDirection::Bullish
    } else if pf >= ps && f < s {
        CrossDirection::Bearish
    } else {
        CrossDirection::None
    };
    EmaCrossing {
        crossing: direction != CrossDirection::None,
        direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_ema() {
        let mut ema = Ema::new(3);
        assert_eq!(ema.push(2.0), None);
        assert_eq!(ema.push(5.0), None);
        assert!(!ema.is_ready());

        let v = ema.push(8.0).unwrap();
        assert!((v - 5.0).abs() < f64::EPSILON);
        assert!(ema.is_ready());

        let v = ema.push(11.0).unwrap();
        assert!((v - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn seed_uses_basis_then_recursion_uses_close() {
        let ticks = vec![
            Tick::new("2025-04-01 10:00:00", 10.0, 14.0, 8.0, 12.0, 1.0),
            Tick::new("2025-04-01 10:01:00", 12.0, 16.0, 10.0, 14.0, 1.0),
            Tick::new("2025-04-01 10:02:00", 14.0, 20.0, 9.0, 10.0, 1.0),
        ];
        let out = ema_of_ticks(&ticks, 2, PriceBasis::TypicalPrice);
        assert_eq!(out[0], None);
        // seed = mean(34/3, 40/3) = 37/3
        let seed = 37.0 / 3.0;
        assert!((out[1].unwrap() - seed).abs() < 1e-12);
        // k = 2/3, recursion on close 10.0 rather than typical 13.0
        let expected = (10.0 - seed) * (2.0 / 3.0) + seed;
        assert!((out[2].unwrap() - expected).abs() < 1e-12);
        assert!((out[2].unwrap() - 97.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn close_basis_matches_plain_series() {
        let ticks: Vec<Tick> = (0..8)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.7).sin();
                Tick::new(format!("2025-04-01 10:0{}:00", i), c, c + 0.2, c - 0.2, c, 1.0)
            })
            .collect();
        let closes: Vec<f64> = ticks.iter().map(|t| t.close).collect();
        assert_eq!(ema_of_ticks(&ticks, 3, PriceBasis::Close), ema_series(&closes, 3));
    }

    #[test]
    fn crossing_requires_previous_values() {
        let fast = [None, Some(2.0)];
        let slow = [Some(1.0), Some(1.5)];
        assert_eq!(ema_crossing(&fast, &slow, 1), EmaCrossing::NONE);
        assert_eq!(ema_crossing(&fast, &slow, 0), EmaCrossing::NONE);
    }

    #[test]
    fn touching_then_separating_counts_as_crossing() {
        let fast = [Some(1.0), Some(2.0)];
        let slow = [Some(1.0), Some(1.5)];
        let c = ema_crossing(&fast, &slow, 1);
        assert!(c.crossing);
        assert_eq!(c.direction, CrossDirection::Bullish);
    }
}
