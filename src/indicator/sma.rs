use super::price_basis::PriceBasis;
use super::Series;
use crate::model::tick::Tick;

/// Simple Moving Average using a ring buffer for O(1) push.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    buffer: Vec<f64>,
    head: usize,
    count: usize,
    sum: f64,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "SMA period must be > 0");
        Self {
            period,
            buffer: vec![0.0; period],
            head: 0,
            count: 0,
            sum: 0.0,
        }
    }

    /// Push a new value, return the current SMA if enough data.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.count >= self.period {
            self.sum -= self.buffer[self.head];
        }
        self.buffer[self.head] = value;
        self.sum += value;
        self.head = (self.head + 1) % self.period;
        if self.count < self.period {
            self.count += 1;
        }
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        if self.count >= self.period {
            Some(self.sum / self.period as f64)
        } else {
            None
        }
    }

    pub fn is_ready(&self) -> bool {
        self.count >= self.period
    }
}

/// Rolling mean over `values`; indices before `period - 1` are `None`.
pub fn sma_series(values: &[f64], period: usize) -> Series {
    let mut sma = Sma::new(period);
    values.iter().map(|v| sma.push(*v)).collect()
}

/// Rolling mean of the chosen price basis over the tick array.
pub fn sma_of_ticks(ticks: &[Tick], period: usize, basis: PriceBasis) -> Series {
    let prices: Vec<f64> = ticks.iter().map(|t| basis.price(t)).collect();
    sma_series(&prices, period)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_sma() {
        let mut sma = Sma::new(3);
        assert_eq!(sma.push(1.0), None);
        assert_eq!(sma.push(2.0), None);
        assert!(!sma.is_ready());

        let v = sma.push(3.0).unwrap();
        assert!((v - 2.0).abs() < f64::EPSILON);

        let v = sma.push(4.0).unwrap();
        assert!((v - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ring_buffer_wraps_correctly() {
        let mut sma = Sma::new(3);
        sma.push(10.0);
        sma.push(20.0);
        sma.push(30.0);
        // [40, 20, 30] -> 30
        let v = sma.push(40.0).unwrap();
        assert!((v - 30.0).abs() < 1e-12);
        // [40, 50, 30] -> 40
        let v = sma.push(50.0).unwrap();
        assert!((v - 40.0).abs() < 1e-12);
    }

    #[test]
    fn series_warmup_is_none_until_period() {
        let s = sma_series(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(s[0], None);
        assert_eq!(s[1], None);
        assert!((s[2].unwrap() - 2.0).abs() < 1e-12);
        assert!((s[3].unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn series_uses_price_basis() {
        let ticks = vec![
            Tick::new("a", 1.0, 4.0, 1.0, 4.0, 1.0),
            Tick::new("b", 4.0, 7.0, 4.0, 7.0, 1.0),
        ];
        let close = sma_of_ticks(&ticks, 2, PriceBasis::Close);
        let typical = sma_of_ticks(&ticks, 2, PriceBasis::TypicalPrice);
        assert!((close[1].unwrap() - 5.5).abs() < 1e-12);
        assert!((typical[1].unwrap() - 4.5).abs() < 1e-12);
    }
}
