pub mod adx;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod price_basis;
pub mod rsi;
pub mod slope;
pub mod sma;

/// One value per tick; `None` where the indicator is still warming up.
pub type Series = Vec<Option<f64>>;

/// Index of the first defined value, if any.
pub fn first_defined(series: &[Option<f64>]) -> Option<usize> {
    series.iter().position(Option::is_some)
}
