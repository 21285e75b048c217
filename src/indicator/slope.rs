use super::Series;

/// Relative change over `period` bars: `(x[i] - x[i - period]) / x[i - period]`.
///
/// `None` before `period`, when either end is undefined, or when the base is 0.
pub fn relative_slope(values: &[Option<f64>], period: usize) -> Series {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    for i in period..values.len() {
        if let (Some(prev), Some(cur)) = (values[i - period], values[i]) {
            if prev != 0.0 {
                out[i] = Some((cur - prev) / prev);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_slope_over_period() {
        let values = [Some(100.0), Some(105.0), Some(110.0)];
        let out = relative_slope(&values, 2);
        assert_eq!(out[..2], [None, None]);
        assert!((out[2].unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn undefined_or_zero_base_yields_none() {
        let values = [None, Some(0.0), Some(1.0), Some(2.0)];
        let out = relative_slope(&values, 1);
        assert_eq!(out[1], None);
        assert_eq!(out[2], None);
        assert!((out[3].unwrap() - 1.0).abs() < 1e-12);
    }
}
