use crate::params::VolumeTrendParams;

/// Raw components of the volume trend over one lookback window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeTrend {
    /// Share of increasing pairs once the largest volume is dropped, in [0, 1].
    pub trend_score: f64,
    /// Last volume over the mean of the rest of the window.
    pub surge_ratio: f64,
}

/// Fraction of ordered pairs `(i < j)` with `values[j] > values[i]`.
fn increasing_pair_share(values: &[f64]) -> f64 {
    let mut up = 0usize;
    let mut total = 0usize;
    for (i, a) in values.iter().enumerate() {
        for b in &values[i + 1..] {
            total += 1;
            if b > a {
                up += 1;
            }
        }
    }
    if total > 0 {
        up as f64 / total as f64
    } else {
        0.0
    }
}

pub fn measure(window: &[f64]) -> Option<VolumeTrend> {
    let (last, rest) = window.split_last()?;
    let avg_rest = if rest.is_empty() {
        0.0
    } else {
        rest.iter().sum::<f64>() / rest.len() as f64
    };
    let surge_ratio = if avg_rest > 0.0 { last / avg_rest } else { 0.0 };

    // Drop one spike (the first maximum) before scoring the trend.
    let mut trimmed = window.to_vec();
    let spike = trimmed
        .iter()
        .enumerate()
        .fold(0, |best, (i, v)| if *v > trimmed[best] { i } else { best });
    trimmed.remove(spike);

    Some(VolumeTrend {
        trend_score: increasing_pair_share(&trimmed),
        surge_ratio,
    })
}

/// Gated volume trend score at `index`.
///
/// `None` before `lookback - 1`. Otherwise the trend score when it clears
/// `min_trend` and the surge clears `min_surge`, else 0.
pub fn volume_trend_score(volumes: &[f64], index: usize, params: &VolumeTrendParams) -> Option<f64> {
    let lookback = params.lookback;
    if lookback == 0 || index + 1 < lookback || index >= volumes.len() {
        return None;
    }
    let trend = measure(&volumes[index + 1 - lookback..=index])?;
    if trend.trend_score >= params.min_trend && trend.surge_ratio >= params.min_surge {
        Some(trend.trend_score)
    } else {
        Some(0.0)
    }
}
