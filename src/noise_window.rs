//! Chop detection over short windows of extended ticks.
//!
//! Four primitives (hugging, indecision, alternation, compression) are
//! combined per [`NoiseStrategy`]. All of them accept a single-tick window;
//! an empty window is never noisy.

use crate::candle::body_fullness;
use crate::model::extended::ExtendedTick;
use crate::model::window::{insert_first, WindowMap};
use crate::params::{CompressionThresholds, NoiseThresholds};

const COMPRESSION_MAJORITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseStrategy {
    /// hugging ∧ indecision ∧ alternation
    Nw1,
    /// hugging ∧ (indecision ∨ alternation)
    Nw2,
    /// 2 of {hugging, indecision, alternation}
    Nw3,
    /// as NW3, hugging measured on the full high/low range
    Nw4,
    /// as NW3, hugging measured on the body midpoint
    Nw5,
    /// 2 of {midpoint hugging, indecision, alternation, compression}
    Nw6,
}

/// Which price of a tick has to stay inside the ATR band around the average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HugMode {
    Close,
    FullRange,
    BodyMidpoint,
}

impl NoiseStrategy {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "NW1" => Some(Self::Nw1),
            "NW2" => Some(Self::Nw2),
            "NW3" => Some(Self::Nw3),
            "NW4" => Some(Self::Nw4),
            "NW5" => Some(Self::Nw5),
            "NW6" => Some(Self::Nw6),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Nw1 => "NW1",
            Self::Nw2 => "NW2",
            Self::Nw3 => "NW3",
            Self::Nw4 => "NW4",
            Self::Nw5 => "NW5",
            Self::Nw6 => "NW6",
        }
    }

    pub fn uses_compression(self) -> bool {
        matches!(self, Self::Nw6)
    }

    fn hug_mode(self) -> HugMode {
        match self {
            Self::Nw1 | Self::Nw2 | Self::Nw3 => HugMode::Close,
            Self::Nw4 => HugMode::FullRange,
            Self::Nw5 | Self::Nw6 => HugMode::BodyMidpoint,
        }
    }

    pub fn is_noisy(self, window: &[ExtendedTick], opts: &NoiseThresholds) -> bool {
        if window.is_empty() {
            return false;
        }
        let hugging = is_hugging(window, self.hug_mode(), opts.atr_multiplier, opts.hugging_ratio);
        let indecisive = is_indecisive(window, opts.alternation_threshold);
        let alternating = is_alternating(window, opts.alternation_threshold);

        match self {
            Self::Nw1 => hugging && indecisive && alternating,
            Self::Nw2 => hugging && (indecisive || alternating),
            Self::Nw3 | Self::Nw4 | Self::Nw5 => votes(&[hugging, indecisive, alternating]) >= 2,
            Self::Nw6 => {
                // Validation guarantees the thresholds for NW6; without them the
                // compression vote simply abstains.
                let compressed = opts
                    .compression
                    .map(|c| is_compressed(window, &c))
                    .unwrap_or(false);
                votes(&[hugging, indecisive, alternating, compressed]) >= 2
            }
        }
    }
}

fn votes(flags: &[bool]) -> usize {
    flags.iter().filter(|f| **f).count()
}

/// Mean high-low range over the window.
pub fn average_range(window: &[ExtendedTick]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    window.iter().map(|t| t.tick().range()).sum::<f64>() / window.len() as f64
}

fn hugs(tick: &ExtendedTick, mode: HugMode, band: f64) -> bool {
    let Some(avg) = tick.moving_avg else {
        return false;
    };
    let t = tick.tick();
    match mode {
        HugMode::Close => (t.close - avg).abs() < band,
        HugMode::FullRange => t.high < avg + band && t.low > avg - band,
        HugMode::BodyMidpoint => ((t.open + t.close) / 2.0 - avg).abs() < band,
    }
}

/// At least `ratio` of the window stays within `multiplier * ATR` of the average.
pub fn is_hugging(window: &[ExtendedTick], mode: HugMode, multiplier: f64, ratio: f64) -> bool {
    if window.is_empty() {
        return false;
    }
    let band = average_range(window) * multiplier;
    let hugging = window.iter().filter(|t| hugs(t, mode, band)).count();
    hugging as f64 / window.len() as f64 >= ratio
}

/// Mean body/range share below `threshold`. A zero-range candle counts its
/// range as 1.
pub fn is_indecisive(window: &[ExtendedTick], threshold: f64) -> bool {
    if window.is_empty() {
        return false;
    }
    let total: f64 = window
        .iter()
        .map(|t| {
            let range = t.tick().range();
            let range = if range == 0.0 { 1.0 } else { range };
            t.tick().body() / range
        })
        .sum();
    total / (window.len() as f64) < threshold
}

fn direction(tick: &ExtendedTick) -> i8 {
    let t = tick.tick();
    if t.close > t.open {
        1
    } else if t.close < t.open {
        -1
    } else {
        0
    }
}

/// Colour flips per tick above `threshold`. Dojis are skipped and do not
/// reset the running colour.
pub fn is_alternating(window: &[ExtendedTick], threshold: f64) -> bool {
    let Some(first) = window.first() else {
        return false;
    };
    let mut prev = direction(first);
    let mut flips = 0usize;
    for tick in &window[1..] {
        let cur = direction(tick);
        if cur == 0 {
            continue;
        }
        if prev != 0 && cur != prev {
            flips += 1;
        }
        prev = cur;
    }
    flips as f64 / window.len() as f64 > threshold
}

/// A majority of candles have a body small against ATR and low fullness.
pub fn is_compressed(window: &[ExtendedTick], thresholds: &CompressionThresholds) -> bool {
    if window.is_empty() {
        return false;
    }
    let atr = average_range(window);
    let compressed = window
        .iter()
        .filter(|t| {
            t.tick().body() < atr * thresholds.body_multiplier
                && body_fullness(t.tick()) < thresholds.fullness_threshold
        })
        .count();
    compressed as f64 / window.len() as f64 >= COMPRESSION_MAJORITY
}

/// Window of `length` ticks that ends two ticks before `index`, leaving out
/// both the candidate and the candle right before it. Clamped at the start
/// of the series.
pub fn lookback_window(ticks: &[ExtendedTick], index: usize, length: usize) -> &[ExtendedTick] {
    let end = index.saturating_sub(1).min(ticks.len());
    let start = index.saturating_sub(length + 1).min(end);
    &ticks[start..end]
}

/// Every noisy lookback window in the series, keyed by start timestamp.
pub fn all_noise_windows(
    ticks: &[ExtendedTick],
    strategy: NoiseStrategy,
    length: usize,
    opts: &NoiseThresholds,
) -> WindowMap<ExtendedTick> {
    let mut out: WindowMap<ExtendedTick> = WindowMap::new();
    for i in (length + 1)..ticks.len() {
        let window = lookback_window(ticks, i, length);
        if strategy.is_noisy(window, opts) {
            insert_first(&mut out, window);
        }
    }
    out
}
