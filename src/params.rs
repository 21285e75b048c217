//! Parameter bundle for one analytics run.
//!
//! Parameters arrive loosely typed (JSON from a chart client, or the
//! `[algo_params]` table of the config file). [`AlgoParams::from_raw`] checks
//! every required knob once, up front, and rejects the whole run when one is
//! absent or has the wrong type. Nothing downstream substitutes defaults.

use serde::Deserialize;

use crate::error::AnalyticsError;
use crate::indicator::price_basis::PriceBasis;
use crate::noise_window::NoiseStrategy;

/// A parameter as sent on the wire. Numbers may arrive as numeric strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ParamValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAlgoParams {
    pub noise_window: Option<ParamValue>,
    pub noise_window_length: Option<ParamValue>,
    pub atr_multiplier: Option<ParamValue>,
    pub alt_threshold: Option<ParamValue>,
    pub hug_ratio: Option<ParamValue>,
    pub comp_body_mult: Option<ParamValue>,
    pub comp_full_thresh: Option<ParamValue>,
    pub sma1_period: Option<ParamValue>,
    pub ema1_period: Option<ParamValue>,
    pub ema2_period: Option<ParamValue>,
    pub ma_avg_type: Option<ParamValue>,
    pub single_dir_min: Option<ParamValue>,
    pub opp_threshold: Option<ParamValue>,
    pub rsi_period: Option<ParamValue>,
    pub min_candle_body_dist: Option<ParamValue>,
    pub slope_period_by_raw_price: Option<ParamValue>,
    #[serde(rename = "slopePeriodBySMA")]
    pub slope_period_by_sma: Option<ParamValue>,
    #[serde(rename = "slopePeriodByEMA")]
    pub slope_period_by_ema: Option<ParamValue>,
    pub adx_period: Option<ParamValue>,
    pub macd_short_period: Option<ParamValue>,
    pub macd_long_period: Option<ParamValue>,
    pub macd_signal_period: Option<ParamValue>,
    pub volume_trend_lookback: Option<ParamValue>,
    pub volume_trend_min_trend: Option<ParamValue>,
    pub volume_trend_min_surge: Option<ParamValue>,
    pub bear_eng_tolerance: Option<ParamValue>,
    pub bull_exh_threshold: Option<ParamValue>,
    pub bollinger_period: Option<ParamValue>,
    pub bollinger_multiplier: Option<ParamValue>,
    pub exclude_early_session: Option<ParamValue>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionThresholds {
    pub body_multiplier: f64,
    pub fullness_threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseThresholds {
    pub atr_multiplier: f64,
    pub alternation_threshold: f64,
    /// In [0, 1]; lower values flag more windows as noise.
    pub hugging_ratio: f64,
    pub compression: Option<CompressionThresholds>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdPeriods {
    pub short: usize,
    pub long: usize,
    pub signal: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerParams {
    pub period: usize,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlopePeriods {
    pub raw_price: usize,
    pub sma: usize,
    pub ema: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeTrendParams {
    pub lookback: usize,
    pub min_trend: f64,
    pub min_surge: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleDirectionParams {
    pub min_length: usize,
    pub opposing_threshold: f64,
}

/// Validated, immutable parameters for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgoParams {
    pub noise_strategy: NoiseStrategy,
    pub noise_window_length: usize,
    pub noise: NoiseThresholds,
    pub sma_period: usize,
    pub ema_fast_period: usize,
    pub ema_slow_period: usize,
    pub price_basis: PriceBasis,
    pub rsi_period: usize,
    pub adx_period: usize,
    pub macd: MacdPeriods,
    pub bollinger: BollingerParams,
    pub min_candle_body_dist: f64,
    pub slope_periods: SlopePeriods,
    pub volume_trend: VolumeTrendParams,
    pub bear_engulfing_tolerance: f64,
    pub bull_exhaustion_ratio: f64,
    pub exclude_early_session: bool,
    pub single_direction: Option<SingleDirectionParams>,
}

const DEFAULT_BOLLINGER_PERIOD: usize = 20;
const DEFAULT_BOLLINGER_MULTIPLIER: f64 = 2.0;

impl AlgoParams {
    pub fn from_raw(raw: &RawAlgoParams) -> Result<Self, AnalyticsError> {
        let noise_label = text(&raw.noise_window, "noiseWindow")?;
        let noise_strategy = NoiseStrategy::parse(&noise_label).ok_or_else(|| invalid(
            "noiseWindow",
            format!("unknown strategy '{}', expected NW1..NW6", noise_label),
        ))?;

        let compression = if noise_strategy.uses_compression() {
            Some(CompressionThresholds {
                body_multiplier: number(&raw.comp_body_mult, "compBodyMult")?,
                fullness_threshold: number(&raw.comp_full_thresh, "compFullThresh")?,
            })
        } else {
            match (
                optional_number(&raw.comp_body_mult, "compBodyMult")?,
                optional_number(&raw.comp_full_thresh, "compFullThresh")?,
            ) {
                (Some(body_multiplier), Some(fullness_threshold)) => Some(CompressionThresholds {
                    body_multiplier,
                    fullness_threshold,
                }),
                _ => None,
            }
        };

        let basis_label = text(&raw.ma_avg_type, "maAvgType")?;
        let price_basis = PriceBasis::parse(&basis_label).ok_or_else(|| {
            invalid(
                "maAvgType",
                format!(
                    "unknown basis '{}', expected default/typicalPrice/OHLCAverage",
                    basis_label
                ),
            )
        })?;

        let hugging_ratio = number(&raw.hug_ratio, "hugRatio")?;
        if !(0.0..=1.0).contains(&hugging_ratio) {
            return Err(invalid("hugRatio", "must be within [0, 1]".to_string()));
        }

        let volume_lookback = period(&raw.volume_trend_lookback, "volumeTrendLookback")?;
        if volume_lookback < 2 {
            return Err(invalid(
                "volumeTrendLookback",
                "must be at least 2".to_string(),
            ));
        }

        let single_direction = match (
            optional_period(&raw.single_dir_min, "singleDirMin")?,
            optional_number(&raw.opp_threshold, "oppThreshold")?,
        ) {
            (Some(min_length), Some(opposing_threshold)) => Some(SingleDirectionParams {
                min_length,
                opposing_threshold,
            }),
            _ => None,
        };

        Ok(Self {
            noise_strategy,
            noise_window_length: period(&raw.noise_window_length, "noiseWindowLength")?,
            noise: NoiseThresholds {
                atr_multiplier: number(&raw.atr_multiplier, "atrMultiplier")?,
                alternation_threshold: number(&raw.alt_threshold, "altThreshold")?,
                hugging_ratio,
                compression,
            },
            sma_period: period(&raw.sma1_period, "sma1Period")?,
            ema_fast_period: period(&raw.ema1_period, "ema1Period")?,
            ema_slow_period: period(&raw.ema2_period, "ema2Period")?,
            price_basis,
            rsi_period: period(&raw.rsi_period, "rsiPeriod")?,
            adx_period: period(&raw.adx_period, "adxPeriod")?,
            macd: MacdPeriods {
                short: period(&raw.macd_short_period, "macdShortPeriod")?,
                long: period(&raw.macd_long_period, "macdLongPeriod")?,
                signal: period(&raw.macd_signal_period, "macdSignalPeriod")?,
            },
            bollinger: BollingerParams {
                period: optional_period(&raw.bollinger_period, "bollingerPeriod")?
                    .unwrap_or(DEFAULT_BOLLINGER_PERIOD),
                multiplier: optional_number(&raw.bollinger_multiplier, "bollingerMultiplier")?
                    .unwrap_or(DEFAULT_BOLLINGER_MULTIPLIER),
            },
            min_candle_body_dist: number(&raw.min_candle_body_dist, "minCandleBodyDist")?,
            slope_periods: SlopePeriods {
                raw_price: period(&raw.slope_period_by_raw_price, "slopePeriodByRawPrice")?,
                sma: period(&raw.slope_period_by_sma, "slopePeriodBySMA")?,
                ema: period(&raw.slope_period_by_ema, "slopePeriodByEMA")?,
            },
            volume_trend: VolumeTrendParams {
                lookback: volume_lookback,
                min_trend: number(&raw.volume_trend_min_trend, "volumeTrendMinTrend")?,
                min_surge: number(&raw.volume_trend_min_surge, "volumeTrendMinSurge")?,
            },
            bear_engulfing_tolerance: number(&raw.bear_eng_tolerance, "bearEngTolerance")?,
            bull_exhaustion_ratio: number(&raw.bull_exh_threshold, "bullExhThreshold")?,
            exclude_early_session: optional_flag(
                &raw.exclude_early_session,
                "excludeEarlySession",
            )?
            .unwrap_or(true),
            single_direction,
        })
    }
}

fn invalid(name: &'static str, reason: String) -> AnalyticsError {
    AnalyticsError::InvalidParameter { name, reason }
}

fn optional_number(
    value: &Option<ParamValue>,
    name: &'static str,
) -> Result<Option<f64>, AnalyticsError> {
    match value {
        None => Ok(None),
        Some(v) => v
            .as_number()
            .map(Some)
            .ok_or_else(|| invalid(name, format!("expected a number, got {:?}", v))),
    }
}

fn number(value: &Option<ParamValue>, name: &'static str) -> Result<f64, AnalyticsError> {
    optional_number(value, name)?.ok_or(AnalyticsError::MissingParameter(name))
}

fn optional_period(
    value: &Option<ParamValue>,
    name: &'static str,
) -> Result<Option<usize>, AnalyticsError> {
    let Some(n) = optional_number(value, name)? else {
        return Ok(None);
    };
    if n < 1.0 || n.fract() != 0.0 {
        return Err(invalid(
            name,
            format!("expected a positive whole number, got {}", n),
        ));
    }
    Ok(Some(n as usize))
}

fn period(value: &Option<ParamValue>, name: &'static str) -> Result<usize, AnalyticsError> {
    optional_period(value, name)?.ok_or(AnalyticsError::MissingParameter(name))
}

fn text(value: &Option<ParamValue>, name: &'static str) -> Result<String, AnalyticsError> {
    match value {
        None => Err(AnalyticsError::MissingParameter(name)),
        Some(ParamValue::Text(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(v) => Err(invalid(name, format!("expected a label, got {:?}", v))),
    }
}

fn optional_flag(
    value: &Option<ParamValue>,
    name: &'static str,
) -> Result<Option<bool>, AnalyticsError> {
    match value {
        None => Ok(None),
        Some(ParamValue::Bool(b)) => Ok(Some(*b)),
        Some(ParamValue::Text(s)) => match s.trim() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(invalid(name, format!("expected true/false, got '{}'", s))),
        },
        Some(v) => Err(invalid(name, format!("expected true/false, got {:?}", v))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_json() -> serde_json::Value {
        serde_json::json!({
            "noiseWindow": "NW1",
            "noiseWindowLength": 6,
            "atrMultiplier": 0.5,
            "altThreshold": 0.6,
            "hugRatio": 0.7,
            "sma1Period": "7",
            "ema1Period": 9,
            "ema2Period": 21,
            "maAvgType": "default",
            "rsiPeriod": 14,
            "minCandleBodyDist": 50,
            "slopePeriodByRawPrice": 5,
            "slopePeriodBySMA": 5,
            "slopePeriodByEMA": 5,
            "adxPeriod": 14,
            "macdShortPeriod": 12,
            "macdLongPeriod": 26,
            "macdSignalPeriod": 9,
            "volumeTrendLookback": 5,
            "volumeTrendMinTrend": 0.65,
            "volumeTrendMinSurge": 1.2,
            "bearEngTolerance": 0.001,
            "bullExhThreshold": 2.0
        })
    }

    fn parse(value: serde_json::Value) -> Result<AlgoParams, AnalyticsError> {
        let raw: RawAlgoParams = serde_json::from_value(value).unwrap();
        AlgoParams::from_raw(&raw)
    }

    #[test]
    fn accepts_numeric_strings_and_applies_fixed_defaults() {
        let params = parse(raw_json()).unwrap();
        assert_eq!(params.sma_period, 7);
        assert_eq!(params.noise_strategy, NoiseStrategy::Nw1);
        assert_eq!(params.bollinger.period, 20);
        assert!((params.bollinger.multiplier - 2.0).abs() < f64::EPSILON);
        assert!(params.exclude_early_session);
        assert!(params.single_direction.is_none());
        assert!(params.noise.compression.is_none());
    }

    #[test]
    fn missing_slope_period_fails_closed() {
        let mut value = raw_json();
        value.as_object_mut().unwrap().remove("slopePeriodBySMA");
        let err = parse(value).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::MissingParameter("slopePeriodBySMA")
        ));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let mut value = raw_json();
        value["rsiPeriod"] = serde_json::json!("fourteen");
        assert!(matches!(
            parse(value).unwrap_err(),
            AnalyticsError::InvalidParameter {
                name: "rsiPeriod",
                ..
            }
        ));
    }

    #[test]
    fn fractional_period_is_rejected() {
        let mut value = raw_json();
        value["adxPeriod"] = serde_json::json!(2.5);
        assert!(parse(value).is_err());
    }

    #[test]
    fn nw6_requires_compression_knobs() {
        let mut value = raw_json();
        value["noiseWindow"] = serde_json::json!("NW6");
        assert!(matches!(
            parse(value.clone()).unwrap_err(),
            AnalyticsError::MissingParameter("compBodyMult")
        ));

        value["compBodyMult"] = serde_json::json!(0.3);
        value["compFullThresh"] = serde_json::json!(40);
        let params = parse(value).unwrap();
        assert_eq!(
            params.noise.compression,
            Some(CompressionThresholds {
                body_multiplier: 0.3,
                fullness_threshold: 40.0,
            })
        );
    }

    #[test]
    fn single_direction_needs_both_knobs() {
        let mut value = raw_json();
        value["singleDirMin"] = serde_json::json!(4);
        assert!(parse(value.clone()).unwrap().single_direction.is_none());
        value["oppThreshold"] = serde_json::json!(0.18);
        let sd = parse(value).unwrap().single_direction.unwrap();
        assert_eq!(sd.min_length, 4);
    }

    #[test]
    fn early_session_gate_accepts_string_flag() {
        let mut value = raw_json();
        value["excludeEarlySession"] = serde_json::json!("false");
        assert!(!parse(value).unwrap().exclude_early_session);
    }
}
