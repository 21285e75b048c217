//! One analytics run: ticks in, enriched ticks and filtered signals out.

use serde::Serialize;

use crate::error::AnalyticsError;
use crate::extension::{base_extend, extend, SeriesBundle};
use crate::indicator::adx::{adx, AdxSeries};
use crate::indicator::bollinger::{bollinger, BollingerSeries};
use crate::indicator::ema::ema_of_ticks;
use crate::indicator::macd::{macd, MacdSeries};
use crate::indicator::rsi::rsi;
use crate::indicator::sma::sma_of_ticks;
use crate::indicator::Series;
use crate::model::extended::ExtendedTick;
use crate::model::tick::Tick;
use crate::model::window::WindowMap;
use crate::noise_window::all_noise_windows;
use crate::params::AlgoParams;
use crate::strategy::confirmed_crossing::detect_confirmed_crossings;
use crate::strategy::single_direction::single_direction_blocks;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSeries {
    pub sma: Series,
    pub ema_fast: Series,
    pub ema_slow: Series,
    pub adx: AdxSeries,
    pub rsi: Series,
    pub macd: MacdSeries,
    pub bollinger: BollingerSeries,
}

impl IndicatorSeries {
    pub fn compute(ticks: &[Tick], params: &AlgoParams) -> Self {
        Self {
            sma: sma_of_ticks(ticks, params.sma_period, params.price_basis),
            ema_fast: ema_of_ticks(ticks, params.ema_fast_period, params.price_basis),
            ema_slow: ema_of_ticks(ticks, params.ema_slow_period, params.price_basis),
            adx: adx(ticks, params.adx_period),
            rsi: rsi(ticks, params.rsi_period),
            macd: macd(ticks, params.macd),
            bollinger: bollinger(ticks, params.bollinger),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResult {
    pub indicator_series: IndicatorSeries,
    pub extended_ticks: Vec<ExtendedTick>,
    pub confirmed_signals: Vec<String>,
    pub noise_windows: WindowMap<ExtendedTick>,
    pub negating_windows: WindowMap<ExtendedTick>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_direction_blocks: Option<WindowMap<Tick>>,
}

fn validate_ticks(ticks: &[Tick]) -> Result<(), AnalyticsError> {
    ticks
        .iter()
        .enumerate()
        .try_for_each(|(i, tick)| tick.validate(i))
}

/// Run the full pipeline over `ticks`.
///
/// Fails only on a malformed tick; an empty input yields an empty result.
/// Same inputs always produce the same output.
pub fn run(ticks: &[Tick], params: &AlgoParams) -> Result<AnalyticsResult, AnalyticsError> {
    validate_ticks(ticks)?;
    tracing::debug!(
        ticks = ticks.len(),
        strategy = params.noise_strategy.label(),
        window = params.noise_window_length,
        "Starting analytics run"
    );

    let indicator_series = IndicatorSeries::compute(ticks, params);
    let base = base_extend(ticks);
    let extended_ticks = extend(
        &base,
        SeriesBundle {
            sma: &indicator_series.sma,
            ema_fast: &indicator_series.ema_fast,
            ema_slow: &indicator_series.ema_slow,
            bollinger: &indicator_series.bollinger,
        },
        params,
    )
    .unwrap_or_default();

    let crossings = detect_confirmed_crossings(&extended_ticks, params);
    let noise_windows = all_noise_windows(
        &extended_ticks,
        params.noise_strategy,
        params.noise_window_length,
        &params.noise,
    );
    let single_direction_blocks = params
        .single_direction
        .as_ref()
        .map(|sd| single_direction_blocks(ticks, sd));

    tracing::info!(
        ticks = ticks.len(),
        signals = crossings.confirmed_signals.len(),
        negating = crossings.negating_windows.len(),
        noise = noise_windows.len(),
        "Analytics run complete"
    );

    Ok(AnalyticsResult {
        indicator_series,
        extended_ticks,
        confirmed_signals: crossings.confirmed_signals,
        noise_windows,
        negating_windows: crossings.negating_windows,
        single_direction_blocks,
    })
}
