use crate::model::tick::Tick;
use crate::model::window::{insert_first, WindowMap};
use crate::params::SingleDirectionParams;

/// Dojis count as red here, matching `Tick::is_green`.
fn same_colour(a: &Tick, b: &Tick) -> bool {
    a.is_green() == b.is_green()
}

/// Whether `next` retraces less than `threshold` of the run's move so far.
///
/// The move is measured from the first candle's low (green run) or high (red
/// run) to the last same-coloured candle's high or low. A run that has not
/// moved tolerates nothing.
fn is_tolerated(run: &[&Tick], last_directional: usize, next: &Tick, threshold: f64) -> bool {
    let (Some(first), Some(last)) = (run.first(), run.get(last_directional)) else {
        return false;
    };
    let green = first.is_green();
    let start = if green { first.low } else { first.high };
    let extreme = if last.is_green() { last.high } else { last.low };
    let opposing = if green { next.low } else { next.high };

    let total_move = extreme - start;
    if total_move == 0.0 {
        return false;
    }
    ((opposing - extreme) / total_move).abs() * 100.0 < threshold * 100.0
}

/// Runs of at least `min_length` same-coloured candles, keyed by start
/// timestamp.
///
/// Once a run is long enough, a single opposing candle is absorbed when its
/// retracement stays under `opposing_threshold` of the run's move.
pub fn single_direction_blocks(ticks: &[Tick], params: &SingleDirectionParams) -> WindowMap<Tick> {
    let mut blocks: WindowMap<Tick> = WindowMap::new();
    let mut run: Vec<&Tick> = Vec::new();
    let mut last_directional = 0usize;

    let flush = |run: &[&Tick], blocks: &mut WindowMap<Tick>| {
        if run.len() >= params.min_length {
            let owned: Vec<Tick> = run.iter().map(|t| (*t).clone()).collect();
            insert_first(blocks, &owned);
        }
    };

    for (i, tick) in ticks.iter().enumerate() {
        let Some(head) = run.first() else {
            run.push(tick);
            last_directional = 0;
            continue;
        };

        if same_colour(tick, head) {
            run.push(tick);
            last_directional = run.len() - 1;
        } else if params.opposing_threshold > 0.0
            && run.len() >= params.min_length
            && is_tolerated(&run, last_directional, tick, params.opposing_threshold)
        {
            run.push(tick);
        } else {
            flush(&run, &mut blocks);
            run.clear();
            // An absorbed opposing candle right before this one starts the new run.
            match i.checked_sub(1).map(|p| &ticks[p]) {
                Some(prev) if same_colour(prev, tick) => {
                    run.push(prev);
                    run.push(tick);
                    last_directional = 1;
                }
                _ => {
                    run.push(tick);
                    last_directional = 0;
                }
            }
        }
    }
    flush(&run, &mut blocks);
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(minute: u32, open: f64, close: f64) -> Tick {
        Tick::new(
            format!("2025-04-01 10:{:02}:00", minute),
            open,
            open.max(close) + 0.1,
            open.min(close) - 0.1,
            close,
            1000.0,
        )
    }

    fn params(min_length: usize, opposing_threshold: f64) -> SingleDirectionParams {
        SingleDirectionParams {
            min_length,
            opposing_threshold,
        }
    }

    #[test]
    fn green_run_is_reported_once() {
        let ticks = vec![
            candle(0, 10.0, 10.5),
            candle(1, 10.5, 11.0),
            candle(2, 11.0, 11.5),
            candle(3, 11.5, 11.2),
        ];
        let blocks = single_direction_blocks(&ticks, &params(3, 0.0));
        assert_eq!(blocks.len(), 1);
        let block = &blocks["2025-04-01 10:00:00"];
        assert_eq!(block.end, "2025-04-01 10:02:00");
        assert_eq!(block.data.len(), 3);
    }

    #[test]
    fn trailing_run_is_flushed() {
        let ticks = vec![
            candle(0, 10.0, 9.5),
            candle(1, 10.0, 10.5),
            candle(2, 10.5, 11.0),
            candle(3, 11.0, 11.5),
        ];
        let blocks = single_direction_blocks(&ticks, &params(3, 0.0));
        assert_eq!(blocks.len(), 1);
        assert!(blocks.contains_key("2025-04-01 10:01:00"));
    }

    #[test]
    fn shallow_pullback_is_absorbed() {
        // move: 9.9 -> 11.6; pullback low 11.3 retraces 0.3 / 1.7 ≈ 18%
        let ticks = vec![
            candle(0, 10.0, 10.5),
            candle(1, 10.5, 11.0),
            candle(2, 11.0, 11.5),
            candle(3, 11.5, 11.4),
            candle(4, 11.4, 12.0),
        ];
        let blocks = single_direction_blocks(&ticks, &params(3, 0.25));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks["2025-04-01 10:00:00"].data.len(), 5);

        let strict = single_direction_blocks(&ticks, &params(3, 0.1));
        assert_eq!(strict["2025-04-01 10:00:00"].data.len(), 3);
    }

    #[test]
    fn short_runs_are_ignored() {
        let ticks = vec![candle(0, 10.0, 10.5), candle(1, 10.5, 10.0)];
        assert!(single_direction_blocks(&ticks, &params(2, 0.0)).is_empty());
    }
}
