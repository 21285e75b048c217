//! Trading-session helpers: grouping ticks by day and the opening-minutes gate.

use chrono::NaiveTime;

use crate::model::tick::Tick;

/// Clock part of a timestamp such as `2025-04-01 09:31:00` or
/// `2025-04-01T09:31:00`.
pub fn session_clock(timestamp: &str) -> Option<NaiveTime> {
    let clock = timestamp
        .split(|c| c == 'T' || c == ' ')
        .nth(1)?
        .get(..8)?;
    NaiveTime::parse_from_str(clock, "%H:%M:%S").ok()
}

/// True for candles stamped 09:30 through 09:44, the first fifteen minutes
/// after the cash-session open. Any second inside that span counts, so
/// sub-minute bars such as 09:44:30 are early too.
pub fn is_early_session(timestamp: &str) -> bool {
    let Some(clock) = session_clock(timestamp) else {
        return false;
    };
    let (Some(open), Some(cutoff)) = (
        NaiveTime::from_hms_opt(9, 30, 0),
        NaiveTime::from_hms_opt(9, 45, 0),
    ) else {
        return false;
    };
    clock >= open && clock < cutoff
}

/// Contiguous index ranges of ticks sharing a day key, in input order.
/// Input is sorted by timestamp, so each day is one range.
pub fn day_ranges(ticks: &[Tick]) -> Vec<(String, std::ops::Range<usize>)> {
    let mut out: Vec<(String, std::ops::Range<usize>)> = Vec::new();
    for (i, tick) in ticks.iter().enumerate() {
        let same_day = matches!(out.last(), Some((day, _)) if day == tick.day_key());
        if !same_day {
            out.push((tick.day_key().to_string(), i..i + 1));
        } else if let Some((_, range)) = out.last_mut() {
            range.end = i + 1;
        }
    }
    out
}
