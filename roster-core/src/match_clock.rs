use roster_types::{ClockState, Match, Timestamp};

/// Playing time elapsed in a match at `now`, excluding half-time.
///
/// While half-time is open the clock is frozen at the moment it started.
/// Once the match has ended the clock is frozen at `end_time`.
pub fn elapsed_match_time(current_match: &Match, now: Timestamp) -> i64 {
    let reference = current_match.end_time.unwrap_or(now);

    let elapsed = match (current_match.half_time_start, current_match.half_time_end) {
        (Some(start), Some(end)) => reference - current_match.start_time - (end - start),
        (Some(start), None) => start - current_match.start_time,
        _ => reference - current_match.start_time,
    };

    elapsed.max(0)
}

/// Whole minutes played, as recorded on goal events.
pub fn match_minute(current_match: &Match, now: Timestamp) -> i32 {
    (elapsed_match_time(current_match, now) / 60_000) as i32
}

/// Renders milliseconds as `m:ss`, truncating partial seconds.
pub fn format_clock(millis: i64) -> String {
    let total_seconds = millis.max(0) / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

pub fn clock_state(current_match: &Match, now: Timestamp) -> ClockState {
    let elapsed_ms = elapsed_match_time(current_match, now);
    let planned_ms = i64::from(current_match.duration) * 60_000;

    ClockState {
        elapsed_ms,
        minute: (elapsed_ms / 60_000) as i32,
        display: format_clock(elapsed_ms),
        remaining_ms: (planned_ms - elapsed_ms).max(0),
        is_active: current_match.is_active,
        is_half_time: current_match.is_half_time(),
    }
}
