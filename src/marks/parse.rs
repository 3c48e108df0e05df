use crate::error::{TrackError, TrackResult};
use crate::host::Seconds;

/// Parse a mark entered by the user into whole seconds.
///
/// Accepts `"<seconds>"` or `"<minutes>:<seconds>"` with seconds below 60.
/// Negative bare values parse fine; range checks reject them later.
pub fn parse_mark(input: &str) -> TrackResult<i64> {
    let trimmed = input.trim();
    let malformed = || TrackError::MalformedInput {
        value: input.to_string(),
    };

    let Some((minutes, seconds)) = trimmed.split_once(':') else {
        return trimmed.parse::<i64>().map_err(|_| malformed());
    };

    let minutes: i64 = minutes.trim().parse().map_err(|_| malformed())?;
    let seconds: i64 = seconds.trim().parse().map_err(|_| malformed())?;
    if !(0..60).contains(&seconds) || minutes < 0 {
        return Err(malformed());
    }
    minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .ok_or_else(malformed)
}

/// Render an offset as `m:ss`, the same shape `parse_mark` accepts.
pub fn format_timestamp(seconds: Option<Seconds>) -> String {
    match seconds {
        Some(s) if s == f64::INFINITY => "∞".to_string(),
        Some(s) if s.is_finite() && s > 0.0 => {
            let total = s.floor() as u64;
            format!("{}:{:02}", total / 60, total % 60)
        }
        _ => "0:00".to_string(),
    }
}
