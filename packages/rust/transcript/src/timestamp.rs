//! Caption timestamp parsing shared by every subtitle format.

/// Parse `HH:MM:SS.mmm`, `MM:SS.mmm` or a bare seconds value into seconds.
///
/// Either `.` or `,` may separate the fraction. Anything unparsable yields
/// `0.0` so one broken cue never aborts a whole transcript.
pub fn parse_timestamp(raw: &str) -> f64 {
    let normalized = raw.trim().replace(',', ".");

    to_seconds(&normalized)
        .filter(|s| s.is_finite() && *s >= 0.0)
        .unwrap_or(0.0)
}

fn to_seconds(timestamp: &str) -> Option<f64> {
    let parts: Vec<&str> = timestamp.split(':').collect();
    match parts.as_slice() {
        [hours, minutes, seconds] => {
            Some(whole(hours)? * 3600.0 + whole(minutes)? * 60.0 + fraction(seconds)?)
        }
        [minutes, seconds] => Some(whole(minutes)? * 60.0 + fraction(seconds)?),
        [seconds] => fraction(seconds),
        _ => None,
    }
}

fn whole(part: &str) -> Option<f64> {
    part.parse::<u64>().ok().map(|n| n as f64)
}

fn fraction(part: &str) -> Option<f64> {
    part.parse::<f64>().ok()
}
