//! Video lengths as reported by `contentDetails.duration`, and telling Shorts apart by them.
//!
//! YouTube reports lengths as ISO 8601 durations restricted to days, hours, minutes and
//! seconds: `PT4M13S`, `PT1H2M`, `P1DT3H`. Live and upcoming videos report `P0D`.

use jiff::{SignedDuration, Span};

/// Videos at most this long are considered Shorts.
pub const SHORTS_MAX_DURATION: SignedDuration = SignedDuration::from_secs(60);

/// Parses an ISO 8601 duration into a span, keeping the units as written.
///
/// Only the designators YouTube uses are accepted; weeks, months and years have no fixed length
/// and are rejected.
fn parse_span(input: &str) -> Option<Span> {
    // jiff also accepts its own `4m 13s` format, which YouTube never sends
    if !input.starts_with('P') {
        return None;
    }
    let span: Span = input.parse().ok()?;
    if span.get_years() != 0 || span.get_months() != 0 || span.get_weeks() != 0 {
        return None;
    }
    Some(span)
}

/// Parses a YouTube duration such as `PT4M13S` or `P1DT2H`, counting a day as 24 hours.
pub fn parse_duration(input: &str) -> Option<SignedDuration> {
    let span = parse_span(input)?;
    let secs = i64::from(span.get_days()) * 86_400
        + i64::from(span.get_hours()) * 3_600
        + span.get_minutes() * 60
        + span.get_seconds();
    let nanos = span.get_milliseconds() * 1_000_000
        + span.get_microseconds() * 1_000
        + span.get_nanoseconds();
    Some(SignedDuration::from_secs(secs) + SignedDuration::from_nanos(nanos))
}

/// Whether a video with the given `contentDetails.duration` is a Short.
///
/// Only time-only durations (`PT...`) with no hour or minute component and at most
/// [`SHORTS_MAX_DURATION`] of seconds qualify. `PT1M` is a regular video while `PT60S` is a Short.
/// `P0D` (live and upcoming videos) and a missing duration never are. A `PT...` duration that
/// does not parse is assumed to be a Short.
pub fn is_short(duration: &str) -> bool {
    if !duration.starts_with("PT") {
        return false;
    }
    match parse_span(duration) {
        Some(span) => {
            span.get_hours() == 0
                && span.get_minutes() == 0
                && span.get_seconds() <= SHORTS_MAX_DURATION.as_secs()
        }
        None => {
            tracing::warn!(duration, "unrecognized video duration, assuming a short");
            true
        }
    }
}
