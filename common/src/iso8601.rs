//! Decoding of ISO-8601 durations such as `PT4M13S`.
//!
//! Only the fixed-length designators are accepted: weeks, days, hours,
//! minutes and seconds. Years and months have no fixed length in seconds and
//! are rejected.

use crate::KioskError;
use std::time::Duration;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;
const SECS_PER_WEEK: u64 = 7 * SECS_PER_DAY;

/// Parse an ISO-8601 duration into whole seconds.
///
/// Every component may carry a fraction (`PT1.5H`). The total is truncated
/// to whole seconds. Designators must appear at most once and in order.
pub fn parse_duration(input: &str) -> Result<Duration, KioskError> {
    let invalid = || KioskError::InvalidDuration(input.to_string());

    let rest = input.trim().strip_prefix('P').ok_or_else(invalid)?;
    if rest.is_empty() {
        return Err(invalid());
    }

    let (date_part, time_part) = match rest.split_once('T') {
        Some((_, "")) => return Err(invalid()),
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut total = sum_components(date_part, &[('W', SECS_PER_WEEK), ('D', SECS_PER_DAY)])
        .ok_or_else(invalid)?;

    if let Some(time_part) = time_part {
        total += sum_components(
            time_part,
            &[('H', SECS_PER_HOUR), ('M', SECS_PER_MINUTE), ('S', 1)],
        )
        .ok_or_else(invalid)?;
    }

    if !total.is_finite() || total >= u64::MAX as f64 {
        return Err(invalid());
    }

    Ok(Duration::from_secs(total.trunc() as u64))
}

/// Sum `4M13S` into seconds using `units`, the allowed designators in the
/// order they must appear.
///
/// Returns `None` on an unknown, repeated or out-of-order designator, a
/// designator without a number or a trailing number without a designator.
fn sum_components(part: &str, units: &[(char, u64)]) -> Option<f64> {
    let mut total = 0.0;
    let mut number = String::new();
    // Index into `units` of the next designator allowed
    let mut next_unit = 0;

    for c in part.chars() {
        if c.is_ascii_digit() || c == '.' || c == ',' {
            number.push(if c == ',' { '.' } else { c });
            continue;
        }

        if number.is_empty() {
            return None;
        }
        let value: f64 = number.parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }

        let offset = units[next_unit..].iter().position(|(unit, _)| *unit == c)?;
        let (_, scale) = units[next_unit + offset];
        next_unit += offset + 1;

        total += value * scale as f64;
        number.clear();
    }

    if !number.is_empty() {
        return None;
    }

    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: &str) -> u64 {
        parse_duration(s).unwrap().as_secs()
    }

    #[test]
    fn test_parse_typical_video_durations() {
        assert_eq!(secs("PT4M13S"), 253);
        assert_eq!(secs("PT1H"), 3600);
        assert_eq!(secs("PT1H2M3S"), 3723);
        assert_eq!(secs("PT45S"), 45);
        assert_eq!(secs("P0D"), 0);
    }

    #[test]
    fn test_parse_days_and_weeks() {
        assert_eq!(secs("P1DT2H"), 26 * 3600);
        assert_eq!(secs("P1W"), 7 * 24 * 3600);
    }

    #[test]
    fn test_fractional_seconds_are_truncated() {
        assert_eq!(secs("PT1.9S"), 1);
        assert_eq!(secs("PT2,5S"), 2);
    }

    #[test]
    fn test_fractions_are_scaled_before_truncation() {
        assert_eq!(secs("PT1.5H"), 5400);
        assert_eq!(secs("PT0.5M"), 30);
        assert_eq!(secs("P0.5D"), 12 * 3600);
        assert_eq!(secs("PT1.5M0.9S"), 90);
    }

    #[test]
    fn test_rejects_repeated_or_unordered_designators() {
        for bad in ["PT1S2H", "PT2M1H", "PT1H1H", "PT1S1S", "P1D1W", "P1D1D"] {
            assert!(parse_duration(bad).is_err(), "accepted '{bad}'");
        }
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "P", "PT", "4M13S", "PT4X", "PTM", "PT12", "P1Y", "P2M", "garbage"] {
            assert!(parse_duration(bad).is_err(), "accepted '{bad}'");
        }
    }
}
