use std::sync::OnceLock;

use regex::Regex;

/// Minutes assumed when a duration is missing or not understood.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

const HALF_DAY_MINUTES: u32 = 240;
const FULL_DAY_MINUTES: u32 = 480;
const MULTIPLE_DAYS_MINUTES: u32 = 1440;

/// A whole hour count standing on its own: not the tail of a decimal (`1.5`) or a range
/// (`10-12`), which fall through to the default.
fn hours_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(?:^|[^\d.\-])(\d+)\s*hours?\b").expect("static pattern compiles")
    })
}

/// Convert a free-text duration such as `"2 hours"` or `"Half day"` into minutes.
///
/// Never fails: anything unrecognised falls back to [`DEFAULT_DURATION_MINUTES`].
pub fn parse_minutes(duration: Option<&str>) -> u32 {
    let Some(raw) = duration.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return DEFAULT_DURATION_MINUTES;
    };

    if let Some(hours) = hours_pattern()
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
    {
        return hours.saturating_mul(60);
    }

    let lowered = raw.to_lowercase();
    if lowered.contains("half day") {
        HALF_DAY_MINUTES
    } else if lowered.contains("full day") {
        FULL_DAY_MINUTES
    } else if lowered.contains("multiple days") {
        MULTIPLE_DAYS_MINUTES
    } else {
        DEFAULT_DURATION_MINUTES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_hours_multiply_by_sixty() {
        assert_eq!(parse_minutes(Some("3 hours")), 180);
        assert_eq!(parse_minutes(Some("1 hour")), 60);
        assert_eq!(parse_minutes(Some("About 4 HOURS")), 240);
        assert_eq!(parse_minutes(Some("2hours")), 120);
    }

    #[test]
    fn named_blocks_map_to_fixed_minutes() {
        assert_eq!(parse_minutes(Some("Half day")), 240);
        assert_eq!(parse_minutes(Some("Full day")), 480);
        assert_eq!(parse_minutes(Some("Multiple days")), 1440);
        assert_eq!(parse_minutes(Some("  full DAY shift ")), 480);
    }

    #[test]
    fn missing_or_unknown_input_uses_default() {
        assert_eq!(parse_minutes(None), 60);
        assert_eq!(parse_minutes(Some("")), 60);
        assert_eq!(parse_minutes(Some("   ")), 60);
        assert_eq!(parse_minutes(Some("gibberish")), 60);
        assert_eq!(parse_minutes(Some("a few hours")), 60);
    }

    #[test]
    fn fractional_and_ranged_hours_use_default() {
        assert_eq!(parse_minutes(Some("1.5 hours")), 60);
        assert_eq!(parse_minutes(Some("10-12 hours")), 60);
        assert_eq!(parse_minutes(Some("2 hoursish")), 60);
        assert_eq!(parse_minutes(Some("Around 12 hours")), 720);
    }

    #[test]
    fn hour_count_too_large_for_u32_degrades_to_default() {
        assert_eq!(parse_minutes(Some("99999999999 hours")), 60);
    }

    #[test]
    fn huge_but_parseable_hours_saturate() {
        assert_eq!(parse_minutes(Some("4000000000 hours")), u32::MAX);
    }
}
