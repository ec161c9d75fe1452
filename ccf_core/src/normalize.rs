//! Normalization of the loosely formatted date, time and location texts.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static DATE_FORMATS: [&str; 2] = ["%B %d, %Y", "%b %d, %Y"];
static OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";
static CITY: &str = "Charleston";

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
            ^
            \p{L}+ # the month name
            \s
            \d{1,2} # the day
            ,\s
            \d{4} # the year
            $
        ",
    )
    .unwrap()
});
static TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?xi)
            ^
            (?P<time>
                \d{1,2}:\d{2} # hour and minute
                \s*
                [ap]m # the meridiem
            )
        ",
    )
    .unwrap()
});

/// Replace every run of whitespace by a single space and trim the ends.
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_REGEX.replace_all(value, " ").trim().to_string()
}

/// Normalize a date like `March 5, 2024` or `Mar 5, 2024` to `2024-03-05`.
///
/// Anything else yields the empty string.
pub fn date(raw: &str) -> String {
    let raw = collapse_whitespace(raw);
    if !DATE_REGEX.is_match(&raw) {
        return String::new();
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&raw, format).ok())
        .map(|date| date.format(OUTPUT_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Normalize a leading clock time like `10:00 am` to `10:00 AM`.
///
/// Text not starting with a clock time is returned with collapsed whitespace.
pub fn time(raw: &str) -> String {
    let raw = collapse_whitespace(raw);
    match TIME_REGEX.captures(&raw) {
        Some(captures) => captures["time"].to_uppercase().replace("  ", " "),
        None => raw,
    }
}

/// Clean up a free-text location.
///
/// The feed sometimes glues the city name to the preceding word (`DowntownCharleston`), which is
/// split again as long as the text has no properly separated occurrence of it.
pub fn location(raw: &str) -> String {
    let mut value = collapse_whitespace(raw);
    if value.contains(CITY) && !value.contains(&format!(" {CITY}")) {
        value = value.replace(CITY, &format!(" {CITY}"));
    }
    collapse_whitespace(&value)
}
