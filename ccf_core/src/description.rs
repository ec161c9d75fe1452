//! This parser recovers date, time and location from an item's free-text description.
//!
//! The description is HTML with one `Label: value` pair per `<br>` separated line, where the
//! labels are usually wrapped in `<strong>`. A location may continue over several lines, up to the
//! next date or time label.

use std::sync::LazyLock;

use html_escape::decode_html_entities;
use regex::Regex;

static LABEL_DATE: &str = "event date:";
static LABEL_TIME: &str = "event time:";
static LABEL_LOCATION: &str = "location:";
static LOCATION_SEPARATOR: &str = ", ";

static EMPHASIS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(?:strong|b|em|i)>").unwrap());
static LINE_BREAK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

/// This is the data which can be extracted from a description.
///
/// Fields not found are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionFields {
    pub date: String,
    pub time: String,
    pub location: String,
}

/// What a single description line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Date(&'a str),
    Time(&'a str),
    Location(&'a str),
    Text(&'a str),
}

impl<'a> Line<'a> {
    /// Classify a trimmed line by its case-insensitive label prefix.
    ///
    /// The value of a labelled line is everything after the first colon, trimmed.
    pub fn classify(line: &'a str) -> Self {
        let value = || line.split_once(':').map_or("", |(_, value)| value.trim());
        let has_label = |label: &str| {
            line.get(..label.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(label))
        };
        if has_label(LABEL_DATE) {
            Line::Date(value())
        } else if has_label(LABEL_TIME) {
            Line::Time(value())
        } else if has_label(LABEL_LOCATION) {
            Line::Location(value())
        } else {
            Line::Text(line)
        }
    }
}

/// Whether unlabelled lines currently belong to the location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum State {
    #[default]
    Scanning,
    CapturingLocation,
}

impl State {
    /// The state after reading `line`.
    ///
    /// A location label starts capturing; only a date or time label stops it.
    pub fn next(self, line: &Line) -> Self {
        match line {
            Line::Date(_) | Line::Time(_) => State::Scanning,
            Line::Location(_) => State::CapturingLocation,
            Line::Text(_) => self,
        }
    }
}

/// Split the description HTML into its trimmed, non-empty text lines.
pub fn lines(description: &str) -> Vec<String> {
    let decoded = decode_html_entities(description).replace('\r', "");
    let stripped = EMPHASIS_REGEX.replace_all(&decoded, "");
    LINE_BREAK_REGEX
        .split(&stripped)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a description into its date, time and location.
pub fn parse(description: &str) -> DescriptionFields {
    let text_lines = lines(description);
    let mut fields = DescriptionFields::default();
    let mut location_lines: Vec<&str> = vec![];
    let mut state = State::default();
    for line in text_lines.iter().map(|line| Line::classify(line)) {
        match line {
            Line::Date(value) => fields.date = String::from(value),
            Line::Time(value) => fields.time = String::from(value),
            Line::Location(value) => location_lines.push(value),
            Line::Text(text) if state == State::CapturingLocation => location_lines.push(text),
            Line::Text(_) => {}
        }
        state = state.next(&line);
    }
    fields.location = location_lines
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<&str>>()
        .join(LOCATION_SEPARATOR);
    fields
}
