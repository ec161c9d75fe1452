//! Assembly of normalized event records from raw feed items.

use std::sync::LazyLock;

use html_escape::decode_html_entities;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    description,
    feed::{self, FeedItem},
    normalize, FeedSource, Result,
};

static DEFAULT_EVENT_TYPE: &str = "Event";

static EVENT_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"EID=(?P<id>\d+)").unwrap());

/// One row of the export.
///
/// Every field is always present; the empty string stands for "unknown".
/// The field order is the column order of the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_id: String,
    pub group_id: String,
    pub body_name: String,
    pub event_type: String,
    pub jurisdiction: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub address: String,
    pub basis: String,
    pub source_url: String,
    pub notes: String,
}

impl EventRecord {
    /// The column names, in output order.
    pub const HEADER: [&'static str; 12] = [
        "event_id",
        "group_id",
        "body_name",
        "event_type",
        "jurisdiction",
        "date",
        "time",
        "location",
        "address",
        "basis",
        "source_url",
        "notes",
    ];

    /// Build the record for a feed item.
    ///
    /// The structured `EventDates`, `EventTimes` and `Location` fields win; the description is
    /// only consulted for the ones that are empty.
    pub fn from_item(item: &FeedItem, source: &FeedSource) -> Self {
        let fallback = description::parse(&item.description);
        let date = normalize::date(prefer(&item.event_dates, &fallback.date));
        let time = normalize::time(prefer(&item.event_times, &fallback.time));
        let location = normalize::location(prefer(&item.location, &fallback.location));
        if item.event_dates.is_empty() || item.event_times.is_empty() || item.location.is_empty() {
            debug!("falling back to the description for {}", item.link);
        }
        let title = decode_html_entities(&item.title).trim().to_string();
        let event_type = if title.is_empty() {
            String::from(DEFAULT_EVENT_TYPE)
        } else {
            title
        };
        EventRecord {
            event_id: event_id(&item.link, &item.guid, &source.id_prefix),
            group_id: source.group_id.clone(),
            body_name: source.body_name.clone(),
            event_type,
            jurisdiction: source.jurisdiction.clone(),
            date,
            time,
            address: location.clone(),
            location,
            basis: source.basis.clone(),
            source_url: item.link.clone(),
            notes: source.notes.clone(),
        }
    }
}

fn prefer<'a>(structured: &'a str, fallback: &'a str) -> &'a str {
    if structured.is_empty() {
        fallback
    } else {
        structured
    }
}

/// Get the identifier of an event from the `EID=` query parameter of its link, or else its guid.
///
/// Changing this function is a breaking change for consumers matching rows across exports!
pub fn event_id(link: &str, guid: &str, prefix: &str) -> String {
    let id = [link, guid]
        .into_iter()
        .find_map(|text| EVENT_ID_REGEX.captures(text))
        .map(|captures| format!("{prefix}-{}", &captures["id"]));
    match id {
        Some(id) => id,
        None => {
            debug!("no event id in link {link:?} or guid {guid:?}");
            String::new()
        }
    }
}

/// Parse a feed document and build one record per item, in document order.
pub fn records(xml: &str, source: &FeedSource) -> Result<Vec<EventRecord>> {
    let records: Vec<EventRecord> = feed::parse(xml, &source.namespace)?
        .iter()
        .map(|item| EventRecord::from_item(item, source))
        .collect();
    Ok(records)
}
