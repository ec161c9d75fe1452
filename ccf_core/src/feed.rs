//! This parser walks the RSS document and collects the raw text of every calendar item.

use log::debug;
use quick_xml::{
    events::Event,
    name::{Namespace, ResolveResult},
    NsReader,
};

use crate::{Error, Result};

const CHANNEL_DEPTH: usize = 2;
const ITEM_DEPTH: usize = 3;
const FIELD_DEPTH: usize = 4;

/// The raw text of one `item` element.
///
/// Every field is the trimmed text of the matching child element, or empty if there is none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub guid: String,
    pub description: String,
    /// the namespaced `EventDates` element
    pub event_dates: String,
    /// the namespaced `EventTimes` element
    pub event_times: String,
    /// the namespaced `Location` element
    pub location: String,
}

impl FeedItem {
    fn set(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::Guid => &mut self.guid,
            Field::Description => &mut self.description,
            Field::EventDates => &mut self.event_dates,
            Field::EventTimes => &mut self.event_times,
            Field::Location => &mut self.location,
        };
        *slot = String::from(value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Guid,
    Description,
    EventDates,
    EventTimes,
    Location,
}

impl Field {
    /// Recognize an item child by its namespace and local name.
    fn resolve(resolved: &ResolveResult, local_name: &[u8], feed_namespace: &str) -> Option<Self> {
        match resolved {
            ResolveResult::Unbound => match local_name {
                b"title" => Some(Field::Title),
                b"link" => Some(Field::Link),
                b"guid" => Some(Field::Guid),
                b"description" => Some(Field::Description),
                _ => None,
            },
            ResolveResult::Bound(Namespace(uri)) if *uri == feed_namespace.as_bytes() => {
                match local_name {
                    b"EventDates" => Some(Field::EventDates),
                    b"EventTimes" => Some(Field::EventTimes),
                    b"Location" => Some(Field::Location),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

fn is_plain(resolved: &ResolveResult, local_name: &[u8], name: &[u8]) -> bool {
    matches!(resolved, ResolveResult::Unbound) && local_name == name
}

/// Parse the feed document into its items, in document order.
///
/// Only the first `channel` directly below the root element is read, and only its direct `item`
/// children count. A document without such a channel has no items; that is not an error.
/// `namespace` is the URI the structured `EventDates`, `EventTimes` and `Location` elements are
/// bound to, whatever prefix the document picks for it.
pub fn parse(xml: &str, namespace: &str) -> Result<Vec<FeedItem>> {
    let mut reader = NsReader::from_str(xml);
    let mut items: Vec<FeedItem> = vec![];
    let mut depth: usize = 0;
    let mut seen_root = false;
    let mut root_closed = false;
    let mut channel_found = false;
    let mut in_channel = false;
    let mut item: Option<FeedItem> = None;
    let mut filled: Vec<Field> = vec![];
    let mut field: Option<Field> = None;
    let mut text = String::new();
    loop {
        match reader.read_resolved_event()? {
            (resolved, Event::Start(start)) => {
                check_element(&resolved, root_closed)?;
                depth += 1;
                seen_root = true;
                let local_name = start.local_name();
                match depth {
                    CHANNEL_DEPTH
                        if !channel_found && is_plain(&resolved, local_name.as_ref(), b"channel") =>
                    {
                        channel_found = true;
                        in_channel = true;
                    }
                    ITEM_DEPTH if in_channel && is_plain(&resolved, local_name.as_ref(), b"item") => {
                        item = Some(FeedItem::default());
                        filled.clear();
                    }
                    FIELD_DEPTH if item.is_some() => {
                        field = Field::resolve(&resolved, local_name.as_ref(), namespace);
                        text.clear();
                    }
                    _ => {}
                }
            }
            (resolved, Event::Empty(start)) => {
                check_element(&resolved, root_closed)?;
                if depth == 0 {
                    root_closed = true;
                }
                seen_root = true;
                let local_name = start.local_name();
                match depth + 1 {
                    CHANNEL_DEPTH
                        if !channel_found && is_plain(&resolved, local_name.as_ref(), b"channel") =>
                    {
                        channel_found = true;
                    }
                    ITEM_DEPTH if in_channel && is_plain(&resolved, local_name.as_ref(), b"item") => {
                        items.push(FeedItem::default());
                    }
                    _ => {}
                }
            }
            (_, Event::End(_)) => {
                match depth {
                    FIELD_DEPTH => {
                        // the first occurrence of a repeated child wins
                        if let (Some(field), Some(item)) = (field.take(), item.as_mut()) {
                            if !filled.contains(&field) {
                                item.set(field, text.trim());
                                filled.push(field);
                            }
                        }
                    }
                    ITEM_DEPTH => {
                        if let Some(item) = item.take() {
                            items.push(item);
                        }
                    }
                    CHANNEL_DEPTH => in_channel = false,
                    _ => {}
                }
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    root_closed = true;
                }
            }
            (_, Event::Text(content)) => {
                let content = content.unescape().map_err(quick_xml::Error::from)?;
                if depth == 0 && !content.trim().is_empty() {
                    return Err(Error::Malformed(String::from(
                        "text outside of the root element",
                    )));
                }
                if field.is_some() {
                    text.push_str(&content);
                }
            }
            (_, Event::CData(content)) => {
                if depth == 0 {
                    return Err(Error::Malformed(String::from(
                        "CDATA outside of the root element",
                    )));
                }
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&content));
                }
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }
    if !seen_root {
        return Err(Error::Malformed(String::from("document has no root element")));
    }
    if depth > 0 {
        return Err(Error::Malformed(format!(
            "document ends with {depth} unclosed element(s)"
        )));
    }
    if !channel_found {
        debug!("feed has no channel below its root element");
    }
    debug!("parsed {} items from feed", items.len());
    Ok(items)
}

/// Reject elements after the root element and elements with an undeclared prefix.
fn check_element(resolved: &ResolveResult, root_closed: bool) -> Result<()> {
    if root_closed {
        return Err(Error::Malformed(String::from(
            "element after the end of the root element",
        )));
    }
    if let ResolveResult::Unknown(prefix) = resolved {
        return Err(Error::Malformed(format!(
            "undeclared namespace prefix {:?}",
            String::from_utf8_lossy(prefix)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        feed::{parse, FeedItem},
        Error,
    };

    static NAMESPACE: &str = "https://www.charleston-sc.gov/Calendar.aspx";

    /// Test whether the sample feed is read item by item.
    ///
    /// This test is offline.
    #[test]
    fn test_parse() {
        let xml = include_str!("feed/tests/calendar.xml");
        let items = parse(xml, NAMESPACE).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(
            items[0],
            FeedItem {
                title: String::from("Board of Zoning Appeals &amp; Site Design"),
                link: String::from("https://www.charleston-sc.gov/Calendar.aspx?EID=4821"),
                guid: String::from("https://www.charleston-sc.gov/Calendar.aspx?EID=4821"),
                description: String::from(
                    "<strong>Event date:</strong> March 5, 2024<br><strong>Event Time: </strong>05:15 PM - 07:00 PM<br><strong>Location:</strong><br>2 George Street<br>Charleston, SC 29401<br>"
                ),
                event_dates: String::from("March 5, 2024"),
                event_times: String::from("05:15 PM - 07:00 PM"),
                location: String::from("City Hall, 80 Broad Street"),
            }
        );
        assert_eq!(
            items[1].link,
            "https://www.charleston-sc.gov/Calendar.aspx?EID=5107&month=4"
        );
        assert!(items[1].description.starts_with("<strong>Event date:</strong> Apr 13, 2024<br />"));
        assert_eq!(items[1].event_dates, "");
        assert_eq!(items[1].event_times, "");
        assert_eq!(items[1].location, "");
        assert_eq!(items[2].title, "");
        assert_eq!(items[2].description, "Details to follow");
    }

    #[test]
    fn test_parse_any_prefix_for_namespace() {
        let xml = r#"<rss xmlns:c="https://www.charleston-sc.gov/Calendar.aspx" xmlns:o="urn:other">
            <channel><item>
                <c:EventDates> May 1, 2024 </c:EventDates>
                <o:EventTimes>9:00 AM</o:EventTimes>
                <EventTimes>10:00 AM</EventTimes>
            </item></channel></rss>"#;
        let items = parse(xml, NAMESPACE).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].event_dates, "May 1, 2024");
        assert_eq!(items[0].event_times, "");
    }

    #[test]
    fn test_parse_only_direct_children() {
        let xml = r#"<rss>
            <channel>
                <item><title>first</title><source><title>nested</title></source></item>
                <group><item><title>not an item</title></item></group>
                <item/>
            </channel>
            <channel><item><title>second channel</title></item></channel>
        </rss>"#;
        let items = parse(xml, NAMESPACE).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "first");
        assert_eq!(items[1], FeedItem::default());
    }

    #[test]
    fn test_parse_trailing_whitespace_and_comments() {
        let xml = "<?xml version=\"1.0\"?>\n<rss><channel><item/></channel></rss>\n<!-- end -->\n";
        assert_eq!(parse(xml, NAMESPACE).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_first_repeated_child_wins() {
        let xml = "<rss><channel><item>
            <title>first</title>
            <title>second</title>
            <link></link>
            <link>https://example.org/?EID=1</link>
        </item></channel></rss>";
        let items = parse(xml, NAMESPACE).unwrap();
        assert_eq!(items[0].title, "first");
        assert_eq!(items[0].link, "");
    }

    #[test]
    fn test_parse_without_channel() {
        assert!(parse("<rss><title>empty</title></rss>", NAMESPACE)
            .unwrap()
            .is_empty());
        assert!(parse("<rss><channel/></rss>", NAMESPACE).unwrap().is_empty());
        assert!(
            parse("<feed><entry><channel><item/></channel></entry></feed>", NAMESPACE)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert!(parse("<rss><channel></rss>", NAMESPACE).is_err());
        assert!(parse("<rss><channel><item>", NAMESPACE).is_err());
        assert!(matches!(parse("", NAMESPACE), Err(Error::Malformed(_))));
        assert!(matches!(
            parse("<rss><channel><item/></channel></rss>junk", NAMESPACE),
            Err(Error::Malformed(_))
        ));
        assert!(matches!(
            parse("<rss><channel><item/></channel></rss><rss/>", NAMESPACE),
            Err(Error::Malformed(_))
        ));
        assert!(matches!(
            parse("<rss/><rss/>", NAMESPACE),
            Err(Error::Malformed(_))
        ));
        assert!(matches!(
            parse("<rss><channel><item><x:y/></item></channel></rss>", NAMESPACE),
            Err(Error::Malformed(_))
        ));
        assert!(parse(
            "<rss><channel><item><foo>&nbsp;</foo></item></channel></rss>",
            NAMESPACE
        )
        .is_err());
        assert!(matches!(parse("not xml at all", NAMESPACE), Err(Error::Malformed(_))));
    }
}
