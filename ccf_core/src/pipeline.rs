//! The whole export: fetch, parse, normalize, write.

use std::path::Path;

use log::debug;

use crate::{feed_client, record, writer, Error, FeedSource, Result};

/// Export the events of an already fetched feed document to `path`.
///
/// A feed without events is an error, and nothing is written for it.
/// Returns the number of records written.
pub fn export(xml: &str, source: &FeedSource, path: &Path) -> Result<usize> {
    let records = record::records(xml, source)?;
    if records.is_empty() {
        debug!("no events in the feed from {}", source.url);
        return Err(Error::NoEvents);
    }
    writer::write(path, &records)?;
    Ok(records.len())
}

/// Fetch the feed of `source` and export its events to `path`.
pub async fn run(source: &FeedSource, path: &Path) -> Result<usize> {
    let xml = feed_client::fetch(&source.url).await?;
    export(&xml, source, path)
}
