//! Errors of the export pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("response body is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("feed is not well-formed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("feed is not well-formed XML: {0}")]
    Malformed(String),

    #[error("could not write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not serialize records: {0}")]
    Csv(#[from] csv::Error),

    #[error("no events parsed from feed")]
    NoEvents,
}

impl Error {
    /// Whether this error happened while retrieving the feed.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Error::Fetch(_) | Error::Decode(_))
    }
}
