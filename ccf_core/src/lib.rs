//! This crate exports the City of Charleston calendar RSS feed as a normalized CSV schedule.
//!
//! The feed is read from <https://www.charleston-sc.gov/RSSFeed.aspx?ModID=58&CID=All-calendar.xml>.
//! Each item becomes one [`record::EventRecord`], combining the feed's structured fields with
//! whatever can be recovered from the free-text description.

pub mod description;
pub mod error;
pub mod feed;
pub mod feed_client;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod source;
pub mod writer;

pub use error::{Error, Result};
pub use record::EventRecord;
pub use source::FeedSource;
