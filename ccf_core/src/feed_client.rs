//! This client fetches the raw feed document.

use log::{debug, info};

use crate::Result;

/// Get the feed document at `url` as text.
///
/// Anything but a success status is an error, as is a body that is not valid UTF-8.
/// There is no retry and no timeout beyond what the transport imposes.
pub async fn fetch(url: &str) -> Result<String> {
    debug!("fetching feed from {url}");
    let response = reqwest::get(url).await?.error_for_status()?;
    let bytes = response.bytes().await?;
    info!("received {} bytes from {url}", bytes.len());
    let text = String::from_utf8(bytes.to_vec())?;
    Ok(text)
}
