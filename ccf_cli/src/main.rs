use std::{path::PathBuf, process::exit};

use anyhow::Result;
use ccf_core::{
    pipeline,
    source::{FeedSource, DEFAULT_OUTPUT_PATH},
    Error,
};
use clap::Parser;
use env_logger::Env;

#[derive(Debug, Parser)]
#[command(about = "Export the City of Charleston calendar feed as CSV")]
pub struct Arguments {
    /// the feed URL, defaults to the City of Charleston calendar
    #[arg(long)]
    pub url: Option<String>,
    /// the CSV file to write
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,
}

impl From<&Arguments> for FeedSource {
    fn from(value: &Arguments) -> Self {
        match &value.url {
            Some(url) => FeedSource::charleston().with_url(url.clone()),
            None => FeedSource::charleston(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Arguments::parse();
    let source = FeedSource::from(&args);
    match pipeline::run(&source, &args.output).await {
        Ok(count) => {
            println!("Wrote {count} events to {}", args.output.display());
            Ok(())
        }
        Err(err) => match failure_message(&err) {
            Some(message) => {
                eprintln!("{message}");
                exit(1);
            }
            None => Err(err.into()),
        },
    }
}

/// The single diagnostic line for failures reported without an error chain.
fn failure_message(err: &Error) -> Option<String> {
    match err {
        Error::NoEvents => Some(String::from("No events parsed from RSS feed.")),
        err if err.is_fetch() => Some(format!("Failed to fetch RSS feed: {err}")),
        _ => None,
    }
}
