//! This writer serializes event records as CSV.

use std::{fs, io::Write, path::Path};

use csv::{Terminator, WriterBuilder};
use log::info;

use crate::{EventRecord, Result};

/// Write the header and one row per record to `writer`.
///
/// Fields are only quoted when they contain the delimiter, a quote or a line break.
pub fn write_to<W: Write>(writer: W, records: &[EventRecord]) -> Result<()> {
    let mut csv_writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(writer);
    csv_writer.write_record(EventRecord::HEADER)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the records to the file at `path`, replacing whatever was there.
///
/// Missing parent directories are created.
pub fn write(path: &Path, records: &[EventRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_to(file, records)?;
    info!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use crate::{
        writer::{write, write_to},
        EventRecord, FeedSource,
    };

    fn test_records() -> Vec<EventRecord> {
        let source = FeedSource::charleston();
        vec![
            EventRecord {
                event_id: String::from("RSS-1"),
                group_id: source.group_id.clone(),
                body_name: source.body_name.clone(),
                event_type: String::from("Planning Commission"),
                jurisdiction: source.jurisdiction.clone(),
                date: String::from("2024-03-05"),
                time: String::from("5:00 PM"),
                location: String::from("City Hall, 80 Broad Street"),
                address: String::from("City Hall, 80 Broad Street"),
                basis: source.basis.clone(),
                source_url: String::from("https://example.org/Calendar.aspx?EID=1"),
                notes: source.notes.clone(),
            },
            EventRecord {
                event_type: String::from("Say \"Cheese\"\nFestival"),
                time: String::from("Evening"),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_write_to() {
        let mut buffer: Vec<u8> = vec![];
        write_to(&mut buffer, &test_records()[1..]).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "event_id,group_id,body_name,event_type,jurisdiction,date,time,location,address,basis,source_url,notes\r\n\
             ,,,\"Say \"\"Cheese\"\"\nFestival\",,,Evening,,,,,\r\n"
        );
    }

    #[test]
    fn test_write_to_without_records() {
        let mut buffer: Vec<u8> = vec![];
        write_to(&mut buffer, &[]).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            format!("{}\r\n", EventRecord::HEADER.join(","))
        );
    }

    #[test]
    fn test_write_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("charleston").join("events.csv");
        let records = test_records();
        write(&path, &records).unwrap();
        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(String::from)
            .collect();
        assert_eq!(header, EventRecord::HEADER);
        let read: Vec<EventRecord> = reader.deserialize().map(Result::unwrap).collect();
        assert_eq!(read, records);
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.csv");
        fs::write(&path, "stale content that is longer than the new export ".repeat(100)).unwrap();
        let records = test_records();
        write(&path, &records[..1]).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_write_unwritable_path() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();
        assert!(write(&blocker.join("events.csv"), &test_records()).is_err());
    }
}
