//! CSV export of the activity log.
//!
//! The exported file mirrors what a dashboard's download button produces:
//! one row per transition, most-recent-first, with second-precision
//! timestamps and durations to two decimal places.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime};

use nodewatch_types::{ActivityLogEntry, NodeStatus, UnixMillis};

use crate::error::{Error, Result};

/// Column headers of the exported CSV.
pub const CSV_HEADERS: [&str; 5] = [
    "Node Display Name",
    "Node Address",
    "Status",
    "Timestamp",
    "Previous State Duration (s)",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One re-imported CSV row.
///
/// Exporting and re-parsing preserves these fields modulo formatting:
/// timestamps are truncated to whole seconds and durations to two
/// decimal places.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedEntry {
    pub node_display_name: String,
    pub node_address: String,
    pub status: NodeStatus,
    pub timestamp: UnixMillis,
    pub duration_seconds: f64,
}

fn format_timestamp(ts: UnixMillis) -> String {
    DateTime::from_timestamp_millis(ts.as_millis() as i64)
        .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

fn parse_timestamp(s: &str) -> Result<UnixMillis> {
    let naive = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|e| Error::Parse(format!("bad timestamp \"{s}\": {e}")))?;
    Ok(UnixMillis::from_millis(
        naive.and_utc().timestamp_millis() as u64
    ))
}

/// File name for an export taken at `now`, e.g.
/// `activity_log_2024-03-01T12-30-00Z.csv`.
pub fn export_file_name(now: UnixMillis) -> String {
    let stamp = DateTime::from_timestamp_millis(now.as_millis() as i64)
        .map(|dt| dt.format("%Y-%m-%dT%H-%M-%SZ").to_string())
        .unwrap_or_default();
    format!("activity_log_{stamp}.csv")
}

/// Write the activity log as CSV to any writer.
pub fn write_activity_csv<W: Write>(entries: &[ActivityLogEntry], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADERS)?;
    for entry in entries {
        let timestamp = format_timestamp(entry.timestamp);
        let duration = format!("{:.2}", entry.duration_seconds);
        wtr.write_record([
            entry.node_display_name.as_str(),
            entry.node_address.as_str(),
            entry.status.as_str(),
            timestamp.as_str(),
            duration.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// The activity log as an in-memory CSV string.
pub fn activity_csv_string(entries: &[ActivityLogEntry]) -> Result<String> {
    let mut buf = Vec::new();
    write_activity_csv(entries, &mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| Error::Parse(format!("exported CSV was not UTF-8: {e}")))
}

/// Export the activity log into `dir` under a timestamped file name.
/// Returns the path of the written file.
pub fn export_activity_log(
    dir: &Path,
    entries: &[ActivityLogEntry],
    now: UnixMillis,
) -> Result<PathBuf> {
    let path = dir.join(export_file_name(now));
    let file = File::create(&path)?;
    write_activity_csv(entries, file)?;
    tracing::debug!(path = %path.display(), rows = entries.len(), "activity log exported");
    Ok(path)
}

/// Re-parse an exported CSV back into entry rows.
pub fn read_activity_csv<R: Read>(reader: R) -> Result<Vec<ExportedEntry>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;

        let status_str = field(&record, 2)?;
        let status = NodeStatus::parse(status_str)
            .ok_or_else(|| Error::Parse(format!("bad status \"{status_str}\"")))?;
        let timestamp = parse_timestamp(field(&record, 3)?)?;
        let duration_str = field(&record, 4)?;
        let duration_seconds: f64 = duration_str
            .parse()
            .map_err(|e| Error::Parse(format!("bad duration \"{duration_str}\": {e}")))?;

        rows.push(ExportedEntry {
            node_display_name: field(&record, 0)?.to_string(),
            node_address: field(&record, 1)?.to_string(),
            status,
            timestamp,
            duration_seconds,
        });
    }
    Ok(rows)
}

fn field(record: &csv::StringRecord, index: usize) -> Result<&str> {
    record
        .get(index)
        .ok_or_else(|| Error::Parse(format!("missing column {index}")))
}
