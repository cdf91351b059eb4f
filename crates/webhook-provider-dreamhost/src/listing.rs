//! Parsing of DreamHost API response bodies
//!
//! Every answer starts with a status line, `success` or `error`. For
//! `dns-list_records` the rest of a successful body is a tab-separated table
//! with a header row:
//!
//! ```text
//! success
//! account_id	zone	record	type	value	comment	editable
//! 1234	example.com	example.com	A	192.0.2.1		1
//! ```

use webhook_core::{Error, RawRecord, Result};

/// Status line of an API answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiStatus<'a> {
    /// `success`, with the remainder of the body
    Success(&'a str),
    /// `error`, with the reason given on the next line
    Error(&'a str),
}

/// Split an API answer into its status and payload
pub fn parse_status(body: &str) -> Result<ApiStatus<'_>> {
    let body = body.trim_start();
    let (status, rest) = body.split_once('\n').unwrap_or((body, ""));

    match status.trim() {
        "success" => Ok(ApiStatus::Success(rest)),
        "error" => Ok(ApiStatus::Error(rest.lines().next().unwrap_or("").trim())),
        other => Err(Error::format(format!(
            "unexpected response status line: {:?}",
            other
        ))),
    }
}

const REQUIRED_COLUMNS: [&str; 5] = ["zone", "record", "type", "value", "editable"];

/// Parse the tab-separated record table of a `dns-list_records` answer
pub fn parse_records(table: &str) -> Result<Vec<RawRecord>> {
    let mut lines = table
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Ok(Vec::new());
    };

    let columns: Vec<&str> = header.split('\t').map(str::trim).collect();
    let mut index = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in index.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| Error::format(format!("record listing has no '{}' column", name)))?;
    }
    let [zone, record, record_type, value, editable] = index;
    let width = index.iter().max().copied().unwrap_or(0) + 1;

    lines
        .map(|(line_no, line)| {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < width {
                return Err(Error::format(format!(
                    "record listing line {} has {} field(s), expected at least {}",
                    line_no + 1,
                    fields.len(),
                    width
                )));
            }

            Ok(RawRecord::new(
                fields[zone].trim(),
                fields[record].trim(),
                fields[record_type].trim(),
                fields[value],
                parse_editable(fields[editable], line_no + 1)?,
            ))
        })
        .collect()
}

fn parse_editable(field: &str, line_no: usize) -> Result<bool> {
    match field.trim() {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(Error::format(format!(
            "record listing line {} has editable={:?}, expected 0 or 1",
            line_no, other
        ))),
    }
}
