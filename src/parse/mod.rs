pub mod header;
pub mod split;

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use header::normalize_header;
use split::{clean_field, split_quoted};

/// One parsed data row: a mapping from normalized header keys to cleaned
/// field values, plus the row's ordinal id.
///
/// The id is the row's 1-based position in the original line sequence, with
/// the header occupying line 0 — so the first data line gets id 1 whether or
/// not earlier rows were dropped. Records are immutable after parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: usize,
    fields: HashMap<String, String>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn fields(&self) -> &HashMap<String, String> {
        &self.fields
    }
}

/// Full ordered sequence of valid records from one parse pass. Replaced
/// wholesale on reload, never patched.
pub type Dataset = Vec<Record>;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The header row, after normalization, did not contain the key every
    /// usable row must carry.
    RequiredKeyMissing { key: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::RequiredKeyMissing { key } => {
                write!(f, "required column '{key}' not found among normalized headers")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse raw CSV text into an ordered sequence of records.
///
/// The first line is the header row; each label is normalized via
/// [`normalize_header`] to produce the key vocabulary. Data rows are split on
/// unquoted commas, and a row survives only if its field count matches the
/// header count exactly and its `required_key` value is non-empty after
/// trimming. Mismatched rows are dropped with a warning rather than failing
/// the parse.
///
/// Fully empty input yields an empty dataset. A header row without
/// `required_key` is the one hard failure.
#[tracing::instrument(level = "debug", skip(csv_text))]
pub fn parse_records(csv_text: &str, required_key: &str) -> Result<Dataset, ParseError> {
    let text = csv_text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let mut lines = text.split('\n');
    let header_line = lines.next().unwrap_or_default();
    let headers: Vec<String> = split_quoted(header_line)
        .into_iter()
        .map(|raw| normalize_header(&clean_field(raw)))
        .collect();

    if !headers.iter().any(|h| h == required_key) {
        return Err(ParseError::RequiredKeyMissing {
            key: required_key.to_string(),
        });
    }

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for (line_no, line) in text.split('\n').enumerate().skip(1) {
        let values = split_quoted(line);
        if values.len() != headers.len() {
            dropped += 1;
            warn!(
                line = line_no,
                fields = values.len(),
                expected = headers.len(),
                "dropping row with mismatched field count"
            );
            continue;
        }

        // Duplicate header keys collapse here: the last column wins.
        let mut fields = HashMap::with_capacity(headers.len());
        for (key, raw) in headers.iter().zip(values) {
            fields.insert(key.clone(), clean_field(raw));
        }

        let usable = fields
            .get(required_key)
            .is_some_and(|v| !v.trim().is_empty());
        if !usable {
            continue;
        }

        records.push(Record {
            id: line_no,
            fields,
        });
    }

    debug!(records = records.len(), dropped, "parsed csv text");
    Ok(records)
}
