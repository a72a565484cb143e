//! Line-oriented record codec for resource bodies.
//!
//! A body holds one record per line, each terminated by `\n`. Records are not
//! escaped, so a record containing `\n` splits into several records on the
//! next read.
//!
//! Decoding treats `\n` as a terminator rather than a separator: the empty
//! body is the empty sequence, and a final `\n` never produces a trailing
//! empty record. A `\r` directly before `\n` is dropped so CRLF bodies read
//! the same as LF bodies; any other `\r` is kept.

use std::fmt;

/// A scalar value stored as one line of a resource.
///
/// Decoding always yields text, so `Record::Integer(1)` comes back as `"1"`.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Text(text) => f.write_str(text),
            Record::Integer(value) => write!(f, "{value}"),
            Record::Float(value) => write!(f, "{value}"),
            Record::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Record {
    fn from(value: &str) -> Self {
        Record::Text(value.to_string())
    }
}

impl From<String> for Record {
    fn from(value: String) -> Self {
        Record::Text(value)
    }
}

impl From<i64> for Record {
    fn from(value: i64) -> Self {
        Record::Integer(value)
    }
}

impl From<i32> for Record {
    fn from(value: i32) -> Self {
        Record::Integer(value.into())
    }
}

impl From<f64> for Record {
    fn from(value: f64) -> Self {
        Record::Float(value)
    }
}

impl From<bool> for Record {
    fn from(value: bool) -> Self {
        Record::Bool(value)
    }
}

/// Serialize records into a body, one line each.
pub fn encode(records: &[Record]) -> String {
    records.iter().fold(String::new(), |mut body, record| {
        body.push_str(&record.to_string());
        body.push('\n');
        body
    })
}

/// Split a body back into records, always as text.
pub fn decode(body: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut rest = body;
    while let Some(end) = rest.find('\n') {
        let line = &rest[..end];
        records.push(line.strip_suffix('\r').unwrap_or(line).to_string());
        rest = &rest[end + 1..];
    }
    // Unterminated final record, kept verbatim.
    if !rest.is_empty() {
        records.push(rest.to_string());
    }
    records
}

/// Lift decoded lines back into records so they can be re-published.
pub fn into_records(lines: Vec<String>) -> Vec<Record> {
    lines.into_iter().map(Record::Text).collect()
}
