//! Knowledge-base entries and the raw record parser.
//!
//! Raw input arrives as one string: records separated by `;`, fields
//! separated by `,`. [`parse_batch`] turns it into a list of
//! [`ParsedRecord`]s, each either a valid [`Entry`] or a rejection with a
//! reason. Nothing downstream re-checks field counts.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Token in the date position that resolves to the processing date.
pub const TODAY_TOKEN: &str = "today";

/// Date format used in raw input and in the persisted store.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One reference record: title, tag path, link and the date it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub tag_path: String,
    pub link: String,
    pub date_added: NaiveDate,
}

impl Entry {
    pub fn new(
        title: impl Into<String>,
        tag_path: impl Into<String>,
        link: impl Into<String>,
        date_added: NaiveDate,
    ) -> Self {
        Entry {
            title: title.into(),
            tag_path: tag_path.into(),
            link: link.into(),
            date_added,
        }
    }

    /// Checks the fields a persisted entry must carry.
    pub fn validate(&self) -> Result<(), RejectReason> {
        if self.title.trim().is_empty() {
            return Err(RejectReason::BlankTitle);
        }
        if self.tag_path.trim().is_empty() {
            return Err(RejectReason::BlankTag);
        }
        Ok(())
    }
}

/// Why a raw record was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    TooFewFields { found: usize },
    TooManyFields { found: usize },
    BlankTitle,
    BlankTag,
    InvalidDate { value: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::TooFewFields { found } => {
                write!(f, "expected at least 3 fields, found {}", found)
            }
            RejectReason::TooManyFields { found } => {
                write!(f, "expected at most 4 fields, found {}", found)
            }
            RejectReason::BlankTitle => write!(f, "title is blank"),
            RejectReason::BlankTag => write!(f, "tag is blank"),
            RejectReason::InvalidDate { value } => {
                write!(f, "date '{}' is neither 'today' nor YYYY-MM-DD", value)
            }
        }
    }
}

/// A raw record that failed parsing, kept verbatim for error reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    pub raw: String,
    pub reason: RejectReason,
}

impl fmt::Display for RejectedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': {}", self.raw, self.reason)
    }
}

/// Outcome of parsing one raw record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRecord {
    Valid(Entry),
    Rejected(RejectedRecord),
}

/// Parses a single comma-separated record.
///
/// Accepts `title, tag, link` (date defaults to `today`) or
/// `title, tag, link, date` where date is `today` (any case) or ISO.
pub fn parse_record(raw: &str, today: NaiveDate) -> ParsedRecord {
    let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
    let reject = |reason| {
        ParsedRecord::Rejected(RejectedRecord {
            raw: raw.trim().to_string(),
            reason,
        })
    };

    if fields.len() < 3 {
        return reject(RejectReason::TooFewFields {
            found: fields.len(),
        });
    }
    if fields.len() > 4 {
        return reject(RejectReason::TooManyFields {
            found: fields.len(),
        });
    }

    let date_added = match fields.get(3) {
        None => today,
        Some(d) if d.eq_ignore_ascii_case(TODAY_TOKEN) => today,
        Some(d) => match NaiveDate::parse_from_str(d, DATE_FORMAT) {
            Ok(date) => date,
            Err(_) => {
                return reject(RejectReason::InvalidDate {
                    value: d.to_string(),
                })
            }
        },
    };

    let entry = Entry::new(fields[0], fields[1], fields[2], date_added);
    match entry.validate() {
        Ok(()) => ParsedRecord::Valid(entry),
        Err(reason) => reject(reason),
    }
}

/// Parses a `;`-separated batch. Blank records are skipped.
pub fn parse_batch(raw: &str, today: NaiveDate) -> Vec<ParsedRecord> {
    raw.split(';')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| parse_record(r, today))
        .collect()
}

/// Splits parsed records into accepted entries, or every rejection if there
/// was at least one.
pub fn partition_batch(records: Vec<ParsedRecord>) -> Result<Vec<Entry>, Vec<RejectedRecord>> {
    let mut entries = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();
    for record in records {
        match record {
            ParsedRecord::Valid(entry) => entries.push(entry),
            ParsedRecord::Rejected(r) => rejected.push(r),
        }
    }
    if rejected.is_empty() {
        Ok(entries)
    } else {
        Err(rejected)
    }
}
