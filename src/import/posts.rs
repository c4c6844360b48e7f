//! StackExchange posts export parser
//!
//! Reads the attribute-per-field `<row .../>` elements of a Posts.xml
//! export and maps each one to a typed [`Question`]. Rows carrying a
//! ParentId are replies, not top-level questions; they are skipped and
//! counted. Missing or unparseable required attributes abort the run with
//! an error naming the row and attribute.

use super::source::ImportError;
use crate::types::Question;
use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Streaming reader over the rows of a posts export
pub struct PostsSource<R: BufRead> {
    reader: Reader<R>,
    seen_ids: HashSet<String>,
    rows_read: usize,
    replies_skipped: usize,
}

impl<R: BufRead> std::fmt::Debug for PostsSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostsSource")
            .field("seen_ids", &self.seen_ids)
            .field("rows_read", &self.rows_read)
            .field("replies_skipped", &self.replies_skipped)
            .finish_non_exhaustive()
    }
}

/// One attribute row, collected before typed mapping
#[derive(Debug, Default)]
struct RawRow {
    id: Option<String>,
    parent_id: Option<String>,
    title: Option<String>,
    body: Option<String>,
    tags: Option<String>,
    score: Option<String>,
    view_count: Option<String>,
    answer_count: Option<String>,
    comment_count: Option<String>,
    creation_date: Option<String>,
    last_activity_date: Option<String>,
    content_license: Option<String>,
    owner_user_id: Option<String>,
    accepted_answer_id: Option<String>,
}

/// Result of reading one row from the XML stream
enum ParseOutcome {
    /// A mapped top-level question
    Question(Question),
    /// A reply row, skipped
    Reply,
    /// End of file reached
    Eof,
}

impl PostsSource<BufReader<File>> {
    /// Open a posts export file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let file = File::open(path.as_ref())?;
        let buf_reader = BufReader::with_capacity(1024 * 1024, file);
        Ok(Self::from_reader(buf_reader))
    }
}

impl<R: BufRead> PostsSource<R> {
    /// Read rows from any buffered reader
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: Reader::from_reader(reader),
            seen_ids: HashSet::new(),
            rows_read: 0,
            replies_skipped: 0,
        }
    }

    /// Rows seen so far, replies included
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Reply rows skipped so far
    pub fn replies_skipped(&self) -> usize {
        self.replies_skipped
    }

    /// Advance to the next row element and map it
    fn parse_next_row(&mut self) -> Result<ParseOutcome, ImportError> {
        let mut buf = Vec::with_capacity(4096);

        loop {
            buf.clear();
            match self.reader.read_event_into(&mut buf)? {
                Event::Empty(ref e) | Event::Start(ref e) if e.name().as_ref() == b"row" => {
                    self.rows_read += 1;
                    let raw = collect_row(e)?;
                    return self.map_row(raw);
                }
                Event::Eof => return Ok(ParseOutcome::Eof),
                _ => {}
            }
        }
    }

    /// Typed schema mapping: every required field is validated here so
    /// failures name the offending row and attribute.
    fn map_row(&mut self, raw: RawRow) -> Result<ParseOutcome, ImportError> {
        if raw.parent_id.is_some() {
            return Ok(ParseOutcome::Reply);
        }

        let id = required(&format!("#{}", self.rows_read), "Id", raw.id)?;
        if !self.seen_ids.insert(id.clone()) {
            return Err(ImportError::DuplicateId(id));
        }

        // ViewCount is the one attribute the export may omit; it defaults
        // to zero rather than failing the row.
        let view_count = match raw.view_count {
            Some(value) => parse_int(&id, "ViewCount", value)?,
            None => 0,
        };

        let question = Question {
            title: required(&id, "Title", raw.title)?,
            body: required(&id, "Body", raw.body)?,
            tags: parse_tags(raw.tags.as_deref().unwrap_or_default()),
            score: parse_int(&id, "Score", required(&id, "Score", raw.score)?)?,
            view_count,
            answer_count: parse_int(&id, "AnswerCount", required(&id, "AnswerCount", raw.answer_count)?)?,
            comment_count: parse_int(&id, "CommentCount", required(&id, "CommentCount", raw.comment_count)?)?,
            creation_date: parse_timestamp(&id, "CreationDate", required(&id, "CreationDate", raw.creation_date)?)?,
            last_activity_date: parse_timestamp(
                &id,
                "LastActivityDate",
                required(&id, "LastActivityDate", raw.last_activity_date)?,
            )?,
            content_license: required(&id, "ContentLicense", raw.content_license)?,
            owner_user_id: required(&id, "OwnerUserId", raw.owner_user_id)?,
            accepted_answer_id: raw.accepted_answer_id,
            id,
        };

        Ok(ParseOutcome::Question(question))
    }
}

impl<R: BufRead> Iterator for PostsSource<R> {
    type Item = Result<Question, ImportError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.parse_next_row() {
                Ok(ParseOutcome::Question(question)) => return Some(Ok(question)),
                Ok(ParseOutcome::Reply) => {
                    self.replies_skipped += 1;
                    continue;
                }
                Ok(ParseOutcome::Eof) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Collect the attributes of one row element into their raw string form
fn collect_row(e: &BytesStart) -> Result<RawRow, ImportError> {
    let mut raw = RawRow::default();

    for attr in e.attributes() {
        let attr = attr.map_err(|err| ImportError::Xml(err.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|err| ImportError::Xml(err.to_string()))?
            .into_owned();

        match attr.key.as_ref() {
            b"Id" => raw.id = Some(value),
            b"ParentId" => raw.parent_id = Some(value),
            b"Title" => raw.title = Some(value),
            b"Body" => raw.body = Some(value),
            b"Tags" => raw.tags = Some(value),
            b"Score" => raw.score = Some(value),
            b"ViewCount" => raw.view_count = Some(value),
            b"AnswerCount" => raw.answer_count = Some(value),
            b"CommentCount" => raw.comment_count = Some(value),
            b"CreationDate" => raw.creation_date = Some(value),
            b"LastActivityDate" => raw.last_activity_date = Some(value),
            b"ContentLicense" => raw.content_license = Some(value),
            b"OwnerUserId" => raw.owner_user_id = Some(value),
            b"AcceptedAnswerId" => raw.accepted_answer_id = Some(value),
            _ => {}
        }
    }

    Ok(raw)
}

fn required(
    row: &str,
    attribute: &'static str,
    value: Option<String>,
) -> Result<String, ImportError> {
    value.ok_or_else(|| ImportError::MissingField {
        row: row.to_string(),
        attribute,
    })
}

fn parse_int(row: &str, attribute: &'static str, value: String) -> Result<i64, ImportError> {
    value.trim().parse().map_err(|_| ImportError::InvalidField {
        row: row.to_string(),
        attribute,
        value,
    })
}

fn parse_timestamp(
    row: &str,
    attribute: &'static str,
    value: String,
) -> Result<DateTime<Utc>, ImportError> {
    parse_iso8601(&value).ok_or_else(|| ImportError::InvalidField {
        row: row.to_string(),
        attribute,
        value,
    })
}

/// Accepts RFC 3339 as well as the offset-less form the export uses
/// (offset-less timestamps are taken as UTC).
fn parse_iso8601(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Decode the `<tag1><tag2>` form of the Tags attribute
fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(['<', '>'])
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
