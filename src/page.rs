//! Defines the [`PageRecord`] type and the logic for splitting a content file
//! into its YAML metadata and markdown body. A content file is structured as
//! follows:
//!
//! 1. YAML metadata with at least `template` and `slug`
//! 2. A delimiter line (`---`)
//! 3. Markdown body
//!
//! For example:
//!
//! ```md
//! headline: Banana
//! slug: banana
//! template: basic.html
//! datePublished: 2021-04-16
//! ---
//! # Banana
//!
//! Bananas are a fruit.
//! ```

use crate::error::{Error, Result};
use crate::markdown;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::Path;

/// The line separating metadata from body.
pub const DELIMITER: &str = "---";

/// The metadata key holding a post's publish date.
pub const DATE_KEY: &str = "datePublished";

const MARKDOWN_EXTENSION: &str = "md";

/// Whether `path` names a content file. Dotfiles such as `.md` have no
/// extension and don't count.
pub fn is_markdown(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == MARKDOWN_EXTENSION)
}

/// Splits `input` around its single delimiter line, returning the metadata
/// and the body. The body starts immediately after the three dashes, so
/// `meta + DELIMITER + body` is always `input`.
pub fn split(input: &str) -> Result<(&str, &str)> {
    let mut offset = 0;
    let mut found = Vec::new();
    for line in input.split_inclusive('\n') {
        if line.trim_end_matches(|c: char| c == '\n' || c == '\r') == DELIMITER {
            found.push(offset);
        }
        offset += line.len();
    }

    match found.as_slice() {
        [start] => Ok((&input[..*start], &input[start + DELIMITER.len()..])),
        _ => Err(Error::Parse { found: found.len() }),
    }
}

/// A post's publish date. Dates without a time sort as midnight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PublishDate(NaiveDateTime);

impl PublishDate {
    fn parse(s: &str) -> Option<PublishDate> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(PublishDate(dt.naive_utc()));
        }
        for format in &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Some(PublishDate(dt));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(PublishDate)
    }
}

impl fmt::Display for PublishDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The parsed representation of one content file.
#[derive(Clone, Debug)]
pub struct PageRecord {
    /// The template file name, relative to the template directory.
    pub template: String,

    /// The output file stem.
    pub slug: String,

    /// Every metadata key, including the ones above, as declared.
    pub metadata: Mapping,

    /// The body flattened onto a single line (`page_text` in templates).
    pub text: String,

    /// The body rendered as HTML (`page_html` in templates).
    pub html: String,
}

impl PageRecord {
    /// Parses a content file. Fails with [`Error::Parse`] if the delimiter is
    /// missing or ambiguous and with [`Error::Metadata`] if the metadata isn't
    /// a YAML mapping with string `template` and `slug` fields.
    pub fn parse(input: &str) -> Result<PageRecord> {
        let (meta, body) = split(input)?;
        let metadata = match serde_yaml::from_str::<Value>(meta) {
            Ok(Value::Mapping(m)) => m,
            Ok(Value::Null) => Mapping::new(),
            Ok(_) => return Err(Error::Metadata("expected a mapping".to_owned())),
            Err(e) => return Err(Error::Metadata(e.to_string())),
        };

        Ok(PageRecord {
            template: required_str(&metadata, "template")?,
            slug: required_str(&metadata, "slug")?,
            text: markdown::flatten(body),
            html: markdown::to_html(body),
            metadata,
        })
    }

    /// Reads the `datePublished` field. Only blog posts need one, so plain
    /// pages may use the key, or leave it out, freely.
    pub fn publish_date(&self) -> Result<PublishDate> {
        match self.metadata.get(&Value::from(DATE_KEY)) {
            Some(Value::String(s)) => PublishDate::parse(s).ok_or_else(|| {
                Error::Metadata(format!(
                    "post `{}`: field `{}` is not a date: `{}`",
                    self.slug, DATE_KEY, s
                ))
            }),
            Some(_) => Err(Error::Metadata(format!(
                "post `{}`: field `{}` must be a date string",
                self.slug, DATE_KEY
            ))),
            None => Err(Error::Metadata(format!(
                "post `{}` has no `{}`",
                self.slug, DATE_KEY
            ))),
        }
    }
}

fn required_str(metadata: &Mapping, key: &str) -> Result<String> {
    match metadata.get(&Value::from(key)) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(_) => Err(Error::Metadata(format!("field `{}` must be a non-empty string", key))),
        None => Err(Error::Metadata(format!("missing field `{}`", key))),
    }
}
