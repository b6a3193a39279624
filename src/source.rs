// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Loads UCD-style range files, e.g. `EastAsianWidth.txt`:
//!
//! ```text
//! 0020..007E     ; Na # Zs     [95] SPACE..TILDE
//! 00A1           ; A  # Po         INVERTED EXCLAMATION MARK
//! ```

use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::apperr::{self, Error};
use crate::attribute::{Attribute, AttributeArray, CODEPOINT_COUNT};

// The value is letters only. Anything after it, like the `_Presentation`
// in `Emoji_Presentation`, is ignored along with the comment.
static RECORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-F]+)(?:\.\.([0-9A-F]+))?\s*;\s*([A-Za-z]+)").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRecord<'a> {
    pub range: RangeInclusive<u32>,
    pub value: &'a str,
}

/// Removes the line terminator, everything from the first `#` on,
/// and the spaces that were left in front of it.
pub fn strip_comment(line: &str) -> &str {
    let line = line.trim_end_matches(['\r', '\n']);
    let line = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };
    line.trim_end_matches(' ')
}

/// Parses a single line.
///
/// Returns `Ok(None)` for lines that aren't records at all (blank, comment-only
/// or otherwise unrecognized). A line that looks like a record but carries an
/// unusable codepoint is an error, because skipping it would silently leave
/// part of the table at its default.
pub fn parse_record(line: &str) -> Result<Option<RangeRecord<'_>>, &'static str> {
    let line = strip_comment(line);
    if line.is_empty() {
        return Ok(None);
    }
    let Some(caps) = RECORD.captures(line) else {
        return Ok(None);
    };

    let from = parse_codepoint(&caps[1])?;
    let to = match caps.get(2) {
        Some(m) => parse_codepoint(m.as_str())?,
        None => from,
    };
    if from > to {
        return Err("range start after range end");
    }

    let value = caps.get(3).map_or("", |m| m.as_str());
    Ok(Some(RangeRecord { range: from..=to, value }))
}

fn parse_codepoint(hex: &str) -> Result<u32, &'static str> {
    let cp = u32::from_str_radix(hex, 16).map_err(|_| "unparsable codepoint")?;
    if cp as usize >= CODEPOINT_COUNT {
        return Err("codepoint beyond U+10FFFF");
    }
    Ok(cp)
}

/// Builds the dense array for `attribute` from the contents of a source file.
/// `origin` is only used for diagnostics.
pub fn load_str(
    text: &str,
    attribute: Attribute,
    origin: &Path,
) -> apperr::Result<AttributeArray> {
    let mut array = AttributeArray::new(attribute);
    let mut records = 0usize;

    for (idx, line) in text.lines().enumerate() {
        let record = parse_record(line).map_err(|reason| Error::MalformedRecord {
            origin: origin.to_path_buf(),
            line: idx + 1,
            text: line.to_string(),
            reason,
        })?;
        let Some(record) = record else {
            if !strip_comment(line).is_empty() {
                log::trace!("{}:{}: skipping {:?}", origin.display(), idx + 1, line);
            }
            continue;
        };

        let id = array.intern(record.value)?;
        let range = *record.range.start() as usize..=*record.range.end() as usize;
        array.assign_unset(range, id);
        records += 1;
    }

    log::debug!(
        "{}: {} records, {} distinct {} values",
        origin.display(),
        records,
        array.names().len(),
        array.attribute().name,
    );
    Ok(array)
}

pub fn load_file(path: &Path, attribute: Attribute) -> apperr::Result<AttributeArray> {
    let text = std::fs::read_to_string(path).map_err(|err| Error::from_io(path, err))?;
    load_str(&text, attribute, path)
}
