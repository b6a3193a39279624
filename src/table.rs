// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The change-point table: only the codepoints whose properties differ from
//! the preceding codepoint are stored. A record's values hold up to, but not
//! including, the next record's codepoint, and the last one up to U+10FFFF.
//!
//! Serialized as one line per record, `0041\tNa\tN\tOther\r\n`.

use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;
use std::path::Path;

use crate::apperr::{self, Error};
use crate::attribute::{CODEPOINT_COUNT, ValueId};
use crate::join::JoinedArray;

pub const FIELD_SEPARATOR: char = '\t';
pub const LINE_TERMINATOR: &str = "\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePoint {
    pub codepoint: u32,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePointTable {
    width: usize,
    points: Vec<ChangePoint>,
}

/// Emits a record for codepoint 0 and for every codepoint whose tuple
/// differs from its predecessor's.
pub fn encode(joined: &JoinedArray) -> ChangePointTable {
    let mut points = Vec::new();
    let mut previous: Option<&[ValueId]> = None;

    for (cp, tuple) in joined.tuples().enumerate() {
        if previous == Some(tuple) {
            continue;
        }
        let values = tuple
            .iter()
            .enumerate()
            .map(|(column, &id)| joined.name(column, id).to_string())
            .collect();
        points.push(ChangePoint { codepoint: cp as u32, values });
        previous = Some(tuple);
    }

    ChangePointTable { width: joined.width(), points }
}

impl ChangePointTable {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of values per record.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChangePoint> {
        self.points.iter()
    }

    /// How many codepoints each record covers on average.
    pub fn compression_ratio(&self) -> f64 {
        CODEPOINT_COUNT as f64 / self.points.len().max(1) as f64
    }

    /// Finds the record that covers `cp`.
    pub fn lookup(&self, cp: u32) -> Option<&ChangePoint> {
        if cp as usize >= CODEPOINT_COUNT {
            return None;
        }
        let idx = self.points.partition_point(|p| p.codepoint <= cp);
        idx.checked_sub(1).map(|idx| &self.points[idx])
    }

    /// Expands the table and compares it against `joined`.
    /// Returns the first codepoint where the two disagree.
    pub fn find_mismatch(&self, joined: &JoinedArray) -> Option<u32> {
        if self.width != joined.width() || self.points.first().is_none_or(|p| p.codepoint != 0) {
            return Some(0);
        }

        for (idx, point) in self.points.iter().enumerate() {
            let end = self.points.get(idx + 1).map_or(CODEPOINT_COUNT, |p| p.codepoint as usize);
            for cp in point.codepoint as usize..end {
                if !joined.values(cp).eq(point.values.iter().map(String::as_str)) {
                    return Some(cp as u32);
                }
            }
        }

        None
    }

    pub fn to_text(&self) -> String {
        let mut buf = String::new();
        for point in &self.points {
            _ = write!(buf, "{:04X}", point.codepoint);
            for value in &point.values {
                buf.push(FIELD_SEPARATOR);
                buf.push_str(value);
            }
            buf.push_str(LINE_TERMINATOR);
        }
        buf
    }

    pub fn write_to(&self, w: &mut impl IoWrite) -> std::io::Result<()> {
        w.write_all(self.to_text().as_bytes())
    }

    /// Reads back the output of [`ChangePointTable::to_text`].
    pub fn parse(text: &str) -> apperr::Result<Self> {
        let mut width = 0;
        let mut points: Vec<ChangePoint> = Vec::new();

        for (idx, line) in text.split_inclusive('\n').enumerate() {
            let lineno = idx + 1;
            let Some(line) = line.strip_suffix(LINE_TERMINATOR) else {
                return Err(Error::malformed_table(lineno, "line not terminated by CRLF"));
            };

            let mut fields = line.split(FIELD_SEPARATOR);
            let hex = fields.next().unwrap_or_default();
            let codepoint = parse_table_codepoint(hex)
                .ok_or_else(|| Error::malformed_table(lineno, format!("bad codepoint {hex:?}")))?;
            let values: Vec<String> = fields.map(str::to_string).collect();

            if values.is_empty() || values.iter().any(String::is_empty) {
                return Err(Error::malformed_table(lineno, "missing values"));
            }
            match points.last() {
                None if codepoint != 0 => {
                    return Err(Error::malformed_table(lineno, "first record must be at 0000"));
                }
                None => width = values.len(),
                Some(_) if values.len() != width => {
                    return Err(Error::malformed_table(
                        lineno,
                        format!("expected {} values, found {}", width, values.len()),
                    ));
                }
                Some(prev) if prev.codepoint >= codepoint => {
                    return Err(Error::malformed_table(lineno, "codepoints out of order"));
                }
                Some(_) => {}
            }

            points.push(ChangePoint { codepoint, values });
        }

        if points.is_empty() {
            return Err(Error::malformed_table(0, "empty table"));
        }
        Ok(Self { width, points })
    }
}

impl<'a> IntoIterator for &'a ChangePointTable {
    type Item = &'a ChangePoint;
    type IntoIter = std::slice::Iter<'a, ChangePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn parse_table_codepoint(hex: &str) -> Option<u32> {
    if hex.len() < 4 || !hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'A'..=b'F')) {
        return None;
    }
    let cp = u32::from_str_radix(hex, 16).ok()?;
    ((cp as usize) < CODEPOINT_COUNT).then_some(cp)
}

/// Writes the table to `path`.
///
/// The contents go to a temporary file next to `path` first, which then
/// replaces `path`, so a failed run never leaves a truncated table behind.
/// The result has the permissions of the file it replaces, or those of any
/// newly created file if there was none.
pub fn write_table(table: &ChangePointTable, path: &Path) -> apperr::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    // Temporary files are 0600 by default. 0666 is subject to the umask,
    // same as for `File::create`.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut file = builder.tempfile_in(dir).map_err(|e| Error::from_write(path, e))?;
    if let Ok(existing) = std::fs::metadata(path) {
        let permissions = existing.permissions();
        file.as_file().set_permissions(permissions).map_err(|e| Error::from_write(path, e))?;
    }
    table.write_to(&mut file).map_err(|e| Error::from_write(path, e))?;
    file.persist(path).map_err(|e| Error::from_write(path, e.error))?;
    Ok(())
}
