// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::{Path, PathBuf};
use std::{error, fmt, io, result};

pub type Result<T> = result::Result<T, Error>;

// Remember to add an entry to `Error::fmt()` for each new variant.
#[derive(Debug)]
pub enum Error {
    /// An attribute source does not exist.
    SourceNotFound(PathBuf),
    /// Reading a source or writing the table failed.
    Io { path: PathBuf, err: io::Error },
    /// A line has the shape of a range record, but its codepoints are unusable.
    MalformedRecord { origin: PathBuf, line: usize, text: String, reason: &'static str },
    /// An attribute has more distinct values than a `ValueId` can address.
    TooManyValues { attribute: String },
    /// A serialized change-point table could not be parsed back.
    MalformedTable { line: usize, reason: String },
}

impl Error {
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Error::SourceNotFound(path.to_path_buf()),
            _ => Error::Io { path: path.to_path_buf(), err },
        }
    }

    /// Same as [`Error::from_io`], but never maps to [`Error::SourceNotFound`].
    /// Used on the output side where a missing directory isn't a missing source.
    pub fn from_write(path: &Path, err: io::Error) -> Self {
        Error::Io { path: path.to_path_buf(), err }
    }

    pub fn malformed_table(line: usize, reason: impl Into<String>) -> Self {
        Error::MalformedTable { line, reason: reason.into() }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::SourceNotFound(path) => {
                write!(f, "source file not found: {}", path.display())
            }
            Error::Io { path, err } => write!(f, "{}: {}", path.display(), err),
            Error::MalformedRecord { origin, line, text, reason } => {
                write!(f, "{}:{}: {}: {:?}", origin.display(), line, reason, text)
            }
            Error::TooManyValues { attribute } => {
                write!(f, "too many distinct values for attribute {attribute}")
            }
            Error::MalformedTable { line, reason } => {
                write!(f, "malformed table at line {line}: {reason}")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io { err, .. } => Some(err),
            _ => None,
        }
    }
}
