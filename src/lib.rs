// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builds `character_property_map.txt`: the East_Asian_Width, emoji and
//! Grapheme_Cluster_Break properties of every codepoint, stored as the list
//! of codepoints at which any of them changes.

use std::path::{Path, PathBuf};

pub mod apperr;
pub mod attribute;
pub mod join;
pub mod source;
pub mod table;

pub use attribute::{Attribute, CODEPOINT_COUNT};
pub use table::{ChangePoint, ChangePointTable};

/// An attribute and the file it is loaded from.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub path: PathBuf,
    pub attribute: Attribute,
}

impl SourceSpec {
    pub fn new(path: impl Into<PathBuf>, attribute: Attribute) -> Self {
        Self { path: path.into(), attribute }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub records: usize,
    pub compression_ratio: f64,
}

/// Loads each source in the given order, joins them and encodes the result.
/// The joined array is returned as well, for verification.
pub fn build_table(
    sources: &[SourceSpec],
) -> apperr::Result<(join::JoinedArray, ChangePointTable)> {
    let arrays = sources
        .iter()
        .map(|s| source::load_file(&s.path, s.attribute.clone()))
        .collect::<apperr::Result<Vec<_>>>()?;

    let joined = join::join(&arrays);
    drop(arrays);

    let table = table::encode(&joined);
    log::info!(
        "{} change points, {:.1} codepoints per record",
        table.len(),
        table.compression_ratio()
    );
    Ok((joined, table))
}

/// Runs the whole pipeline and writes the table to `output`.
///
/// # Panics
///
/// If the encoded table doesn't expand back into the joined array.
pub fn generate(sources: &[SourceSpec], output: &Path) -> apperr::Result<Summary> {
    let (joined, table) = build_table(sources)?;

    if let Some(cp) = table.find_mismatch(&joined) {
        panic!("change-point table sanity check failed for U+{cp:04X}");
    }

    table::write_table(&table, output)?;
    Ok(Summary { records: table.len(), compression_ratio: table.compression_ratio() })
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::apperr::Error;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_generate() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.txt", "0000..007F ; Halfwidth\n");
        let b = write(dir.path(), "b.txt", "0041..0042 ; Emoji\n");
        let out = dir.path().join("out.txt");

        let summary = generate(
            &[
                SourceSpec::new(a, Attribute::new("width", "Fullwidth")),
                SourceSpec::new(b, Attribute::new("emoji", "NonEmoji")),
            ],
            &out,
        )
        .unwrap();

        assert_eq!(summary.records, 4);
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "0000\tHalfwidth\tNonEmoji\r\n\
             0041\tHalfwidth\tEmoji\r\n\
             0043\tHalfwidth\tNonEmoji\r\n\
             0080\tFullwidth\tNonEmoji\r\n"
        );
    }

    #[test]
    fn test_standard_sources() {
        let dir = tempfile::tempdir().unwrap();
        let eaw = write(
            dir.path(),
            "EastAsianWidth.txt",
            indoc! {"
                # EastAsianWidth.txt
                0000..001F     ; N  # Cc    [32] <control-0000>..<control-001F>
                0020..007E     ; Na # Zs     [95] SPACE..TILDE
                00A1           ; A  # Po         INVERTED EXCLAMATION MARK
                1100..115F     ; W  # Lo    [96] HANGUL CHOSEONG KIYEOK..HANGUL CHOSEONG FILLER
            "},
        );
        let emoji = write(
            dir.path(),
            "emoji-data.txt",
            indoc! {"
                0023          ; Emoji                # E0.0   [1] (#️)       hash sign
                00A9          ; Extended_Pictographic# E0.6   [1] (©️)       copyright
                0023          ; Emoji_Component      # E0.0   [1] (#️)       hash sign
            "},
        );
        let gcb = write(
            dir.path(),
            "GraphemeBreakProperty.txt",
            indoc! {"
                000D          ; CR # Cc       <control-000D>
                000A          ; LF # Cc       <control-000A>
                1100..115F    ; L # Lo  [96] HANGUL CHOSEONG KIYEOK..HANGUL CHOSEONG FILLER
            "},
        );
        let out = dir.path().join("character_property_map.txt");
        let sources = [
            SourceSpec::new(eaw, Attribute::east_asian_width()),
            SourceSpec::new(emoji, Attribute::emoji()),
            SourceSpec::new(gcb, Attribute::grapheme_cluster_break()),
        ];

        generate(&sources, &out).unwrap();
        let first = std::fs::read(&out).unwrap();
        let table = ChangePointTable::parse(std::str::from_utf8(&first).unwrap()).unwrap();

        assert_eq!(table.lookup(0x0A).unwrap().values, ["N", "N", "LF"]);
        assert_eq!(table.lookup(0x23).unwrap().values, ["Na", "Emoji", "Other"]);
        assert_eq!(table.lookup(0xA9).unwrap().values, ["N", "Extended", "Other"]);
        assert_eq!(table.lookup(0xA1).unwrap().values, ["A", "N", "Other"]);
        assert_eq!(table.lookup(0x1150).unwrap().values, ["W", "N", "L"]);
        assert_eq!(table.lookup(0x10FFFF).unwrap().values, ["N", "N", "Other"]);

        // A second run over the same inputs must not change a single byte.
        generate(&sources, &out).unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), first);
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.txt", "0041 ; X\n");
        let missing = dir.path().join("missing.txt");
        let out = dir.path().join("out.txt");

        let err = generate(
            &[
                SourceSpec::new(a, Attribute::new("a", "D")),
                SourceSpec::new(&missing, Attribute::new("b", "D")),
            ],
            &out,
        )
        .unwrap_err();

        assert!(matches!(err, Error::SourceNotFound(ref p) if *p == missing));
        assert!(!out.exists());
    }

    #[test]
    fn test_malformed_source() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.txt", "0041 ; X\n12345678901 ; Y\n");

        let err = build_table(&[SourceSpec::new(a, Attribute::new("a", "D"))]).err().unwrap();
        assert!(matches!(err, Error::MalformedRecord { line: 2, .. }));
    }
}
