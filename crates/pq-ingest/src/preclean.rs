//! Raw export repair.
//!
//! Instrument exports contain decimal literals without a leading zero
//! (`,5`, `-,5`), escaped minus signs and empty cells. Each line is repaired
//! with a fixed sequence of substitutions and written as UTF-8 to a separate
//! file so the original stays untouched.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::encoding::{SourceEncoding, decode};
use crate::error::{IngestError, Result};

static NEGATIVE_MISSING_ZERO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\t)-,").expect("valid regex"));
static POSITIVE_MISSING_ZERO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\t),").expect("valid regex"));
static EMPTY_CELL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\t\t").expect("valid regex"));

/// Passes of the empty-cell substitution; each pass fills every other gap
/// of a run of empty cells.
const EMPTY_CELL_PASSES: usize = 3;

/// Counters reported by [`preclean_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrecleanStats {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub total_lines: usize,
    pub lines_modified: usize,
    /// Lines containing U+FFFD after decoding.
    pub encoding_errors: usize,
    pub source_encoding: SourceEncoding,
}

/// Applies every repair to one line, line terminator included.
pub fn clean_line(line: &str) -> String {
    let mut cleaned = line.replace(" \\- ", "-").replace("\\-", "-");
    cleaned = replace_all(&NEGATIVE_MISSING_ZERO, cleaned, "${1}-0,");
    cleaned = replace_all(&POSITIVE_MISSING_ZERO, cleaned, "${1}0,");
    for _ in 0..EMPTY_CELL_PASSES {
        cleaned = replace_all(&EMPTY_CELL, cleaned, "\t0,0\t");
    }
    cleaned
}

fn replace_all(pattern: &Regex, text: String, replacement: &str) -> String {
    match pattern.replace_all(&text, replacement) {
        Cow::Borrowed(_) => text,
        Cow::Owned(replaced) => replaced,
    }
}

/// `<stem>_clean.txt` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "export".into(), |s| s.to_string_lossy());
    input.with_file_name(format!("{stem}_clean.txt"))
}

/// Writes a repaired UTF-8 copy of `input` to `output`.
pub fn preclean_file(input: &Path, output: &Path) -> Result<PrecleanStats> {
    info!(input = %input.display(), output = %output.display(), "pre-cleaning export");
    let bytes = fs::read(input).map_err(|e| IngestError::read(input, e))?;
    let (text, source_encoding) = decode(&bytes);

    let write_err = |source| IngestError::FileWrite {
        path: output.to_path_buf(),
        source,
    };
    let file = File::create(output).map_err(write_err)?;
    let mut writer = BufWriter::new(file);

    let mut stats = PrecleanStats {
        input_file: input.to_path_buf(),
        output_file: output.to_path_buf(),
        total_lines: 0,
        lines_modified: 0,
        encoding_errors: 0,
        source_encoding,
    };
    for line in text.split_inclusive('\n') {
        stats.total_lines += 1;
        if line.contains('\u{FFFD}') {
            stats.encoding_errors += 1;
        }
        let cleaned = clean_line(line);
        if cleaned != line {
            stats.lines_modified += 1;
        }
        writer.write_all(cleaned.as_bytes()).map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;

    if stats.encoding_errors > 0 {
        warn!(
            lines = stats.encoding_errors,
            encoding = source_encoding.label(),
            "lines with undecodable bytes"
        );
    }
    info!(
        total_lines = stats.total_lines,
        lines_modified = stats.lines_modified,
        encoding = source_encoding.label(),
        "pre-cleaning complete"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaped_minus_is_unescaped() {
        assert_eq!(clean_line("a \\- b"), "a-b");
        assert_eq!(clean_line("\\-5,0"), "-5,0");
    }

    #[test]
    fn missing_leading_zero_is_restored() {
        assert_eq!(clean_line(",5\t-,25\t1,0\n"), "0,5\t-0,25\t1,0\n");
        assert_eq!(clean_line("x\t,75"), "x\t0,75");
    }

    #[test]
    fn comma_inside_value_is_untouched() {
        assert_eq!(clean_line("230,5\t-1,25"), "230,5\t-1,25");
    }

    #[test]
    fn empty_cells_are_filled() {
        assert_eq!(clean_line("a\t\tb"), "a\t0,0\tb");
        assert_eq!(clean_line("a\t\t\tb"), "a\t0,0\t0,0\tb");
        assert_eq!(clean_line("a\t\t\t\t\tb"), "a\t0,0\t0,0\t0,0\t0,0\tb");
    }

    #[test]
    fn default_output_is_next_to_input() {
        assert_eq!(
            default_output_path(Path::new("/data/meranie.txt")),
            PathBuf::from("/data/meranie_clean.txt")
        );
    }
}
