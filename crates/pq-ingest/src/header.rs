//! Header row reading and quick file statistics.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;

use crate::encoding::decode;
use crate::error::{IngestError, Result};

/// Splits a header line on TAB after removing a leading BOM and the line
/// terminator. No other trimming is applied.
pub fn split_header_line(line: &str) -> Vec<String> {
    let line = line
        .trim_start_matches('\u{feff}')
        .trim_end_matches(['\r', '\n']);
    line.split('\t').map(str::to_string).collect()
}

/// Reads the first line of a tab-separated export.
pub fn read_header(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| IngestError::read(path, e))?;
    let mut reader = BufReader::new(file);
    let mut line = Vec::new();
    reader
        .read_until(b'\n', &mut line)
        .map_err(|e| IngestError::read(path, e))?;

    let (text, _) = decode(&line);
    if text.trim_start_matches('\u{feff}').trim().is_empty() {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    let headers = split_header_line(&text);
    tracing::debug!(path = %path.display(), columns = headers.len(), "read header");
    Ok(headers)
}

/// Size and shape estimate used to pick a load strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FileInfo {
    pub size_bytes: u64,
    pub size_mb: f64,
    /// Line count minus the header.
    pub estimated_rows: usize,
    pub estimated_cols: usize,
}

/// Counts lines and header fields without parsing any values.
pub fn estimate_file_info(path: &Path) -> Result<FileInfo> {
    let size_bytes = std::fs::metadata(path)
        .map_err(|e| IngestError::read(path, e))?
        .len();
    let file = File::open(path).map_err(|e| IngestError::read(path, e))?;
    let mut reader = BufReader::new(file);

    let mut lines = 0usize;
    let mut estimated_cols = 0usize;
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        let read = reader
            .read_until(b'\n', &mut buffer)
            .map_err(|e| IngestError::read(path, e))?;
        if read == 0 {
            break;
        }
        if lines == 0 {
            let (text, _) = decode(&buffer);
            estimated_cols = split_header_line(&text).len();
        }
        lines += 1;
    }

    let size_mb = size_bytes as f64 / 1024.0 / 1024.0;
    Ok(FileInfo {
        size_bytes,
        size_mb,
        estimated_rows: lines.saturating_sub(1),
        estimated_cols,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_line_keeps_empty_and_padded_cells() {
        assert_eq!(
            split_header_line("\u{feff}Dátum\t Čas \t\r\n"),
            ["Dátum", " Čas ", ""]
        );
    }
}
