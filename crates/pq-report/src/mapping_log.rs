//! Mapping-log CSV export.

use std::path::{Path, PathBuf};

use pq_map::MappingLogEntry;
use tracing::info;

use crate::error::{ReportError, Result};

/// Writes `target,source,index` rows in log order.
pub fn write_mapping_log(entries: &[MappingLogEntry], path: &Path) -> Result<PathBuf> {
    let file = std::fs::File::create(path).map_err(|e| ReportError::write(path, e))?;
    let mut writer = csv::Writer::from_writer(file);
    for entry in entries {
        writer.serialize(entry)?;
    }
    if entries.is_empty() {
        writer.write_record(["target", "source", "index"])?;
    }
    writer.flush().map_err(|e| ReportError::write(path, e))?;
    info!(path = %path.display(), entries = entries.len(), "wrote mapping log");
    Ok(path.to_path_buf())
}
