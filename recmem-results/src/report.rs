//! Summary files: one row of metrics per processed session.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use recmem_core::{Error, Result, SessionSummary};
use tracing::info;

/// Writes `summary` beside `source_table`, named after the current time.
pub fn store_summary(source_table: &Path, summary: &SessionSummary) -> Result<PathBuf> {
    let dir = source_table.parent().unwrap_or_else(|| Path::new("."));
    write_summary(dir, summary, Local::now())
}

pub fn write_summary(
    dir: &Path,
    summary: &SessionSummary,
    at: DateTime<Local>,
) -> Result<PathBuf> {
    let name = format!("{}_results.csv", at.format("%Y-%m-%d_%H-%M-%S%.6f"));
    let path = dir.join(name);
    let mut wtr = csv::Writer::from_path(&path).map_err(|e| Error::table(&path, e))?;
    wtr.serialize(summary).map_err(|e| Error::table(&path, e))?;
    wtr.flush()?;
    info!(path = %path.display(), "results saved");
    Ok(path)
}

pub fn read_summaries(path: &Path) -> Result<Vec<SessionSummary>> {
    let mut rdr = csv::Reader::from_path(path).map_err(|e| Error::table(path, e))?;
    rdr.deserialize()
        .map(|row| row.map_err(|e| Error::table(path, e)))
        .collect()
}
