use std::path::PathBuf;

use chrono::NaiveDate;
use recmem_core::{Result, SessionPhase};
use tracing::info;

/// Where one subject's session files go:
/// `<root>/<subject>/<YYYY-MM-DD>/<trial>/<phase>.csv`.
#[derive(Debug, Clone)]
pub struct SessionLayout {
    root: PathBuf,
    subject: u32,
    date: NaiveDate,
}

impl SessionLayout {
    pub fn new(root: impl Into<PathBuf>, subject: u32, date: NaiveDate) -> Self {
        Self {
            root: root.into(),
            subject,
            date,
        }
    }

    /// Directory of a trial; `trial` is 1-based.
    pub fn trial_dir(&self, trial: u32) -> PathBuf {
        self.root
            .join(self.subject.to_string())
            .join(self.date.format("%Y-%m-%d").to_string())
            .join(trial.to_string())
    }

    pub fn table_path(&self, trial: u32, phase: SessionPhase) -> PathBuf {
        self.trial_dir(trial)
            .join(format!("{}.csv", phase.table_stem()))
    }

    /// Creates the trial directory if needed and returns the table path.
    pub fn prepare(&self, trial: u32, phase: SessionPhase) -> Result<PathBuf> {
        let dir = self.trial_dir(trial);
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
            info!(dir = %dir.display(), "created session directory");
        }
        Ok(self.table_path(trial, phase))
    }
}
