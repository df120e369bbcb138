//! The `recmem score` command, and the metric report shared with `run`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use recmem_core::SessionSummary;
use recmem_results::{StudyTable, TestTable, score, store_summary};

use crate::console::{Style, styled};

pub fn execute(test: PathBuf, study: PathBuf, trial: Option<u32>, save: bool) -> Result<()> {
    let trial = match trial {
        Some(trial) => trial,
        None => trial_from_path(&test)?,
    };
    let summary = evaluate(&test, &study, trial)?;
    print_summary(&summary);

    if save {
        let path = store_summary(&test, &summary)?;
        println!("{}", styled(&format!("Saved {}", path.display()), Style::Success));
    }
    Ok(())
}

/// Scores a stored test table against the study table of the same trial.
pub fn evaluate(test: &Path, study: &Path, trial: u32) -> Result<SessionSummary> {
    let test_table = TestTable::load(test)?;
    let study_table = StudyTable::load(study)?;
    let summary = score(&test_table, &study_table.image_ids(), trial)
        .with_context(|| format!("scoring {}", test.display()))?;
    Ok(summary)
}

/// Session directories are numbered by trial.
fn trial_from_path(test: &Path) -> Result<u32> {
    test.parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .and_then(|name| name.parse().ok())
        .with_context(|| {
            format!("cannot infer the trial number from {}; pass --trial", test.display())
        })
}

pub fn print_summary(summary: &SessionSummary) {
    println!(
        "{}",
        styled(
            &format!(
                "Subject {}, trial {}",
                summary.subject_id, summary.trial_number
            ),
            Style::Heading
        )
    );
    println!("Hit rate: {:.2}", summary.hit_rate);
    println!("False alarm rate: {:.2}", summary.false_alarm_rate);
    println!("Mean reaction time: {:.4} s", summary.mean_reaction_time);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trial_comes_from_the_session_directory() {
        let path = Path::new("/results/3/2026-10-14/2/test_phase.csv");
        assert_eq!(trial_from_path(path).unwrap(), 2);
    }

    #[test]
    fn unnumbered_directory_needs_explicit_trial() {
        let err = trial_from_path(Path::new("/tmp/session/test_phase.csv")).unwrap_err();
        assert!(err.to_string().contains("--trial"));
    }
}
