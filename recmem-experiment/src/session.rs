//! Runs the study and test phases of every trial and writes their tables.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use recmem_core::{
    DisplaySurface, ResponseKeys, ResponseRecord, Result, SessionPhase, Stimulus,
    StimulusPresentationRecord, TextStim,
};
use recmem_results::{SessionLayout, StudyTable, TestTable};
use recmem_timing::Timer;
use tracing::info;

use crate::config::ExperimentConfig;
use crate::dataset::Partition;
use crate::presenter::{PresentationResult, present};
use crate::trial::TrialTiming;

const FAREWELL_HOLD: Duration = Duration::from_secs(3);
const KEY_WAIT_POLL: Duration = Duration::from_millis(1);

/// Where the last trial's tables were written.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub trial: u32,
    pub study_table: PathBuf,
    pub test_table: PathBuf,
}

pub struct SessionRunner<'a, D, T> {
    display: &'a mut D,
    timer: &'a mut T,
    subject: u32,
    seed: u64,
    trials: u32,
    timing: TrialTiming,
    keys: ResponseKeys,
    layout: SessionLayout,
    date: String,
}

impl<'a, D, T> SessionRunner<'a, D, T>
where
    D: DisplaySurface,
    T: Timer,
{
    pub fn new(
        display: &'a mut D,
        timer: &'a mut T,
        config: &ExperimentConfig,
        started_at: DateTime<Local>,
    ) -> Result<Self> {
        Ok(Self {
            display,
            timer,
            subject: config.subject,
            seed: config.seed,
            trials: config.trials,
            timing: config.timing()?,
            keys: config.response_keys(),
            layout: SessionLayout::new(&config.output_dir, config.subject, started_at.date_naive()),
            date: started_at.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
        })
    }

    /// Runs every trial on the same partition, then shows the farewell screen.
    pub fn run(&mut self, sets: &Partition<Stimulus>) -> Result<SessionOutcome> {
        let mut outcome = None;
        for trial in 1..=self.trials {
            self.show_message(&format!("Now starting the study phase of Trial: {trial}"))?;
            let study_table = self.run_study_phase(&sets.study, trial)?;
            self.show_message(&format!("End of study phase of Trial: {trial}"))?;

            self.show_message(&format!("Now starting the test phase of Trial: {trial}"))?;
            let test_table = self.run_test_phase(&sets.test, trial)?;
            self.show_message(&format!("End of test phase of Trial: {trial}"))?;

            outcome = Some(SessionOutcome {
                trial,
                study_table,
                test_table,
            });
        }
        self.farewell()?;
        outcome.ok_or_else(|| recmem_core::Error::invalid_input("trials", "must be at least 1"))
    }

    pub fn run_study_phase(&mut self, images: &[Stimulus], trial: u32) -> Result<PathBuf> {
        info!(trial, images = images.len(), "study phase");
        let mut records = Vec::with_capacity(images.len());
        for image in images {
            let result = present(
                &mut *self.display,
                &mut *self.timer,
                image,
                &self.timing,
                &self.keys,
                SessionPhase::Study,
            )?;
            if let PresentationResult::Study { start, end } = result {
                records.push(StimulusPresentationRecord {
                    image_id: image.name.clone(),
                    start_time: start,
                    end_time: end,
                    max_duration: self.timing.max_duration.as_secs_f64(),
                    delay: self.timing.delay.as_secs_f64(),
                });
            }
        }

        let table = StudyTable {
            subject_id: self.subject,
            date: self.date.clone(),
            seed: self.seed,
            valid_keys: self.keys.clone(),
            records,
        };
        let path = self.layout.prepare(trial, SessionPhase::Study)?;
        table.write(&path)?;
        Ok(path)
    }

    pub fn run_test_phase(&mut self, images: &[Stimulus], trial: u32) -> Result<PathBuf> {
        info!(trial, images = images.len(), "test phase");
        let mut records = Vec::with_capacity(images.len());
        for image in images {
            let result = present(
                &mut *self.display,
                &mut *self.timer,
                image,
                &self.timing,
                &self.keys,
                SessionPhase::Test,
            )?;
            if let PresentationResult::Test(entries) = result {
                records.push(ResponseRecord::new(image.name.clone(), entries));
            }
        }

        let table = TestTable {
            subject_id: self.subject,
            date: self.date.clone(),
            records,
        };
        let path = self.layout.prepare(trial, SessionPhase::Test)?;
        table.write(&path)?;
        Ok(path)
    }

    /// Shows a message until the participant presses any key.
    pub fn show_message(&mut self, text: &str) -> Result<()> {
        self.display.clear_events()?;
        self.display.draw_text(&TextStim::message(text))?;
        self.display.draw_text(&TextStim::continue_hint())?;
        self.display.flip()?;
        while self.display.poll_key()?.is_none() {
            self.timer.sleep(KEY_WAIT_POLL);
        }
        self.display.flip()
    }

    pub fn farewell(&mut self) -> Result<()> {
        self.display.draw_text(&TextStim::farewell())?;
        self.display.flip()?;
        self.timer.sleep(FAREWELL_HOLD);
        self.display.flip()
    }
}
