//! Signal-detection scoring of a test table.
//!
//! Each response entry becomes one `ScoredRow`. Only valid entries count:
//! invalid presses and the no-response sentinel are excluded from the four
//! outcome counts and from the reaction-time mean.

use std::collections::HashSet;

use recmem_core::{
    Classification, Error, ResponseRecord, Result, ScoredRow, SessionSummary, file_name,
};
use tracing::debug;

use crate::table::TestTable;

/// Explodes records into one row per response, tagged with study membership.
///
/// Membership compares file names, so a studied image is recognised wherever
/// its file lives.
pub fn explode<S: AsRef<str>>(records: &[ResponseRecord], study_images: &[S]) -> Vec<ScoredRow> {
    let studied: HashSet<&str> = study_images
        .iter()
        .map(|s| file_name(s.as_ref()))
        .collect();

    records
        .iter()
        .flat_map(|record| {
            let is_study_image = studied.contains(file_name(&record.image_id));
            record.entries().iter().map(move |entry| ScoredRow {
                image_id: record.image_id.clone(),
                response: entry.response.clone(),
                reaction_time: entry.reaction_time,
                validity: entry.validity,
                is_study_image,
                classification: Classification::of(&entry.response, entry.validity, is_study_image),
            })
        })
        .collect()
}

/// Outcome counts of a scored session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    pub hits: usize,
    pub false_alarms: usize,
    pub correct_rejections: usize,
    pub misses: usize,
    pub valid_reaction_times: Vec<f64>,
}

impl Tally {
    pub fn from_rows(rows: &[ScoredRow]) -> Self {
        let mut tally = Tally::default();
        for row in rows {
            match row.classification {
                Classification::Hit => tally.hits += 1,
                Classification::FalseAlarm => tally.false_alarms += 1,
                Classification::CorrectRejection => tally.correct_rejections += 1,
                Classification::Miss => tally.misses += 1,
                Classification::Invalid => {}
            }
            if let Some(rt) = row.valid_reaction_time() {
                tally.valid_reaction_times.push(rt);
            }
        }
        tally
    }

    /// Hits over all valid responses to studied images.
    pub fn hit_rate(&self) -> Result<f64> {
        ratio(self.hits, self.hits + self.misses, "hit rate").map(|r| round_to(r, 2))
    }

    /// False alarms over all valid responses to new images.
    pub fn false_alarm_rate(&self) -> Result<f64> {
        ratio(
            self.false_alarms,
            self.false_alarms + self.correct_rejections,
            "false alarm rate",
        )
        .map(|r| round_to(r, 2))
    }

    pub fn mean_reaction_time(&self) -> Result<f64> {
        if self.valid_reaction_times.is_empty() {
            return Err(Error::NoValidResponses);
        }
        let sum: f64 = self.valid_reaction_times.iter().sum();
        Ok(round_to(sum / self.valid_reaction_times.len() as f64, 4))
    }
}

fn ratio(num: usize, den: usize, rate: &'static str) -> Result<f64> {
    if den == 0 {
        return Err(Error::DivisionUndefined { rate });
    }
    Ok(num as f64 / den as f64)
}

/// Rounds to `places` decimals, exact ties to even.
pub fn round_to(x: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (x * scale).round_ties_even() / scale
}

/// Scores one test table against the study list it was built from.
pub fn score<S: AsRef<str>>(
    table: &TestTable,
    study_images: &[S],
    trial_number: u32,
) -> Result<SessionSummary> {
    let rows = explode(&table.records, study_images);
    let tally = Tally::from_rows(&rows);
    debug!(
        hits = tally.hits,
        false_alarms = tally.false_alarms,
        correct_rejections = tally.correct_rejections,
        misses = tally.misses,
        valid = tally.valid_reaction_times.len(),
        "session tallied"
    );

    Ok(SessionSummary {
        subject_id: table.subject_id,
        trial_number,
        hit_rate: tally.hit_rate()?,
        false_alarm_rate: tally.false_alarm_rate()?,
        mean_reaction_time: tally.mean_reaction_time()?,
    })
}
