//! Per-phase session tables.
//!
//! One CSV row per stimulus. The list-valued columns of the test table
//! (`Responses`, `Reaction Time`, `Valid Response`) hold JSON arrays, as does
//! the study table's `Valid Keys`.

use std::path::Path;

use recmem_core::{
    Error, Response, ResponseKeys, ResponseRecord, Result, StimulusPresentationRecord, Validity,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
struct StudyRow {
    #[serde(rename = "Subject ID")]
    subject_id: u32,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Seed")]
    seed: u64,
    #[serde(rename = "Valid Keys")]
    valid_keys: String,
    #[serde(rename = "Image")]
    image: String,
    #[serde(rename = "Start")]
    start: f64,
    #[serde(rename = "End")]
    end: f64,
    #[serde(rename = "Exp. Timing")]
    exp_timing: f64,
    #[serde(rename = "Delay")]
    delay: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct TestRow {
    #[serde(rename = "Subject ID")]
    subject_id: u32,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Image")]
    image: String,
    #[serde(rename = "Reaction Time")]
    reaction_time: String,
    #[serde(rename = "Responses")]
    responses: String,
    #[serde(rename = "Number of Responses")]
    response_count: usize,
    #[serde(rename = "Valid Response")]
    valid_response: String,
}

/// Study-phase table of one trial.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyTable {
    pub subject_id: u32,
    pub date: String,
    pub seed: u64,
    pub valid_keys: ResponseKeys,
    pub records: Vec<StimulusPresentationRecord>,
}

impl StudyTable {
    /// File names of the studied images, in presentation order.
    pub fn image_ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.image_id.as_str()).collect()
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let keys = serde_json::to_string(&self.valid_keys.as_vec())?;
        let mut wtr = csv::Writer::from_path(path).map_err(|e| Error::table(path, e))?;
        for r in &self.records {
            wtr.serialize(StudyRow {
                subject_id: self.subject_id,
                date: self.date.clone(),
                seed: self.seed,
                valid_keys: keys.clone(),
                image: r.image_id.clone(),
                start: r.start_time,
                end: r.end_time,
                exp_timing: r.max_duration,
                delay: r.delay,
            })
            .map_err(|e| Error::table(path, e))?;
        }
        wtr.flush()?;
        info!(path = %path.display(), rows = self.records.len(), "study table written");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mut rdr = csv::Reader::from_path(path).map_err(|e| Error::table(path, e))?;
        let mut head: Option<(u32, String, u64, ResponseKeys)> = None;
        let mut records = Vec::new();
        for row in rdr.deserialize::<StudyRow>() {
            let row = row.map_err(|e| Error::table(path, e))?;
            if head.is_none() {
                let keys: Vec<String> = serde_json::from_str(&row.valid_keys)
                    .map_err(|e| Error::table(path, format!("Valid Keys: {e}")))?;
                let [old, new] = <[String; 2]>::try_from(keys)
                    .map_err(|_| Error::table(path, "Valid Keys must hold two keys"))?;
                head = Some((row.subject_id, row.date.clone(), row.seed, ResponseKeys { old, new }));
            }
            records.push(StimulusPresentationRecord {
                image_id: row.image,
                start_time: row.start,
                end_time: row.end,
                max_duration: row.exp_timing,
                delay: row.delay,
            });
        }
        let (subject_id, date, seed, valid_keys) =
            head.ok_or_else(|| Error::table(path, "table has no rows"))?;
        Ok(Self {
            subject_id,
            date,
            seed,
            valid_keys,
            records,
        })
    }
}

/// Test-phase table of one trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TestTable {
    pub subject_id: u32,
    pub date: String,
    pub records: Vec<ResponseRecord>,
}

impl TestTable {
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path).map_err(|e| Error::table(path, e))?;
        for r in &self.records {
            wtr.serialize(TestRow {
                subject_id: self.subject_id,
                date: self.date.clone(),
                image: r.image_id.clone(),
                reaction_time: serde_json::to_string(&r.reaction_times())?,
                responses: serde_json::to_string(&r.responses())?,
                response_count: r.response_count(),
                valid_response: serde_json::to_string(&r.validity_flags())?,
            })
            .map_err(|e| Error::table(path, e))?;
        }
        wtr.flush()?;
        info!(path = %path.display(), rows = self.records.len(), "test table written");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mut rdr = csv::Reader::from_path(path).map_err(|e| Error::table(path, e))?;
        let mut head: Option<(u32, String)> = None;
        let mut records = Vec::new();
        for row in rdr.deserialize::<TestRow>() {
            let row = row.map_err(|e| Error::table(path, e))?;
            if head.is_none() {
                head = Some((row.subject_id, row.date.clone()));
            }
            let responses: Vec<Response> = parse_cell(path, "Responses", &row.responses)?;
            let times: Vec<f64> = parse_cell(path, "Reaction Time", &row.reaction_time)?;
            let validity: Vec<Validity> = parse_cell(path, "Valid Response", &row.valid_response)?;
            if responses.is_empty() {
                return Err(Error::table(path, format!("{}: empty response cells", row.image)));
            }
            let record = ResponseRecord::from_parallel(row.image.clone(), responses, times, validity)
                .ok_or_else(|| {
                    Error::table(path, format!("{}: response columns differ in length", row.image))
                })?;
            if record.response_count() != row.response_count {
                return Err(Error::table(
                    path,
                    format!(
                        "{}: Number of Responses is {} but {} were recorded",
                        row.image,
                        row.response_count,
                        record.response_count()
                    ),
                ));
            }
            records.push(record);
        }
        let (subject_id, date) = head.ok_or_else(|| Error::table(path, "table has no rows"))?;
        Ok(Self {
            subject_id,
            date,
            records,
        })
    }
}

fn parse_cell<T: serde::de::DeserializeOwned>(path: &Path, column: &str, cell: &str) -> Result<T> {
    serde_json::from_str(cell).map_err(|e| Error::table(path, format!("{column}: {e}")))
}
