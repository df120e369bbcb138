use serde::{Deserialize, Serialize};

use crate::trial::{Response, Validity};

/// Signal-detection outcome of one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// "old" to a studied image.
    Hit,
    /// "old" to a new image.
    FalseAlarm,
    /// "new" to a new image.
    CorrectRejection,
    /// "new" to a studied image.
    Miss,
    /// Not a valid response; excluded from every count.
    Invalid,
}

impl Classification {
    pub fn of(response: &Response, validity: Validity, is_study_image: bool) -> Self {
        if !validity.is_valid() {
            return Classification::Invalid;
        }
        match (response, is_study_image) {
            (Response::Old, true) => Classification::Hit,
            (Response::Old, false) => Classification::FalseAlarm,
            (Response::New, false) => Classification::CorrectRejection,
            (Response::New, true) => Classification::Miss,
            _ => Classification::Invalid,
        }
    }
}

/// One response entry of a test table, annotated for scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRow {
    pub image_id: String,
    pub response: Response,
    pub reaction_time: f64,
    pub validity: Validity,
    pub is_study_image: bool,
    pub classification: Classification,
}

impl ScoredRow {
    /// Reaction time counted towards the mean, `None` for invalid rows.
    pub fn valid_reaction_time(&self) -> Option<f64> {
        self.validity.is_valid().then_some(self.reaction_time)
    }
}

/// Metrics of one processed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    #[serde(rename = "Subject ID")]
    pub subject_id: u32,
    #[serde(rename = "Trial")]
    pub trial_number: u32,
    #[serde(rename = "Hit Ratio")]
    pub hit_rate: f64,
    #[serde(rename = "False Alarm Ratio")]
    pub false_alarm_rate: f64,
    #[serde(rename = "Average RT (sec)")]
    pub mean_reaction_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_table() {
        use Classification::*;
        let yes = Validity::Yes;
        assert_eq!(Classification::of(&Response::Old, yes, true), Hit);
        assert_eq!(Classification::of(&Response::Old, yes, false), FalseAlarm);
        assert_eq!(Classification::of(&Response::New, yes, false), CorrectRejection);
        assert_eq!(Classification::of(&Response::New, yes, true), Miss);
    }

    #[test]
    fn invalid_rows_never_count() {
        let c = Classification::of(&Response::Old, Validity::No, true);
        assert_eq!(c, Classification::Invalid);
        let sentinel = Classification::of(&Response::NoResponse, Validity::No, false);
        assert_eq!(sentinel, Classification::Invalid);
    }
}
