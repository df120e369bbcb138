use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a keypress was one of the two response keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Validity {
    Yes,
    No,
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Yes)
    }
}

/// What a single keypress meant.
///
/// Stored as text: `"old"`, `"new"`, `"None"` for the no-response sentinel,
/// or the raw key name of an invalid press.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Response {
    Old,
    New,
    NoResponse,
    Key(String),
}

impl Response {
    pub fn as_str(&self) -> &str {
        match self {
            Response::Old => "old",
            Response::New => "new",
            Response::NoResponse => "None",
            Response::Key(k) => k,
        }
    }
}

impl From<String> for Response {
    fn from(s: String) -> Self {
        match s.as_str() {
            "old" => Response::Old,
            "new" => Response::New,
            "None" => Response::NoResponse,
            _ => Response::Key(s),
        }
    }
}

impl From<Response> for String {
    fn from(r: Response) -> Self {
        match r {
            Response::Key(k) => k,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two keys a participant answers with during the test phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseKeys {
    pub old: String,
    pub new: String,
}

impl ResponseKeys {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }

    /// Maps a key name to its response, `None` when the key is not a response key.
    pub fn classify(&self, key: &str) -> Option<Response> {
        if key == self.old {
            Some(Response::Old)
        } else if key == self.new {
            Some(Response::New)
        } else {
            None
        }
    }

    pub fn as_vec(&self) -> Vec<String> {
        vec![self.old.clone(), self.new.clone()]
    }
}

/// One recorded keypress (or the no-response sentinel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEntry {
    pub response: Response,
    /// Seconds since stimulus onset; `-1.0` for the sentinel.
    pub reaction_time: f64,
    pub validity: Validity,
}

impl ResponseEntry {
    pub fn valid(response: Response, reaction_time: f64) -> Self {
        Self {
            response,
            reaction_time,
            validity: Validity::Yes,
        }
    }

    pub fn invalid(key: impl Into<String>, reaction_time: f64) -> Self {
        Self {
            response: Response::Key(key.into()),
            reaction_time,
            validity: Validity::No,
        }
    }

    pub fn sentinel() -> Self {
        Self {
            response: Response::NoResponse,
            reaction_time: -1.0,
            validity: Validity::No,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.response == Response::NoResponse
    }
}

/// Timing of one study-phase stimulus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulusPresentationRecord {
    pub image_id: String,
    pub start_time: f64,
    pub end_time: f64,
    pub max_duration: f64,
    pub delay: f64,
}

/// Every keypress recorded while one test-phase stimulus was on screen.
///
/// Holds at least one entry: a trial without any keypress carries the
/// sentinel `("None", -1, No)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRecord {
    pub image_id: String,
    entries: Vec<ResponseEntry>,
}

impl ResponseRecord {
    pub fn new(image_id: impl Into<String>, mut entries: Vec<ResponseEntry>) -> Self {
        if entries.is_empty() {
            entries.push(ResponseEntry::sentinel());
        }
        Self {
            image_id: image_id.into(),
            entries,
        }
    }

    /// Rebuilds a record from its three parallel columns.
    ///
    /// Returns `None` when the columns differ in length.
    pub fn from_parallel(
        image_id: impl Into<String>,
        responses: Vec<Response>,
        reaction_times: Vec<f64>,
        validity_flags: Vec<Validity>,
    ) -> Option<Self> {
        if responses.len() != reaction_times.len() || responses.len() != validity_flags.len() {
            return None;
        }
        let entries = responses
            .into_iter()
            .zip(reaction_times)
            .zip(validity_flags)
            .map(|((response, reaction_time), validity)| ResponseEntry {
                response,
                reaction_time,
                validity,
            })
            .collect();
        Some(Self::new(image_id, entries))
    }

    pub fn entries(&self) -> &[ResponseEntry] {
        &self.entries
    }

    pub fn responses(&self) -> Vec<Response> {
        self.entries.iter().map(|e| e.response.clone()).collect()
    }

    pub fn reaction_times(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.reaction_time).collect()
    }

    pub fn validity_flags(&self) -> Vec<Validity> {
        self.entries.iter().map(|e| e.validity).collect()
    }

    /// Number of keypresses, zero when the participant never pressed a key.
    pub fn response_count(&self) -> usize {
        if self.entries.iter().any(ResponseEntry::is_sentinel) {
            0
        } else {
            self.entries.len()
        }
    }
}
