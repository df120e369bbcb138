pub mod error;
pub mod phase;
pub mod stimulus;
pub mod summary;
pub mod surface;
pub mod trial;

pub use error::{Error, Result};
pub use phase::SessionPhase;
pub use stimulus::{Stimulus, TextStim, file_name};
pub use summary::{Classification, ScoredRow, SessionSummary};
pub use surface::{DisplaySurface, KeyPress};
pub use trial::{
    Response, ResponseEntry, ResponseKeys, ResponseRecord, StimulusPresentationRecord, Validity,
};
