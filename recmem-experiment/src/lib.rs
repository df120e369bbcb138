pub mod config;
pub mod dataset;
pub mod presenter;
pub mod session;
pub mod trial;

#[cfg(test)]
mod test_support;

pub use config::{DisplayConfig, ExperimentConfig};
pub use dataset::{Partition, discover_images, partition};
pub use presenter::{PresentationResult, present};
pub use session::{SessionOutcome, SessionRunner};
pub use trial::TrialTiming;
