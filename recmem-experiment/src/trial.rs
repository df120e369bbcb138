use std::time::Duration;

use recmem_core::{Error, Result};

/// How long a stimulus stays up and how long the blank screen after it lasts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialTiming {
    pub max_duration: Duration,
    pub delay: Duration,
}

impl TrialTiming {
    pub fn new(max_duration: Duration, delay: Duration) -> Self {
        Self {
            max_duration,
            delay,
        }
    }

    pub fn from_secs(max_duration: f64, delay: f64) -> Result<Self> {
        let max_duration = Duration::try_from_secs_f64(max_duration)
            .map_err(|e| Error::invalid_input("presentation time", e.to_string()))?;
        let delay = Duration::try_from_secs_f64(delay)
            .map_err(|e| Error::invalid_input("delay", e.to_string()))?;
        Ok(Self::new(max_duration, delay))
    }
}
