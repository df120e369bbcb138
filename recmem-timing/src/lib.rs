pub mod manual;
pub mod timer;

pub use manual::ManualClock;
pub use timer::{HighPrecisionTimer, Timer};
