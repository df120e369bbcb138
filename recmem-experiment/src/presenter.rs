//! The timing and response-capture loop run once per stimulus.

use recmem_core::{
    DisplaySurface, ResponseEntry, ResponseKeys, Result, SessionPhase, Stimulus, TextStim,
};
use recmem_timing::Timer;
use tracing::{debug, trace};

use crate::trial::TrialTiming;

#[derive(Debug, Clone, PartialEq)]
pub enum PresentationResult {
    /// Onset and offset of a study stimulus, in seconds on the trial clock.
    Study { start: f64, end: f64 },
    /// Every keypress of a test stimulus; never empty.
    Test(Vec<ResponseEntry>),
}

/// Shows `stimulus` until `timing.max_duration` elapses or, in the test
/// phase, until a response key is pressed. The screen is then blanked for
/// `timing.delay`.
///
/// Each loop iteration checks the timeout first and then consults the first
/// pending key. A key seen in the iteration that times out is still
/// recorded. Keys other than the two response keys are recorded as invalid
/// and do not end the trial.
pub fn present<D, T>(
    display: &mut D,
    timer: &mut T,
    stimulus: &Stimulus,
    timing: &TrialTiming,
    keys: &ResponseKeys,
    phase: SessionPhase,
) -> Result<PresentationResult>
where
    D: DisplaySurface,
    T: Timer,
{
    display.clear_events()?;
    timer.reset();

    display.draw_stimulus(stimulus)?;
    if phase.shows_instructions() {
        display.draw_text(&TextStim::instructions(keys))?;
    }
    display.flip()?;
    let start = timer.now_secs();
    debug!(image = %stimulus.name, t = start, "is presented");

    let mut end = start;
    let mut entries = Vec::new();
    let mut presenting = true;
    while presenting {
        if timer.now() >= timing.max_duration {
            display.flip()?;
            end = timer.now_secs();
            debug!(image = %stimulus.name, t = end, "done presenting");
            presenting = false;
        }

        let Some(press) = display.poll_key()? else {
            continue;
        };
        if !phase.collects_responses() {
            trace!(key = %press.key, "key ignored during study");
            continue;
        }
        let rt = timer.now_secs();
        match keys.classify(&press.key) {
            Some(response) => {
                debug!(image = %stimulus.name, %response, rt, "valid response");
                entries.push(ResponseEntry::valid(response, rt));
                presenting = false;
            }
            None => {
                debug!(image = %stimulus.name, key = %press.key, rt, "invalid key");
                entries.push(ResponseEntry::invalid(press.key, rt));
            }
        }
    }

    display.flip()?;
    debug!(t = timer.now_secs(), "blank screen");
    timer.sleep(timing.delay);

    Ok(match phase {
        SessionPhase::Study => PresentationResult::Study { start, end },
        SessionPhase::Test => {
            if entries.is_empty() {
                entries.push(ResponseEntry::sentinel());
            }
            PresentationResult::Test(entries)
        }
    })
}
