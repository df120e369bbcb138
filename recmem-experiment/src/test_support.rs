use std::collections::HashMap;

use recmem_core::{DisplaySurface, KeyPress, Result, Stimulus, TextStim};

#[derive(Debug, Clone, PartialEq)]
pub enum Drawn {
    Stimulus(String),
    Text(String),
}

type Responder = Box<dyn FnMut(&[Drawn], usize) -> Option<String>>;

/// A display that records what was drawn and answers polls from a script.
///
/// The responder sees the frame currently on screen and how many times the
/// key queue has been polled since that frame was flipped.
pub struct ScriptedDisplay {
    responder: Responder,
    back: Vec<Drawn>,
    pub shown: Vec<Drawn>,
    pub frames: Vec<Vec<Drawn>>,
    pub flips: usize,
    pub polls: usize,
    pub cleared: usize,
    polls_this_frame: usize,
}

impl ScriptedDisplay {
    pub fn new(responder: impl FnMut(&[Drawn], usize) -> Option<String> + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            back: Vec::new(),
            shown: Vec::new(),
            frames: Vec::new(),
            flips: 0,
            polls: 0,
            cleared: 0,
            polls_this_frame: 0,
        }
    }

    /// Keys delivered at fixed positions in the overall sequence of polls.
    pub fn at_polls(script: &[(usize, &str)]) -> Self {
        let script: HashMap<usize, String> =
            script.iter().map(|(i, k)| (*i, k.to_string())).collect();
        let mut total = 0usize;
        Self::new(move |_, _| {
            let key = script.get(&total).cloned();
            total += 1;
            key
        })
    }
}

impl DisplaySurface for ScriptedDisplay {
    fn draw_stimulus(&mut self, stimulus: &Stimulus) -> Result<()> {
        self.back.push(Drawn::Stimulus(stimulus.name.clone()));
        Ok(())
    }

    fn draw_text(&mut self, text: &TextStim) -> Result<()> {
        self.back.push(Drawn::Text(text.content.clone()));
        Ok(())
    }

    fn flip(&mut self) -> Result<()> {
        self.shown = std::mem::take(&mut self.back);
        self.frames.push(self.shown.clone());
        self.flips += 1;
        self.polls_this_frame = 0;
        Ok(())
    }

    fn clear_events(&mut self) -> Result<()> {
        self.cleared += 1;
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<KeyPress>> {
        let key = (self.responder)(&self.shown, self.polls_this_frame);
        self.polls += 1;
        self.polls_this_frame += 1;
        Ok(key.map(KeyPress::new))
    }
}
