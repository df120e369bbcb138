use crate::error::Result;
use crate::stimulus::{Stimulus, TextStim};

/// A keyboard event as the presenter sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    /// Lowercase key name: the character for printable keys, otherwise a
    /// name such as `"space"` or `"escape"`.
    pub key: String,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// The capability set the experiment needs from a display toolkit.
///
/// Drawing goes to a back buffer; `flip` presents it and starts the next
/// frame blank, so flipping without drawing blanks the screen.
pub trait DisplaySurface {
    fn draw_stimulus(&mut self, stimulus: &Stimulus) -> Result<()>;
    fn draw_text(&mut self, text: &TextStim) -> Result<()>;
    fn flip(&mut self) -> Result<()>;

    /// Discards every pending keyboard event.
    fn clear_events(&mut self) -> Result<()>;

    /// Returns the first keyboard event since the previous poll and discards
    /// any others that arrived alongside it.
    fn poll_key(&mut self) -> Result<Option<KeyPress>>;
}
