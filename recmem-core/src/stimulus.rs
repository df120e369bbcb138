use std::path::PathBuf;

use crate::trial::ResponseKeys;

/// An image stimulus, identified by its file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stimulus {
    pub path: PathBuf,
    pub name: String,
}

impl Stimulus {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = file_name(&path.to_string_lossy()).to_string();
        Self { path, name }
    }
}

/// Strips any directory part off a stored image path.
///
/// Both separators are accepted so that tables written on one platform score
/// the same on another.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// A block of text drawn on the display.
///
/// Position and height are in screen-height units: `(0.0, 0.0)` is the
/// centre, positive `pos_y` moves up, `height = 0.05` is 5% of the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStim {
    pub content: String,
    pub pos_y: f32,
    pub height: f32,
    pub color: [u8; 4],
}

const BLACK: [u8; 4] = [0, 0, 0, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

impl TextStim {
    pub fn new(content: impl Into<String>, pos_y: f32, height: f32, color: [u8; 4]) -> Self {
        Self {
            content: content.into(),
            pos_y,
            height,
            color,
        }
    }

    /// Centred message screen text.
    pub fn message(content: impl Into<String>) -> Self {
        Self::new(content, 0.0, 0.05, BLACK)
    }

    /// The hint shown under a message screen.
    pub fn continue_hint() -> Self {
        Self::new("Press any key to continue", -0.05, 0.03, BLACK)
    }

    pub fn farewell() -> Self {
        Self::message("End of trial. Thank you for participating.")
    }

    /// Key instructions drawn under each test-phase stimulus.
    pub fn instructions(keys: &ResponseKeys) -> Self {
        Self::new(
            format!(
                "On the keyboard, press '{}' for previously seen images and '{}' for new images",
                keys.old, keys.new
            ),
            -0.2,
            0.02,
            RED,
        )
    }
}
