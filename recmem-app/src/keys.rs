use std::collections::VecDeque;

use recmem_core::KeyPress;

/// Key presses collected between two polls of the display.
#[derive(Debug, Default)]
pub struct KeyQueue {
    pending: VecDeque<KeyPress>,
}

impl KeyQueue {
    pub fn push(&mut self, key: KeyPress) {
        self.pending.push_back(key);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// The earliest pending press. Everything after it is dropped, so one
    /// poll yields at most one key.
    pub fn take_first(&mut self) -> Option<KeyPress> {
        let first = self.pending.pop_front();
        self.pending.clear();
        first
    }
}
