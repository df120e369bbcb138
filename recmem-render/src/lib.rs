pub mod render;
pub mod text;

pub use render::{Compositor, stimulus_pixmap};
pub use text::{load_font, render_text_block, render_text_pixmap, wrap_lines};
