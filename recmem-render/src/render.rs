use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use ab_glyph::FontVec;
use anyhow::{Context, Result, anyhow};
use image::RgbaImage;
use image::imageops::{self, FilterType};
use recmem_core::TextStim;
use string_cache::DefaultAtom as Atom;
use tiny_skia::{Color, IntSize, Pixmap, PixmapPaint, Transform};
use tracing::{debug, warn};

use crate::text::render_text_block;

/// Text wider than this fraction of the canvas is wrapped.
const WRAP_FRACTION: f32 = 0.9;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TextKey {
    content: Atom,
    size_px: u32,
    color: [u8; 4],
    wrap_px: u32,
}

/// Converts a straight-alpha image to a premultiplied pixmap of the given
/// size. The image is stretched to fit.
pub fn stimulus_pixmap(img: &RgbaImage, width: u32, height: u32) -> Result<Pixmap> {
    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| anyhow!("invalid stimulus size {width}x{height}"))?;
    let mut data = imageops::resize(img, width, height, FilterType::Triangle).into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }
    Pixmap::from_vec(data, size).ok_or_else(|| anyhow!("pixel buffer does not match size"))
}

/// Composes one frame at a time on an opaque white canvas.
///
/// Decoded stimuli and rasterized text are cached, so redrawing the same
/// screen only costs the blit.
pub struct Compositor {
    width: u32,
    height: u32,
    canvas: Pixmap,
    font: Option<FontVec>,
    text_cache: HashMap<TextKey, Arc<Pixmap>>,
    image_cache: HashMap<(Atom, u32), Arc<Pixmap>>,
}

impl Compositor {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mut compositor = Self {
            width,
            height,
            canvas: Self::blank_canvas(width, height)?,
            font: None,
            text_cache: HashMap::new(),
            image_cache: HashMap::new(),
        };
        compositor.clear();
        Ok(compositor)
    }

    pub fn with_font(mut self, font: FontVec) -> Self {
        self.font = Some(font);
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    fn blank_canvas(width: u32, height: u32) -> Result<Pixmap> {
        Pixmap::new(width, height).ok_or_else(|| anyhow!("invalid canvas size {width}x{height}"))
    }

    /// Sizes depend on the canvas height, so both caches are dropped.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.canvas = Self::blank_canvas(width, height)?;
        self.width = width;
        self.height = height;
        self.text_cache.clear();
        self.image_cache.clear();
        self.clear();
        debug!(width, height, "canvas resized");
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn clear(&mut self) {
        self.canvas.fill(Color::WHITE);
    }

    fn stimulus_side(&self, scale: f32) -> u32 {
        (scale * self.height as f32).round().max(1.0) as u32
    }

    /// Draws the image at `path` centred, as a square whose edge is `scale`
    /// times the canvas height.
    pub fn draw_image_file(&mut self, path: &Path, scale: f32) -> Result<()> {
        let side = self.stimulus_side(scale);
        let key = (Atom::from(path.to_string_lossy()), side);
        let pm = match self.image_cache.get(&key) {
            Some(pm) => Arc::clone(pm),
            None => {
                let img = image::open(path)
                    .with_context(|| format!("decoding {}", path.display()))?
                    .into_rgba8();
                let pm = Arc::new(stimulus_pixmap(&img, side, side)?);
                debug!(image = %path.display(), side, "stimulus decoded");
                self.image_cache.insert(key, Arc::clone(&pm));
                pm
            }
        };
        self.blit_centered(&pm, self.center());
        Ok(())
    }

    /// Like [`Compositor::draw_image_file`] for an image already in memory.
    pub fn draw_image(&mut self, img: &RgbaImage, scale: f32) -> Result<()> {
        let side = self.stimulus_side(scale);
        let pm = stimulus_pixmap(img, side, side)?;
        self.blit_centered(&pm, self.center());
        Ok(())
    }

    /// Draws `text` centred horizontally at its vertical position. Returns
    /// false when no font is loaded or nothing was drawn.
    pub fn draw_text(&mut self, text: &TextStim) -> bool {
        let Some(font) = &self.font else {
            warn!(text = %text.content, "no font loaded, text skipped");
            return false;
        };
        let h = self.height as f32;
        let key = TextKey {
            content: Atom::from(text.content.as_str()),
            size_px: (text.height * h).round().max(1.0) as u32,
            color: text.color,
            wrap_px: (self.width as f32 * WRAP_FRACTION) as u32,
        };
        let pm = match self.text_cache.get(&key) {
            Some(pm) => Arc::clone(pm),
            None => {
                let [r, g, b, a] = text.color;
                let Some(pm) = render_text_block(
                    &text.content,
                    key.size_px as f32,
                    font,
                    Color::from_rgba8(r, g, b, a),
                    key.wrap_px as f32,
                ) else {
                    return false;
                };
                let pm = Arc::new(pm);
                self.text_cache.insert(key, Arc::clone(&pm));
                pm
            }
        };
        let (cx, cy) = self.center();
        self.blit_centered(&pm, (cx, cy - text.pos_y * h));
        true
    }

    fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    fn blit_centered(&mut self, pm: &Pixmap, (cx, cy): (f32, f32)) {
        let x = (cx - pm.width() as f32 / 2.0).round() as i32;
        let y = (cy - pm.height() as f32 / 2.0).round() as i32;
        self.canvas
            .draw_pixmap(x, y, pm.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    }

    /// The current frame as RGBA8. The canvas is opaque, so premultiplied and
    /// straight alpha agree.
    pub fn frame(&self) -> &[u8] {
        self.canvas.data()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.canvas
            .pixel(x, y)
            .map(|p| [p.red(), p.green(), p.blue(), p.alpha()])
    }

    pub fn cached_images(&self) -> usize {
        self.image_cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    const WHITE: [u8; 4] = [255, 255, 255, 255];

    #[test]
    fn starts_white() {
        let c = Compositor::new(20, 10).unwrap();
        assert_eq!(c.frame().len(), 20 * 10 * 4);
        assert!(c.frame().chunks_exact(4).all(|p| p == WHITE));
    }

    #[test]
    fn zero_size_canvas_is_an_error() {
        assert!(Compositor::new(0, 10).is_err());
    }

    #[test]
    fn image_is_centred_and_scaled() {
        let mut c = Compositor::new(100, 100).unwrap();
        let red = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        c.draw_image(&red, 0.5).unwrap();
        assert_eq!(c.pixel(50, 50), Some([255, 0, 0, 255]));
        assert_eq!(c.pixel(26, 26), Some([255, 0, 0, 255]));
        assert_eq!(c.pixel(20, 50), Some(WHITE));
        assert_eq!(c.pixel(50, 80), Some(WHITE));
    }

    #[test]
    fn clear_blanks_the_frame() {
        let mut c = Compositor::new(30, 30).unwrap();
        let black = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        c.draw_image(&black, 1.0).unwrap();
        assert_eq!(c.pixel(0, 0), Some([0, 0, 0, 255]));
        c.clear();
        assert_eq!(c.pixel(0, 0), Some(WHITE));
    }

    #[test]
    fn premultiplies_alpha() {
        let half = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 128]));
        let pm = stimulus_pixmap(&half, 1, 1).unwrap();
        assert_eq!(pm.data(), &[128, 128, 128, 128]);
    }

    #[test]
    fn text_without_font_is_skipped() {
        let mut c = Compositor::new(40, 40).unwrap();
        assert!(!c.has_font());
        assert!(!c.draw_text(&TextStim::message("hello")));
        assert!(c.frame().chunks_exact(4).all(|p| p == WHITE));
    }

    #[test]
    fn image_files_are_decoded_once_per_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blue.png");
        RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 255]))
            .save(&path)
            .unwrap();

        let mut c = Compositor::new(64, 64).unwrap();
        c.draw_image_file(&path, 0.5).unwrap();
        c.draw_image_file(&path, 0.5).unwrap();
        assert_eq!(c.cached_images(), 1);
        assert_eq!(c.pixel(32, 32), Some([0, 0, 255, 255]));

        c.resize(32, 32).unwrap();
        assert_eq!(c.cached_images(), 0);
        assert_eq!(c.size(), (32, 32));
    }

    #[test]
    fn missing_image_file() {
        let mut c = Compositor::new(16, 16).unwrap();
        assert!(c.draw_image_file(Path::new("/no/such/image.png"), 0.3).is_err());
    }
}
