use std::path::Path;

use ab_glyph::{Font, FontVec, Glyph, PxScale, ScaleFont, point};
use anyhow::{Context, Result, anyhow};
use tiny_skia::{Color, Pixmap, PixmapPaint, PremultipliedColorU8, Transform};

/// Baseline-to-baseline distance as a multiple of the letter height.
const LINE_SPACING: f32 = 1.2;

pub fn load_font(path: &Path) -> Result<FontVec> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    FontVec::try_from_vec(bytes).map_err(|e| anyhow!("invalid font {}: {e}", path.display()))
}

fn line_width<F: Font>(font: &F, scale: PxScale, line: &str) -> f32 {
    let sf = font.as_scaled(scale);
    let mut width = 0.0;
    let mut prev = None;
    for ch in line.chars() {
        let id = font.glyph_id(ch);
        if let Some(p) = prev {
            width += sf.kern(p, id);
        }
        width += sf.h_advance(id);
        prev = Some(id);
    }
    width
}

/// Breaks `text` at whitespace so no line exceeds `max_width` pixels, unless
/// a single word is wider on its own. Explicit newlines are kept.
pub fn wrap_lines<F: Font>(font: &F, scale: PxScale, text: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if line_width(font, scale, &candidate) > max_width {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }
    lines
}

/// Rasterizes one line of text into a tight, transparent pixmap.
///
/// Returns `None` when nothing in the line has an outline (blank or
/// whitespace-only text).
pub fn render_text_pixmap<F: Font>(
    text: &str,
    font_size: f32,
    font: &F,
    color: Color,
) -> Option<Pixmap> {
    let scale = PxScale::from(font_size);
    let sf = font.as_scaled(scale);

    // Baseline at ascent.
    let mut pen_x = 0.0f32;
    let mut glyphs = Vec::<Glyph>::new();
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = glyphs.last() {
            pen_x += sf.kern(prev.id, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(pen_x, sf.ascent()),
        });
        pen_x += sf.h_advance(id);
    }

    let outlines: Vec<_> = glyphs
        .into_iter()
        .filter_map(|g| font.outline_glyph(g))
        .collect();
    if outlines.is_empty() {
        return None;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for out in &outlines {
        let b = out.px_bounds();
        min_x = min_x.min(b.min.x);
        min_y = min_y.min(b.min.y);
        max_x = max_x.max(b.max.x);
        max_y = max_y.max(b.max.y);
    }

    let w = (max_x.ceil() - min_x.floor()).max(1.0) as u32;
    let h = (max_y.ceil() - min_y.floor()).max(1.0) as u32;
    let mut pm = Pixmap::new(w, h)?;

    let stride = w as usize;
    let dst = pm.pixels_mut();
    let cu = color.to_color_u8();

    for out in &outlines {
        let b = out.px_bounds();
        out.draw(|x, y, cov| {
            if cov <= f32::EPSILON {
                return;
            }
            let ix = (x as f32 + b.min.x - min_x).floor() as i32;
            let iy = (y as f32 + b.min.y - min_y).floor() as i32;
            if ix < 0 || iy < 0 || ix >= w as i32 || iy >= h as i32 {
                return;
            }
            let i = iy as usize * stride + ix as usize;

            // Source premultiplied by coverage * alpha.
            let a_lin = (cov * cu.alpha() as f32 / 255.0).clamp(0.0, 1.0);
            let sr = (cu.red() as f32 * a_lin) as u8;
            let sg = (cu.green() as f32 * a_lin) as u8;
            let sb = (cu.blue() as f32 * a_lin) as u8;
            let sa = (a_lin * 255.0) as u8;

            // Source over destination, premultiplied.
            let bg = dst[i];
            let inv = 1.0 - (sa as f32 / 255.0);
            let r = sr.saturating_add((bg.red() as f32 * inv) as u8);
            let g = sg.saturating_add((bg.green() as f32 * inv) as u8);
            let b = sb.saturating_add((bg.blue() as f32 * inv) as u8);
            let a = sa.saturating_add((bg.alpha() as f32 * inv) as u8);
            if let Some(px) = PremultipliedColorU8::from_rgba(r, g, b, a) {
                dst[i] = px;
            }
        });
    }

    Some(pm)
}

/// Wraps and rasterizes `text`, centring each line horizontally in a
/// single pixmap.
pub fn render_text_block<F: Font>(
    text: &str,
    font_size: f32,
    font: &F,
    color: Color,
    max_width: f32,
) -> Option<Pixmap> {
    let scale = PxScale::from(font_size);
    let step = (font_size * LINE_SPACING).ceil() as u32;
    let lines: Vec<Option<Pixmap>> = wrap_lines(font, scale, text, max_width)
        .iter()
        .map(|line| render_text_pixmap(line, font_size, font, color))
        .collect();

    let width = lines.iter().flatten().map(Pixmap::width).max()?;
    let last_height = lines.last().and_then(|l| l.as_ref()).map_or(step, Pixmap::height);
    let height = step * (lines.len() as u32 - 1) + last_height.max(1);

    let mut block = Pixmap::new(width, height)?;
    for (row, line) in lines.iter().enumerate() {
        let Some(pm) = line else { continue };
        let x = ((width - pm.width()) / 2) as i32;
        let y = (row as u32 * step) as i32;
        block.draw_pixmap(x, y, pm.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    }
    Some(block)
}
