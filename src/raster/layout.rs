use super::font::{GLYPH_HEIGHT, GLYPH_WIDTH};

/// Placement of a line of 5x7 text inside a square canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayout {
    /// Border reserved on every side, in pixels.
    pub pad: i64,
    /// Pixels per font cell, always at least 1.
    pub scale: i64,
    /// Top-left of the first glyph. May be negative when the text cannot fit.
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl TextLayout {
    /// Pick the largest integer scale at which `len` glyphs fit inside the
    /// padded area, then center the block.
    ///
    /// Centering floors the half-difference, so an odd remainder shifts the
    /// text one pixel up/left, and text wider than the area starts at a
    /// negative offset rounded away from zero.
    pub fn fit(size: u32, pad_ratio: f64, len: usize, spacing: i64) -> Self {
        let size = size as i64;
        let len = len.max(1) as i64;

        let pad = (size as f64 * pad_ratio) as i64;
        let available = (size - 2 * pad).max(1);

        let width_units = len * GLYPH_WIDTH + (len - 1) * spacing;
        let max_scale_w = (available / width_units).max(1);
        let max_scale_h = (available / GLYPH_HEIGHT).max(1);
        let scale = max_scale_w.min(max_scale_h).max(1);

        let width = width_units * scale;
        let height = GLYPH_HEIGHT * scale;

        Self {
            pad,
            scale,
            x: pad + (available - width).div_euclid(2),
            y: pad + (available - height).div_euclid(2),
            width,
            height,
        }
    }

    /// Down-right offset of the drop shadow.
    pub fn shadow_offset(&self) -> i64 {
        (self.scale / 4).max(1)
    }
}
