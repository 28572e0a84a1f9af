pub mod font;
pub mod layout;

use font::{GLYPH_HEIGHT, GLYPH_WIDTH};

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Square RGBA pixel buffer, row-major, 4 bytes per pixel.
///
/// Coordinates passed to the drawing routines are signed and may fall
/// outside the canvas; anything out of bounds is clipped.
#[derive(Debug, Clone)]
pub struct Canvas {
    size: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Create a `size` x `size` canvas filled with `background`.
    pub fn new(size: u32, background: Rgba) -> Self {
        let pixels = background.to_array().repeat(size as usize * size as usize);
        Self { size, pixels }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Read back the pixel at (`x`, `y`). Panics when out of bounds.
    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        assert!(x < self.size && y < self.size, "pixel ({x}, {y}) out of bounds");
        let i = ((y * self.size + x) * 4) as usize;
        Rgba::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        )
    }

    /// Overwrite the half-open rectangle [x0, x1) x [y0, y1) with `color`.
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgba) {
        let size = self.size as i64;
        let (x0, x1) = (x0.max(0), x1.min(size));
        let (y0, y1) = (y0.max(0), y1.min(size));
        if x1 <= x0 || y1 <= y0 {
            return;
        }

        let rgba = color.to_array();
        for y in y0..y1 {
            let row = (y * size) as usize;
            for x in x0..x1 {
                let i = (row + x as usize) * 4;
                self.pixels[i..i + 4].copy_from_slice(&rgba);
            }
        }
    }

    /// Draw `text` with the 5x7 font, top-left of the first glyph at (`x`, `y`).
    ///
    /// Each lit cell becomes a `scale` x `scale` square. The cursor advances
    /// `(5 + spacing) * scale` per character; characters missing from the
    /// font leave a blank cell.
    pub fn draw_text(&mut self, text: &str, scale: i64, x: i64, y: i64, color: Rgba, spacing: i64) {
        let advance = (GLYPH_WIDTH + spacing) * scale;
        let mut cx = x;
        for ch in text.chars() {
            if let Some(glyph) = font::glyph(ch) {
                for gy in 0..GLYPH_HEIGHT {
                    for gx in 0..GLYPH_WIDTH {
                        if !font::is_set(glyph, gx as usize, gy as usize) {
                            continue;
                        }
                        let px = cx + gx * scale;
                        let py = y + gy * scale;
                        self.fill_rect(px, py, px + scale, py + scale, color);
                    }
                }
            }
            cx += advance;
        }
    }
}
