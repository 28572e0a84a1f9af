pub mod verify;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::png;
use crate::raster::layout::TextLayout;
use crate::raster::{Canvas, Rgba};

/// #1976d2
pub const BACKGROUND: Rgba = Rgba::new(25, 118, 210, 255);
pub const FOREGROUND: Rgba = Rgba::new(255, 255, 255, 255);
pub const SHADOW: Rgba = Rgba::new(0, 0, 0, 110);

/// Blank columns between glyphs, in font cells.
pub const SPACING: i64 = 1;

/// One output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconSpec {
    /// File name inside the output directory.
    pub name: String,
    /// Width and height in pixels.
    pub size: u32,
    /// Safe-zone variant for OS crop masks. Only the padding differs.
    #[serde(default)]
    pub maskable: bool,
    /// Fraction of `size` kept clear on every side, in [0, 1).
    pub pad_ratio: f64,
}

impl IconSpec {
    pub fn new(name: &str, size: u32, maskable: bool, pad_ratio: f64) -> Self {
        Self {
            name: name.into(),
            size,
            maskable,
            pad_ratio,
        }
    }
}

/// The PWA, iOS and favicon set.
pub fn default_icons() -> Vec<IconSpec> {
    vec![
        // PWA
        IconSpec::new("icon-192.png", 192, false, 0.18),
        IconSpec::new("icon-192-maskable.png", 192, true, 0.28),
        IconSpec::new("icon-512.png", 512, false, 0.16),
        IconSpec::new("icon-512-maskable.png", 512, true, 0.26),
        // iOS home screen
        IconSpec::new("apple-touch-icon.png", 180, false, 0.20),
        // Favicons
        IconSpec::new("favicon-32.png", 32, false, 0.10),
        IconSpec::new("favicon-16.png", 16, false, 0.05),
    ]
}

/// Rasterize one icon: background, drop shadow, then the text on top.
pub fn render_icon(spec: &IconSpec, text: &str) -> Canvas {
    let mut canvas = Canvas::new(spec.size, BACKGROUND);
    let layout = TextLayout::fit(spec.size, spec.pad_ratio, text.chars().count(), SPACING);
    debug!(
        "{}: pad={} scale={} origin=({}, {}) block={}x{}",
        spec.name, layout.pad, layout.scale, layout.x, layout.y, layout.width, layout.height
    );

    let off = layout.shadow_offset();
    canvas.draw_text(text, layout.scale, layout.x + off, layout.y + off, SHADOW, SPACING);
    canvas.draw_text(text, layout.scale, layout.x, layout.y, FOREGROUND, SPACING);
    canvas
}

/// Render and PNG-encode one icon.
pub fn encode_icon(spec: &IconSpec, text: &str) -> Result<Vec<u8>> {
    let canvas = render_icon(spec, text);
    png::encode_rgba(spec.size, spec.size, canvas.as_bytes())
        .with_context(|| format!("Failed to encode {}", spec.name))
}

/// Size, variant, scale and byte count of one written icon.
fn describe(spec: &IconSpec, text: &str, len: usize) -> String {
    let scale = TextLayout::fit(spec.size, spec.pad_ratio, text.chars().count(), SPACING).scale;
    format!(
        "{}x{}{}, scale {}, {} bytes",
        spec.size,
        spec.size,
        if spec.maskable { ", maskable" } else { "" },
        scale,
        len
    )
}

/// Write every icon into `out_dir`, creating it if needed.
/// Returns the written paths in input order.
pub fn generate_all(out_dir: &Path, text: &str, icons: &[IconSpec]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(icons.len());
    for spec in icons {
        let bytes = encode_icon(spec, text)?;
        let path = out_dir.join(&spec.name);
        std::fs::write(&path, &bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {} ({})", path.display(), describe(spec, text, bytes.len()));
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "FFHL";

    fn spec(size: u32, pad_ratio: f64) -> IconSpec {
        IconSpec::new("test.png", size, false, pad_ratio)
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pwa-icons-{}-{}", tag, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_favicon_16_corner() {
        let canvas = render_icon(&spec(16, 0.05), TEXT);
        assert_eq!(canvas.as_bytes().len(), 1024);
        assert_eq!(canvas.pixel(0, 0), BACKGROUND);
        // Last column of the clipped first F
        assert_eq!(canvas.pixel(0, 4), FOREGROUND);
    }

    #[test]
    fn test_shadow_fringe_visible() {
        let canvas = render_icon(&spec(192, 0.18), TEXT);
        assert_eq!(canvas.pixel(38, 78), FOREGROUND);
        // Below the top bar of the first F, where only the shadow reaches
        assert_eq!(canvas.pixel(50, 83), SHADOW);
    }

    #[test]
    fn test_untouched_pixels_are_background() {
        for icon in default_icons() {
            let canvas = render_icon(&icon, TEXT);
            let layout = TextLayout::fit(icon.size, icon.pad_ratio, TEXT.len(), SPACING);
            let off = layout.shadow_offset();
            let (x0, y0) = (layout.x, layout.y);
            let (x1, y1) = (x0 + layout.width + off, y0 + layout.height + off);

            for y in 0..icon.size {
                for x in 0..icon.size {
                    let (xi, yi) = (x as i64, y as i64);
                    if xi >= x0 && xi < x1 && yi >= y0 && yi < y1 {
                        continue;
                    }
                    assert_eq!(canvas.pixel(x, y), BACKGROUND, "{} at ({x}, {y})", icon.name);
                }
            }
        }
    }

    #[test]
    fn test_only_palette_colors() {
        let canvas = render_icon(&spec(180, 0.20), TEXT);
        let palette = [BACKGROUND, FOREGROUND, SHADOW].map(Rgba::to_array);
        assert!(canvas
            .as_bytes()
            .chunks_exact(4)
            .all(|px| palette.iter().any(|c| px == c)));
    }

    #[test]
    fn test_tiny_canvas() {
        let canvas = render_icon(&spec(4, 0.9), TEXT);
        assert_eq!(canvas.as_bytes().len(), 4 * 4 * 4);
    }

    #[test]
    fn test_header_matches_size() {
        for icon in default_icons() {
            let bytes = encode_icon(&icon, TEXT).unwrap();
            let header = png::read_header(&bytes).unwrap();
            assert_eq!((header.width, header.height), (icon.size, icon.size));
            assert!(header.is_rgba8());
        }
    }

    #[test]
    fn test_decode_reencode_identical() {
        let icon = spec(32, 0.10);
        let bytes = encode_icon(&icon, TEXT).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.as_raw(), render_icon(&icon, TEXT).as_bytes());

        let again = png::encode_rgba(decoded.width(), decoded.height(), decoded.as_raw()).unwrap();
        assert_eq!(bytes, again);
    }

    #[test]
    fn test_describe_reports_scale() {
        let icons = default_icons();
        assert_eq!(describe(&icons[0], TEXT, 1234), "192x192, scale 5, 1234 bytes");
        assert_eq!(
            describe(&icons[3], TEXT, 99),
            "512x512, maskable, scale 10, 99 bytes"
        );
    }

    #[test]
    fn test_generate_all_writes_files() {
        let dir = temp_dir("generate");
        let icons = default_icons();
        let written = generate_all(&dir, TEXT, &icons).unwrap();

        assert_eq!(written.len(), icons.len());
        for (path, icon) in written.iter().zip(&icons) {
            assert_eq!(path, &dir.join(&icon.name));
            assert!(path.is_file());
        }
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_generate_all_deterministic() {
        let first = temp_dir("determinism-a");
        let second = temp_dir("determinism-b");
        let icons = default_icons();
        generate_all(&first, TEXT, &icons).unwrap();
        generate_all(&second, TEXT, &icons).unwrap();

        for icon in &icons {
            let a = std::fs::read(first.join(&icon.name)).unwrap();
            let b = std::fs::read(second.join(&icon.name)).unwrap();
            assert_eq!(a, b, "{}", icon.name);
        }
        let _ = std::fs::remove_dir_all(&first);
        let _ = std::fs::remove_dir_all(&second);
    }

    #[test]
    fn test_generate_all_unwritable_target() {
        let dir = temp_dir("blocked");
        std::fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("file");
        std::fs::write(&blocker, b"x").unwrap();

        // A regular file where the output directory should be
        let result = generate_all(&blocker.join("icons"), TEXT, &default_icons());
        assert!(result.is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
