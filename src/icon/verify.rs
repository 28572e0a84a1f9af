use std::path::Path;

use anyhow::{ensure, Context, Result};
use image::GenericImageView;
use tracing::debug;

use crate::png::{self, chunk};

/// Re-read a written icon and check it is a well-formed `size` x `size`
/// RGBA PNG: valid chunk CRCs, IHDR first, a single IDAT, empty IEND last,
/// and pixel data a standard decoder accepts.
pub fn verify_file(path: &Path, size: u32) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    verify_bytes(&data, size).with_context(|| format!("Invalid icon {}", path.display()))
}

pub fn verify_bytes(data: &[u8], size: u32) -> Result<()> {
    let chunks = png::read_chunks(data)?;
    ensure!(chunks.len() >= 3, "Expected at least 3 chunks, found {}", chunks.len());

    let header = png::read_header(data)?;
    ensure!(
        header.width == size && header.height == size,
        "Size mismatch: {}x{}, expected {}x{}",
        header.width,
        header.height,
        size,
        size
    );
    ensure!(
        header.is_rgba8(),
        "Not 8-bit RGBA: depth={} color_type={}",
        header.bit_depth,
        header.color_type
    );
    ensure!(header.interlace == 0, "Interlaced image");

    let idat_count = chunks.iter().filter(|c| c.tag == chunk::IDAT).count();
    ensure!(idat_count == 1, "Expected one IDAT, found {}", idat_count);

    let last = &chunks[chunks.len() - 1];
    ensure!(
        last.tag == chunk::IEND && last.data.is_empty(),
        "Stream does not end with an empty IEND: {}",
        last
    );

    let decoded = image::load_from_memory_with_format(data, image::ImageFormat::Png)
        .context("Decoder rejected image")?;
    let (width, height) = decoded.dimensions();
    ensure!(
        width == size && height == size,
        "Decoded size {}x{}, expected {}x{}",
        width,
        height,
        size,
        size
    );

    for c in &chunks {
        debug!("  {}", c);
    }
    Ok(())
}
