//! Minimal PNG writer: 8-bit RGBA, one IDAT, no filtering, no interlace.

pub mod chunk;
pub mod crc;

use std::io::Write;

use anyhow::{ensure, Context, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;

pub use chunk::Chunk;
use chunk::{IDAT, IEND, IHDR};

/// Eight-byte magic at the start of every PNG stream.
pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

pub const BIT_DEPTH_8: u8 = 8;
pub const COLOR_TYPE_RGBA: u8 = 6;

/// Scanline filter type 0 ("None").
const FILTER_NONE: u8 = 0;

/// Contents of the IHDR chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub compression: u8,
    pub filter: u8,
    pub interlace: u8,
}

impl ImageHeader {
    pub fn rgba8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bit_depth: BIT_DEPTH_8,
            color_type: COLOR_TYPE_RGBA,
            compression: 0,
            filter: 0,
            interlace: 0,
        }
    }

    pub fn is_rgba8(&self) -> bool {
        self.bit_depth == BIT_DEPTH_8 && self.color_type == COLOR_TYPE_RGBA
    }

    pub fn to_chunk(&self) -> Chunk {
        let mut data = Vec::with_capacity(13);
        data.extend_from_slice(&self.width.to_be_bytes());
        data.extend_from_slice(&self.height.to_be_bytes());
        data.push(self.bit_depth);
        data.push(self.color_type);
        data.push(self.compression);
        data.push(self.filter);
        data.push(self.interlace);
        Chunk::new(IHDR, data)
    }

    pub fn from_chunk(chunk: &Chunk) -> Result<Self> {
        ensure!(
            chunk.tag == IHDR,
            "Expected IHDR, found {}",
            String::from_utf8_lossy(&chunk.tag)
        );
        let d = &chunk.data;
        ensure!(d.len() == 13, "IHDR must be 13 bytes, got {}", d.len());
        Ok(Self {
            width: u32::from_be_bytes([d[0], d[1], d[2], d[3]]),
            height: u32::from_be_bytes([d[4], d[5], d[6], d[7]]),
            bit_depth: d[8],
            color_type: d[9],
            compression: d[10],
            filter: d[11],
            interlace: d[12],
        })
    }
}

/// Encode a `width` x `height` RGBA buffer as a PNG stream.
///
/// Panics if `rgba.len() != width * height * 4`.
pub fn encode_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>> {
    let stride = width as usize * 4;
    assert_eq!(
        rgba.len(),
        stride * height as usize,
        "RGBA buffer does not match {}x{}",
        width,
        height
    );

    // Filter byte + raw row, per scanline
    let mut raw = Vec::with_capacity((stride + 1) * height as usize);
    for y in 0..height as usize {
        raw.push(FILTER_NONE);
        raw.extend_from_slice(&rgba[y * stride..(y + 1) * stride]);
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(&raw)
        .context("Failed to compress scanlines")?;
    let compressed = encoder.finish().context("Failed to finish zlib stream")?;

    let mut png = Vec::with_capacity(SIGNATURE.len() + compressed.len() + 3 * 12 + 13);
    png.extend_from_slice(&SIGNATURE);
    ImageHeader::rgba8(width, height).to_chunk().write_to(&mut png);
    Chunk::new(IDAT, compressed).write_to(&mut png);
    Chunk::new(IEND, Vec::new()).write_to(&mut png);
    Ok(png)
}

/// Check the signature and parse the chunk list of a PNG stream.
pub fn read_chunks(data: &[u8]) -> Result<Vec<Chunk>> {
    ensure!(
        data.len() >= SIGNATURE.len() && data[..SIGNATURE.len()] == SIGNATURE,
        "Missing PNG signature"
    );
    Chunk::parse_all(&data[SIGNATURE.len()..])
}

/// Read the IHDR of a PNG stream.
pub fn read_header(data: &[u8]) -> Result<ImageHeader> {
    let chunks = read_chunks(data)?;
    let first = chunks.first().context("PNG stream has no chunks")?;
    ImageHeader::from_chunk(first)
}
