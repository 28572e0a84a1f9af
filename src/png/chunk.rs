use anyhow::{bail, ensure, Result};

use super::crc::chunk_crc;

pub const IHDR: [u8; 4] = *b"IHDR";
pub const IDAT: [u8; 4] = *b"IDAT";
pub const IEND: [u8; 4] = *b"IEND";

/// A single PNG chunk.
///
/// Wire format:
/// ```text
/// [length: 4 bytes BE] [tag: 4 bytes] [data: `length` bytes] [CRC32: 4 bytes BE]
/// ```
///
/// The CRC covers tag + data, not the length field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub tag: [u8; 4],
    pub data: Vec<u8>,
}

impl Chunk {
    pub fn new(tag: [u8; 4], data: Vec<u8>) -> Self {
        Self { tag, data }
    }

    /// Append the serialized chunk to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.reserve(12 + self.data.len());
        out.extend_from_slice(&(self.data.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&self.data);
        out.extend_from_slice(&chunk_crc(&self.tag, &self.data).to_be_bytes());
    }

    #[cfg(test)]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(12 + self.data.len());
        self.write_to(&mut out);
        out
    }

    /// Parse one chunk from the front of `data`, validating its CRC.
    /// Returns the chunk and the number of bytes consumed.
    pub fn from_bytes_checked(data: &[u8]) -> Result<(Self, usize)> {
        ensure!(data.len() >= 12, "Chunk too short: {} bytes", data.len());

        let length = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
        let tag = [data[4], data[5], data[6], data[7]];
        let end = 8 + length;
        if end + 4 > data.len() {
            bail!(
                "Chunk overflows stream: tag={}, len={}, available={}",
                String::from_utf8_lossy(&tag),
                length,
                data.len()
            );
        }

        let body = &data[8..end];
        let stored = u32::from_be_bytes([data[end], data[end + 1], data[end + 2], data[end + 3]]);
        let computed = chunk_crc(&tag, body);
        ensure!(
            computed == stored,
            "CRC mismatch in {}: computed {:08X}, expected {:08X}",
            String::from_utf8_lossy(&tag),
            computed,
            stored
        );

        Ok((Self::new(tag, body.to_vec()), end + 4))
    }

    /// Parse every chunk in a stream that follows the PNG signature.
    pub fn parse_all(mut data: &[u8]) -> Result<Vec<Self>> {
        let mut chunks = Vec::new();
        while !data.is_empty() {
            let (chunk, used) = Self::from_bytes_checked(data)?;
            data = &data[used..];
            chunks.push(chunk);
        }
        Ok(chunks)
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} bytes)",
            String::from_utf8_lossy(&self.tag),
            self.data.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iend_wire_format() {
        let bytes = Chunk::new(IEND, Vec::new()).to_bytes();
        assert_eq!(
            bytes,
            [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn test_roundtrip() {
        let chunk = Chunk::new(IDAT, vec![1, 2, 3, 4, 5]);
        let bytes = chunk.to_bytes();
        let (parsed, used) = Chunk::from_bytes_checked(&bytes).unwrap();
        assert_eq!(parsed, chunk);
        assert_eq!(used, bytes.len());
    }

    #[test]
    fn test_crc_validation_fails_on_corrupt() {
        let mut bytes = Chunk::new(IDAT, vec![9, 9, 9]).to_bytes();
        bytes[9] ^= 0xFF;
        assert!(Chunk::from_bytes_checked(&bytes).is_err());
    }

    #[test]
    fn test_truncated_chunk() {
        let bytes = Chunk::new(IDAT, vec![0; 32]).to_bytes();
        assert!(Chunk::from_bytes_checked(&bytes[..20]).is_err());
        assert!(Chunk::from_bytes_checked(&bytes[..8]).is_err());
    }

    #[test]
    fn test_parse_all() {
        let mut stream = Vec::new();
        Chunk::new(IHDR, vec![0; 13]).write_to(&mut stream);
        Chunk::new(IDAT, vec![7; 4]).write_to(&mut stream);
        Chunk::new(IEND, Vec::new()).write_to(&mut stream);

        let chunks = Chunk::parse_all(&stream).unwrap();
        let tags: Vec<_> = chunks.iter().map(|c| c.tag).collect();
        assert_eq!(tags, [IHDR, IDAT, IEND]);
    }
}
