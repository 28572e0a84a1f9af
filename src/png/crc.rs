use crc::{Crc, CRC_32_ISO_HDLC};

const CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// CRC-32 over a chunk's type tag followed by its data, as PNG defines it.
pub fn chunk_crc(tag: &[u8; 4], data: &[u8]) -> u32 {
    let mut digest = CRC.digest();
    digest.update(tag);
    digest.update(data);
    digest.finalize()
}
