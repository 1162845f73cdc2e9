//! Binary header probing.

use trfscope_transform_model::{HeaderInfo, HEADER_LEN, TRF_MAGIC};

use crate::decode::read_u32_le;

/// Attempt to read the fixed binary header from the front of the buffer.
///
/// Fails soft: a buffer shorter than the header or a magic mismatch
/// yields `None` and the caller proceeds without header diagnostics.
/// The decoded fields are advisory only; in particular the advertised
/// frame count must never gate decoding.
pub fn probe_header(buffer: &[u8]) -> Option<HeaderInfo> {
    if buffer.len() < HEADER_LEN {
        return None;
    }
    if buffer[..4] != TRF_MAGIC {
        return None;
    }

    Some(HeaderInfo {
        magic: TRF_MAGIC,
        version: read_u32_le(buffer, 4)?,
        advertised_frame_count: read_u32_le(buffer, 8)?,
        advertised_data_size: read_u32_le(buffer, 12)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(version: u32, frames: u32, data_size: u32) -> Vec<u8> {
        let mut buffer = TRF_MAGIC.to_vec();
        buffer.extend_from_slice(&version.to_le_bytes());
        buffer.extend_from_slice(&frames.to_le_bytes());
        buffer.extend_from_slice(&data_size.to_le_bytes());
        buffer
    }

    #[test]
    fn probe_decodes_little_endian_fields() {
        let buffer = header_bytes(1, 16514, 396_336);
        let header = probe_header(&buffer).unwrap();
        assert_eq!(header.magic, TRF_MAGIC);
        assert_eq!(header.version, 1);
        assert_eq!(header.advertised_frame_count, 16514);
        assert_eq!(header.advertised_data_size, 396_336);
    }

    #[test]
    fn probe_fails_soft_on_short_buffer() {
        assert!(probe_header(b"TRF1").is_none());
        assert!(probe_header(&[]).is_none());
    }

    #[test]
    fn probe_fails_soft_on_magic_mismatch() {
        let mut buffer = header_bytes(1, 3, 72);
        buffer[0] = b'X';
        assert!(probe_header(&buffer).is_none());
    }
}
