//! Classification of TRF inputs as text or binary.

use std::io::Read;
use std::path::Path;

use trfscope_common::TrfResult;

/// 4-byte ASCII magic tag at the start of binary TRF files.
pub const TRF_MAGIC: [u8; 4] = *b"TRF1";

/// How many bytes of the input the sniffer inspects.
const SNIFF_PREFIX_LEN: usize = 512;

/// Result of sniffing an input file.
///
/// `Unknown` is a best-effort fallback: callers route it to the binary
/// decode path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrfFormat {
    /// UTF-8 line-oriented transform data.
    Text,
    /// Binary TRF data starting with the magic tag.
    Binary,
    /// Neither signature recognized.
    Unknown,
}

/// Classify a byte prefix as text or binary TRF data.
///
/// The magic tag wins outright; otherwise the first line must decode as
/// UTF-8 and be empty, a `#` comment, or digit-leading to classify as
/// text. Anything else is `Unknown`.
pub fn sniff_bytes(prefix: &[u8]) -> TrfFormat {
    if prefix.len() >= 4 && prefix[..4] == TRF_MAGIC {
        return TrfFormat::Binary;
    }

    let line_end = prefix
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(prefix.len());

    match std::str::from_utf8(&prefix[..line_end]) {
        Ok(line) => {
            let line = line.trim_end_matches('\r');
            let first = line.chars().next();
            match first {
                None => TrfFormat::Text,
                Some('#') => TrfFormat::Text,
                Some(c) if c.is_ascii_digit() => TrfFormat::Text,
                Some(_) => TrfFormat::Unknown,
            }
        }
        Err(_) => TrfFormat::Unknown,
    }
}

/// Classify a file on disk by peeking at its prefix. Read-only, no side
/// effects.
pub fn sniff_path(path: &Path) -> TrfResult<TrfFormat> {
    let mut file = std::fs::File::open(path)?;
    let mut prefix = [0u8; SNIFF_PREFIX_LEN];
    let n = file.read(&mut prefix)?;
    Ok(sniff_bytes(&prefix[..n]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_classifies_as_binary() {
        let mut buffer = b"TRF1".to_vec();
        buffer.extend_from_slice(&[0u8; 32]);
        assert_eq!(sniff_bytes(&buffer), TrfFormat::Binary);
    }

    #[test]
    fn comment_line_classifies_as_text() {
        assert_eq!(sniff_bytes(b"# VidStab transform data\n0 1 2 3\n"), TrfFormat::Text);
    }

    #[test]
    fn digit_leading_line_classifies_as_text() {
        assert_eq!(sniff_bytes(b"0 1.0 2.0 0.1\n"), TrfFormat::Text);
    }

    #[test]
    fn empty_input_classifies_as_text() {
        assert_eq!(sniff_bytes(b""), TrfFormat::Text);
    }

    #[test]
    fn non_utf8_prefix_classifies_as_unknown() {
        assert_eq!(sniff_bytes(&[0xff, 0xfe, 0x00]), TrfFormat::Unknown);
    }

    #[test]
    fn alpha_leading_line_classifies_as_unknown() {
        assert_eq!(sniff_bytes(b"hello world\n"), TrfFormat::Unknown);
    }

    #[test]
    fn sniff_path_peeks_at_file_prefix() {
        let path = std::env::temp_dir().join(format!("trfscope-sniff-{}.trf", std::process::id()));
        std::fs::write(&path, b"TRF1\x01\x00\x00\x00").unwrap();
        assert_eq!(sniff_path(&path).unwrap(), TrfFormat::Binary);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn short_binary_prefix_classifies_as_unknown() {
        // Shorter than the magic tag, not valid UTF-8.
        assert_eq!(sniff_bytes(&[0xc3, 0x28]), TrfFormat::Unknown);
    }
}
