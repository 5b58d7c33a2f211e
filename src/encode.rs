//! PlantUML text encoding for URL transport.
//!
//! The markup is raw-deflate compressed and then transcoded with PlantUML's
//! own 64-character alphabet (`0-9A-Za-z-_`), three bytes to four characters.
//! The result is URL-safe as-is.

use anyhow::Result;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::Write;

/// Encode diagram markup into the compact token the rendering service
/// accepts in its URL path
pub fn encode_diagram(markup: &str) -> Result<String> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(markup.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(encode64(&compressed))
}

/// Transcode bytes with the PlantUML base64 alphabet. Incomplete trailing
/// groups are zero-padded, matching the reference encoder.
pub fn encode64(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);

    for chunk in data.chunks(3) {
        let b1 = chunk[0];
        let b2 = chunk.get(1).copied().unwrap_or(0);
        let b3 = chunk.get(2).copied().unwrap_or(0);

        out.push(encode6bit(b1 >> 2));
        out.push(encode6bit(((b1 & 0x3) << 4) | (b2 >> 4)));
        out.push(encode6bit(((b2 & 0xF) << 2) | (b3 >> 6)));
        out.push(encode6bit(b3 & 0x3F));
    }

    out
}

fn encode6bit(b: u8) -> char {
    match b {
        0..=9 => (b'0' + b) as char,
        10..=35 => (b'A' + b - 10) as char,
        36..=61 => (b'a' + b - 36) as char,
        62 => '-',
        63 => '_',
        _ => '?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::DeflateDecoder;
    use std::io::Read;

    #[test]
    fn test_encode6bit_alphabet() {
        assert_eq!(encode6bit(0), '0');
        assert_eq!(encode6bit(9), '9');
        assert_eq!(encode6bit(10), 'A');
        assert_eq!(encode6bit(35), 'Z');
        assert_eq!(encode6bit(36), 'a');
        assert_eq!(encode6bit(61), 'z');
        assert_eq!(encode6bit(62), '-');
        assert_eq!(encode6bit(63), '_');
    }

    #[test]
    fn test_encode64() {
        assert_eq!(encode64(b""), "");
        assert_eq!(encode64(b"ABC"), "GK93");
        // Trailing groups are padded to four characters
        assert_eq!(encode64(&[0]), "0000");
        assert_eq!(encode64(&[255, 255, 255]), "____");
    }

    #[test]
    fn test_encoded_diagram_is_url_safe() {
        let markup = "@startuml\nentity users\n@enduml\n";
        let token = encode_diagram(markup).unwrap();

        assert!(!token.is_empty());
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_deflate_payload_decodes_back() {
        let markup = "@startuml\ntable( Users, users ) {\n  pkey( id ): INT\n}\n@enduml\n";

        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(markup.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut decoder = DeflateDecoder::new(compressed.as_slice());
        let mut restored = String::new();
        decoder.read_to_string(&mut restored).unwrap();

        assert_eq!(restored, markup);
    }
}
