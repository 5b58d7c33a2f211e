//! Unit tests for encoding markup and addressing the rendering service.

use sql_uml::encode::{encode64, encode_diagram};
use sql_uml::render::{diagram_url, DEFAULT_PLANTUML_URL};
use sql_uml::uml::Format;

mod encode_tests {
    use super::*;
    use flate2::read::DeflateDecoder;
    use std::io::Read;

    #[test]
    fn test_encode64_reference_vectors() {
        assert_eq!(encode64(b"ABC"), "GK93");
        assert_eq!(encode64(&[0]), "0000");
        assert_eq!(encode64(&[255, 255, 255]), "____");
    }

    #[test]
    fn test_token_is_raw_deflate() {
        let markup = "@startuml\n\ntable( Users, users ) {\n  pkey( id ): INT(11)\n}\n\n@enduml\n";
        let token = encode_diagram(markup).unwrap();

        // Decode the alphabet back to bytes and inflate
        let mut bytes = Vec::new();
        for chunk in token.as_bytes().chunks(4) {
            let vals: Vec<u8> = chunk.iter().map(|&c| decode6bit(c)).collect();
            bytes.push((vals[0] << 2) | (vals[1] >> 4));
            bytes.push((vals[1] << 4) | (vals[2] >> 2));
            bytes.push((vals[2] << 6) | vals[3]);
        }
        // Padding bytes past the end of the stream are ignored by the decoder
        let mut decoder = DeflateDecoder::new(bytes.as_slice());
        let mut restored = String::new();
        decoder.read_to_string(&mut restored).unwrap();
        assert_eq!(restored, markup);
    }

    fn decode6bit(c: u8) -> u8 {
        match c {
            b'0'..=b'9' => c - b'0',
            b'A'..=b'Z' => c - b'A' + 10,
            b'a'..=b'z' => c - b'a' + 36,
            b'-' => 62,
            b'_' => 63,
            _ => panic!("unexpected character in token: {}", c as char),
        }
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = encode_diagram("@startuml\n@enduml\n").unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}

mod url_tests {
    use super::*;

    #[test]
    fn test_diagram_url_layout() {
        let url = diagram_url(DEFAULT_PLANTUML_URL, Format::Png, "GK93");
        assert_eq!(url, "http://www.plantuml.com/plantuml/png/GK93");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let url = diagram_url("https://uml.example.com/render/", Format::Svg, "abc");
        assert_eq!(url, "https://uml.example.com/render/svg/abc");
    }

    #[test]
    fn test_txt_format_still_uses_the_service() {
        let url = diagram_url(DEFAULT_PLANTUML_URL, Format::Txt, "abc");
        assert_eq!(url, "http://www.plantuml.com/plantuml/txt/abc");
    }
}
