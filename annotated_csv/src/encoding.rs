//! Text encodings
//!
//! Encoding labels are resolved with the WHATWG Encoding Standard labels
//! (`"utf-8"`, `"shift_jis"`, `"windows-1252"`, `"iso-8859-1"`, ...).
//! Encoding is lossy but total: characters that the target encoding cannot
//! represent are replaced with [`SUBSTITUTION_BYTE`].

use encoding_rs::{EncoderResult, Encoding, UTF_16BE, UTF_16LE, UTF_8};
use tracing::debug;

use crate::error::CsvWriteError;

/// Byte written in place of an unmappable character (`?`)
pub const SUBSTITUTION_BYTE: u8 = b'?';

/// Label of the default encoding
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// A resolved text encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    /// UTF-8
    pub fn utf8() -> Self {
        Self(UTF_8)
    }

    /// Resolve an encoding label (case-insensitive, surrounding whitespace ignored)
    pub fn for_label(label: &str) -> Result<Self, CsvWriteError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(CsvWriteError::MissingEncoding);
        }
        // Labels such as `iso-2022-kr` resolve to the `replacement` encoding,
        // which has no encoder of its own
        Encoding::for_label(label.as_bytes())
            .filter(|enc| {
                enc.output_encoding() == *enc || *enc == UTF_16LE || *enc == UTF_16BE
            })
            .map(TextEncoding)
            .ok_or_else(|| CsvWriteError::UnknownEncoding(label.to_string()))
    }

    /// Canonical name of the encoding
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Encode `text`, replacing unmappable characters with [`SUBSTITUTION_BYTE`]
    pub fn encode(&self, text: &str) -> Vec<u8> {
        if self.0 == UTF_16LE {
            return text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        }
        if self.0 == UTF_16BE {
            return text.encode_utf16().flat_map(u16::to_be_bytes).collect();
        }
        if self.0.output_encoding() == UTF_8 {
            return text.as_bytes().to_vec();
        }

        let mut encoder = self.0.new_encoder();
        let mut out: Vec<u8> = Vec::with_capacity(text.len());
        let mut remaining = text;
        let mut substituted = 0usize;
        loop {
            let needed = encoder
                .max_buffer_length_from_utf8_without_replacement(remaining.len())
                .unwrap_or(remaining.len().saturating_mul(4))
                .max(16);
            out.reserve(needed);
            let (result, read) =
                encoder.encode_from_utf8_to_vec_without_replacement(remaining, &mut out, true);
            remaining = &remaining[read..];
            match result {
                EncoderResult::InputEmpty => break,
                EncoderResult::OutputFull => {}
                EncoderResult::Unmappable(_) => {
                    substituted += 1;
                    out.push(SUBSTITUTION_BYTE);
                }
            }
        }
        if substituted > 0 {
            debug!(
                encoding = self.name(),
                substituted, "replaced unmappable characters"
            );
        }
        out
    }

    /// Decode `bytes`, replacing malformed sequences with U+FFFD
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, had_errors) = self.0.decode_without_bom_handling(bytes);
        if had_errors {
            debug!(encoding = self.name(), "replaced malformed input");
        }
        text.into_owned()
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::utf8()
    }
}

/// Encode `text` with the encoding labelled `encoding`
///
/// Fails only if the label is empty or unknown.
pub fn encode(text: &str, encoding: &str) -> Result<Vec<u8>, CsvWriteError> {
    Ok(TextEncoding::for_label(encoding)?.encode(text))
}

/// Decode `bytes` with the encoding labelled `encoding`
pub fn decode(bytes: &[u8], encoding: &str) -> Result<String, CsvWriteError> {
    Ok(TextEncoding::for_label(encoding)?.decode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_is_verbatim() {
        let text = "\"id\",\"name\"\n\"1\",\"Zoë ✓\"\n";
        assert_eq!(encode(text, "utf-8").unwrap(), text.as_bytes());
        assert_eq!(encode(text, " UTF8 ").unwrap(), text.as_bytes());
    }

    #[test]
    fn test_unmappable_is_substituted() {
        let bytes = encode("a✓b", "iso-8859-1").unwrap();
        assert_eq!(bytes, b"a?b");
    }

    #[test]
    fn test_single_byte_mapping() {
        // windows-1252: é = 0xE9, € = 0x80
        assert_eq!(encode("é€", "windows-1252").unwrap(), vec![0xE9, 0x80]);
    }

    #[test]
    fn test_shift_jis() {
        // あ = 0x82 0xA0
        assert_eq!(encode("あ", "shift_jis").unwrap(), vec![0x82, 0xA0]);
        assert_eq!(encode("あ😀", "shift_jis").unwrap(), vec![0x82, 0xA0, b'?']);
    }

    #[test]
    fn test_utf16() {
        assert_eq!(encode("A", "utf-16le").unwrap(), vec![0x41, 0x00]);
        assert_eq!(encode("A", "utf-16be").unwrap(), vec![0x00, 0x41]);
        assert_eq!(decode(&[0x41, 0x00], "utf-16le").unwrap(), "A");
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let text = "Grüße, 世界 ✓";
        assert_eq!(
            encode(text, "euc-jp").unwrap(),
            encode(text, "euc-jp").unwrap()
        );
    }

    #[test]
    fn test_round_trip_shows_substitution() {
        let bytes = encode("naïve ✓", "iso-8859-1").unwrap();
        assert_eq!(decode(&bytes, "iso-8859-1").unwrap(), "naïve ?");
    }

    #[test]
    fn test_missing_and_unknown_labels() {
        assert!(matches!(encode("x", ""), Err(CsvWriteError::MissingEncoding)));
        assert!(matches!(
            encode("x", "klingon"),
            Err(CsvWriteError::UnknownEncoding(l)) if l == "klingon"
        ));
    }

    #[test]
    fn test_labels_without_encoder_are_rejected() {
        for label in ["iso-2022-kr", "csiso2022kr", "hz-gb-2312"] {
            let err = encode("x", label).unwrap_err();
            assert!(err.is_configuration());
            assert!(matches!(err, CsvWriteError::UnknownEncoding(l) if l == label));
        }
        assert!(decode(b"abc", "iso-2022-kr").is_err());
        assert_eq!(
            encode("\u{3042}\u{2713}b", "iso-2022-jp").unwrap(),
            b"\x1b$B$\"\x1b(B?b".to_vec()
        );
    }

    #[test]
    fn test_canonical_names() {
        assert_eq!(TextEncoding::for_label("latin1").unwrap().name(), "windows-1252");
        assert_eq!(TextEncoding::default().name(), "UTF-8");
    }
}
