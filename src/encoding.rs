//! Text encodings for reading and writing SQL files.

use std::fmt;
use std::str::FromStr;

/// An encoding of SQL source files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Utf8,
    /// ISO-8859-1: every byte is the code point of the same value.
    Latin1,
    Utf16Le,
    Utf16Be,
}

/// Classifies an encoding error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingErrorKind {
    /// The name matches no supported encoding.
    Unknown(String),
    /// The input bytes are not valid in the encoding.
    InvalidInput { offset: usize },
    /// The text holds a character the encoding cannot represent.
    Unencodable(char),
}

impl fmt::Display for EncodingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(name) => write!(
                f,
                "unknown encoding {name:?}, expected one of utf-8, latin-1, utf-16le, utf-16be"
            ),
            Self::InvalidInput { offset } => write!(f, "invalid input at byte {offset}"),
            Self::Unencodable(c) => write!(f, "cannot encode {c:?}"),
        }
    }
}

/// Error produced when text cannot be decoded or encoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{encoding}: {kind}")]
pub struct EncodingError {
    pub kind: EncodingErrorKind,
    pub encoding: String,
}

impl Encoding {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
            Self::Utf16Le => "utf-16le",
            Self::Utf16Be => "utf-16be",
        }
    }

    fn error(self, kind: EncodingErrorKind) -> EncodingError {
        EncodingError {
            kind,
            encoding: self.name().to_string(),
        }
    }

    /// Decode `bytes` into text. A byte-order mark is kept as text.
    pub fn decode(self, bytes: &[u8]) -> Result<String, EncodingError> {
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| {
                self.error(EncodingErrorKind::InvalidInput {
                    offset: e.utf8_error().valid_up_to(),
                })
            }),
            Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Utf16Le | Self::Utf16Be => self.decode_utf16(bytes),
        }
    }

    fn decode_utf16(self, bytes: &[u8]) -> Result<String, EncodingError> {
        let units = bytes.chunks(2).map(|pair| match (self, pair) {
            (Self::Utf16Be, &[hi, lo]) => Some(u16::from_be_bytes([hi, lo])),
            (_, &[lo, hi]) => Some(u16::from_le_bytes([lo, hi])),
            _ => None,
        });
        let mut text = String::with_capacity(bytes.len() / 2);
        let mut offset = 0;
        for unit in char::decode_utf16(units.map_while(std::convert::identity)) {
            let c = unit.map_err(|_| self.error(EncodingErrorKind::InvalidInput { offset }))?;
            offset += c.len_utf16() * 2;
            text.push(c);
        }
        if offset == bytes.len() {
            Ok(text)
        } else {
            Err(self.error(EncodingErrorKind::InvalidInput { offset }))
        }
    }

    /// Encode `text` into bytes.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, EncodingError> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Latin1 => text
                .chars()
                .map(|c| u8::try_from(c).map_err(|_| self.error(EncodingErrorKind::Unencodable(c))))
                .collect(),
            Self::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Self::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Self::Latin1),
            "utf-16le" | "utf-16-le" => Ok(Self::Utf16Le),
            "utf-16be" | "utf-16-be" => Ok(Self::Utf16Be),
            _ => Err(EncodingError {
                kind: EncodingErrorKind::Unknown(s.to_string()),
                encoding: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!("UTF8".parse::<Encoding>(), Ok(Encoding::Utf8));
        assert_eq!("iso_8859_1".parse::<Encoding>(), Ok(Encoding::Latin1));
        assert_eq!("utf-16be".parse::<Encoding>(), Ok(Encoding::Utf16Be));
        let err = "ebcdic".parse::<Encoding>().unwrap_err();
        assert_eq!(err.kind, EncodingErrorKind::Unknown("ebcdic".to_string()));
    }

    #[test]
    fn latin1_maps_bytes_to_code_points() {
        assert_eq!(Encoding::Latin1.decode(b"caf\xe9").unwrap(), "café");
        assert_eq!(Encoding::Latin1.encode("café").unwrap(), b"caf\xe9");
        let err = Encoding::Latin1.encode("€").unwrap_err();
        assert_eq!(err.kind, EncodingErrorKind::Unencodable('€'));
    }

    #[test]
    fn invalid_utf8_reports_offset() {
        let err = Encoding::Utf8.decode(b"select \xff").unwrap_err();
        assert_eq!(err.kind, EncodingErrorKind::InvalidInput { offset: 7 });
        assert_eq!(err.to_string(), "utf-8: invalid input at byte 7");
    }

    #[test]
    fn utf16_both_byte_orders() {
        let le = Encoding::Utf16Le.encode("select 'é'").unwrap();
        assert_eq!(Encoding::Utf16Le.decode(&le).unwrap(), "select 'é'");
        let be = Encoding::Utf16Be.encode("a").unwrap();
        assert_eq!(be, vec![0, b'a']);
        assert_eq!(Encoding::Utf16Be.decode(&be).unwrap(), "a");
    }

    #[test]
    fn utf16_rejects_odd_length() {
        let err = Encoding::Utf16Le.decode(&[b'a', 0, b'b']).unwrap_err();
        assert_eq!(err.kind, EncodingErrorKind::InvalidInput { offset: 2 });
    }
}
