use crate::{Error, Result};

/// Character encoding for textual payloads crossing the boundary as bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Charset {
    /// UTF-8 (default).
    #[default]
    Utf8,
    /// ISO-8859-1.
    Latin1,
    /// US-ASCII.
    Ascii,
}

impl Charset {
    /// Parse a charset label.
    pub fn from_label(label: &str) -> Result<Self> {
        match label.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Charset::Utf8),
            "iso-8859-1" | "latin1" | "latin-1" => Ok(Charset::Latin1),
            "us-ascii" | "ascii" => Ok(Charset::Ascii),
            other => Err(Error::UnknownCharset(other.to_string())),
        }
    }

    /// Canonical label for this charset.
    pub fn label(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Latin1 => "iso-8859-1",
            Charset::Ascii => "us-ascii",
        }
    }

    /// Encode text to a byte sequence in this charset.
    pub fn string_to_bytes(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            Charset::Utf8 => Ok(text.as_bytes().to_vec()),
            Charset::Latin1 => text
                .chars()
                .map(|c| {
                    let code = c as u32;
                    if code <= 0xFF {
                        Ok(code as u8)
                    } else {
                        Err(Error::Encoding(format!(
                            "character {:?} not representable in iso-8859-1",
                            c
                        )))
                    }
                })
                .collect(),
            Charset::Ascii => text
                .chars()
                .map(|c| {
                    if c.is_ascii() {
                        Ok(c as u8)
                    } else {
                        Err(Error::Encoding(format!(
                            "character {:?} not representable in us-ascii",
                            c
                        )))
                    }
                })
                .collect(),
        }
    }

    /// Decode a byte sequence in this charset back to text.
    pub fn bytes_to_string(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Charset::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| Error::Encoding(format!("invalid utf-8: {}", e))),
            Charset::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
            Charset::Ascii => {
                if let Some(bad) = bytes.iter().find(|b| !b.is_ascii()) {
                    return Err(Error::Encoding(format!(
                        "byte 0x{:02x} not valid us-ascii",
                        bad
                    )));
                }
                Ok(bytes.iter().map(|&b| b as char).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_utf8() {
        assert_eq!(Charset::default(), Charset::Utf8);
    }

    #[test]
    fn test_latin1_roundtrip() {
        let charset = Charset::from_label("latin1").unwrap();
        let bytes = charset.string_to_bytes("café").unwrap();
        assert_eq!(bytes.len(), 4);
        assert_eq!(charset.bytes_to_string(&bytes).unwrap(), "café");
    }

    #[test]
    fn test_ascii_rejects_non_ascii() {
        let err = Charset::Ascii.string_to_bytes("café").unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert!(matches!(
            Charset::from_label("ebcdic"),
            Err(Error::UnknownCharset(_))
        ));
    }
}
