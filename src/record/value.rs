use super::error::{RecordError, RecordResult};
use super::{CHAR_WIDTH, INT_WIDTH};

/// Attribute data type. Both variants have a fixed on-disk width, which is
/// what keeps rows fixed-width and page addressing purely arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    /// Unsigned 32-bit integer, 4 bytes little-endian.
    Int,
    /// Zero-padded byte string, 16 bytes.
    Char,
}

impl AttrType {
    /// On-disk width of a value of this type.
    pub fn width(&self) -> usize {
        match self {
            AttrType::Int => INT_WIDTH,
            AttrType::Char => CHAR_WIDTH,
        }
    }

    /// Parse a type name as written in commands and in attribute
    /// descriptors ("int" / "char").
    pub fn parse(s: &str) -> RecordResult<Self> {
        match s {
            "int" => Ok(AttrType::Int),
            "char" => Ok(AttrType::Char),
            other => Err(RecordError::UnsupportedAttrType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttrType::Int => "int",
            AttrType::Char => "char",
        }
    }

    /// Encode one value into its fixed-width representation.
    ///
    /// A missing value encodes as all zeroes (empty string / zero); there
    /// is no explicit null representation.
    pub fn encode_value(&self, attr: &str, value: Option<&str>) -> RecordResult<Vec<u8>> {
        let value = value.unwrap_or("");
        match self {
            AttrType::Char => {
                let bytes = value.as_bytes();
                if bytes.len() > CHAR_WIDTH {
                    return Err(RecordError::ValueTooLong {
                        attr: attr.to_string(),
                        len: bytes.len(),
                    });
                }
                let mut out = vec![0u8; CHAR_WIDTH];
                out[..bytes.len()].copy_from_slice(bytes);
                Ok(out)
            }
            AttrType::Int => {
                let parsed: u32 = if value.is_empty() {
                    0
                } else {
                    value.parse().map_err(|_| RecordError::InvalidInteger {
                        attr: attr.to_string(),
                        value: value.to_string(),
                    })?
                };
                Ok(parsed.to_le_bytes().to_vec())
            }
        }
    }

    /// Decode one fixed-width value back to its string form. Char values
    /// are right-trimmed of zero padding; ints render as decimal.
    pub fn decode_value(&self, bytes: &[u8]) -> String {
        match self {
            AttrType::Char => {
                let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
                String::from_utf8_lossy(&bytes[..end]).into_owned()
            }
            AttrType::Int => {
                let mut buf = [0u8; INT_WIDTH];
                buf.copy_from_slice(&bytes[..INT_WIDTH]);
                u32::from_le_bytes(buf).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(AttrType::Int.width(), 4);
        assert_eq!(AttrType::Char.width(), 16);
    }

    #[test]
    fn test_parse_type() {
        assert_eq!(AttrType::parse("int").unwrap(), AttrType::Int);
        assert_eq!(AttrType::parse("char").unwrap(), AttrType::Char);
        assert!(matches!(
            AttrType::parse("varchar"),
            Err(RecordError::UnsupportedAttrType(_))
        ));
    }

    #[test]
    fn test_int_round_trip() {
        let bytes = AttrType::Int.encode_value("id", Some("4294967295")).unwrap();
        assert_eq!(bytes, 0xFFFF_FFFFu32.to_le_bytes());
        assert_eq!(AttrType::Int.decode_value(&bytes), "4294967295");
    }

    #[test]
    fn test_int_parse_failure() {
        let result = AttrType::Int.encode_value("id", Some("not-a-number"));
        assert!(matches!(result, Err(RecordError::InvalidInteger { .. })));

        // Negative values are not representable as u32.
        let result = AttrType::Int.encode_value("id", Some("-1"));
        assert!(matches!(result, Err(RecordError::InvalidInteger { .. })));
    }

    #[test]
    fn test_char_round_trip() {
        let bytes = AttrType::Char.encode_value("name", Some("alice")).unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[..5], b"alice");
        assert!(bytes[5..].iter().all(|&b| b == 0));
        assert_eq!(AttrType::Char.decode_value(&bytes), "alice");
    }

    #[test]
    fn test_char_too_long() {
        let result = AttrType::Char.encode_value("name", Some("exactly-17-bytes!"));
        assert!(matches!(
            result,
            Err(RecordError::ValueTooLong { len: 17, .. })
        ));
    }

    #[test]
    fn test_missing_value_defaults() {
        assert_eq!(
            AttrType::Int.encode_value("id", None).unwrap(),
            0u32.to_le_bytes()
        );
        assert_eq!(
            AttrType::Char.encode_value("name", None).unwrap(),
            vec![0u8; 16]
        );
    }
}
