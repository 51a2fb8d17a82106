//! Base64url text handling (RFC 4648 §5, no padding).

use std::fmt;
use std::str::FromStr;

use base64ct::{Base64UrlUnpadded, Encoding};

use crate::JoseError;

/// Encode bytes as unpadded base64url text.
pub fn encode(bytes: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(bytes)
}

/// Decode unpadded base64url text.
pub fn decode(text: &str) -> Result<Vec<u8>, JoseError> {
    Base64UrlUnpadded::decode_vec(text).map_err(|_| JoseError::malformed("invalid base64url"))
}

pub(crate) fn is_base64url_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Non-empty base64url text without padding.
///
/// Used for all key-material fields in JWKs. Constructed only through
/// [`Base64UrlString::new`] (or [`Base64UrlString::from_bytes`], which
/// cannot produce invalid text).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Base64UrlString(String);

impl Base64UrlString {
    pub fn new(text: impl Into<String>) -> Result<Self, JoseError> {
        let text = text.into();
        if text.is_empty() || !text.bytes().all(is_base64url_byte) {
            return Err(JoseError::malformed("expected non-empty base64url text"));
        }
        Ok(Base64UrlString(text))
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Base64UrlString(encode(bytes))
    }

    pub fn decode(&self) -> Result<Vec<u8>, JoseError> {
        decode(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Base64UrlString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Base64UrlString {
    type Err = JoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Base64UrlString::new(s)
    }
}

#[cfg(feature = "serde")]
crate::serde_str!(Base64UrlString, "base64url text");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let data = b"{\"alg\":\"HS256\"}";
        let text = encode(data);
        assert_eq!(decode(&text).unwrap(), data);
    }

    #[test]
    fn rejects_padding_and_foreign_characters() {
        assert!(Base64UrlString::new("").is_err());
        assert!(Base64UrlString::new("abc=").is_err());
        assert!(Base64UrlString::new("a+b").is_err());
        assert!(Base64UrlString::new("a/b").is_err());
        assert!(Base64UrlString::new("a.b").is_err());
        assert!(Base64UrlString::new("AQAB").is_ok());
    }

    #[test]
    fn from_bytes_is_always_valid() {
        let text = Base64UrlString::from_bytes(&[0xff, 0x00, 0x7f]);
        assert_eq!(text.decode().unwrap(), vec![0xff, 0x00, 0x7f]);
    }
}
