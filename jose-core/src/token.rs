//! Compact-serialisation tokens.

use std::fmt;
use std::str::FromStr;

use crate::JoseError;
use crate::base64::is_base64url_byte;
use crate::claims::RegisteredClaims;
use crate::header::JoseHeader;

/// A validated JWS compact serialisation.
///
/// Exactly three non-empty segments separated by `.`, each restricted to
/// the base64url alphabet. Validation is a single-pass byte scan; the
/// value is immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenString {
    text: String,
    dot1: usize,
    dot2: usize,
}

impl TokenString {
    pub fn new(text: impl Into<String>) -> Result<Self, JoseError> {
        let text = text.into();
        let mut dots = [0usize; 2];
        let mut seen = 0usize;
        for (i, b) in text.bytes().enumerate() {
            if b == b'.' {
                if seen == 2 {
                    return Err(JoseError::malformed("expected exactly three segments"));
                }
                dots[seen] = i;
                seen += 1;
            } else if !is_base64url_byte(b) {
                return Err(JoseError::malformed("invalid character in token"));
            }
        }
        if seen != 2 {
            return Err(JoseError::malformed("expected exactly three segments"));
        }
        let [dot1, dot2] = dots;
        if dot1 == 0 || dot2 == dot1 + 1 || dot2 + 1 == text.len() {
            return Err(JoseError::malformed("empty token segment"));
        }
        Ok(TokenString { text, dot1, dot2 })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn header_b64(&self) -> &str {
        &self.text[..self.dot1]
    }

    pub fn payload_b64(&self) -> &str {
        &self.text[self.dot1 + 1..self.dot2]
    }

    pub fn signature_b64(&self) -> &str {
        &self.text[self.dot2 + 1..]
    }

    /// The ASCII bytes the signature covers: `header_b64 + "." + payload_b64`.
    pub fn signing_input(&self) -> &[u8] {
        self.text[..self.dot2].as_bytes()
    }
}

impl fmt::Display for TokenString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for TokenString {
    type Err = JoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TokenString::new(s)
    }
}

#[cfg(feature = "serde")]
crate::serde_str!(TokenString, "a JWS compact serialisation");

/// A decoded and verified token.
///
/// `claims` and `registered` are two projections of the same payload
/// object: the payload is decoded once as the caller's claim shape `A`
/// and once as [`RegisteredClaims`].
#[derive(Debug, Clone)]
pub struct Jwt<A> {
    pub header: JoseHeader,
    pub claims: A,
    pub registered: RegisteredClaims,
}
