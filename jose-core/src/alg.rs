//! Signing algorithms, curves and key-use designators.

use std::fmt;
use std::str::FromStr;

use crate::JoseError;

/// The closed set of supported JWS algorithms.
///
/// There is deliberately no `none` variant: unsigned tokens cannot be
/// represented at the type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    HS256,
    HS384,
    HS512,
    RS256,
    RS384,
    RS512,
    ES256,
    ES384,
    ES512,
    PS256,
    PS384,
    PS512,
}

/// The cryptographic family an [`Algorithm`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmFamily {
    Hmac,
    Rsa,
    Ec,
    RsaPss,
}

impl Algorithm {
    pub const ALL: [Algorithm; 12] = [
        Algorithm::HS256,
        Algorithm::HS384,
        Algorithm::HS512,
        Algorithm::RS256,
        Algorithm::RS384,
        Algorithm::RS512,
        Algorithm::ES256,
        Algorithm::ES384,
        Algorithm::ES512,
        Algorithm::PS256,
        Algorithm::PS384,
        Algorithm::PS512,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
            Algorithm::ES256 => "ES256",
            Algorithm::ES384 => "ES384",
            Algorithm::ES512 => "ES512",
            Algorithm::PS256 => "PS256",
            Algorithm::PS384 => "PS384",
            Algorithm::PS512 => "PS512",
        }
    }

    pub fn family(self) -> AlgorithmFamily {
        match self {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => AlgorithmFamily::Hmac,
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => AlgorithmFamily::Rsa,
            Algorithm::ES256 | Algorithm::ES384 | Algorithm::ES512 => AlgorithmFamily::Ec,
            Algorithm::PS256 | Algorithm::PS384 | Algorithm::PS512 => AlgorithmFamily::RsaPss,
        }
    }

    /// SHA digest length in bytes (32, 48 or 64).
    pub fn hash_len(self) -> usize {
        match self {
            Algorithm::HS256 | Algorithm::RS256 | Algorithm::ES256 | Algorithm::PS256 => 32,
            Algorithm::HS384 | Algorithm::RS384 | Algorithm::ES384 | Algorithm::PS384 => 48,
            Algorithm::HS512 | Algorithm::RS512 | Algorithm::ES512 | Algorithm::PS512 => 64,
        }
    }

    /// The curve an ECDSA algorithm operates on; `None` for other families.
    pub fn curve(self) -> Option<EcCurve> {
        match self {
            Algorithm::ES256 => Some(EcCurve::P256),
            Algorithm::ES384 => Some(EcCurve::P384),
            Algorithm::ES512 => Some(EcCurve::P521),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = JoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "none" {
            return Err(JoseError::malformed("the \"none\" algorithm is rejected"));
        }
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| JoseError::UnsupportedAlgorithm(s.to_owned()))
    }
}

#[cfg(feature = "serde")]
crate::serde_str!(Algorithm, "a JWS algorithm name");

/// The NIST prime curves supported for ECDSA keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcCurve {
    P256,
    P384,
    P521,
}

impl EcCurve {
    pub fn name(self) -> &'static str {
        match self {
            EcCurve::P256 => "P-256",
            EcCurve::P384 => "P-384",
            EcCurve::P521 => "P-521",
        }
    }

    /// Byte length of one affine coordinate (and of a private scalar).
    pub fn coordinate_len(self) -> usize {
        match self {
            EcCurve::P256 => 32,
            EcCurve::P384 => 48,
            EcCurve::P521 => 66,
        }
    }

    /// Byte length of a raw `R || S` signature on this curve.
    pub fn signature_len(self) -> usize {
        2 * self.coordinate_len()
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EcCurve {
    type Err = JoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P-256" => Ok(EcCurve::P256),
            "P-384" => Ok(EcCurve::P384),
            "P-521" => Ok(EcCurve::P521),
            _ => Err(JoseError::malformed("unsupported curve")),
        }
    }
}

#[cfg(feature = "serde")]
crate::serde_str!(EcCurve, "an EC curve name");

/// The `use` member of a JWK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUse {
    Sig,
    Enc,
}

impl fmt::Display for KeyUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyUse::Sig => "sig",
            KeyUse::Enc => "enc",
        })
    }
}

impl FromStr for KeyUse {
    type Err = JoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sig" => Ok(KeyUse::Sig),
            "enc" => Ok(KeyUse::Enc),
            _ => Err(JoseError::malformed("unsupported key use")),
        }
    }
}

#[cfg(feature = "serde")]
crate::serde_str!(KeyUse, "a key use designator");

/// A `key_ops` member entry of a JWK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOp {
    Sign,
    Verify,
    Encrypt,
    Decrypt,
    WrapKey,
    UnwrapKey,
    DeriveKey,
    DeriveBits,
}

impl fmt::Display for KeyOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyOp::Sign => "sign",
            KeyOp::Verify => "verify",
            KeyOp::Encrypt => "encrypt",
            KeyOp::Decrypt => "decrypt",
            KeyOp::WrapKey => "wrapKey",
            KeyOp::UnwrapKey => "unwrapKey",
            KeyOp::DeriveKey => "deriveKey",
            KeyOp::DeriveBits => "deriveBits",
        })
    }
}

impl FromStr for KeyOp {
    type Err = JoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sign" => Ok(KeyOp::Sign),
            "verify" => Ok(KeyOp::Verify),
            "encrypt" => Ok(KeyOp::Encrypt),
            "decrypt" => Ok(KeyOp::Decrypt),
            "wrapKey" => Ok(KeyOp::WrapKey),
            "unwrapKey" => Ok(KeyOp::UnwrapKey),
            "deriveKey" => Ok(KeyOp::DeriveKey),
            "deriveBits" => Ok(KeyOp::DeriveBits),
            _ => Err(JoseError::malformed("unsupported key operation")),
        }
    }
}

#[cfg(feature = "serde")]
crate::serde_str!(KeyOp, "a key operation name");
