//! Core JOSE data model.
//!
//! This crate holds the validated primitive types, the JWK model, the
//! codec and key-store interfaces, and the error taxonomy shared by the
//! rest of the workspace. It performs no cryptography and no I/O.

#![forbid(unsafe_code)]

pub mod alg;
pub mod base64;
pub mod claims;
pub mod codec;
pub mod header;
pub mod jwk;
pub mod store;
pub mod token;

use std::borrow::Cow;

use crate::claims::{Audience, NumericDate};
use crate::header::Kid;

/// Error returned for all token, key and codec operations that can fail.
#[derive(Debug)]
#[non_exhaustive]
pub enum JoseError {
    /// The token's `exp` claim lies in the past.
    Expired {
        expires_at: NumericDate,
        now: NumericDate,
    },
    /// The token's `nbf` claim lies in the future.
    NotYetValid {
        not_before: NumericDate,
        now: NumericDate,
    },
    /// The token's `aud` claim does not contain the required audience.
    InvalidAudience {
        expected: String,
        actual: Option<Audience>,
    },
    /// The token's `iss` claim does not equal the required issuer.
    InvalidIssuer {
        expected: String,
        actual: Option<String>,
    },
    /// The signature could not be verified against the resolved key.
    InvalidSignature,
    /// The token, key or claim document was structurally invalid.
    MalformedToken(Cow<'static, str>),
    /// The header algorithm is not in the configured allow-list.
    UnsupportedAlgorithm(String),
    /// Key resolution produced no match, or more than one.
    KeyNotFound(Option<Kid>),
}

impl JoseError {
    pub fn malformed(cause: impl Into<Cow<'static, str>>) -> Self {
        JoseError::MalformedToken(cause.into())
    }
}

impl std::error::Error for JoseError {}

impl std::fmt::Display for JoseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoseError::Expired { expires_at, now } => {
                write!(f, "token expired at {expires_at} (now {now})")
            }
            JoseError::NotYetValid { not_before, now } => {
                write!(f, "token not valid before {not_before} (now {now})")
            }
            JoseError::InvalidAudience { expected, .. } => {
                write!(f, "token was not issued for audience {expected:?}")
            }
            JoseError::InvalidIssuer { expected, .. } => {
                write!(f, "token was not issued by {expected:?}")
            }
            JoseError::InvalidSignature => f.write_str("token signature could not be verified"),
            JoseError::MalformedToken(cause) => write!(f, "malformed token: {cause}"),
            JoseError::UnsupportedAlgorithm(name) => {
                write!(f, "algorithm {name:?} is not allowed")
            }
            JoseError::KeyNotFound(Some(kid)) => {
                write!(f, "no unique key found for kid {kid}")
            }
            JoseError::KeyNotFound(None) => f.write_str("no unique key found"),
        }
    }
}

/// Serde impls for types whose wire form is their string form.
#[cfg(feature = "serde")]
macro_rules! serde_str {
    ($ty:ty, $expecting:literal) => {
        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                struct Visitor;
                impl serde::de::Visitor<'_> for Visitor {
                    type Value = $ty;

                    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                        f.write_str($expecting)
                    }

                    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
                    where
                        E: serde::de::Error,
                    {
                        v.parse().map_err(E::custom)
                    }
                }
                deserializer.deserialize_str(Visitor)
            }
        }
    };
}

#[cfg(feature = "serde")]
pub(crate) use serde_str;
