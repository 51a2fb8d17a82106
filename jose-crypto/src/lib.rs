//! Signature engine and JWK ↔ native key bridge.
//!
//! Per-algorithm sign/verify for the twelve JWS algorithms, the ECDSA
//! R‖S↔DER transcoder with its pre-verification sanity checks, and the
//! conversions between wire JWKs and native key material.

#![forbid(unsafe_code)]

pub mod bridge;
mod curve;
pub mod der;
pub mod keys;
pub mod sign;
mod thumbprint;

pub use keys::{MacKey, PrivateKey, PublicKey};
pub use sign::{constant_time_eq, sign, sign_mac, verify, verify_mac};
pub use thumbprint::thumbprint;
