//! `serde_json`-backed codec values.
//!
//! [`Json<A>`] turns any `Serialize + DeserializeOwned` type into a
//! first-class [`Codec`] value for the validator and issuer. The wire
//! contracts themselves (duplicate-member rejection, `alg:"none"`
//! rejection, audience shapes, …) live in the hand-written serde impls
//! on the `jose-core` types; this crate only plugs them into the codec
//! interface.

#![forbid(unsafe_code)]

use std::marker::PhantomData;

use jose_core::JoseError;
use jose_core::claims::RegisteredClaims;
use jose_core::codec::Codec;
use jose_core::header::JoseHeader;
use jose_core::jwk::{Jwk, JwkSet};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A codec for `A` over compact JSON.
///
/// Decode failures carry the underlying parser message as the
/// `MalformedToken` cause.
pub struct Json<A>(PhantomData<fn() -> A>);

impl<A> Json<A> {
    pub const fn new() -> Self {
        Json(PhantomData)
    }
}

impl<A> Default for Json<A> {
    fn default() -> Self {
        Json::new()
    }
}

impl<A> Clone for Json<A> {
    fn clone(&self) -> Self {
        Json(PhantomData)
    }
}

impl<A: Serialize + DeserializeOwned> Codec<A> for Json<A> {
    fn decode(&self, bytes: &[u8]) -> Result<A, JoseError> {
        serde_json::from_slice(bytes).map_err(|e| JoseError::MalformedToken(e.to_string().into()))
    }

    fn encode(&self, value: &A) -> Result<Vec<u8>, JoseError> {
        serde_json::to_vec(value).map_err(|e| JoseError::MalformedToken(e.to_string().into()))
    }
}

/// The header codec used by most constructions.
pub fn header_codec() -> Json<JoseHeader> {
    Json::new()
}

/// The registered-claims codec used by most constructions.
pub fn claims_codec() -> Json<RegisteredClaims> {
    Json::new()
}

pub fn jwk_codec() -> Json<Jwk> {
    Json::new()
}

/// The JWK Set codec handed to remote fetchers.
pub fn jwk_set_codec() -> Json<JwkSet> {
    Json::new()
}

#[cfg(test)]
mod tests {
    use jose_core::alg::Algorithm;

    use super::*;

    #[test]
    fn decode_failures_surface_as_malformed() {
        let codec = header_codec();
        let err = codec.decode(b"not json").unwrap_err();
        assert!(matches!(err, JoseError::MalformedToken(_)));
    }

    #[test]
    fn header_round_trip() {
        let codec = header_codec();
        let header = JoseHeader::new(Algorithm::ES256);
        let bytes = codec.encode(&header).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), header);
    }

    #[test]
    fn none_never_decodes() {
        let codec = header_codec();
        assert!(codec.decode(br#"{"alg":"none"}"#).is_err());
    }
}
