//! The wire codec interface.
//!
//! Every codec the pipelines use — JOSE header, registered claims, JWK
//! set, the caller's custom claim shape — is a first-class value passed
//! in at construction or call time. Nothing in the core resolves a codec
//! implicitly.

use crate::JoseError;

/// Encodes and decodes a value of type `A` to and from wire bytes.
pub trait Codec<A>: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<A, JoseError>;

    fn encode(&self, value: &A) -> Result<Vec<u8>, JoseError>;
}

impl<A, C: Codec<A> + ?Sized> Codec<A> for &C {
    fn decode(&self, bytes: &[u8]) -> Result<A, JoseError> {
        C::decode(self, bytes)
    }

    fn encode(&self, value: &A) -> Result<Vec<u8>, JoseError> {
        C::encode(self, value)
    }
}

impl<A, C: Codec<A> + ?Sized> Codec<A> for Box<C> {
    fn decode(&self, bytes: &[u8]) -> Result<A, JoseError> {
        C::decode(self, bytes)
    }

    fn encode(&self, value: &A) -> Result<Vec<u8>, JoseError> {
        C::encode(self, value)
    }
}

impl<A, C: Codec<A> + ?Sized> Codec<A> for std::sync::Arc<C> {
    fn decode(&self, bytes: &[u8]) -> Result<A, JoseError> {
        C::decode(self, bytes)
    }

    fn encode(&self, value: &A) -> Result<Vec<u8>, JoseError> {
        C::encode(self, value)
    }
}
