//! Key stores and key resolution.

use std::future::Future;
use std::sync::Arc;

use crate::JoseError;
use crate::alg::Algorithm;
use crate::header::Kid;
use crate::jwk::Jwk;

/// A source of JWKs.
///
/// `keys` is infallible at this interface: failure modes (network,
/// decode) live behind the implementation. The returned sequence is a
/// consistent snapshot — callers never observe a partial update.
pub trait KeyStore: Send + Sync {
    fn keys(&self) -> impl Future<Output = Arc<[Jwk]>> + Send;
}

impl<S: KeyStore> KeyStore for &S {
    fn keys(&self) -> impl Future<Output = Arc<[Jwk]>> + Send {
        S::keys(self)
    }
}

impl<S: KeyStore> KeyStore for Arc<S> {
    fn keys(&self) -> impl Future<Output = Arc<[Jwk]>> + Send {
        S::keys(self)
    }
}

/// A fixed key sequence, returned on every call.
#[derive(Debug, Clone)]
pub struct StaticKeys {
    keys: Arc<[Jwk]>,
}

impl StaticKeys {
    pub fn new(keys: impl IntoIterator<Item = Jwk>) -> Self {
        StaticKeys {
            keys: keys.into_iter().collect(),
        }
    }
}

impl KeyStore for StaticKeys {
    fn keys(&self) -> impl Future<Output = Arc<[Jwk]>> + Send {
        std::future::ready(self.keys.clone())
    }
}

/// What a resolved key will be asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPurpose {
    Signing,
    Verification,
}

/// Select the single key a token may be processed with.
///
/// Keys are first filtered by the suitability predicate for `purpose`
/// and `alg`. With a `kid` the match must be unique among keys carrying
/// that `kid`; without one the filtered set itself must contain exactly
/// one key. Zero or ambiguous matches fail with
/// [`JoseError::KeyNotFound`].
pub fn resolve<'a>(
    keys: &'a [Jwk],
    alg: Algorithm,
    kid: Option<&Kid>,
    purpose: KeyPurpose,
) -> Result<&'a Jwk, JoseError> {
    let mut candidates = keys.iter().filter(|key| {
        let suitable = match purpose {
            KeyPurpose::Signing => key.is_suitable_for_signing(alg),
            KeyPurpose::Verification => key.is_suitable_for_verifying(alg),
        };
        suitable
            && match kid {
                Some(kid) => key.kid() == Some(kid),
                None => true,
            }
    });
    match (candidates.next(), candidates.next()) {
        (Some(key), None) => Ok(key),
        _ => Err(JoseError::KeyNotFound(kid.cloned())),
    }
}
