//! Native key material.

use std::fmt;

use jose_core::JoseError;
use jose_core::alg::{Algorithm, AlgorithmFamily, EcCurve};

/// A symmetric MAC key.
///
/// Carries the algorithm name it was built for (from the JWK's `alg`
/// member, or HMAC-SHA-256 by default); the signature engine always uses
/// the algorithm the caller passes alongside the data.
#[derive(Clone)]
pub struct MacKey {
    key: Vec<u8>,
    alg: Algorithm,
}

impl MacKey {
    pub fn new(key: impl Into<Vec<u8>>, alg: Algorithm) -> Result<Self, JoseError> {
        if alg.family() != AlgorithmFamily::Hmac {
            return Err(JoseError::malformed("expected an HMAC algorithm"));
        }
        Ok(MacKey {
            key: key.into(),
            alg,
        })
    }

    /// A fresh random key of `len` bytes, labelled HMAC-SHA-256.
    pub fn random(len: usize) -> Result<Self, JoseError> {
        let mut key = vec![0u8; len];
        getrandom::fill(&mut key).map_err(|_| JoseError::malformed("randomness unavailable"))?;
        Ok(MacKey {
            key,
            alg: Algorithm::HS256,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    pub fn algorithm(&self) -> Algorithm {
        self.alg
    }
}

impl fmt::Debug for MacKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacKey")
            .field("len", &self.key.len())
            .field("alg", &self.alg)
            .finish()
    }
}

/// An asymmetric key used to verify token signatures.
#[derive(Clone)]
pub enum PublicKey {
    Rsa(rsa::RsaPublicKey),
    P256(p256::ecdsa::VerifyingKey),
    P384(p384::ecdsa::VerifyingKey),
    P521(p521::ecdsa::VerifyingKey),
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PublicKey::Rsa(_) => "PublicKey::Rsa",
            PublicKey::P256(_) => "PublicKey::P256",
            PublicKey::P384(_) => "PublicKey::P384",
            PublicKey::P521(_) => "PublicKey::P521",
        })
    }
}

/// An asymmetric key used to create token signatures.
#[derive(Clone)]
pub enum PrivateKey {
    Rsa(rsa::RsaPrivateKey),
    P256(p256::ecdsa::SigningKey),
    P384(p384::ecdsa::SigningKey),
    P521(p521::ecdsa::SigningKey),
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrivateKey::Rsa(_) => "PrivateKey::Rsa",
            PrivateKey::P256(_) => "PrivateKey::P256",
            PrivateKey::P384(_) => "PrivateKey::P384",
            PrivateKey::P521(_) => "PrivateKey::P521",
        })
    }
}

impl PrivateKey {
    pub fn public_key(&self) -> PublicKey {
        match self {
            PrivateKey::Rsa(key) => PublicKey::Rsa(key.to_public_key()),
            PrivateKey::P256(key) => PublicKey::P256(*key.verifying_key()),
            PrivateKey::P384(key) => PublicKey::P384(*key.verifying_key()),
            PrivateKey::P521(key) => PublicKey::P521(p521::ecdsa::VerifyingKey::from(key)),
        }
    }

    /// Generate a fresh ECDSA keypair on `curve`.
    pub fn random_ec(curve: EcCurve) -> Result<Self, JoseError> {
        match curve {
            EcCurve::P256 => {
                let mut bytes = [0u8; 32];
                loop {
                    fill(&mut bytes, 0xff)?;
                    match p256::ecdsa::SigningKey::from_slice(&bytes).map(PrivateKey::P256) {
                        Err(_) => continue,
                        Ok(key) => break Ok(key),
                    }
                }
            }
            EcCurve::P384 => {
                let mut bytes = [0u8; 48];
                loop {
                    fill(&mut bytes, 0xff)?;
                    match p384::ecdsa::SigningKey::from_slice(&bytes).map(PrivateKey::P384) {
                        Err(_) => continue,
                        Ok(key) => break Ok(key),
                    }
                }
            }
            EcCurve::P521 => {
                let mut bytes = [0u8; 66];
                loop {
                    // P-521 scalars use only the lowest bit of the leading byte.
                    fill(&mut bytes, 0x01)?;
                    match p521::ecdsa::SigningKey::from_slice(&bytes).map(PrivateKey::P521) {
                        Err(_) => continue,
                        Ok(key) => break Ok(key),
                    }
                }
            }
        }
    }

    /// Generate a fresh 2048-bit RSA keypair.
    pub fn random_rsa() -> Result<Self, JoseError> {
        use rsa::rand_core::OsRng;

        rsa::RsaPrivateKey::new(&mut OsRng, 2048)
            .map(PrivateKey::Rsa)
            .map_err(|_| JoseError::malformed("RSA key generation failed"))
    }
}

fn fill(bytes: &mut [u8], top_mask: u8) -> Result<(), JoseError> {
    getrandom::fill(bytes).map_err(|_| JoseError::malformed("randomness unavailable"))?;
    bytes[0] &= top_mask;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_key_requires_an_hmac_algorithm() {
        assert!(MacKey::new(vec![0u8; 32], Algorithm::RS256).is_err());
        let key = MacKey::new(vec![0u8; 32], Algorithm::HS384).unwrap();
        assert_eq!(key.algorithm(), Algorithm::HS384);
    }

    #[test]
    fn random_mac_key_has_requested_length() {
        let key = MacKey::random(32).unwrap();
        assert_eq!(key.as_bytes().len(), 32);
    }

    #[test]
    fn debug_output_redacts_key_material() {
        let key = MacKey::random(32).unwrap();
        let rendered = format!("{key:?}");
        assert!(!rendered.contains(&format!("{:?}", key.as_bytes())));
    }
}
