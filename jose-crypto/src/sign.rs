//! Per-algorithm signing and verification.

use digest::{Digest, KeyInit, Mac};
use hmac::Hmac;
use jose_core::JoseError;
use jose_core::alg::{Algorithm, AlgorithmFamily, EcCurve};
use jose_core::jwk::RSA_MIN_MODULUS_BITS;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, Pss};
use sha2::{Sha256, Sha384, Sha512};

use crate::der;
use crate::keys::{MacKey, PrivateKey, PublicKey};

/// Compute a raw MAC over `data`. HMAC algorithms only.
pub fn sign_mac(data: &[u8], key: &MacKey, alg: Algorithm) -> Result<Vec<u8>, JoseError> {
    match alg {
        Algorithm::HS256 => mac::<Hmac<Sha256>>(key.as_bytes(), data),
        Algorithm::HS384 => mac::<Hmac<Sha384>>(key.as_bytes(), data),
        Algorithm::HS512 => mac::<Hmac<Sha512>>(key.as_bytes(), data),
        _ => Err(JoseError::malformed("expected an HMAC algorithm")),
    }
}

/// Recompute the MAC and compare in constant time. HMAC algorithms only.
pub fn verify_mac(
    data: &[u8],
    signature: &[u8],
    key: &MacKey,
    alg: Algorithm,
) -> Result<(), JoseError> {
    let expected = sign_mac(data, key, alg)?;
    if constant_time_eq(&expected, signature) {
        Ok(())
    } else {
        Err(JoseError::InvalidSignature)
    }
}

fn mac<M: Mac + KeyInit>(key: &[u8], data: &[u8]) -> Result<Vec<u8>, JoseError> {
    let mut mac =
        <M as Mac>::new_from_slice(key).map_err(|_| JoseError::malformed("invalid HMAC key"))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Single-pass XOR-accumulating comparison.
///
/// The accumulator keeps the loop free of data-dependent branches, and a
/// length mismatch still walks the full computed-MAC length (comparing
/// it against itself) so timing stays length-independent. The length
/// verdict joins by boolean AND at the end.
#[inline(never)]
pub fn constant_time_eq(computed: &[u8], provided: &[u8]) -> bool {
    let len_match = computed.len() == provided.len();
    let other = if len_match { provided } else { computed };
    let mut acc = 0u8;
    for (a, b) in computed.iter().zip(other.iter()) {
        acc |= a ^ b;
    }
    (acc == 0) & len_match
}

/// Sign `data` with a private key. RSA, RSA-PSS and ECDSA only.
pub fn sign(data: &[u8], key: &PrivateKey, alg: Algorithm) -> Result<Vec<u8>, JoseError> {
    match alg.family() {
        AlgorithmFamily::Hmac => Err(JoseError::malformed("HMAC requires a symmetric key")),
        AlgorithmFamily::Rsa => {
            let key = rsa_private(key)?;
            check_rsa_floor(key.n().bits())?;
            key.sign(pkcs1_scheme(alg), &digest(alg, data))
                .map_err(|_| JoseError::malformed("RSA signing failed"))
        }
        AlgorithmFamily::RsaPss => {
            use rsa::rand_core::OsRng;

            let key = rsa_private(key)?;
            check_rsa_floor(key.n().bits())?;
            key.sign_with_rng(&mut OsRng, pss_scheme(alg), &digest(alg, data))
                .map_err(|_| JoseError::malformed("RSA signing failed"))
        }
        AlgorithmFamily::Ec => sign_ecdsa(data, key, alg),
    }
}

/// Verify `data` against `signature` with a public key. Asymmetric
/// algorithms only. Every cryptographic failure maps to
/// [`JoseError::InvalidSignature`].
pub fn verify(
    data: &[u8],
    signature: &[u8],
    key: &PublicKey,
    alg: Algorithm,
) -> Result<(), JoseError> {
    match alg.family() {
        AlgorithmFamily::Hmac => Err(JoseError::malformed("HMAC requires a symmetric key")),
        AlgorithmFamily::Rsa => {
            let key = rsa_public(key)?;
            check_rsa_floor(key.n().bits())?;
            key.verify(pkcs1_scheme(alg), &digest(alg, data), signature)
                .map_err(|_| JoseError::InvalidSignature)
        }
        AlgorithmFamily::RsaPss => {
            let key = rsa_public(key)?;
            check_rsa_floor(key.n().bits())?;
            key.verify(pss_scheme(alg), &digest(alg, data), signature)
                .map_err(|_| JoseError::InvalidSignature)
        }
        AlgorithmFamily::Ec => verify_ecdsa(data, signature, key, alg),
    }
}

fn sign_ecdsa(data: &[u8], key: &PrivateKey, alg: Algorithm) -> Result<Vec<u8>, JoseError> {
    use p256::ecdsa::signature::DigestSigner;

    // The provider emits DER; JWS wants fixed-width R || S.
    match (key, alg) {
        (PrivateKey::P256(key), Algorithm::ES256) => {
            let signature: p256::ecdsa::Signature =
                key.sign_digest(Sha256::new_with_prefix(data));
            let signature = signature.normalize_s().unwrap_or(signature);
            der::der_to_concat(signature.to_der().as_bytes(), EcCurve::P256)
        }
        (PrivateKey::P384(key), Algorithm::ES384) => {
            let signature: p384::ecdsa::Signature =
                key.sign_digest(Sha384::new_with_prefix(data));
            let signature = signature.normalize_s().unwrap_or(signature);
            der::der_to_concat(signature.to_der().as_bytes(), EcCurve::P384)
        }
        (PrivateKey::P521(key), Algorithm::ES512) => {
            use p521::ecdsa::signature::Signer;
            let signature: p521::ecdsa::Signature = key.sign(data);
            let signature = signature.normalize_s().unwrap_or(signature);
            der::der_to_concat(signature.to_der().as_bytes(), EcCurve::P521)
        }
        _ => Err(JoseError::malformed("key does not match algorithm")),
    }
}

fn verify_ecdsa(
    data: &[u8],
    signature: &[u8],
    key: &PublicKey,
    alg: Algorithm,
) -> Result<(), JoseError> {
    use p256::ecdsa::signature::DigestVerifier;

    let curve = match alg.curve() {
        Some(curve) => curve,
        None => return Err(JoseError::malformed("expected an ECDSA algorithm")),
    };
    der::check_raw_signature(curve, signature)?;
    let der = der::concat_to_der(signature).map_err(|_| JoseError::InvalidSignature)?;
    match (key, alg) {
        (PublicKey::P256(key), Algorithm::ES256) => {
            let signature = p256::ecdsa::Signature::from_der(&der)
                .map_err(|_| JoseError::InvalidSignature)?;
            key.verify_digest(Sha256::new_with_prefix(data), &signature)
                .map_err(|_| JoseError::InvalidSignature)
        }
        (PublicKey::P384(key), Algorithm::ES384) => {
            let signature = p384::ecdsa::Signature::from_der(&der)
                .map_err(|_| JoseError::InvalidSignature)?;
            key.verify_digest(Sha384::new_with_prefix(data), &signature)
                .map_err(|_| JoseError::InvalidSignature)
        }
        (PublicKey::P521(key), Algorithm::ES512) => {
            use p521::ecdsa::signature::Verifier;
            let signature = p521::ecdsa::Signature::from_der(&der)
                .map_err(|_| JoseError::InvalidSignature)?;
            key.verify(data, &signature)
                .map_err(|_| JoseError::InvalidSignature)
        }
        _ => Err(JoseError::malformed("key does not match algorithm")),
    }
}

fn rsa_private<'a>(key: &'a PrivateKey) -> Result<&'a rsa::RsaPrivateKey, JoseError> {
    match key {
        PrivateKey::Rsa(key) => Ok(key),
        _ => Err(JoseError::malformed("key does not match algorithm")),
    }
}

fn rsa_public<'a>(key: &'a PublicKey) -> Result<&'a rsa::RsaPublicKey, JoseError> {
    match key {
        PublicKey::Rsa(key) => Ok(key),
        _ => Err(JoseError::malformed("key does not match algorithm")),
    }
}

fn check_rsa_floor(bits: usize) -> Result<(), JoseError> {
    if bits < RSA_MIN_MODULUS_BITS {
        return Err(JoseError::malformed("RSA key must be at least 2048 bits"));
    }
    Ok(())
}

fn digest(alg: Algorithm, data: &[u8]) -> Vec<u8> {
    match alg.hash_len() {
        32 => Sha256::digest(data).to_vec(),
        48 => Sha384::digest(data).to_vec(),
        _ => Sha512::digest(data).to_vec(),
    }
}

// MGF1 matches the hash, salt length equals the hash output, trailer 0xBC.
fn pss_scheme(alg: Algorithm) -> Pss {
    match alg.hash_len() {
        32 => Pss::new_with_salt::<Sha256>(32),
        48 => Pss::new_with_salt::<Sha384>(48),
        _ => Pss::new_with_salt::<Sha512>(64),
    }
}

fn pkcs1_scheme(alg: Algorithm) -> Pkcs1v15Sign {
    match alg.hash_len() {
        32 => Pkcs1v15Sign::new::<Sha256>(),
        48 => Pkcs1v15Sign::new::<Sha384>(),
        _ => Pkcs1v15Sign::new::<Sha512>(),
    }
}
