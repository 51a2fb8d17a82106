//! Converting between wire JWKs and native key material.

use jose_core::JoseError;
use jose_core::alg::{Algorithm, EcCurve};
use jose_core::base64::Base64UrlString;
use jose_core::jwk::{
    EcPrivateJwk, EcPublicJwk, Jwk, JwkParams, RSA_MIN_MODULUS_BITS, RsaPrivateJwk, RsaPublicJwk,
    SymmetricJwk,
};
use rsa::BigUint;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};

use crate::curve;
use crate::keys::{MacKey, PrivateKey, PublicKey};

fn decode_uint(text: &Base64UrlString) -> Result<BigUint, JoseError> {
    Ok(BigUint::from_bytes_be(&text.decode()?))
}

/// Encode an unsigned big integer without padding (RSA `n`, `e`, …).
fn encode_uint(value: &BigUint) -> Base64UrlString {
    Base64UrlString::from_bytes(&value.to_bytes_be())
}

/// A field element padded to the curve coordinate length. Never
/// truncates: an oversized value is an error.
fn coordinate_bytes(value: &BigUint, curve: EcCurve) -> Result<Vec<u8>, JoseError> {
    let bytes = value.to_bytes_be();
    let len = curve.coordinate_len();
    if bytes.len() > len {
        return Err(JoseError::malformed("EC field element too large for curve"));
    }
    let mut out = vec![0u8; len - bytes.len()];
    out.extend_from_slice(&bytes);
    Ok(out)
}

/// Build the native public key a JWK describes.
///
/// EC points are validated against the curve equation before any
/// provider type is constructed; RSA moduli below 2048 bits are refused.
pub fn public_key(jwk: &Jwk) -> Result<PublicKey, JoseError> {
    match jwk {
        Jwk::EcPublic(key) => ec_public(key.crv, &key.x, &key.y),
        Jwk::EcPrivate(key) => ec_public(key.crv, &key.x, &key.y),
        Jwk::RsaPublic(key) => rsa_public(&key.n, &key.e),
        Jwk::RsaPrivate(key) => rsa_public(&key.n, &key.e),
        Jwk::Symmetric(_) => Err(JoseError::malformed(
            "symmetric JWK cannot provide a public key",
        )),
    }
}

fn ec_public(crv: EcCurve, x: &Base64UrlString, y: &Base64UrlString) -> Result<PublicKey, JoseError> {
    let x = decode_uint(x)?;
    let y = decode_uint(y)?;
    if !curve::is_on_curve(crv, &x, &y) {
        return Err(JoseError::malformed("EC point is not on the curve"));
    }
    let x = coordinate_bytes(&x, crv)?;
    let y = coordinate_bytes(&y, crv)?;
    match crv {
        EcCurve::P256 => {
            let point = p256::EncodedPoint::from_affine_coordinates(
                p256::FieldBytes::from_slice(&x),
                p256::FieldBytes::from_slice(&y),
                false,
            );
            p256::ecdsa::VerifyingKey::from_encoded_point(&point)
                .map(PublicKey::P256)
                .map_err(|_| JoseError::malformed("invalid EC public key"))
        }
        EcCurve::P384 => {
            let point = p384::EncodedPoint::from_affine_coordinates(
                p384::FieldBytes::from_slice(&x),
                p384::FieldBytes::from_slice(&y),
                false,
            );
            p384::ecdsa::VerifyingKey::from_encoded_point(&point)
                .map(PublicKey::P384)
                .map_err(|_| JoseError::malformed("invalid EC public key"))
        }
        EcCurve::P521 => {
            let point = p521::EncodedPoint::from_affine_coordinates(
                p521::FieldBytes::from_slice(&x),
                p521::FieldBytes::from_slice(&y),
                false,
            );
            p521::ecdsa::VerifyingKey::from_encoded_point(&point)
                .map(PublicKey::P521)
                .map_err(|_| JoseError::malformed("invalid EC public key"))
        }
    }
}

fn rsa_public(n: &Base64UrlString, e: &Base64UrlString) -> Result<PublicKey, JoseError> {
    let n = decode_uint(n)?;
    if n.bits() < RSA_MIN_MODULUS_BITS {
        return Err(JoseError::malformed("RSA key must be at least 2048 bits"));
    }
    let e = decode_uint(e)?;
    rsa::RsaPublicKey::new(n, e)
        .map(PublicKey::Rsa)
        .map_err(|_| JoseError::malformed("invalid RSA public key"))
}

/// Build the native private key a JWK describes.
pub fn private_key(jwk: &Jwk) -> Result<PrivateKey, JoseError> {
    match jwk {
        Jwk::EcPrivate(key) => ec_private(key),
        Jwk::RsaPrivate(key) => rsa_private(key),
        Jwk::EcPublic(_) | Jwk::RsaPublic(_) => Err(JoseError::malformed(
            "public JWK cannot provide a private key",
        )),
        Jwk::Symmetric(_) => Err(JoseError::malformed(
            "symmetric JWK cannot provide a private key",
        )),
    }
}

fn ec_private(key: &EcPrivateJwk) -> Result<PrivateKey, JoseError> {
    let d = coordinate_bytes(&decode_uint(&key.d)?, key.crv)?;
    match key.crv {
        EcCurve::P256 => p256::ecdsa::SigningKey::from_slice(&d)
            .map(PrivateKey::P256)
            .map_err(|_| JoseError::malformed("invalid EC private key")),
        EcCurve::P384 => p384::ecdsa::SigningKey::from_slice(&d)
            .map(PrivateKey::P384)
            .map_err(|_| JoseError::malformed("invalid EC private key")),
        EcCurve::P521 => p521::ecdsa::SigningKey::from_slice(&d)
            .map(PrivateKey::P521)
            .map_err(|_| JoseError::malformed("invalid EC private key")),
    }
}

fn rsa_private(key: &RsaPrivateJwk) -> Result<PrivateKey, JoseError> {
    let n = decode_uint(&key.n)?;
    if n.bits() < RSA_MIN_MODULUS_BITS {
        return Err(JoseError::malformed("RSA key must be at least 2048 bits"));
    }
    let e = decode_uint(&key.e)?;
    let d = decode_uint(&key.d)?;
    let p = decode_uint(&key.p)?;
    let q = decode_uint(&key.q)?;
    rsa::RsaPrivateKey::from_components(n, e, d, vec![p, q])
        .map(PrivateKey::Rsa)
        .map_err(|_| JoseError::malformed("invalid RSA private key"))
}

/// Build the keyed MAC primitive a symmetric JWK describes, labelled by
/// the JWK's `alg` member or HMAC-SHA-256 by default.
pub fn mac_key(jwk: &Jwk) -> Result<MacKey, JoseError> {
    match jwk {
        Jwk::Symmetric(key) => {
            let bytes = key.k.decode()?;
            MacKey::new(bytes, key.params.alg.unwrap_or(Algorithm::HS256))
        }
        _ => Err(JoseError::malformed("expected a symmetric JWK")),
    }
}

/// Express a native public key as a JWK.
pub fn public_jwk(key: &PublicKey, params: JwkParams) -> Result<Jwk, JoseError> {
    match key {
        PublicKey::Rsa(key) => {
            if key.n().bits() < RSA_MIN_MODULUS_BITS {
                return Err(JoseError::malformed("RSA key must be at least 2048 bits"));
            }
            Ok(Jwk::RsaPublic(RsaPublicJwk {
                n: encode_uint(key.n()),
                e: encode_uint(key.e()),
                params,
            }))
        }
        PublicKey::P256(key) => {
            let (x, y) = point_coordinates(key.to_encoded_point(false).as_bytes())?;
            Ok(Jwk::EcPublic(EcPublicJwk {
                crv: EcCurve::P256,
                x,
                y,
                params,
            }))
        }
        PublicKey::P384(key) => {
            let (x, y) = point_coordinates(key.to_encoded_point(false).as_bytes())?;
            Ok(Jwk::EcPublic(EcPublicJwk {
                crv: EcCurve::P384,
                x,
                y,
                params,
            }))
        }
        PublicKey::P521(key) => {
            let (x, y) = point_coordinates(key.to_encoded_point(false).as_bytes())?;
            Ok(Jwk::EcPublic(EcPublicJwk {
                crv: EcCurve::P521,
                x,
                y,
                params,
            }))
        }
    }
}

/// Express a native private key as a JWK. RSA keys carry the five CRT
/// parameters; EC keys carry `d` padded to the coordinate length.
pub fn private_jwk(key: &PrivateKey, params: JwkParams) -> Result<Jwk, JoseError> {
    match key {
        PrivateKey::Rsa(key) => {
            if key.n().bits() < RSA_MIN_MODULUS_BITS {
                return Err(JoseError::malformed("RSA key must be at least 2048 bits"));
            }
            let [p, q] = key.primes() else {
                return Err(JoseError::malformed("multi-prime RSA keys are not supported"));
            };
            let d = key.d();
            let one = BigUint::from(1u32);
            let dp = d % (p - &one);
            let dq = d % (q - &one);
            // q⁻¹ mod p by Fermat: p is prime.
            let qi = q.modpow(&(p - BigUint::from(2u32)), p);
            Ok(Jwk::RsaPrivate(RsaPrivateJwk {
                n: encode_uint(key.n()),
                e: encode_uint(key.e()),
                d: encode_uint(d),
                p: encode_uint(p),
                q: encode_uint(q),
                dp: encode_uint(&dp),
                dq: encode_uint(&dq),
                qi: encode_uint(&qi),
                params,
            }))
        }
        PrivateKey::P256(key) => {
            let (x, y) = point_coordinates(key.verifying_key().to_encoded_point(false).as_bytes())?;
            Ok(Jwk::EcPrivate(EcPrivateJwk {
                crv: EcCurve::P256,
                x,
                y,
                d: Base64UrlString::from_bytes(&key.to_bytes()),
                params,
            }))
        }
        PrivateKey::P384(key) => {
            let (x, y) = point_coordinates(key.verifying_key().to_encoded_point(false).as_bytes())?;
            Ok(Jwk::EcPrivate(EcPrivateJwk {
                crv: EcCurve::P384,
                x,
                y,
                d: Base64UrlString::from_bytes(&key.to_bytes()),
                params,
            }))
        }
        PrivateKey::P521(key) => {
            let verifying_key = p521::ecdsa::VerifyingKey::from(key);
            let (x, y) = point_coordinates(verifying_key.to_encoded_point(false).as_bytes())?;
            Ok(Jwk::EcPrivate(EcPrivateJwk {
                crv: EcCurve::P521,
                x,
                y,
                d: Base64UrlString::from_bytes(&key.to_bytes()),
                params,
            }))
        }
    }
}

/// Express a MAC key as a symmetric JWK. The `alg` member stays
/// unspecified unless the caller put one in `params`.
pub fn symmetric_jwk(key: &MacKey, params: JwkParams) -> Jwk {
    Jwk::Symmetric(SymmetricJwk {
        k: Base64UrlString::from_bytes(key.as_bytes()),
        params,
    })
}

fn point_coordinates(bytes: &[u8]) -> Result<(Base64UrlString, Base64UrlString), JoseError> {
    // Uncompressed SEC 1: 0x04 || x || y, both halves already padded.
    let [0x04, coordinates @ ..] = bytes else {
        return Err(JoseError::malformed("EC key is not an affine point"));
    };
    let (x, y) = coordinates.split_at(coordinates.len() / 2);
    Ok((
        Base64UrlString::from_bytes(x),
        Base64UrlString::from_bytes(y),
    ))
}
