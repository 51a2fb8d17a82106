//! RFC 7638 JWK thumbprints.

use jose_core::base64;
use jose_core::header::Kid;
use jose_core::jwk::Jwk;
use sha2::{Digest, Sha256};

/// The SHA-256 thumbprint of a key, base64url-encoded, as a [`Kid`].
///
/// The digest input is the canonical JSON object of the required members
/// of the key type, in lexicographic member order, with no whitespace.
/// Private variants hash the same members as their public halves.
pub fn thumbprint(jwk: &Jwk) -> Kid {
    let canonical = match jwk {
        Jwk::EcPublic(key) => format!(
            r#"{{"crv":"{}","kty":"EC","x":"{}","y":"{}"}}"#,
            key.crv, key.x, key.y
        ),
        Jwk::EcPrivate(key) => format!(
            r#"{{"crv":"{}","kty":"EC","x":"{}","y":"{}"}}"#,
            key.crv, key.x, key.y
        ),
        Jwk::RsaPublic(key) => {
            format!(r#"{{"e":"{}","kty":"RSA","n":"{}"}}"#, key.e, key.n)
        }
        Jwk::RsaPrivate(key) => {
            format!(r#"{{"e":"{}","kty":"RSA","n":"{}"}}"#, key.e, key.n)
        }
        Jwk::Symmetric(key) => format!(r#"{{"k":"{}","kty":"oct"}}"#, key.k),
    };
    let digest = Sha256::digest(canonical.as_bytes());
    Kid::new(base64::encode(&digest)).expect("thumbprint text is never empty")
}

#[cfg(test)]
mod tests {
    use jose_core::base64::Base64UrlString;
    use jose_core::jwk::{JwkParams, RsaPublicJwk, SymmetricJwk};

    use super::*;

    // RFC 7638 §3.1: the example RSA key and its published thumbprint.
    const RFC_N: &str = "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw";
    const RFC_THUMBPRINT: &str = "NzbLsXh8uDCcd-6MNwXF4W_7noWXFZAfHkxZsRGC9Xs";

    #[test]
    fn rfc7638_rsa_example() {
        let jwk = Jwk::RsaPublic(RsaPublicJwk {
            n: Base64UrlString::new(RFC_N).unwrap(),
            e: Base64UrlString::new("AQAB").unwrap(),
            params: JwkParams::default(),
        });
        assert_eq!(thumbprint(&jwk).as_str(), RFC_THUMBPRINT);
    }

    #[test]
    fn symmetric_thumbprint_is_stable() {
        let jwk = Jwk::Symmetric(SymmetricJwk {
            k: Base64UrlString::new("c2VjcmV0").unwrap(),
            params: JwkParams::default(),
        });
        assert_eq!(thumbprint(&jwk), thumbprint(&jwk));
    }
}
