//! Published RFC 7515 signing examples verified against this
//! implementation.

use jose_core::alg::{Algorithm, AlgorithmFamily};
use jose_core::base64;
use jose_core::claims::RegisteredClaims;
use jose_core::codec::Codec;
use jose_core::header::JoseHeader;
use jose_core::jwk::Jwk;
use jose_core::token::TokenString;
use jose_test::read_vectors;
use serde::Deserialize;

#[derive(Deserialize)]
struct SignatureVector {
    alg: Algorithm,
    jwk: Jwk,
    token: TokenString,
}

#[test]
fn rfc7515_signatures_verify() {
    for vector in read_vectors::<SignatureVector>("rfc7515.json").tests {
        let SignatureVector { alg, jwk, token } = vector.data;
        let signature = base64::decode(token.signature_b64())
            .unwrap_or_else(|e| panic!("{}: signature decodes: {e}", vector.name));

        match alg.family() {
            AlgorithmFamily::Hmac => {
                let key = jose_crypto::bridge::mac_key(&jwk).unwrap();
                jose_crypto::verify_mac(token.signing_input(), &signature, &key, alg)
                    .unwrap_or_else(|e| panic!("{}: verifies: {e}", vector.name));
            }
            _ => {
                let key = jose_crypto::bridge::public_key(&jwk).unwrap();
                jose_crypto::verify(token.signing_input(), &signature, &key, alg)
                    .unwrap_or_else(|e| panic!("{}: verifies: {e}", vector.name));
            }
        }

        // A flipped signature byte must not verify.
        let mut tampered = signature.clone();
        tampered[0] ^= 0x01;
        let failed = match alg.family() {
            AlgorithmFamily::Hmac => {
                let key = jose_crypto::bridge::mac_key(&jwk).unwrap();
                jose_crypto::verify_mac(token.signing_input(), &tampered, &key, alg).is_err()
            }
            _ => {
                let key = jose_crypto::bridge::public_key(&jwk).unwrap();
                jose_crypto::verify(token.signing_input(), &tampered, &key, alg).is_err()
            }
        };
        assert!(failed, "{}: tampered signature rejected", vector.name);
    }
}

#[test]
fn rfc7515_header_and_claims_decode() {
    let vectors = read_vectors::<SignatureVector>("rfc7515.json");
    let token = &vectors.tests[0].data.token;

    let header: JoseHeader = jose_json::header_codec()
        .decode(&base64::decode(token.header_b64()).unwrap())
        .unwrap();
    assert_eq!(header.alg, Algorithm::HS256);
    assert_eq!(header.typ.as_deref(), Some("JWT"));

    let claims: RegisteredClaims = jose_json::claims_codec()
        .decode(&base64::decode(token.payload_b64()).unwrap())
        .unwrap();
    assert_eq!(claims.iss.as_deref(), Some("joe"));
    assert_eq!(claims.exp.unwrap().as_second(), 1_300_819_380);
}
