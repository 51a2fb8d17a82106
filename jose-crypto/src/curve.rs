//! NIST prime-curve parameters and point validation.
//!
//! The point-on-curve check runs over plain big integers, independent of
//! the elliptic-curve provider, before any provider type is constructed.

use std::sync::OnceLock;

use jose_core::alg::EcCurve;
use rsa::BigUint;

/// Domain parameters of a short-Weierstrass prime curve with `a = p − 3`.
pub(crate) struct CurveParams {
    /// Field prime.
    pub p: BigUint,
    /// Curve coefficient `b`.
    pub b: BigUint,
    /// Group order.
    pub n: BigUint,
}

// SEC 2 v2.0: secp256r1, secp384r1, secp521r1.
const P256_P: &[u8] = b"ffffffff00000001000000000000000000000000ffffffffffffffffffffffff";
const P256_B: &[u8] = b"5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b";
const P256_N: &[u8] = b"ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551";

const P384_P: &[u8] = b"fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffeffffffff0000000000000000ffffffff";
const P384_B: &[u8] = b"b3312fa7e23ee7e4988e056be3f82d19181d9c6efe8141120314088f5013875ac656398d8a2ed19d2a85c8edd3ec2aef";
const P384_N: &[u8] = b"ffffffffffffffffffffffffffffffffffffffffffffffffc7634d81f4372ddf581a0db248b0a77aecec196accc52973";

const P521_P: &[u8] = b"01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";
const P521_B: &[u8] = b"0051953eb9618e1c9a1f929a21a0b68540eea2da725b99b315f3b8b489918ef109e156193951ec7e937b1652c0bd3bb1bf073573df883d2c34f1ef451fd46b503f00";
const P521_N: &[u8] = b"01fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffa51868783bf2f966b7fcc0148f709a5d03bb5c9b8899c47aebb6fb71e91386409";

fn parse(params: [&[u8]; 3]) -> CurveParams {
    let [p, b, n] = params.map(|hex| {
        BigUint::parse_bytes(hex, 16).expect("curve constant is valid hex")
    });
    CurveParams { p, b, n }
}

/// The cached parameter set for `curve`.
pub(crate) fn params(curve: EcCurve) -> &'static CurveParams {
    static P256: OnceLock<CurveParams> = OnceLock::new();
    static P384: OnceLock<CurveParams> = OnceLock::new();
    static P521: OnceLock<CurveParams> = OnceLock::new();
    match curve {
        EcCurve::P256 => P256.get_or_init(|| parse([P256_P, P256_B, P256_N])),
        EcCurve::P384 => P384.get_or_init(|| parse([P384_P, P384_B, P384_N])),
        EcCurve::P521 => P521.get_or_init(|| parse([P521_P, P521_B, P521_N])),
    }
}

/// Whether `(x, y)` satisfies `y² ≡ x³ − 3x + b (mod p)` on `curve`.
pub(crate) fn is_on_curve(curve: EcCurve, x: &BigUint, y: &BigUint) -> bool {
    let params = params(curve);
    let p = &params.p;
    if x >= p || y >= p {
        return false;
    }
    let three = BigUint::from(3u32);
    let lhs = (y * y) % p;
    let rhs = (x.modpow(&three, p) + ((p - &three) * x) % p + &params.b) % p;
    lhs == rhs
}
