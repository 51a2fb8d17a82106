//! ECDSA signature forms: fixed-width `R || S` and ASN.1 DER.
//!
//! JWS carries ECDSA signatures as `R || S`, each half padded to the
//! curve coordinate length; the providers speak DER. The checks in
//! [`check_raw_signature`] run before any provider code sees the
//! signature.

use jose_core::JoseError;
use jose_core::alg::EcCurve;
use rsa::BigUint;

use crate::curve;

/// Reject structurally invalid `R || S` signatures.
///
/// All-zero signatures, wrong lengths, zero halves, and halves at or
/// above the group order are refused outright (the CVE-2022-21449 class)
/// — the cryptographic primitive is never consulted for them.
pub fn check_raw_signature(curve: EcCurve, sig: &[u8]) -> Result<(), JoseError> {
    if sig.iter().all(|&b| b == 0) {
        return Err(JoseError::InvalidSignature);
    }
    if sig.len() != curve.signature_len() {
        return Err(JoseError::InvalidSignature);
    }
    let order = &curve::params(curve).n;
    let zero = BigUint::from(0u32);
    let (r, s) = sig.split_at(curve.coordinate_len());
    for half in [r, s] {
        let value = BigUint::from_bytes_be(half);
        if value == zero || &value >= order {
            return Err(JoseError::InvalidSignature);
        }
    }
    Ok(())
}

/// Transcode a DER `SEQUENCE { INTEGER r, INTEGER s }` into fixed-width
/// `R || S` for `curve`.
pub fn der_to_concat(der: &[u8], curve: EcCurve) -> Result<Vec<u8>, JoseError> {
    let coordinate_len = curve.coordinate_len();
    let content = parse_sequence(der)?;
    let (r, content) = parse_integer(content)?;
    let (s, content) = parse_integer(content)?;
    if !content.is_empty() {
        return Err(JoseError::malformed("trailing bytes in DER signature"));
    }
    let mut out = vec![0u8; 2 * coordinate_len];
    place(r, &mut out[..coordinate_len])?;
    place(s, &mut out[coordinate_len..])?;
    Ok(out)
}

/// Transcode fixed-width `R || S` into DER.
///
/// Leading zeros are stripped from each half; a half whose top bit is
/// set gains a 0x00 sign byte to stay a positive ASN.1 INTEGER.
pub fn concat_to_der(sig: &[u8]) -> Result<Vec<u8>, JoseError> {
    if sig.is_empty() || sig.len() % 2 != 0 {
        return Err(JoseError::malformed("invalid raw signature length"));
    }
    let (r, s) = sig.split_at(sig.len() / 2);
    let r = trim_leading_zeros(r);
    let s = trim_leading_zeros(s);

    let content_len = integer_len(r) + integer_len(s);
    let mut out = Vec::with_capacity(content_len + 3);
    out.push(0x30);
    if content_len < 0x80 {
        out.push(content_len as u8);
    } else {
        out.push(0x81);
        out.push(content_len as u8);
    }
    push_integer(&mut out, r);
    push_integer(&mut out, s);
    Ok(out)
}

fn parse_sequence(der: &[u8]) -> Result<&[u8], JoseError> {
    let [0x30, rest @ ..] = der else {
        return Err(JoseError::malformed("expected a DER sequence"));
    };
    let (len, rest) = parse_length(rest)?;
    if rest.len() != len {
        return Err(JoseError::malformed("DER sequence length mismatch"));
    }
    Ok(rest)
}

// Short form below 0x80, single-byte long form (0x81) above.
fn parse_length(input: &[u8]) -> Result<(usize, &[u8]), JoseError> {
    match input {
        [len, rest @ ..] if *len < 0x80 => Ok((*len as usize, rest)),
        [0x81, len, rest @ ..] if *len >= 0x80 => Ok((*len as usize, rest)),
        _ => Err(JoseError::malformed("unsupported DER length form")),
    }
}

fn parse_integer(input: &[u8]) -> Result<(&[u8], &[u8]), JoseError> {
    let [0x02, len, rest @ ..] = input else {
        return Err(JoseError::malformed("expected a DER integer"));
    };
    let len = *len as usize;
    if len >= 0x80 || rest.len() < len {
        return Err(JoseError::malformed("DER integer length mismatch"));
    }
    let (value, rest) = rest.split_at(len);
    Ok((trim_leading_zeros(value), rest))
}

fn trim_leading_zeros(mut value: &[u8]) -> &[u8] {
    while let [0, rest @ ..] = value {
        if rest.is_empty() {
            break;
        }
        value = rest;
    }
    value
}

fn place(value: &[u8], slot: &mut [u8]) -> Result<(), JoseError> {
    if value.len() > slot.len() {
        return Err(JoseError::malformed("DER integer too large for curve"));
    }
    let offset = slot.len() - value.len();
    slot[offset..].copy_from_slice(value);
    Ok(())
}

fn integer_len(value: &[u8]) -> usize {
    2 + value.len() + usize::from(value[0] & 0x80 != 0)
}

fn push_integer(out: &mut Vec<u8>, value: &[u8]) {
    out.push(0x02);
    out.push((value.len() + usize::from(value[0] & 0x80 != 0)) as u8);
    if value[0] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(value);
}
