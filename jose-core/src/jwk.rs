//! JSON Web Keys (RFC 7517) and JWK Sets.

use crate::JoseError;
use crate::alg::{Algorithm, EcCurve, KeyOp, KeyUse};
use crate::base64::Base64UrlString;
use crate::header::Kid;

/// Smallest RSA modulus accepted anywhere in the workspace.
pub const RSA_MIN_MODULUS_BITS: usize = 2048;

/// The optional metadata members shared by every JWK variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JwkParams {
    pub key_use: Option<KeyUse>,
    pub key_ops: Option<Vec<KeyOp>>,
    pub alg: Option<Algorithm>,
    pub kid: Option<Kid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EcPublicJwk {
    pub crv: EcCurve,
    pub x: Base64UrlString,
    pub y: Base64UrlString,
    pub params: JwkParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EcPrivateJwk {
    pub crv: EcCurve,
    pub x: Base64UrlString,
    pub y: Base64UrlString,
    pub d: Base64UrlString,
    pub params: JwkParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RsaPublicJwk {
    pub n: Base64UrlString,
    pub e: Base64UrlString,
    pub params: JwkParams,
}

/// A private RSA JWK always carries the five CRT parameters, not just `d`.
#[derive(Debug, Clone, PartialEq)]
pub struct RsaPrivateJwk {
    pub n: Base64UrlString,
    pub e: Base64UrlString,
    pub d: Base64UrlString,
    pub p: Base64UrlString,
    pub q: Base64UrlString,
    pub dp: Base64UrlString,
    pub dq: Base64UrlString,
    pub qi: Base64UrlString,
    pub params: JwkParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricJwk {
    pub k: Base64UrlString,
    pub params: JwkParams,
}

/// A single JSON Web Key.
#[derive(Debug, Clone, PartialEq)]
pub enum Jwk {
    EcPublic(EcPublicJwk),
    EcPrivate(EcPrivateJwk),
    RsaPublic(RsaPublicJwk),
    RsaPrivate(RsaPrivateJwk),
    Symmetric(SymmetricJwk),
}

impl Jwk {
    pub fn params(&self) -> &JwkParams {
        match self {
            Jwk::EcPublic(key) => &key.params,
            Jwk::EcPrivate(key) => &key.params,
            Jwk::RsaPublic(key) => &key.params,
            Jwk::RsaPrivate(key) => &key.params,
            Jwk::Symmetric(key) => &key.params,
        }
    }

    pub fn params_mut(&mut self) -> &mut JwkParams {
        match self {
            Jwk::EcPublic(key) => &mut key.params,
            Jwk::EcPrivate(key) => &mut key.params,
            Jwk::RsaPublic(key) => &mut key.params,
            Jwk::RsaPrivate(key) => &mut key.params,
            Jwk::Symmetric(key) => &mut key.params,
        }
    }

    pub fn kid(&self) -> Option<&Kid> {
        self.params().kid.as_ref()
    }

    pub fn with_kid(mut self, kid: Kid) -> Self {
        self.params_mut().kid = Some(kid);
        self
    }

    /// Whether this key may verify signatures made with `alg`.
    ///
    /// A key is suitable iff `use` is unset or `sig`, `key_ops` is unset
    /// or contains `verify`, and `alg` is unset or equals `alg`.
    pub fn is_suitable_for_verifying(&self, alg: Algorithm) -> bool {
        self.is_suitable(alg, KeyOp::Verify)
    }

    /// Whether this key may produce signatures with `alg`.
    pub fn is_suitable_for_signing(&self, alg: Algorithm) -> bool {
        self.is_suitable(alg, KeyOp::Sign)
    }

    fn is_suitable(&self, alg: Algorithm, op: KeyOp) -> bool {
        let params = self.params();
        let use_ok = match params.key_use {
            None => true,
            Some(key_use) => key_use == KeyUse::Sig,
        };
        let ops_ok = match &params.key_ops {
            None => true,
            Some(ops) => ops.contains(&op),
        };
        let alg_ok = match params.alg {
            None => true,
            Some(key_alg) => key_alg == alg,
        };
        use_ok && ops_ok && alg_ok
    }
}

/// Bit length of an RSA modulus given as base64url bytes.
pub fn modulus_bits(n: &Base64UrlString) -> Result<usize, JoseError> {
    let bytes = n.decode()?;
    let significant = bytes.iter().skip_while(|&&b| b == 0).count();
    match bytes.iter().find(|&&b| b != 0) {
        None => Ok(0),
        Some(msb) => Ok((significant - 1) * 8 + (8 - msb.leading_zeros() as usize)),
    }
}

pub(crate) fn check_modulus_floor(n: &Base64UrlString) -> Result<(), JoseError> {
    if modulus_bits(n)? < RSA_MIN_MODULUS_BITS {
        return Err(JoseError::malformed("RSA key must be at least 2048 bits"));
    }
    Ok(())
}

/// An ordered sequence of JWKs (RFC 7517 §5).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    pub fn new(keys: Vec<Jwk>) -> Self {
        JwkSet { keys }
    }
}

impl FromIterator<Jwk> for JwkSet {
    fn from_iter<I: IntoIterator<Item = Jwk>>(iter: I) -> Self {
        JwkSet {
            keys: iter.into_iter().collect(),
        }
    }
}

#[cfg(feature = "serde")]
mod wire {
    use std::fmt;

    use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
    use serde::ser::{Error as _, SerializeMap, Serializer};

    use super::*;

    /// Re-encode an EC field element padded to the curve coordinate length.
    fn pad_coordinate(
        value: &Base64UrlString,
        curve: EcCurve,
    ) -> Result<Base64UrlString, JoseError> {
        let bytes = value.decode()?;
        let stripped: Vec<u8> = bytes.iter().copied().skip_while(|&b| b == 0).collect();
        let len = curve.coordinate_len();
        if stripped.len() > len {
            return Err(JoseError::malformed("EC field element too large for curve"));
        }
        let mut padded = vec![0u8; len - stripped.len()];
        padded.extend_from_slice(&stripped);
        Ok(Base64UrlString::from_bytes(&padded))
    }

    impl serde::Serialize for Jwk {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(None)?;
            match self {
                Jwk::EcPublic(key) => {
                    map.serialize_entry("kty", "EC")?;
                    map.serialize_entry("crv", &key.crv)?;
                    map.serialize_entry(
                        "x",
                        &pad_coordinate(&key.x, key.crv).map_err(S::Error::custom)?,
                    )?;
                    map.serialize_entry(
                        "y",
                        &pad_coordinate(&key.y, key.crv).map_err(S::Error::custom)?,
                    )?;
                    serialize_params(&mut map, &key.params)?;
                }
                Jwk::EcPrivate(key) => {
                    map.serialize_entry("kty", "EC")?;
                    map.serialize_entry("crv", &key.crv)?;
                    map.serialize_entry(
                        "x",
                        &pad_coordinate(&key.x, key.crv).map_err(S::Error::custom)?,
                    )?;
                    map.serialize_entry(
                        "y",
                        &pad_coordinate(&key.y, key.crv).map_err(S::Error::custom)?,
                    )?;
                    map.serialize_entry(
                        "d",
                        &pad_coordinate(&key.d, key.crv).map_err(S::Error::custom)?,
                    )?;
                    serialize_params(&mut map, &key.params)?;
                }
                Jwk::RsaPublic(key) => {
                    check_modulus_floor(&key.n).map_err(S::Error::custom)?;
                    map.serialize_entry("kty", "RSA")?;
                    map.serialize_entry("n", &key.n)?;
                    map.serialize_entry("e", &key.e)?;
                    serialize_params(&mut map, &key.params)?;
                }
                Jwk::RsaPrivate(key) => {
                    check_modulus_floor(&key.n).map_err(S::Error::custom)?;
                    map.serialize_entry("kty", "RSA")?;
                    map.serialize_entry("n", &key.n)?;
                    map.serialize_entry("e", &key.e)?;
                    map.serialize_entry("d", &key.d)?;
                    map.serialize_entry("p", &key.p)?;
                    map.serialize_entry("q", &key.q)?;
                    map.serialize_entry("dp", &key.dp)?;
                    map.serialize_entry("dq", &key.dq)?;
                    map.serialize_entry("qi", &key.qi)?;
                    serialize_params(&mut map, &key.params)?;
                }
                Jwk::Symmetric(key) => {
                    map.serialize_entry("kty", "oct")?;
                    map.serialize_entry("k", &key.k)?;
                    serialize_params(&mut map, &key.params)?;
                }
            }
            map.end()
        }
    }

    fn serialize_params<M: SerializeMap>(map: &mut M, params: &JwkParams) -> Result<(), M::Error> {
        if let Some(key_use) = &params.key_use {
            map.serialize_entry("use", key_use)?;
        }
        if let Some(key_ops) = &params.key_ops {
            map.serialize_entry("key_ops", key_ops)?;
        }
        if let Some(alg) = &params.alg {
            map.serialize_entry("alg", alg)?;
        }
        if let Some(kid) = &params.kid {
            map.serialize_entry("kid", kid)?;
        }
        Ok(())
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Field {
        Kty,
        Crv,
        X,
        Y,
        D,
        N,
        E,
        P,
        Q,
        Dp,
        Dq,
        Qi,
        K,
        Use,
        KeyOps,
        Alg,
        Kid,
        Ignored,
    }

    impl Field {
        fn name(self) -> &'static str {
            match self {
                Field::Kty => "kty",
                Field::Crv => "crv",
                Field::X => "x",
                Field::Y => "y",
                Field::D => "d",
                Field::N => "n",
                Field::E => "e",
                Field::P => "p",
                Field::Q => "q",
                Field::Dp => "dp",
                Field::Dq => "dq",
                Field::Qi => "qi",
                Field::K => "k",
                Field::Use => "use",
                Field::KeyOps => "key_ops",
                Field::Alg => "alg",
                Field::Kid => "kid",
                Field::Ignored => "?",
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Field {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            struct FieldVisitor;
            impl serde::de::Visitor<'_> for FieldVisitor {
                type Value = Field;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("field identifier")
                }

                fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                    Ok(match v {
                        "kty" => Field::Kty,
                        "crv" => Field::Crv,
                        "x" => Field::X,
                        "y" => Field::Y,
                        "d" => Field::D,
                        "n" => Field::N,
                        "e" => Field::E,
                        "p" => Field::P,
                        "q" => Field::Q,
                        "dp" => Field::Dp,
                        "dq" => Field::Dq,
                        "qi" => Field::Qi,
                        "k" => Field::K,
                        "use" => Field::Use,
                        "key_ops" => Field::KeyOps,
                        "alg" => Field::Alg,
                        "kid" => Field::Kid,
                        _ => Field::Ignored,
                    })
                }
            }
            d.deserialize_identifier(FieldVisitor)
        }
    }

    #[derive(Default)]
    struct RawJwk {
        kty: Option<String>,
        crv: Option<EcCurve>,
        material: [Option<Base64UrlString>; 11],
        params: JwkParams,
    }

    impl RawJwk {
        fn slot(&mut self, field: Field) -> &mut Option<Base64UrlString> {
            let index = match field {
                Field::X => 0,
                Field::Y => 1,
                Field::D => 2,
                Field::N => 3,
                Field::E => 4,
                Field::P => 5,
                Field::Q => 6,
                Field::Dp => 7,
                Field::Dq => 8,
                Field::Qi => 9,
                Field::K => 10,
                _ => unreachable!("not a key material field"),
            };
            &mut self.material[index]
        }

        fn take<E: serde::de::Error>(&mut self, field: Field) -> Result<Base64UrlString, E> {
            self.slot(field)
                .take()
                .ok_or_else(|| E::missing_field(field.name()))
        }
    }

    struct JwkVisitor;

    impl<'de> Visitor<'de> for JwkVisitor {
        type Value = Jwk;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a JWK object")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut raw = RawJwk::default();
            while let Some(field) = map.next_key()? {
                match field {
                    Field::Kty => {
                        if raw.kty.is_some() {
                            return Err(serde::de::Error::duplicate_field("kty"));
                        }
                        raw.kty = Some(map.next_value()?);
                    }
                    Field::Crv => {
                        if raw.crv.is_some() {
                            return Err(serde::de::Error::duplicate_field("crv"));
                        }
                        raw.crv = Some(map.next_value()?);
                    }
                    Field::Use => {
                        if raw.params.key_use.is_some() {
                            return Err(serde::de::Error::duplicate_field("use"));
                        }
                        raw.params.key_use = map.next_value()?;
                    }
                    Field::KeyOps => {
                        if raw.params.key_ops.is_some() {
                            return Err(serde::de::Error::duplicate_field("key_ops"));
                        }
                        raw.params.key_ops = map.next_value()?;
                    }
                    Field::Alg => {
                        if raw.params.alg.is_some() {
                            return Err(serde::de::Error::duplicate_field("alg"));
                        }
                        raw.params.alg = map.next_value()?;
                    }
                    Field::Kid => {
                        if raw.params.kid.is_some() {
                            return Err(serde::de::Error::duplicate_field("kid"));
                        }
                        raw.params.kid = map.next_value()?;
                    }
                    Field::Ignored => {
                        map.next_value::<IgnoredAny>()?;
                    }
                    material => {
                        let slot = raw.slot(material);
                        if slot.is_some() {
                            return Err(serde::de::Error::duplicate_field(material.name()));
                        }
                        *slot = Some(map.next_value()?);
                    }
                }
            }
            finish_jwk(raw)
        }
    }

    fn finish_jwk<E: serde::de::Error>(mut raw: RawJwk) -> Result<Jwk, E> {
        let kty = raw.kty.take().ok_or_else(|| E::missing_field("kty"))?;
        match kty.as_str() {
            "EC" => {
                let crv = raw.crv.ok_or_else(|| E::missing_field("crv"))?;
                let x = raw.take(Field::X)?;
                let y = raw.take(Field::Y)?;
                match raw.slot(Field::D).take() {
                    Some(d) => Ok(Jwk::EcPrivate(EcPrivateJwk {
                        crv,
                        x,
                        y,
                        d,
                        params: raw.params,
                    })),
                    None => Ok(Jwk::EcPublic(EcPublicJwk {
                        crv,
                        x,
                        y,
                        params: raw.params,
                    })),
                }
            }
            "RSA" => {
                let n = raw.take(Field::N)?;
                let e = raw.take(Field::E)?;
                check_modulus_floor(&n).map_err(E::custom)?;
                match raw.slot(Field::D).take() {
                    Some(d) => {
                        let p = raw.take(Field::P)?;
                        let q = raw.take(Field::Q)?;
                        let dp = raw.take(Field::Dp)?;
                        let dq = raw.take(Field::Dq)?;
                        let qi = raw.take(Field::Qi)?;
                        Ok(Jwk::RsaPrivate(RsaPrivateJwk {
                            n,
                            e,
                            d,
                            p,
                            q,
                            dp,
                            dq,
                            qi,
                            params: raw.params,
                        }))
                    }
                    None => Ok(Jwk::RsaPublic(RsaPublicJwk {
                        n,
                        e,
                        params: raw.params,
                    })),
                }
            }
            "oct" => {
                let k = raw.take(Field::K)?;
                Ok(Jwk::Symmetric(SymmetricJwk {
                    k,
                    params: raw.params,
                }))
            }
            other => Err(E::custom(format!("unsupported key type {other:?}"))),
        }
    }

    impl<'de> serde::Deserialize<'de> for Jwk {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            d.deserialize_map(JwkVisitor)
        }
    }

    impl serde::Serialize for JwkSet {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry("keys", &self.keys)?;
            map.end()
        }
    }

    struct JwkSetVisitor;

    impl<'de> Visitor<'de> for JwkSetVisitor {
        type Value = JwkSet;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a JWK Set object")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut keys: Option<Vec<Jwk>> = None;
            while let Some(field) = map.next_key::<String>()? {
                if field == "keys" {
                    if keys.is_some() {
                        return Err(serde::de::Error::duplicate_field("keys"));
                    }
                    keys = Some(map.next_value()?);
                } else {
                    map.next_value::<IgnoredAny>()?;
                }
            }
            // A set without a "keys" member is an empty set.
            Ok(JwkSet {
                keys: keys.unwrap_or_default(),
            })
        }
    }

    impl<'de> serde::Deserialize<'de> for JwkSet {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            d.deserialize_map(JwkSetVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b64(text: &str) -> Base64UrlString {
        Base64UrlString::new(text).unwrap()
    }

    // 2048-bit modulus: 0x80 followed by 255 zero bytes.
    fn min_modulus() -> Base64UrlString {
        let mut bytes = vec![0u8; 256];
        bytes[0] = 0x80;
        Base64UrlString::from_bytes(&bytes)
    }

    #[test]
    fn modulus_bit_length() {
        assert_eq!(modulus_bits(&min_modulus()).unwrap(), 2048);
        assert_eq!(
            modulus_bits(&Base64UrlString::from_bytes(&[0x01, 0x00])).unwrap(),
            9
        );
        assert_eq!(
            modulus_bits(&Base64UrlString::from_bytes(&[0x00, 0xff])).unwrap(),
            8
        );
    }

    #[test]
    fn symmetric_suitability_with_unset_members() {
        let key = Jwk::Symmetric(SymmetricJwk {
            k: b64("c2VjcmV0"),
            params: JwkParams::default(),
        });
        // use, key_ops and alg all unset: suitable for everything.
        assert!(key.is_suitable_for_verifying(Algorithm::HS256));
        assert!(key.is_suitable_for_signing(Algorithm::HS512));
    }

    #[test]
    fn suitability_respects_each_member() {
        let mut key = Jwk::Symmetric(SymmetricJwk {
            k: b64("c2VjcmV0"),
            params: JwkParams {
                key_use: Some(KeyUse::Enc),
                ..JwkParams::default()
            },
        });
        assert!(!key.is_suitable_for_verifying(Algorithm::HS256));

        key.params_mut().key_use = Some(KeyUse::Sig);
        key.params_mut().key_ops = Some(vec![KeyOp::Verify]);
        assert!(key.is_suitable_for_verifying(Algorithm::HS256));
        assert!(!key.is_suitable_for_signing(Algorithm::HS256));

        key.params_mut().key_ops = Some(vec![KeyOp::Sign, KeyOp::Verify]);
        key.params_mut().alg = Some(Algorithm::HS384);
        assert!(!key.is_suitable_for_signing(Algorithm::HS256));
        assert!(key.is_suitable_for_signing(Algorithm::HS384));
    }

    #[test]
    fn decodes_an_ec_public_jwk() {
        let jwk: Jwk = serde_json::from_str(
            r#"{"kty":"EC","crv":"P-256","x":"MKBCTNIcKUSDii11ySs3526iDZ8AiTo7Tu6KPAqv7D4",
                "y":"4Etl6SRW2YiLUrN5vfvVHuhp7x8PxltmWWlbbM4IFyM","use":"sig","kid":"1"}"#,
        )
        .unwrap();
        let Jwk::EcPublic(key) = &jwk else {
            panic!("expected an EC public key");
        };
        assert_eq!(key.crv, EcCurve::P256);
        assert_eq!(key.params.key_use, Some(KeyUse::Sig));
        assert_eq!(jwk.kid().unwrap().as_str(), "1");
    }

    #[test]
    fn ec_jwk_with_d_is_private() {
        let jwk: Jwk = serde_json::from_str(
            r#"{"kty":"EC","crv":"P-256","x":"MKBCTNIcKUSDii11ySs3526iDZ8AiTo7Tu6KPAqv7D4",
                "y":"4Etl6SRW2YiLUrN5vfvVHuhp7x8PxltmWWlbbM4IFyM",
                "d":"870MB6gfuTJ4HtUnUvYMyJpr5eUZNP4Bk43bVdj3eAE"}"#,
        )
        .unwrap();
        assert!(matches!(jwk, Jwk::EcPrivate(_)));
    }

    #[test]
    fn rejects_okp_and_unknown_key_types() {
        assert!(
            serde_json::from_str::<Jwk>(r#"{"kty":"OKP","crv":"Ed25519","x":"AA"}"#).is_err()
        );
        assert!(serde_json::from_str::<Jwk>(r#"{"kty":"foo"}"#).is_err());
    }

    #[test]
    fn rejects_small_rsa_modulus_on_decode() {
        // 1024-bit modulus.
        let mut bytes = vec![0u8; 128];
        bytes[0] = 0x80;
        let n = Base64UrlString::from_bytes(&bytes);
        let doc = format!(r#"{{"kty":"RSA","n":"{n}","e":"AQAB"}}"#);
        let err = serde_json::from_str::<Jwk>(&doc).unwrap_err();
        assert!(err.to_string().contains("2048"));
    }

    #[test]
    fn rejects_small_rsa_modulus_on_encode() {
        let mut bytes = vec![0u8; 128];
        bytes[0] = 0x80;
        let jwk = Jwk::RsaPublic(RsaPublicJwk {
            n: Base64UrlString::from_bytes(&bytes),
            e: b64("AQAB"),
            params: JwkParams::default(),
        });
        assert!(serde_json::to_string(&jwk).is_err());
    }

    #[test]
    fn rsa_private_requires_crt_parameters() {
        let n = min_modulus();
        let doc = format!(r#"{{"kty":"RSA","n":"{n}","e":"AQAB","d":"AQ"}}"#);
        assert!(serde_json::from_str::<Jwk>(&doc).is_err());
    }

    #[test]
    fn rsa_public_round_trips() {
        let jwk = Jwk::RsaPublic(RsaPublicJwk {
            n: min_modulus(),
            e: b64("AQAB"),
            params: JwkParams {
                alg: Some(Algorithm::RS256),
                kid: Some(Kid::new("rsa-1").unwrap()),
                ..JwkParams::default()
            },
        });
        let text = serde_json::to_string(&jwk).unwrap();
        let decoded: Jwk = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, jwk);
    }

    #[test]
    fn ec_coordinates_are_padded_on_encode() {
        // A 31-byte x coordinate must be left-padded to 32 on the wire.
        let mut x = vec![1u8; 31];
        x[0] = 0x7f;
        let jwk = Jwk::EcPublic(EcPublicJwk {
            crv: EcCurve::P256,
            x: Base64UrlString::from_bytes(&x),
            y: Base64UrlString::from_bytes(&[2u8; 32]),
            params: JwkParams::default(),
        });
        let text = serde_json::to_string(&jwk).unwrap();
        let decoded: Jwk = serde_json::from_str(&text).unwrap();
        let Jwk::EcPublic(key) = decoded else {
            panic!("expected an EC public key");
        };
        let padded = key.x.decode().unwrap();
        assert_eq!(padded.len(), 32);
        assert_eq!(padded[0], 0);
        assert_eq!(&padded[1..], &x[..]);
    }

    #[test]
    fn every_variant_round_trips_through_the_wire() {
        let coord = Base64UrlString::from_bytes(&[7u8; 32]);
        let set = JwkSet::new(vec![
            Jwk::EcPublic(EcPublicJwk {
                crv: EcCurve::P256,
                x: coord.clone(),
                y: coord.clone(),
                params: JwkParams {
                    key_use: Some(KeyUse::Sig),
                    ..JwkParams::default()
                },
            }),
            Jwk::EcPrivate(EcPrivateJwk {
                crv: EcCurve::P256,
                x: coord.clone(),
                y: coord.clone(),
                d: coord.clone(),
                params: JwkParams::default(),
            }),
            Jwk::RsaPublic(RsaPublicJwk {
                n: min_modulus(),
                e: b64("AQAB"),
                params: JwkParams::default(),
            }),
            Jwk::RsaPrivate(RsaPrivateJwk {
                n: min_modulus(),
                e: b64("AQAB"),
                d: b64("Aw"),
                p: b64("BQ"),
                q: b64("Bw"),
                dp: b64("AQ"),
                dq: b64("Aw"),
                qi: b64("AQ"),
                params: JwkParams::default(),
            }),
            Jwk::Symmetric(SymmetricJwk {
                k: b64("c2VjcmV0"),
                params: JwkParams {
                    key_ops: Some(vec![KeyOp::Sign, KeyOp::Verify]),
                    alg: Some(Algorithm::HS256),
                    ..JwkParams::default()
                },
            }),
        ]);
        let text = serde_json::to_string(&set).unwrap();
        let decoded: JwkSet = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, set);
    }

    #[test]
    fn jwk_set_wire_shapes() {
        let set: JwkSet = serde_json::from_str(r#"{"keys":[]}"#).unwrap();
        assert!(set.keys.is_empty());

        // A missing "keys" member decodes as the empty set.
        let set: JwkSet = serde_json::from_str("{}").unwrap();
        assert!(set.keys.is_empty());

        let set: JwkSet =
            serde_json::from_str(r#"{"keys":[{"kty":"oct","k":"c2VjcmV0"}],"extra":1}"#).unwrap();
        assert_eq!(set.keys.len(), 1);
    }
}
