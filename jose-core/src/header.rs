//! The JOSE protected header.

use std::fmt;
use std::str::FromStr;

use crate::JoseError;
use crate::alg::Algorithm;

/// A key identifier. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Kid(String);

impl Kid {
    pub fn new(value: impl Into<String>) -> Result<Self, JoseError> {
        let value = value.into();
        if value.is_empty() {
            return Err(JoseError::malformed("kid must not be empty"));
        }
        Ok(Kid(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Kid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Kid {
    type Err = JoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kid::new(s)
    }
}

#[cfg(feature = "serde")]
crate::serde_str!(Kid, "a key identifier");

/// The JOSE header of a JWS.
///
/// Only `alg`, `typ`, `cty` and `kid` are modelled; unknown members are
/// ignored on decode. `alg` is required and `"none"` is rejected during
/// decode, before any verification can take place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoseHeader {
    pub alg: Algorithm,
    pub typ: Option<String>,
    pub cty: Option<String>,
    pub kid: Option<Kid>,
}

impl JoseHeader {
    pub fn new(alg: Algorithm) -> Self {
        JoseHeader {
            alg,
            typ: None,
            cty: None,
            kid: None,
        }
    }
}

#[cfg(feature = "serde")]
mod wire {
    use super::*;
    use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
    use serde::ser::{SerializeMap, Serializer};

    impl serde::Serialize for JoseHeader {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let len = 1
                + usize::from(self.typ.is_some())
                + usize::from(self.cty.is_some())
                + usize::from(self.kid.is_some());
            let mut map = serializer.serialize_map(Some(len))?;
            map.serialize_entry("alg", &self.alg)?;
            if let Some(typ) = &self.typ {
                map.serialize_entry("typ", typ)?;
            }
            if let Some(cty) = &self.cty {
                map.serialize_entry("cty", cty)?;
            }
            if let Some(kid) = &self.kid {
                map.serialize_entry("kid", kid)?;
            }
            map.end()
        }
    }

    enum Field {
        Alg,
        Typ,
        Cty,
        Kid,
        Ignored,
    }

    impl<'de> serde::Deserialize<'de> for Field {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            struct FieldVisitor;
            impl Visitor<'_> for FieldVisitor {
                type Value = Field;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("field identifier")
                }

                fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                    Ok(match v {
                        "alg" => Field::Alg,
                        "typ" => Field::Typ,
                        "cty" => Field::Cty,
                        "kid" => Field::Kid,
                        _ => Field::Ignored,
                    })
                }
            }
            d.deserialize_identifier(FieldVisitor)
        }
    }

    struct HeaderVisitor;

    impl<'de> Visitor<'de> for HeaderVisitor {
        type Value = JoseHeader;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a JOSE header object")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut alg: Option<Algorithm> = None;
            let mut typ: Option<String> = None;
            let mut cty: Option<String> = None;
            let mut kid: Option<Kid> = None;
            while let Some(field) = map.next_key()? {
                match field {
                    Field::Alg => {
                        if alg.is_some() {
                            return Err(serde::de::Error::duplicate_field("alg"));
                        }
                        alg = Some(map.next_value()?);
                    }
                    Field::Typ => {
                        if typ.is_some() {
                            return Err(serde::de::Error::duplicate_field("typ"));
                        }
                        typ = map.next_value()?;
                    }
                    Field::Cty => {
                        if cty.is_some() {
                            return Err(serde::de::Error::duplicate_field("cty"));
                        }
                        cty = map.next_value()?;
                    }
                    Field::Kid => {
                        if kid.is_some() {
                            return Err(serde::de::Error::duplicate_field("kid"));
                        }
                        kid = map.next_value()?;
                    }
                    Field::Ignored => {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
            }
            let alg = alg.ok_or_else(|| serde::de::Error::missing_field("alg"))?;
            Ok(JoseHeader { alg, typ, cty, kid })
        }
    }

    impl<'de> serde::Deserialize<'de> for JoseHeader {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            d.deserialize_map(HeaderVisitor)
        }
    }
}
