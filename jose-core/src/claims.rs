//! Registered claims (RFC 7519 §4.1).

use std::fmt;
use std::time::Duration;

use crate::JoseError;

/// An RFC 7519 numeric date: seconds since the Unix epoch.
///
/// Stored as raw epoch seconds for exact wire fidelity — the JSON form is
/// an integer, never ISO-8601, and negative values are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumericDate(i64);

impl NumericDate {
    pub fn from_second(second: i64) -> Self {
        NumericDate(second)
    }

    pub fn as_second(self) -> i64 {
        self.0
    }

    /// The current wall-clock time, truncated to whole seconds.
    pub fn now() -> Self {
        NumericDate(jiff::Timestamp::now().as_second())
    }
}

impl fmt::Display for NumericDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(feature = "serde")]
mod numeric_date_wire {
    use super::*;

    impl serde::Serialize for NumericDate {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_i64(self.0)
        }
    }

    impl<'de> serde::Deserialize<'de> for NumericDate {
        fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            struct Visitor;
            impl serde::de::Visitor<'_> for Visitor {
                type Value = NumericDate;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("epoch seconds as an integer")
                }

                fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                    Ok(NumericDate(v))
                }

                fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                    i64::try_from(v)
                        .map(NumericDate)
                        .map_err(|_| E::custom("epoch seconds out of range"))
                }
            }
            d.deserialize_i64(Visitor)
        }
    }
}

/// The `aud` claim: a single audience or a non-empty list of them.
///
/// Constructed through [`Audience::single`] and [`Audience::many`]; the
/// latter collapses a length-1 sequence to `Single`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    Single(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn single(value: impl Into<String>) -> Self {
        Audience::Single(value.into())
    }

    pub fn many(values: impl IntoIterator<Item = String>) -> Result<Self, JoseError> {
        let mut values: Vec<String> = values.into_iter().collect();
        match values.len() {
            0 => Err(JoseError::malformed("audience must not be empty")),
            1 => Ok(Audience::Single(values.remove(0))),
            _ => Ok(Audience::Many(values)),
        }
    }

    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(value) => value == audience,
            Audience::Many(values) => values.iter().any(|value| value == audience),
        }
    }
}

#[cfg(feature = "serde")]
mod audience_wire {
    use super::*;
    use serde::de::SeqAccess;

    impl serde::Serialize for Audience {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Audience::Single(value) => serializer.serialize_str(value),
                Audience::Many(values) => values.serialize(serializer),
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Audience {
        fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            struct Visitor;
            impl<'de> serde::de::Visitor<'de> for Visitor {
                type Value = Audience;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("a string or a non-empty array of strings")
                }

                fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                    Ok(Audience::single(v))
                }

                fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                    let mut values = Vec::new();
                    while let Some(value) = seq.next_element::<String>()? {
                        values.push(value);
                    }
                    Audience::many(values).map_err(serde::de::Error::custom)
                }
            }
            d.deserialize_any(Visitor)
        }
    }
}

/// The registered claim set. Every member is optional; a JSON `null` is
/// treated as absent on decode, and absent members are skipped on encode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisteredClaims {
    pub iss: Option<String>,
    pub sub: Option<String>,
    pub aud: Option<Audience>,
    pub exp: Option<NumericDate>,
    pub nbf: Option<NumericDate>,
    pub iat: Option<NumericDate>,
    pub jti: Option<String>,
}

impl RegisteredClaims {
    pub fn new() -> Self {
        RegisteredClaims::default()
    }

    pub fn from_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }

    pub fn for_subject(mut self, subject: impl Into<String>) -> Self {
        self.sub = Some(subject.into());
        self
    }

    pub fn for_audience(mut self, audience: Audience) -> Self {
        self.aud = Some(audience);
        self
    }

    /// Sets `iat` to the current time and `exp` to `validity` from now.
    pub fn expires_in(mut self, validity: Duration) -> Self {
        let now = NumericDate::now();
        self.iat = Some(now);
        self.exp = Some(NumericDate::from_second(
            now.as_second().saturating_add(validity.as_secs() as i64),
        ));
        self
    }

    pub fn not_before(mut self, not_before: NumericDate) -> Self {
        self.nbf = Some(not_before);
        self
    }

    pub fn with_token_id(mut self, token_id: impl Into<String>) -> Self {
        self.jti = Some(token_id.into());
        self
    }
}

#[cfg(feature = "serde")]
mod claims_wire {
    use super::*;
    use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
    use serde::ser::{SerializeMap, Serializer};

    impl serde::Serialize for RegisteredClaims {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(None)?;
            if let Some(iss) = &self.iss {
                map.serialize_entry("iss", iss)?;
            }
            if let Some(sub) = &self.sub {
                map.serialize_entry("sub", sub)?;
            }
            if let Some(aud) = &self.aud {
                map.serialize_entry("aud", aud)?;
            }
            if let Some(exp) = &self.exp {
                map.serialize_entry("exp", exp)?;
            }
            if let Some(nbf) = &self.nbf {
                map.serialize_entry("nbf", nbf)?;
            }
            if let Some(iat) = &self.iat {
                map.serialize_entry("iat", iat)?;
            }
            if let Some(jti) = &self.jti {
                map.serialize_entry("jti", jti)?;
            }
            map.end()
        }
    }

    enum Field {
        Issuer,
        Subject,
        Audience,
        Expiration,
        NotBefore,
        IssuedAt,
        TokenIdentifier,
        Ignored,
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
                        "iss" => Field::Issuer,
                        "sub" => Field::Subject,
                        "aud" => Field::Audience,
                        "exp" => Field::Expiration,
                        "nbf" => Field::NotBefore,
                        "iat" => Field::IssuedAt,
                        "jti" => Field::TokenIdentifier,
                        _ => Field::Ignored,
                    })
                }
            }
            d.deserialize_identifier(FieldVisitor)
        }
    }

    struct ClaimsVisitor;

    impl<'de> Visitor<'de> for ClaimsVisitor {
        type Value = RegisteredClaims;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a claim set object")
        }

        // A repeated member takes the later value. Issued payloads rely
        // on this: the byte-level claim merge resolves name collisions
        // in favour of the second (registered) document.
        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut claims = RegisteredClaims::default();
            while let Some(field) = map.next_key()? {
                match field {
                    Field::Issuer => claims.iss = map.next_value()?,
                    Field::Subject => claims.sub = map.next_value()?,
                    Field::Audience => claims.aud = map.next_value()?,
                    Field::Expiration => claims.exp = map.next_value()?,
                    Field::NotBefore => claims.nbf = map.next_value()?,
                    Field::IssuedAt => claims.iat = map.next_value()?,
                    Field::TokenIdentifier => claims.jti = map.next_value()?,
                    Field::Ignored => {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
            }
            Ok(claims)
        }
    }

    impl<'de> serde::Deserialize<'de> for RegisteredClaims {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            d.deserialize_map(ClaimsVisitor)
        }
    }
}
