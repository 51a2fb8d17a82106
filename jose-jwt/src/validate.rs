//! The token processor.

use std::time::Duration;

use jose_core::JoseError;
use jose_core::alg::{Algorithm, AlgorithmFamily};
use jose_core::base64;
use jose_core::claims::{NumericDate, RegisteredClaims};
use jose_core::codec::Codec;
use jose_core::header::JoseHeader;
use jose_core::store::{KeyPurpose, KeyStore, resolve};
use jose_core::token::{Jwt, TokenString};
use jose_crypto::bridge;

/// A non-empty algorithm allow-list.
#[derive(Debug, Clone)]
pub struct AllowedAlgorithms(Vec<Algorithm>);

impl AllowedAlgorithms {
    pub fn new(algorithms: impl IntoIterator<Item = Algorithm>) -> Result<Self, JoseError> {
        let algorithms: Vec<Algorithm> = algorithms.into_iter().collect();
        if algorithms.is_empty() {
            return Err(JoseError::malformed("algorithm allow-list must not be empty"));
        }
        Ok(AllowedAlgorithms(algorithms))
    }

    pub fn contains(&self, alg: Algorithm) -> bool {
        self.0.contains(&alg)
    }
}

/// What the validator demands of a token beyond its signature.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    pub clock_skew: Duration,
    pub required_issuer: Option<String>,
    pub required_audience: Option<String>,
    pub required_typ: Option<String>,
    pub allowed_algorithms: AllowedAlgorithms,
}

impl ValidationOptions {
    pub fn new(allowed_algorithms: AllowedAlgorithms) -> Self {
        ValidationOptions {
            clock_skew: Duration::ZERO,
            required_issuer: None,
            required_audience: None,
            required_typ: None,
            allowed_algorithms,
        }
    }

    pub fn with_clock_skew(mut self, clock_skew: Duration) -> Self {
        self.clock_skew = clock_skew;
        self
    }

    pub fn require_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.required_issuer = Some(issuer.into());
        self
    }

    pub fn require_audience(mut self, audience: impl Into<String>) -> Self {
        self.required_audience = Some(audience.into());
        self
    }

    pub fn require_typ(mut self, typ: impl Into<String>) -> Self {
        self.required_typ = Some(typ.into());
        self
    }
}

/// Validates compact tokens against a key store.
pub struct Validator<S> {
    options: ValidationOptions,
    store: S,
    header_codec: Box<dyn Codec<JoseHeader>>,
    registered_codec: Box<dyn Codec<RegisteredClaims>>,
}

impl<S: KeyStore> Validator<S> {
    pub fn new(
        options: ValidationOptions,
        store: S,
        header_codec: impl Codec<JoseHeader> + 'static,
        registered_codec: impl Codec<RegisteredClaims> + 'static,
    ) -> Self {
        Validator {
            options,
            store,
            header_codec: Box::new(header_codec),
            registered_codec: Box::new(registered_codec),
        }
    }

    /// Run the full pipeline over `token`, decoding the payload as the
    /// caller's claim shape `A` alongside the registered claims.
    ///
    /// The pipeline is strictly fail-fast: segmentation, header decode,
    /// algorithm admission, key resolution, signature verification,
    /// payload decode, then claim validation against a single wall-clock
    /// read.
    pub async fn validate<A>(
        &self,
        token: &str,
        claims_codec: &dyn Codec<A>,
    ) -> Result<Jwt<A>, JoseError> {
        let token = TokenString::new(token)?;
        let header_bytes = base64::decode(token.header_b64())?;
        let payload_bytes = base64::decode(token.payload_b64())?;
        let signature = base64::decode(token.signature_b64())?;

        let header = self.header_codec.decode(&header_bytes)?;
        if !self.options.allowed_algorithms.contains(header.alg) {
            return Err(JoseError::UnsupportedAlgorithm(header.alg.name().to_owned()));
        }

        let keys = self.store.keys().await;
        let jwk = resolve(
            &keys,
            header.alg,
            header.kid.as_ref(),
            KeyPurpose::Verification,
        )?;
        match header.alg.family() {
            AlgorithmFamily::Hmac => {
                let key = bridge::mac_key(jwk)?;
                jose_crypto::verify_mac(token.signing_input(), &signature, &key, header.alg)?;
            }
            _ => {
                let key = bridge::public_key(jwk)?;
                jose_crypto::verify(token.signing_input(), &signature, &key, header.alg)?;
            }
        }

        let claims: A = claims_codec.decode(&payload_bytes)?;
        let registered = self.registered_codec.decode(&payload_bytes)?;
        self.check_claims(&header, &registered)?;

        Ok(Jwt {
            header,
            claims,
            registered,
        })
    }

    fn check_claims(
        &self,
        header: &JoseHeader,
        registered: &RegisteredClaims,
    ) -> Result<(), JoseError> {
        let now = NumericDate::now();
        let skew = self.options.clock_skew.as_secs().min(i64::MAX as u64) as i64;

        if let Some(exp) = registered.exp {
            if now.as_second() >= exp.as_second().saturating_add(skew) {
                return Err(JoseError::Expired {
                    expires_at: exp,
                    now,
                });
            }
        }
        if let Some(nbf) = registered.nbf {
            if now.as_second() < nbf.as_second().saturating_sub(skew) {
                return Err(JoseError::NotYetValid {
                    not_before: nbf,
                    now,
                });
            }
        }
        if let Some(issuer) = &self.options.required_issuer {
            if registered.iss.as_deref() != Some(issuer.as_str()) {
                return Err(JoseError::InvalidIssuer {
                    expected: issuer.clone(),
                    actual: registered.iss.clone(),
                });
            }
        }
        if let Some(audience) = &self.options.required_audience {
            let heard = registered
                .aud
                .as_ref()
                .is_some_and(|aud| aud.contains(audience));
            if !heard {
                return Err(JoseError::InvalidAudience {
                    expected: audience.clone(),
                    actual: registered.aud.clone(),
                });
            }
        }
        if let Some(typ) = &self.options.required_typ {
            if header.typ.as_deref() != Some(typ.as_str()) {
                return Err(JoseError::malformed("typ mismatch"));
            }
        }
        Ok(())
    }
}
