//! The token issuer.

use jose_core::JoseError;
use jose_core::alg::{Algorithm, AlgorithmFamily};
use jose_core::base64;
use jose_core::claims::RegisteredClaims;
use jose_core::codec::Codec;
use jose_core::header::{JoseHeader, Kid};
use jose_core::store::{KeyPurpose, KeyStore, resolve};
use jose_core::token::TokenString;
use jose_crypto::bridge;

/// How issued tokens are shaped and signed.
#[derive(Debug, Clone)]
pub struct IssueOptions {
    pub algorithm: Algorithm,
    pub kid: Option<Kid>,
    pub typ: Option<String>,
    pub cty: Option<String>,
}

impl IssueOptions {
    pub fn new(algorithm: Algorithm) -> Self {
        IssueOptions {
            algorithm,
            kid: None,
            typ: None,
            cty: None,
        }
    }

    pub fn with_kid(mut self, kid: Kid) -> Self {
        self.kid = Some(kid);
        self
    }

    pub fn with_typ(mut self, typ: impl Into<String>) -> Self {
        self.typ = Some(typ.into());
        self
    }

    pub fn with_cty(mut self, cty: impl Into<String>) -> Self {
        self.cty = Some(cty.into());
        self
    }
}

/// Assembles, signs and emits compact tokens.
pub struct Issuer<S> {
    options: IssueOptions,
    store: S,
    header_codec: Box<dyn Codec<JoseHeader>>,
    registered_codec: Box<dyn Codec<RegisteredClaims>>,
}

impl<S: KeyStore> Issuer<S> {
    pub fn new(
        options: IssueOptions,
        store: S,
        header_codec: impl Codec<JoseHeader> + 'static,
        registered_codec: impl Codec<RegisteredClaims> + 'static,
    ) -> Self {
        Issuer {
            options,
            store,
            header_codec: Box::new(header_codec),
            registered_codec: Box::new(registered_codec),
        }
    }

    /// Serialise, merge, sign and emit a token carrying both the custom
    /// claims `A` and the registered claims.
    ///
    /// The two claim documents are serialised independently and merged
    /// at the byte level; on a member-name collision the registered
    /// claim wins. Both documents must serialise as JSON objects.
    pub async fn issue<A>(
        &self,
        claims: &A,
        registered: &RegisteredClaims,
        claims_codec: &dyn Codec<A>,
    ) -> Result<TokenString, JoseError> {
        let header = JoseHeader {
            alg: self.options.algorithm,
            typ: self.options.typ.clone(),
            cty: self.options.cty.clone(),
            kid: self.options.kid.clone(),
        };
        let header_b64 = base64::encode(&self.header_codec.encode(&header)?);

        let custom = claims_codec.encode(claims)?;
        let registered = self.registered_codec.encode(registered)?;
        let payload_b64 = base64::encode(&merge_objects(custom, &registered)?);

        let mut token = header_b64;
        token.push('.');
        token.push_str(&payload_b64);

        let keys = self.store.keys().await;
        let jwk = resolve(
            &keys,
            self.options.algorithm,
            self.options.kid.as_ref(),
            KeyPurpose::Signing,
        )?;
        let signature = match self.options.algorithm.family() {
            AlgorithmFamily::Hmac => {
                let key = bridge::mac_key(jwk)?;
                jose_crypto::sign_mac(token.as_bytes(), &key, self.options.algorithm)?
            }
            _ => {
                let key = bridge::private_key(jwk)?;
                jose_crypto::sign(token.as_bytes(), &key, self.options.algorithm)?
            }
        };

        token.push('.');
        token.push_str(&base64::encode(&signature));
        TokenString::new(token)
    }
}

/// Byte-level merge of two serialised JSON objects.
///
/// Strips the closing brace of the first document and the opening brace
/// of the second, joining on a comma. An empty object on either side
/// yields the other unchanged. Because JSON decoders read the later
/// duplicate member, the second (registered) document wins on name
/// collision — a documented contract of issuance.
fn merge_objects(first: Vec<u8>, second: &[u8]) -> Result<Vec<u8>, JoseError> {
    // The undefined-behavior path for non-object claim documents is cut
    // off here instead: both sides must be objects.
    if !is_object(&first) || !is_object(second) {
        return Err(JoseError::malformed(
            "claims must serialise as a JSON object",
        ));
    }
    if first.len() == 2 {
        return Ok(second.to_vec());
    }
    if second.len() == 2 {
        return Ok(first);
    }
    let mut merged = first;
    merged.pop();
    merged.push(b',');
    merged.extend_from_slice(&second[1..]);
    Ok(merged)
}

fn is_object(document: &[u8]) -> bool {
    document.first() == Some(&b'{') && document.last() == Some(&b'}')
}
