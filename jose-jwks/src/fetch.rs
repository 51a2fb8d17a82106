//! Fetching a JWK Set from a remote endpoint.

use std::future::Future;
use std::time::Duration;

use jose_core::JoseError;
use jose_core::codec::Codec;
use jose_core::jwk::JwkSet;
use tracing::debug;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Retrieves the current JWK Set.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<JwkSet, JoseError>> + Send;
}

/// Fetches a JWKS document over HTTP GET.
///
/// Any 2xx response body is handed to the injected JWK Set codec; the
/// content type is not inspected. HTTP and decode failures surface as
/// `MalformedToken` with the underlying cause.
pub struct HttpFetcher {
    client: reqwest::Client,
    url: Url,
    codec: Box<dyn Codec<JwkSet>>,
}

impl HttpFetcher {
    /// A fetcher with a fresh HTTP client and a 10 s request timeout.
    pub fn new(url: Url, codec: impl Codec<JwkSet> + 'static) -> Result<Self, JoseError> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| JoseError::MalformedToken(format!("HTTP client: {e}").into()))?;
        Ok(HttpFetcher::with_client(client, url, codec))
    }

    /// A fetcher over a caller-configured client (custom timeouts,
    /// proxies, TLS roots).
    pub fn with_client(
        client: reqwest::Client,
        url: Url,
        codec: impl Codec<JwkSet> + 'static,
    ) -> Self {
        HttpFetcher {
            client,
            url,
            codec: Box::new(codec),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self) -> Result<JwkSet, JoseError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| JoseError::MalformedToken(format!("JWKS fetch failed: {e}").into()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(JoseError::MalformedToken(
                format!("JWKS endpoint returned status {status}").into(),
            ));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| JoseError::MalformedToken(format!("JWKS fetch failed: {e}").into()))?;
        let set = self.codec.decode(&body)?;
        debug!(url = %self.url, key_count = set.keys.len(), "fetched JWKS");
        Ok(set)
    }
}
