//! Remote JWKS rotation.
//!
//! [`JwksStore`] wraps a [`Fetcher`] and exposes the rotating key
//! sequence as an infallible [`KeyStore`]. The initial fetch fulfils a
//! latch all readers await — concurrent callers share the single
//! in-flight request — and a background task refreshes periodically,
//! retaining the last-known-good sequence across failures. The task is
//! cancelled when the store is dropped.

#![forbid(unsafe_code)]

mod fetch;

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use jose_core::JoseError;
use jose_core::jwk::{Jwk, JwkSet};
use jose_core::store::KeyStore;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

pub use fetch::{Fetcher, HttpFetcher};

const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);
const MAX_INITIAL_ATTEMPTS: u32 = 20;

/// Refresh cadence and rate limiting.
#[derive(Debug, Clone)]
pub struct JwksOptions {
    /// How often the background task attempts a refresh.
    pub refresh_interval: Duration,
    /// Attempts closer than this to the last successful fetch are
    /// skipped without issuing a request. Applies to the periodic task
    /// and to [`JwksStore::refresh`].
    pub min_refresh_interval: Duration,
}

impl Default for JwksOptions {
    fn default() -> Self {
        JwksOptions {
            refresh_interval: Duration::from_secs(300),
            min_refresh_interval: Duration::from_secs(5),
        }
    }
}

type Latest = Option<Arc<[Jwk]>>;

struct Shared<F> {
    fetcher: F,
    options: JwksOptions,
    /// The latch. Fulfilment publishes a whole snapshot; dropping the
    /// sender marks the store permanently defunct (initial fetch
    /// exhausted).
    publisher: Mutex<Option<watch::Sender<Latest>>>,
    last_success: Mutex<Option<Instant>>,
    /// Single-writer discipline between the periodic task and external
    /// refresh triggers.
    write_gate: tokio::sync::Mutex<()>,
}

/// A [`KeyStore`] over a remotely rotated JWKS.
pub struct JwksStore<F> {
    shared: Arc<Shared<F>>,
    latest: watch::Receiver<Latest>,
    task: tokio::task::JoinHandle<()>,
}

impl<F: Fetcher> JwksStore<F> {
    /// Start the store. The initial fetch is scheduled immediately;
    /// `keys()` callers await its completion.
    pub fn spawn(fetcher: F, options: JwksOptions) -> Self {
        JwksStore::start(fetcher, options, None)
    }

    /// Start the store with an already-known key set: `keys()` resolves
    /// immediately and the background task only rotates.
    pub fn preloaded(fetcher: F, options: JwksOptions, initial: JwkSet) -> Self {
        JwksStore::start(fetcher, options, Some(initial))
    }

    fn start(fetcher: F, options: JwksOptions, initial: Option<JwkSet>) -> Self {
        let preloaded = initial.is_some();
        let (publisher, latest) =
            watch::channel(initial.map(|set| Arc::from(set.keys)));
        let shared = Arc::new(Shared {
            fetcher,
            options,
            publisher: Mutex::new(Some(publisher)),
            last_success: Mutex::new(preloaded.then(Instant::now)),
            write_gate: tokio::sync::Mutex::new(()),
        });
        let task = tokio::spawn(run(shared.clone(), preloaded));
        JwksStore {
            shared,
            latest,
            task,
        }
    }

    /// Refresh now, subject to the `min_refresh_interval` rate limit.
    /// A skipped (rate-limited) attempt is not an error.
    pub async fn refresh(&self) -> Result<(), JoseError> {
        try_refresh(&self.shared).await
    }
}

impl<F> Drop for JwksStore<F> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<F: Fetcher> KeyStore for JwksStore<F> {
    fn keys(&self) -> impl Future<Output = Arc<[Jwk]>> + Send {
        let mut latest = self.latest.clone();
        async move {
            match latest.wait_for(|keys| keys.is_some()).await {
                Ok(keys) => keys.clone().expect("latch is fulfilled"),
                // The initial fetch exhausted its retries: the service
                // cannot function without keys.
                Err(_) => panic!("initial JWKS fetch failed permanently"),
            }
        }
    }
}

async fn run<F: Fetcher>(shared: Arc<Shared<F>>, preloaded: bool) {
    if !preloaded && !initial_fetch(&shared).await {
        error!(
            attempts = MAX_INITIAL_ATTEMPTS,
            "initial JWKS fetch exhausted its retries; store is defunct"
        );
        shared.publisher.lock().expect("publisher lock").take();
        return;
    }

    let mut ticks = tokio::time::interval(shared.options.refresh_interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticks.tick().await; // the zeroth tick fires immediately
    loop {
        ticks.tick().await;
        if let Err(error) = try_refresh(&shared).await {
            // Failures after the first success are swallowed; the last
            // known good sequence stays published.
            warn!(%error, "JWKS refresh failed; retaining last known good keys");
        }
    }
}

async fn initial_fetch<F: Fetcher>(shared: &Shared<F>) -> bool {
    let mut delay = INITIAL_RETRY_DELAY;
    for attempt in 1..=MAX_INITIAL_ATTEMPTS {
        match fetch_and_publish(shared).await {
            Ok(()) => return true,
            Err(error) => {
                warn!(attempt, %error, retry_in = ?delay, "initial JWKS fetch failed");
            }
        }
        tokio::time::sleep(delay).await;
        delay = (delay * 2).min(MAX_RETRY_DELAY);
    }
    false
}

async fn try_refresh<F: Fetcher>(shared: &Shared<F>) -> Result<(), JoseError> {
    let _writer = shared.write_gate.lock().await;
    let last_success = *shared.last_success.lock().expect("last_success lock");
    if let Some(elapsed) = last_success.map(|at| at.elapsed()) {
        if elapsed < shared.options.min_refresh_interval {
            debug!(?elapsed, "JWKS refresh rate limited; skipping fetch");
            return Ok(());
        }
    }
    fetch_and_publish(shared).await
}

async fn fetch_and_publish<F: Fetcher>(shared: &Shared<F>) -> Result<(), JoseError> {
    let set = shared.fetcher.fetch().await?;
    info!(key_count = set.keys.len(), "JWKS refreshed");
    let keys: Arc<[Jwk]> = Arc::from(set.keys);
    {
        let publisher = shared.publisher.lock().expect("publisher lock");
        if let Some(publisher) = publisher.as_ref() {
            publisher.send_replace(Some(keys));
        }
    }
    *shared.last_success.lock().expect("last_success lock") = Some(Instant::now());
    Ok(())
}
