//! Single-flight memoization of presentation assets.
//!
//! The first lookup of an image key inserts a pending slot and spawns the
//! one and only fetch for that key. Later lookups, concurrent or not, attach
//! to the pending slot's watch channel instead of fetching again. Once the
//! fetch settles the outcome, success or failure, is kept for the lifetime of
//! the cache. There is no eviction and no retry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::watch;
use url::Url;

use crate::cache::fetcher::AssetFetcher;
use crate::error::FetchError;
use crate::presentation::{Content, PresentationKey};
use crate::sync::lock;

/// Settled result of resolving a key.
pub type Outcome = Result<Content, FetchError>;

enum Slot {
    Pending(watch::Receiver<Option<Outcome>>),
    Settled(Outcome),
}

/// Result of a non-blocking [`AssetCache::resolve`].
pub enum Resolution {
    Settled(Outcome),
    Pending(PendingAsset),
}

impl Resolution {
    /// Wait for the outcome.
    pub async fn outcome(self) -> Outcome {
        match self {
            Self::Settled(outcome) => outcome,
            Self::Pending(pending) => pending.wait().await,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// Handle on an in-flight fetch.
pub struct PendingAsset {
    url: Url,
    rx: watch::Receiver<Option<Outcome>>,
}

impl PendingAsset {
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Wait for the fetch to settle. Yields [`FetchError::Cancelled`] if the
    /// fetch task was dropped first.
    pub async fn wait(mut self) -> Outcome {
        let settled = match self.rx.wait_for(Option::is_some).await {
            Ok(settled) => (*settled).clone(),
            Err(_) => None,
        };
        settled.unwrap_or_else(|| {
            Err(FetchError::Cancelled {
                url: self.url.to_string(),
            })
        })
    }
}

/// Key-addressed asset cache with at most one fetch per key.
pub struct AssetCache<F> {
    fetcher: Arc<F>,
    runtime: Handle,
    slots: Arc<Mutex<HashMap<PresentationKey, Slot>>>,
    fetches: AtomicUsize,
}

impl<F: AssetFetcher> AssetCache<F> {
    /// Fetches are spawned onto `runtime`.
    pub fn new(fetcher: F, runtime: Handle) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            runtime,
            slots: Arc::new(Mutex::new(HashMap::new())),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Look up `key`, starting its fetch if this is the first request.
    ///
    /// Never blocks on the fetch. Text keys settle immediately and never
    /// reach the fetcher.
    pub fn resolve(&self, key: &PresentationKey) -> Resolution {
        let url = match key {
            PresentationKey::Text { text } => {
                return Resolution::Settled(Ok(Content::Text(text.clone())));
            }
            PresentationKey::Image { url } => url,
        };

        let mut slots = lock(&self.slots);
        match slots.get(key) {
            Some(Slot::Settled(outcome)) => Resolution::Settled(outcome.clone()),
            Some(Slot::Pending(rx)) => Resolution::Pending(PendingAsset {
                url: url.clone(),
                rx: rx.clone(),
            }),
            None => {
                let (tx, rx) = watch::channel(None);
                slots.insert(key.clone(), Slot::Pending(rx.clone()));
                drop(slots);
                self.spawn_fetch(key.clone(), url.clone(), tx);
                Resolution::Pending(PendingAsset {
                    url: url.clone(),
                    rx,
                })
            }
        }
    }

    /// The settled outcome for `key`, if any. Does not start a fetch.
    pub fn peek(&self, key: &PresentationKey) -> Option<Outcome> {
        match lock(&self.slots).get(key) {
            Some(Slot::Settled(outcome)) => Some(outcome.clone()),
            _ => None,
        }
    }

    /// Number of image keys seen so far, pending or settled.
    pub fn len(&self) -> usize {
        lock(&self.slots).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total fetches started over the cache's lifetime.
    pub fn fetches_started(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    fn spawn_fetch(&self, key: PresentationKey, url: Url, tx: watch::Sender<Option<Outcome>>) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let fetcher = Arc::clone(&self.fetcher);
        let mut slot = SettleSlot {
            key,
            url,
            slots: Arc::clone(&self.slots),
            tx,
            published: false,
        };

        self.runtime.spawn(async move {
            let url = slot.url.clone();
            tracing::info!(%url, "Loading image");
            let outcome = fetcher.fetch(&url).await.map(Content::Image);
            match &outcome {
                Ok(_) => tracing::debug!(%url, "Image loaded"),
                Err(e) => {
                    tracing::warn!(%url, error = %e, "Image fetch failed, tag falls back to text")
                }
            }
            slot.publish(outcome);
        });
    }
}

/// Settles one pending slot and wakes its waiters.
///
/// If the fetch task goes away without a result (the fetcher panicked, or the
/// runtime dropped the task), the slot settles as [`FetchError::Cancelled`]
/// so later lookups do not stay pending forever.
struct SettleSlot {
    key: PresentationKey,
    url: Url,
    slots: Arc<Mutex<HashMap<PresentationKey, Slot>>>,
    tx: watch::Sender<Option<Outcome>>,
    published: bool,
}

impl SettleSlot {
    fn publish(&mut self, outcome: Outcome) {
        self.published = true;
        lock(&self.slots).insert(self.key.clone(), Slot::Settled(outcome.clone()));
        self.tx.send_replace(Some(outcome));
    }
}

impl Drop for SettleSlot {
    fn drop(&mut self) {
        if self.published {
            return;
        }
        tracing::warn!(url = %self.url, "Image fetch ended without a result");
        let cancelled = Err(FetchError::Cancelled {
            url: self.url.to_string(),
        });
        self.publish(cancelled);
    }
}
