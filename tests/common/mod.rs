#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tagcast::{AssetFetcher, FetchError, ImageAsset, Presentation, Renderer, TokenId};
use url::Url;

#[derive(Debug, Clone)]
pub enum RenderCall {
    Present(Presentation),
    Clear(TokenId),
}

/// Renderer that records every call.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Mutex<Vec<RenderCall>>,
}

impl RecordingRenderer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn presented(&self, id: TokenId) -> Vec<Presentation> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RenderCall::Present(p) if p.id == id => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn last_presented(&self, id: TokenId) -> Option<Presentation> {
        self.presented(id).pop()
    }

    pub fn clears(&self, id: TokenId) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, RenderCall::Clear(cleared) if *cleared == id))
            .count()
    }
}

impl Renderer for RecordingRenderer {
    fn present(&self, presentation: Presentation) {
        self.calls.lock().unwrap().push(RenderCall::Present(presentation));
    }

    fn clear(&self, id: TokenId) {
        self.calls.lock().unwrap().push(RenderCall::Clear(id));
    }
}

/// Fetcher that counts invocations, takes `delay` to answer, and fails for
/// URLs containing "broken".
#[derive(Debug, Clone)]
pub struct CountingFetcher {
    pub calls: Arc<AtomicUsize>,
    pub delay: Duration,
}

impl CountingFetcher {
    pub fn new(delay: Duration) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            delay,
        }
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AssetFetcher for CountingFetcher {
    async fn fetch(&self, url: &Url) -> Result<ImageAsset, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if url.as_str().contains("broken") {
            return Err(FetchError::network(url.as_str(), "connection reset"));
        }
        Ok(ImageAsset::new(32, 16, vec![0xff; 32 * 16 * 4]))
    }
}

/// Records every visibility count reported.
pub fn count_log() -> (Arc<Mutex<Vec<usize>>>, impl Fn(usize) + Send + Sync + 'static) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    (log, move |count| sink.lock().unwrap().push(count))
}
