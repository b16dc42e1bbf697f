//! Owner of every tracked tag in one camera session.
//!
//! The producer thread calls the `on_*` handlers synchronously, once per
//! detector callback. Handlers never wait on a fetch: a pending asset gets a
//! continuation task that updates the tag when the fetch settles. Hide timers
//! run on the same runtime.
//!
//! Locks are always taken in the order registry, then tag, then visibility
//! coordinator. Resolution continuations take only the tag lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;

use crate::cache::{AssetCache, AssetFetcher, Resolution};
use crate::error::ConfigError;
use crate::geometry::{Point, Quad, Rect};
use crate::integration::{FrameEvent, Renderer};
use crate::presentation::{Palette, Payload, Presentation, TokenId};
use crate::sync::lock;
use crate::tracker::config::SessionConfig;
use crate::tracker::lifecycle::{Departure, TrackerLifecycle};
use crate::tracker::visibility::VisibilityCoordinator;

type Tracker = Arc<Mutex<TrackerLifecycle>>;

#[derive(Default)]
struct Registry {
    trackers: HashMap<TokenId, Tracker>,
    closed: bool,
}

struct Shared<R> {
    config: SessionConfig,
    renderer: R,
    registry: Mutex<Registry>,
    visibility: VisibilityCoordinator,
    palette: Palette,
    rotation_bits: AtomicU32,
    runtime: Handle,
}

/// Builder for [`Session`].
pub struct SessionBuilder<F, R> {
    fetcher: F,
    renderer: R,
    config: SessionConfig,
    on_visibility_changed: Option<Box<dyn Fn(usize) + Send + Sync>>,
}

impl<F: AssetFetcher, R: Renderer> SessionBuilder<F, R> {
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Called with the debounced number of visible tags; typically drives
    /// the camera's focus mode.
    pub fn on_visibility_changed(
        mut self,
        listener: impl Fn(usize) + Send + Sync + 'static,
    ) -> Self {
        self.on_visibility_changed = Some(Box::new(listener));
        self
    }

    /// Validate the configuration and start the session. Fetches and timers
    /// are spawned onto `runtime`.
    pub fn build(self, runtime: Handle) -> Result<Session<F, R>, ConfigError> {
        self.config.validate()?;

        let listener = self.on_visibility_changed;
        let visibility = VisibilityCoordinator::new(
            self.config.visibility_done_delay,
            runtime.clone(),
            move |count| {
                if let Some(listener) = &listener {
                    listener(count);
                }
            },
        );

        Ok(Session {
            cache: Arc::new(AssetCache::new(self.fetcher, runtime.clone())),
            shared: Arc::new(Shared {
                palette: Palette::new(self.config.palette.clone()),
                config: self.config,
                renderer: self.renderer,
                registry: Mutex::new(Registry::default()),
                visibility,
                rotation_bits: AtomicU32::new(0.0f32.to_bits()),
                runtime,
            }),
        })
    }
}

/// Presentation coordinator for all tags tracked in one camera session.
pub struct Session<F, R> {
    cache: Arc<AssetCache<F>>,
    shared: Arc<Shared<R>>,
}

impl<F: AssetFetcher, R: Renderer> Session<F, R> {
    pub fn builder(fetcher: F, renderer: R) -> SessionBuilder<F, R> {
        SessionBuilder {
            fetcher,
            renderer,
            config: SessionConfig::default(),
            on_visibility_changed: None,
        }
    }

    /// Dispatch one detector event.
    pub fn handle(&self, event: FrameEvent) {
        match event {
            FrameEvent::NewItem { id } => self.on_new_item(id),
            FrameEvent::Update {
                id,
                corners,
                payload,
            } => self.on_update(id, corners, &payload),
            FrameEvent::Missing { id } => self.on_missing(id),
            FrameEvent::Done { id } => self.on_done(id),
        }
    }

    /// Latest device rotation in degrees, applied from the next update on.
    pub fn set_rotation(&self, degrees: f32) {
        self.shared
            .rotation_bits
            .store(degrees.to_bits(), Ordering::Relaxed);
    }

    pub fn rotation(&self) -> f32 {
        f32::from_bits(self.shared.rotation_bits.load(Ordering::Relaxed))
    }

    /// The detector started tracking `id`. Re-announcing a tag that is
    /// waiting to be hidden keeps it on screen.
    pub fn on_new_item(&self, id: TokenId) {
        self.shared.with_tracker(id, true, |_, life| {
            tracing::debug!(id, "New tag");
            life.announce();
        });
    }

    /// One frame's sighting of `id`: store its corners, start resolving its
    /// payload if that changed, and present whatever is already resolved.
    pub fn on_update(&self, id: TokenId, corners: Quad, payload: &Payload) {
        self.shared.with_tracker(id, true, |tracker, life| {
            tracing::trace!(id, raw_value = %payload.raw_value, "Tag update");
            self.apply_update(tracker, life, corners, payload);
        });
    }

    fn apply_update(
        &self,
        tracker: &Tracker,
        life: &mut TrackerLifecycle,
        corners: Quad,
        payload: &Payload,
    ) {
        let id = life.id();

        if life.observe(corners, payload, self.rotation()) {
            self.shared.visibility.on_tracker_enabled(id);
        }

        if let Some(key) = life.pending_key().cloned() {
            match self.cache.resolve(&key) {
                Resolution::Settled(outcome) => {
                    life.settle(&key, outcome);
                }
                Resolution::Pending(pending) => {
                    life.mark_awaiting(key.clone());
                    let shared = Arc::clone(&self.shared);
                    let tracker = Arc::clone(tracker);
                    self.shared.runtime.spawn(async move {
                        let outcome = pending.wait().await;
                        let mut life = lock(&tracker);
                        if life.settle(&key, outcome) {
                            if let Some(presentation) = life.presentation() {
                                shared.renderer.present(presentation);
                            }
                        }
                    });
                }
            }
        }

        if let Some(presentation) = life.presentation() {
            self.shared.renderer.present(presentation);
        }
    }

    /// `id` was not seen in this frame. The overlay stays as it is.
    pub fn on_missing(&self, id: TokenId) {
        self.shared.with_tracker(id, false, |_, life| life.miss());
    }

    /// The detector dropped `id`. Its overlay is cleared after
    /// [`SessionConfig::hide_after_done_delay`] unless it is seen again first.
    pub fn on_done(&self, id: TokenId) {
        let mut registry = lock(&self.shared.registry);
        let Some(tracker) = registry.trackers.get(&id).cloned() else {
            return;
        };
        let mut life = lock(&tracker);

        match life.depart() {
            Departure::Immediate => {
                registry.trackers.remove(&id);
                tracing::debug!(id, "Tag done before it was shown");
            }
            Departure::Scheduled(epoch) => {
                drop(registry);
                let shared = Arc::clone(&self.shared);
                let delay = self.shared.config.hide_after_done_delay;
                let timer = self.shared.runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    shared.expire(id, epoch);
                });
                life.set_hide_timer(timer);
            }
            Departure::Ignored => {}
        }
    }

    /// Debounced number of visible tags.
    pub fn visible_count(&self) -> usize {
        self.shared.visibility.current_count()
    }

    /// Number of tags currently held, including ones waiting to be hidden.
    pub fn tracked_count(&self) -> usize {
        lock(&self.shared.registry).trackers.len()
    }

    /// Snapshots of every drawable tag, ordered by id.
    pub fn presentations(&self) -> Vec<Presentation> {
        let trackers: Vec<Tracker> = lock(&self.shared.registry)
            .trackers
            .values()
            .cloned()
            .collect();
        let mut presentations: Vec<Presentation> = trackers
            .iter()
            .filter_map(|tracker| lock(tracker).presentation())
            .collect();
        presentations.sort_by_key(|p| p.id);
        presentations
    }

    /// The tag under a tap at `point`: the first (lowest id) tag whose
    /// bounds contain it, otherwise the tag whose bounds' center is nearest.
    pub fn token_at(&self, point: Point) -> Option<TokenId> {
        let bounds: Vec<(TokenId, Rect)> = self
            .presentations()
            .into_iter()
            .map(|p| (p.id, p.bounds))
            .collect();

        if let Some((id, _)) = bounds.iter().find(|(_, rect)| rect.contains(&point)) {
            return Some(*id);
        }
        bounds
            .iter()
            .map(|(id, rect)| (*id, rect.center().distance_sq(&point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    pub fn cache(&self) -> &AssetCache<F> {
        &self.cache
    }

    pub fn config(&self) -> &SessionConfig {
        &self.shared.config
    }

    pub fn renderer(&self) -> &R {
        &self.shared.renderer
    }

    /// End the session: cancel every timer without firing it and drop all
    /// tags. In-flight fetches are not awaited; their results are ignored.
    pub fn shutdown(&self) {
        self.shared.close();
    }

    pub fn is_shut_down(&self) -> bool {
        lock(&self.shared.registry).closed
    }
}

impl<F, R> Drop for Session<F, R> {
    fn drop(&mut self) {
        self.shared.close();
    }
}

impl<R> Shared<R> {
    /// Run `f` on the tracker for `id`, inserting a fresh one if `create` is
    /// set. The registry lock is held until the tag lock is taken, so a hide
    /// timer cannot remove the tag in between.
    fn with_tracker<T>(
        &self,
        id: TokenId,
        create: bool,
        f: impl FnOnce(&Tracker, &mut TrackerLifecycle) -> T,
    ) -> Option<T> {
        let mut registry = lock(&self.registry);
        if registry.closed {
            tracing::trace!(id, "Event after shutdown ignored");
            return None;
        }
        let tracker = match registry.trackers.get(&id) {
            Some(tracker) => Arc::clone(tracker),
            None if create => {
                let tracker = Arc::new(Mutex::new(TrackerLifecycle::new(
                    id,
                    self.palette.next_color(),
                )));
                registry.trackers.insert(id, Arc::clone(&tracker));
                tracker
            }
            None => return None,
        };
        let mut life = lock(&tracker);
        drop(registry);
        Some(f(&tracker, &mut life))
    }

    fn close(&self) {
        let mut registry = lock(&self.registry);
        if registry.closed {
            return;
        }
        registry.closed = true;
        let count = registry.trackers.len();
        for (_, tracker) in registry.trackers.drain() {
            lock(&tracker).retire();
        }
        drop(registry);
        self.visibility.shutdown();
        tracing::debug!(tags = count, "Session shut down");
    }
}

impl<R: Renderer> Shared<R> {
    fn expire(&self, id: TokenId, epoch: u64) {
        let mut registry = lock(&self.registry);
        let Some(tracker) = registry.trackers.get(&id).cloned() else {
            return;
        };
        let mut life = lock(&tracker);
        if !life.expire(epoch) {
            return;
        }
        registry.trackers.remove(&id);

        // The registry stays locked until the old tag is fully retired, so a
        // reused id cannot be presented or counted before this clear.
        tracing::debug!(id, "Tag removed");
        self.renderer.clear(id);
        if life.is_enabled() {
            self.visibility.on_tracker_done(id);
        }
    }
}
