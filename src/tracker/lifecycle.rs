//! Per-tag lifecycle state machine.
//!
//! ```text
//! Unseen --update--> Active --missing--> MissingGrace --update--> Active
//!                      |                      |
//!                      +---------done---------+--> Gone --timer--> Removed
//!                                                   |
//!                                       new item / update: back to Active
//! ```
//!
//! A single missing frame never hides a tag. Removal only follows the
//! detector's "done" signal, after a delay, and any sighting before the delay
//! elapses cancels it.

use tokio::task::JoinHandle;

use crate::cache::Outcome;
use crate::geometry::{Quad, normalize_orientation};
use crate::presentation::{Color, Content, Payload, Presentation, PresentationKey, TokenId};
use crate::tracker::track_state::TrackState;

/// What [`TrackerLifecycle::depart`] asks the owner to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// Never shown; drop it right away.
    Immediate,
    /// Start the hide timer tagged with this epoch.
    Scheduled(u64),
    /// Already gone or removed.
    Ignored,
}

/// Mutable state of one tracked tag.
#[derive(Debug)]
pub struct TrackerLifecycle {
    id: TokenId,
    color: Color,
    state: TrackState,
    /// Key derived from the latest payload.
    key: Option<PresentationKey>,
    /// Key whose resolution `display` holds.
    shown_key: Option<PresentationKey>,
    /// Key with a resolution continuation in flight.
    awaiting: Option<PresentationKey>,
    raw_value: String,
    corners: Option<Quad>,
    display: Option<Content>,
    hide_timer: Option<JoinHandle<()>>,
    /// Bumped whenever a scheduled hide is cancelled, so a timer that already
    /// fired can tell it is stale.
    epoch: u64,
    enabled: bool,
}

impl TrackerLifecycle {
    pub fn new(id: TokenId, color: Color) -> Self {
        Self {
            id,
            color,
            state: TrackState::Unseen,
            key: None,
            shown_key: None,
            awaiting: None,
            raw_value: String::new(),
            corners: None,
            display: None,
            hide_timer: None,
            epoch: 0,
            enabled: false,
        }
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn key(&self) -> Option<&PresentationKey> {
        self.key.as_ref()
    }

    pub fn display(&self) -> Option<&Content> {
        self.display.as_ref()
    }

    /// Whether the tag has been counted by the visibility coordinator.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The detector (re)announced this id. Cancels a pending hide.
    pub fn announce(&mut self) {
        if self.state == TrackState::Gone {
            self.cancel_hide();
            self.state = TrackState::Active;
        }
    }

    /// Apply one frame's report. Returns `true` on the first sighting, when
    /// the owner should count the tag as visible.
    pub fn observe(&mut self, corners: Quad, payload: &Payload, rotation_degrees: f32) -> bool {
        if self.state == TrackState::Removed {
            return false;
        }
        if self.state == TrackState::Gone {
            self.cancel_hide();
        }
        self.state = TrackState::Active;
        self.corners = Some(normalize_orientation(corners, rotation_degrees));
        self.raw_value.clone_from(&payload.raw_value);
        self.key = Some(PresentationKey::from_payload(payload));

        let first_sighting = !self.enabled;
        self.enabled = true;
        first_sighting
    }

    /// The current key if it still has to be looked up in the cache.
    pub fn pending_key(&self) -> Option<&PresentationKey> {
        let key = self.key.as_ref()?;
        if self.shown_key.as_ref() == Some(key) || self.awaiting.as_ref() == Some(key) {
            return None;
        }
        Some(key)
    }

    pub fn mark_awaiting(&mut self, key: PresentationKey) {
        self.awaiting = Some(key);
    }

    /// Apply the cache's answer for `key`. A failed fetch shows the raw
    /// payload as text. Returns `false` if the answer is stale.
    pub fn settle(&mut self, key: &PresentationKey, outcome: Outcome) -> bool {
        if self.awaiting.as_ref() == Some(key) {
            self.awaiting = None;
        }
        if self.state == TrackState::Removed || self.key.as_ref() != Some(key) {
            return false;
        }
        self.display = Some(match outcome {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(id = self.id, error = %e, "Showing payload as text");
                Content::Text(self.raw_value.clone())
            }
        });
        self.shown_key = Some(key.clone());
        true
    }

    /// The tag was absent from a frame. Nothing changes on screen.
    pub fn miss(&mut self) {
        if self.state == TrackState::Active {
            self.state = TrackState::MissingGrace;
        }
    }

    /// The detector is done with the tag.
    pub fn depart(&mut self) -> Departure {
        match self.state {
            TrackState::Unseen => {
                self.state = TrackState::Removed;
                Departure::Immediate
            }
            TrackState::Active | TrackState::MissingGrace => {
                self.state = TrackState::Gone;
                self.epoch += 1;
                Departure::Scheduled(self.epoch)
            }
            TrackState::Gone | TrackState::Removed => Departure::Ignored,
        }
    }

    pub fn set_hide_timer(&mut self, timer: JoinHandle<()>) {
        if let Some(previous) = self.hide_timer.replace(timer) {
            previous.abort();
        }
    }

    /// The hide timer for `epoch` fired. Returns `true` if the tag is now
    /// removed; `false` for a timer that was cancelled in the meantime.
    pub fn expire(&mut self, epoch: u64) -> bool {
        if self.state != TrackState::Gone || self.epoch != epoch {
            return false;
        }
        self.state = TrackState::Removed;
        self.hide_timer = None;
        true
    }

    /// Session teardown: cancel timers without firing them.
    pub fn retire(&mut self) {
        if let Some(timer) = self.hide_timer.take() {
            timer.abort();
        }
        self.state = TrackState::Removed;
    }

    /// Snapshot for the renderer, if there is anything to draw.
    pub fn presentation(&self) -> Option<Presentation> {
        if !self.state.is_displayed() {
            return None;
        }
        let corners = self.corners?;
        let content = self.display.clone()?;
        Some(Presentation::new(self.id, corners, content, self.color))
    }

    fn cancel_hide(&mut self) {
        self.epoch += 1;
        if let Some(timer) = self.hide_timer.take() {
            timer.abort();
        }
        tracing::debug!(id = self.id, "Pending hide cancelled");
    }
}

impl Drop for TrackerLifecycle {
    fn drop(&mut self) {
        if let Some(timer) = self.hide_timer.take() {
            timer.abort();
        }
    }
}
