//! Presentation cache and tracker lifecycle for overlaying content on
//! detected visual tags.
//!
//! A detector reports each tracked tag once per camera frame. For every tag,
//! a [`Session`] decides what to draw (an image fetched from the tag's URL,
//! or the tag's text) and where (its corners, reordered so the label stays
//! upright as the device rotates), while absorbing single-frame dropouts and
//! track hand-overs so overlays do not flicker.
//!
//! - [`AssetCache`] fetches each distinct image at most once, shared by all tags.
//! - [`TrackerLifecycle`] debounces a tag's appearance and disappearance.
//! - [`VisibilityCoordinator`] reports a debounced count of visible tags,
//!   used to pick a camera focus mode.
//! - [`normalize_orientation`] picks a stable reference corner under rotation.

pub mod cache;
pub mod error;
pub mod geometry;
pub mod integration;
pub mod presentation;
mod sync;
pub mod tracker;

pub use cache::{AssetCache, AssetFetcher, ImageAsset, Outcome, PendingAsset, Resolution};
pub use error::{ConfigError, FetchError};
pub use geometry::{Homography, Point, Quad, Rect, normalize_orientation};
pub use integration::{
    EventSource, FocusController, FocusMode, FocusPolicy, FrameEvent, PresentationPipeline,
    Renderer, UpdateBuilder,
};
#[cfg(feature = "http-fetcher")]
pub use integration::HttpFetcher;
pub use presentation::{Color, Content, Palette, Payload, Presentation, PresentationKey, TokenId};
pub use tracker::{
    Session, SessionBuilder, SessionConfig, TrackState, TrackerLifecycle, VisibilityCoordinator,
};
