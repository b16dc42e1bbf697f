//! Integration module for connecting detectors, renderers and cameras with a
//! [`Session`](crate::Session).
//!
//! This module provides the traits at the session's outer edges and
//! utilities for driving it from a detection backend.

mod builder;
mod detector;
mod focus;
mod pipeline;
mod renderer;

pub use builder::UpdateBuilder;
pub use detector::{EventSource, FrameEvent};
pub use focus::{FocusController, FocusMode, FocusPolicy};
pub use pipeline::PresentationPipeline;
pub use renderer::Renderer;

#[cfg(feature = "http-fetcher")]
mod http_fetcher;

#[cfg(feature = "http-fetcher")]
pub use http_fetcher::HttpFetcher;
