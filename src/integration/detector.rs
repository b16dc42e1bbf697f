//! Inbound stream from a tag detector.

use crate::geometry::Quad;
use crate::presentation::{Payload, TokenId};

/// One detector callback for one tracked tag.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    /// The detector started tracking a new identity.
    NewItem { id: TokenId },
    /// The tag was seen in the current frame.
    Update {
        id: TokenId,
        corners: Quad,
        payload: Payload,
    },
    /// The tag was not seen in the current frame.
    Missing { id: TokenId },
    /// The detector stopped tracking the tag.
    Done { id: TokenId },
}

impl FrameEvent {
    pub fn id(&self) -> TokenId {
        match self {
            Self::NewItem { id }
            | Self::Update { id, .. }
            | Self::Missing { id }
            | Self::Done { id } => *id,
        }
    }
}

/// Trait for detection engines feeding a [`Session`](crate::Session).
///
/// # Example
///
/// ```ignore
/// use tagcast::{EventSource, FrameEvent};
///
/// struct Replay {
///     frames: std::vec::IntoIter<Vec<FrameEvent>>,
/// }
///
/// impl EventSource for Replay {
///     type Error = std::convert::Infallible;
///
///     fn next_frame(&mut self) -> Result<Option<Vec<FrameEvent>>, Self::Error> {
///         Ok(self.frames.next())
///     }
/// }
/// ```
pub trait EventSource {
    /// Error type for detection failures.
    type Error;

    /// Events for the next camera frame, in the order they should be applied.
    /// `None` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<Vec<FrameEvent>>, Self::Error>;
}
