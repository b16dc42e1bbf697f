//! What a tracked tag shows, and the snapshot handed to the renderer.

mod content;
mod key;
mod palette;

pub use content::{Content, Presentation};
pub use key::{Payload, PresentationKey, parse_url};
pub use palette::{Color, Palette};

/// Detector-assigned identity of a tracked tag.
///
/// Unique among concurrently live tags; the detector may reuse it after the
/// tag is done.
pub type TokenId = u32;
