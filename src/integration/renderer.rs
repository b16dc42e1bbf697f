use std::sync::Arc;

use crate::presentation::{Presentation, TokenId};

/// Drawing surface for tag overlays.
///
/// Called from the producer thread and from runtime tasks (fetch
/// continuations, hide timers), with the tag's lock held; `clear` also runs
/// with the session registry locked. Implementations must not call back into
/// the session.
pub trait Renderer: Send + Sync + 'static {
    /// Draw or redraw a tag.
    fn present(&self, presentation: Presentation);

    /// Remove a tag's overlay.
    fn clear(&self, id: TokenId);
}

impl<T: Renderer> Renderer for Arc<T> {
    fn present(&self, presentation: Presentation) {
        (**self).present(presentation)
    }

    fn clear(&self, id: TokenId) {
        (**self).clear(id)
    }
}
