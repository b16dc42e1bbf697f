//! PresentationPipeline for combining a detector with a session.

use crate::cache::AssetFetcher;
use crate::integration::{EventSource, Renderer};
use crate::tracker::Session;

/// Bundles an [`EventSource`] with the [`Session`] it feeds.
pub struct PresentationPipeline<S: EventSource, F, R> {
    source: S,
    session: Session<F, R>,
}

impl<S: EventSource, F: AssetFetcher, R: Renderer> PresentationPipeline<S, F, R> {
    pub fn new(source: S, session: Session<F, R>) -> Self {
        Self { source, session }
    }

    /// Pull one frame of events from the source and apply them in order.
    ///
    /// Returns the number of events applied, or `None` once the source is
    /// exhausted.
    pub fn process_frame(&mut self) -> Result<Option<usize>, S::Error> {
        let Some(events) = self.source.next_frame()? else {
            return Ok(None);
        };
        let count = events.len();
        for event in events {
            self.session.handle(event);
        }
        Ok(Some(count))
    }

    /// Get a reference to the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a mutable reference to the underlying source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Get a reference to the underlying session.
    pub fn session(&self) -> &Session<F, R> {
        &self.session
    }

    /// Stop the session and hand back the source.
    pub fn into_source(self) -> S {
        self.session.shutdown();
        self.source
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::runtime::Handle;
    use url::Url;

    use super::*;
    use crate::cache::ImageAsset;
    use crate::error::FetchError;
    use crate::integration::{FrameEvent, UpdateBuilder};
    use crate::presentation::{Presentation, TokenId};

    struct MockSource {
        frames: Vec<Vec<FrameEvent>>,
    }

    impl EventSource for MockSource {
        type Error = std::convert::Infallible;

        fn next_frame(&mut self) -> Result<Option<Vec<FrameEvent>>, Self::Error> {
            if self.frames.is_empty() {
                Ok(None)
            } else {
                Ok(Some(self.frames.remove(0)))
            }
        }
    }

    struct NoFetch;

    impl AssetFetcher for NoFetch {
        async fn fetch(&self, url: &Url) -> Result<ImageAsset, FetchError> {
            Err(FetchError::network(url.as_str(), "offline"))
        }
    }

    #[derive(Default)]
    struct Frames(Mutex<Vec<TokenId>>);

    impl Renderer for Frames {
        fn present(&self, presentation: Presentation) {
            self.0.lock().unwrap().push(presentation.id);
        }

        fn clear(&self, _id: TokenId) {}
    }

    #[tokio::test(start_paused = true)]
    async fn test_presentation_pipeline() {
        let source = MockSource {
            frames: vec![
                vec![
                    FrameEvent::NewItem { id: 4 },
                    UpdateBuilder::new(4).tlbr(0.0, 0.0, 8.0, 8.0).raw_value("hi").build(),
                ],
                vec![FrameEvent::Missing { id: 4 }],
            ],
        };
        let renderer = Arc::new(Frames::default());
        let session = Session::builder(NoFetch, Arc::clone(&renderer))
            .build(Handle::current())
            .unwrap();

        let mut pipeline = PresentationPipeline::new(source, session);
        assert_eq!(pipeline.process_frame().unwrap(), Some(2));
        assert_eq!(pipeline.process_frame().unwrap(), Some(1));
        assert_eq!(pipeline.process_frame().unwrap(), None);

        assert_eq!(*renderer.0.lock().unwrap(), vec![4]);
        assert_eq!(pipeline.session().visible_count(), 1);
    }
}
