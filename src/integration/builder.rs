//! Builder for update events from various corner formats.

use crate::geometry::{Point, Quad};
use crate::integration::FrameEvent;
use crate::presentation::{Payload, TokenId};

/// Builder for [`FrameEvent::Update`].
#[derive(Debug, Clone, Default)]
pub struct UpdateBuilder {
    id: TokenId,
    corners: Quad,
    payload: Payload,
}

impl UpdateBuilder {
    /// Create a new update builder for tag `id`.
    pub fn new(id: TokenId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Set the corners as reported by the detector.
    pub fn corners(mut self, corners: Quad) -> Self {
        self.corners = corners;
        self
    }

    /// Set an axis-aligned quad in TLBR format (x1, y1, x2, y2), corners
    /// clockwise from the top-left.
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.corners = [
            Point::new(x1, y1),
            Point::new(x2, y1),
            Point::new(x2, y2),
            Point::new(x1, y2),
        ];
        self
    }

    /// Set an axis-aligned quad in XYWH format (center_x, center_y, width, height).
    pub fn xywh(self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.tlbr(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0)
    }

    /// Set the decoded raw value.
    pub fn raw_value(mut self, raw_value: impl Into<String>) -> Self {
        self.payload.raw_value = raw_value.into();
        self
    }

    /// Set the explicit URL field.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.payload.url = Some(url.into());
        self
    }

    /// Build the final `FrameEvent::Update`.
    pub fn build(self) -> FrameEvent {
        FrameEvent::Update {
            id: self.id,
            corners: self.corners,
            payload: self.payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_builder() {
        let event = UpdateBuilder::new(3)
            .xywh(30.0, 50.0, 40.0, 60.0)
            .raw_value("hello")
            .build();

        let FrameEvent::Update {
            id,
            corners,
            payload,
        } = event
        else {
            panic!("expected update event");
        };
        assert_eq!(id, 3);
        assert_eq!(corners[0], Point::new(10.0, 20.0));
        assert_eq!(corners[2], Point::new(50.0, 80.0));
        assert_eq!(payload, Payload::new("hello"));
    }

    #[test]
    fn test_update_builder_with_url() {
        let event = UpdateBuilder::new(1)
            .tlbr(0.0, 0.0, 10.0, 10.0)
            .raw_value("scan me")
            .url("https://example.com/a.png")
            .build();
        assert_eq!(event.id(), 1);
        match event {
            FrameEvent::Update { payload, .. } => {
                assert_eq!(payload.url.as_deref(), Some("https://example.com/a.png"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
