use crate::cache::ImageAsset;
use crate::geometry::{Homography, Point, Quad, Rect};

use super::TokenId;
use super::palette::Color;

/// Something a tag can display.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Image(ImageAsset),
    Text(String),
}

impl Content {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageAsset> {
        match self {
            Self::Image(image) => Some(image),
            Self::Text(_) => None,
        }
    }
}

/// Read-only snapshot of one tag, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub id: TokenId,
    /// Corners with index 0 at the visually top-left corner.
    pub corners: Quad,
    pub content: Content,
    pub color: Color,
    /// Axis-aligned bounds of `corners`.
    pub bounds: Rect,
    /// Where a text label starts.
    pub label_anchor: Point,
    /// Maps image pixel coordinates onto `corners`. Only set for image
    /// content on a non-degenerate quad.
    pub warp: Option<Homography>,
}

impl Presentation {
    pub fn new(id: TokenId, corners: Quad, content: Content, color: Color) -> Self {
        let warp = content
            .as_image()
            .and_then(|image| Homography::from_image_rect(image.width, image.height, &corners));
        Self {
            id,
            corners,
            bounds: Rect::bounding(&corners),
            label_anchor: corners[0],
            content,
            color,
            warp,
        }
    }
}
