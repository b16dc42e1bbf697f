use std::sync::atomic::{AtomicUsize, Ordering};

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xff);
    pub const CYAN: Color = Color::rgb(0x00, 0xff, 0xff);
    pub const GREEN: Color = Color::rgb(0x00, 0xff, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }
}

/// Hands out colors round-robin, one per new tag.
///
/// Owned by a single session, so two sessions never share a rotation.
#[derive(Debug)]
pub struct Palette {
    colors: Vec<Color>,
    next: AtomicUsize,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Self {
        Self {
            colors,
            next: AtomicUsize::new(0),
        }
    }

    /// Next color in the rotation; white if the palette is empty.
    pub fn next_color(&self) -> Color {
        if self.colors.is_empty() {
            return Color::WHITE;
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        self.colors[index % self.colors.len()]
    }

    pub fn default_colors() -> Vec<Color> {
        vec![Color::BLUE, Color::CYAN, Color::GREEN]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(Self::default_colors())
    }
}
