use super::point::Point;

/// Axis-aligned bounds of a tag on screen, stored as top-left plus size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// From opposite corners (left, top, right, bottom).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Smallest Rect enclosing all `points`. Empty input gives a zero Rect.
    pub fn bounding(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (mut x1, mut y1, mut x2, mut y2) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            x1 = x1.min(p.x);
            y1 = y1.min(p.y);
            x2 = x2.max(p.x);
            y2 = y2.max(p.y);
        }
        Self::from_tlbr(x1, y1, x2, y2)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Half-open containment: left and top edges are inside, right and bottom are not.
    pub fn contains(&self, point: &Point) -> bool {
        (self.x..self.right()).contains(&point.x) && (self.y..self.bottom()).contains(&point.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_opposite_corners() {
        let rect = Rect::from_tlbr(10.0, 20.0, 40.0, 60.0);
        assert_eq!(rect, Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!((rect.right(), rect.bottom()), (40.0, 60.0));
    }

    #[test]
    fn test_bounding_of_rotated_quad() {
        let quad = [
            Point::new(5.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(5.0, 10.0),
            Point::new(0.0, 5.0),
        ];
        let rect = Rect::bounding(&quad);
        assert_eq!(rect, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(rect.center(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_contains_is_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(&Point::new(0.0, 0.0)));
        assert!(rect.contains(&Point::new(9.9, 9.9)));
        assert!(!rect.contains(&Point::new(10.0, 5.0)));
        assert!(!rect.contains(&Point::new(-0.1, 5.0)));
    }

    #[test]
    fn test_bounding_empty() {
        assert_eq!(Rect::bounding(&[]), Rect::default());
    }
}
