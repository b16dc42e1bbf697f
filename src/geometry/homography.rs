//! Planar projective transform between two quadrilaterals.

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

use super::point::{Point, Quad};

/// 3x3 projective transform with `h[2][2] == 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    matrix: Matrix3<f64>,
}

impl Homography {
    /// Solve for the transform mapping each `src[i]` onto `dst[i]`.
    ///
    /// Returns `None` when the correspondences are degenerate (three collinear
    /// points, repeated corners, ...).
    pub fn from_quads(src: &Quad, dst: &Quad) -> Option<Self> {
        if is_degenerate(src) || is_degenerate(dst) {
            return None;
        }

        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();

        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            let (x, y) = (s.x as f64, s.y as f64);
            let (u, v) = (d.x as f64, d.y as f64);
            let r = 2 * i;

            a[(r, 0)] = x;
            a[(r, 1)] = y;
            a[(r, 2)] = 1.0;
            a[(r, 6)] = -u * x;
            a[(r, 7)] = -u * y;
            b[r] = u;

            a[(r + 1, 3)] = x;
            a[(r + 1, 4)] = y;
            a[(r + 1, 5)] = 1.0;
            a[(r + 1, 6)] = -v * x;
            a[(r + 1, 7)] = -v * y;
            b[r + 1] = v;
        }

        let h = a.lu().solve(&b)?;
        if h.iter().any(|c| !c.is_finite()) {
            return None;
        }
        Some(Self {
            matrix: Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0),
        })
    }

    /// Transform mapping the `width` x `height` image rectangle onto `dst`,
    /// image corners taken clockwise from the top-left.
    pub fn from_image_rect(width: u32, height: u32, dst: &Quad) -> Option<Self> {
        let (w, h) = (width as f32, height as f32);
        let src = [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ];
        Self::from_quads(&src, dst)
    }

    /// Map a point through the transform; `None` for points on the horizon line.
    pub fn apply(&self, point: Point) -> Option<Point> {
        let p = self.matrix * Vector3::new(point.x as f64, point.y as f64, 1.0);
        if p.z.abs() < f64::EPSILON {
            return None;
        }
        Some(Point::new((p.x / p.z) as f32, (p.y / p.z) as f32))
    }

    /// Row-major coefficients, suitable for a renderer's 3x3 matrix type.
    pub fn to_row_major(&self) -> [f64; 9] {
        let m = &self.matrix;
        [
            m[(0, 0)],
            m[(0, 1)],
            m[(0, 2)],
            m[(1, 0)],
            m[(1, 1)],
            m[(1, 2)],
            m[(2, 0)],
            m[(2, 1)],
            m[(2, 2)],
        ]
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }
}

/// A quad whose shoelace area vanishes cannot anchor a projective transform.
fn is_degenerate(quad: &Quad) -> bool {
    let twice_area: f64 = (0..4)
        .map(|i| {
            let (p, q) = (quad[i], quad[(i + 1) % 4]);
            p.x as f64 * q.y as f64 - q.x as f64 * p.y as f64
        })
        .sum();
    twice_area.abs() < 1e-6
}
