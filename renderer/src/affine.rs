use crate::shapes::Point;

/// A 2D affine transform stored as `[a, b, c, d, e, f]`, mapping
/// `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.
///
/// Products are applied left to right: `A * B` first applies `A`, then `B`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine(pub [f64; 6]);

impl Affine {
    #[inline]
    pub const fn identity() -> Self {
        Self::scale(1.0)
    }

    #[inline]
    pub const fn scale(s: f64) -> Affine {
        Affine([s, 0.0, 0.0, s, 0.0, 0.0])
    }

    #[inline]
    pub const fn scale_xy(sx: f64, sy: f64) -> Affine {
        Affine([sx, 0.0, 0.0, sy, 0.0, 0.0])
    }

    #[inline]
    pub const fn translate(x: f64, y: f64) -> Affine {
        Affine([1.0, 0.0, 0.0, 1.0, x, y])
    }

    /// Rotation by `theta` degrees. In a y-down pixel space this turns
    /// clockwise on screen.
    #[inline]
    pub fn rotate(theta: f64) -> Affine {
        let (s, c) = theta.to_radians().sin_cos();
        Affine([c, s, -s, c, 0.0, 0.0])
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        let [a, b, c, d, e, f] = self.0;
        Point {
            x: a * p.x + c * p.y + e,
            y: b * p.x + d * p.y + f,
        }
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.0[0] * self.0[3] - self.0[1] * self.0[2]
    }

    /// Returns the inverse transform, or `None` if the transform collapses
    /// the plane (e.g. a zero scale).
    pub fn inverse(&self) -> Option<Affine> {
        let det = self.determinant();
        if det.abs() < f64::EPSILON {
            return None;
        }
        let [a, b, c, d, e, f] = self.0;
        Some(Affine([
            d / det,
            -b / det,
            -c / det,
            a / det,
            (c * f - d * e) / det,
            (b * e - a * f) / det,
        ]))
    }
}

impl Default for Affine {
    fn default() -> Self {
        Affine::identity()
    }
}

impl std::ops::Mul for Affine {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let a = self.0[0] * rhs.0[0] + self.0[1] * rhs.0[2];
        let b = self.0[0] * rhs.0[1] + self.0[1] * rhs.0[3];
        let c = self.0[2] * rhs.0[0] + self.0[3] * rhs.0[2];
        let d = self.0[2] * rhs.0[1] + self.0[3] * rhs.0[3];
        let e = self.0[4] * rhs.0[0] + self.0[5] * rhs.0[2] + rhs.0[4];
        let f = self.0[4] * rhs.0[1] + self.0[5] * rhs.0[3] + rhs.0[5];
        Affine([a, b, c, d, e, f])
    }
}

// from nalgebra::Matrix3<f64> (homogeneous 2D)
impl From<nalgebra::Matrix3<f64>> for Affine {
    fn from(m: nalgebra::Matrix3<f64>) -> Self {
        Affine([m[(0, 0)], m[(1, 0)], m[(0, 1)], m[(1, 1)], m[(0, 2)], m[(1, 2)]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn rotate_then_translate() {
        let t = Affine::rotate(90.0) * Affine::translate(10.0, 0.0);
        let p = t.apply(Point { x: 1.0, y: 0.0 });
        assert!(close(p, Point { x: 10.0, y: 1.0 }));
    }

    #[test]
    fn inverse_round_trips() {
        let t = Affine::scale_xy(2.0, 3.0) * Affine::rotate(33.0) * Affine::translate(-4.0, 7.5);
        let inv = t.inverse().unwrap();
        let p = Point { x: 3.25, y: -1.5 };
        assert!(close(inv.apply(t.apply(p)), p));
    }

    #[test]
    fn zero_scale_has_no_inverse() {
        assert!(Affine::scale(0.0).inverse().is_none());
    }

    #[test]
    fn matrix3_conversion_matches_translate() {
        let m = nalgebra::Matrix3::new(1.0, 0.0, 5.0, 0.0, 1.0, -2.0, 0.0, 0.0, 1.0);
        assert_eq!(Affine::from(m), Affine::translate(5.0, -2.0));
    }
}
