//! Affine transforms for rotated layout boxes.

use crate::geometry::{Point, Rect};

/// A 2x3 affine transform matrix: `[a b c d e f]` mapping
/// `(x, y) -> (a*x + c*y + e, b*x + d*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translate(tx: f32, ty: f32) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: tx,
            f: ty,
        }
    }

    /// Rotation by `angle` radians, counter-clockwise about the origin.
    pub fn rotate(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Rotation by `angle` radians about the point `(cx, cy)`.
    pub fn rotate_about(angle: f32, cx: f32, cy: f32) -> Self {
        Self::translate(cx, cy)
            .then(Self::rotate(angle))
            .then(Self::translate(-cx, -cy))
    }

    /// Returns `self * other`: `other` is applied first, then `self`.
    pub fn then(self, other: Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    /// The axis-aligned bounding box of `rect` after transformation.
    pub fn bounding_box(&self, rect: Rect) -> Rect {
        let corners = [
            self.apply(Point::new(rect.x, rect.y)),
            self.apply(Point::new(rect.x + rect.width, rect.y)),
            self.apply(Point::new(rect.x, rect.y + rect.height)),
            self.apply(Point::new(rect.x + rect.width, rect.y + rect.height)),
        ];
        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for p in corners {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Rect {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    pub fn is_identity(&self) -> bool {
        const EPSILON: f32 = 1e-6;
        (self.a - 1.0).abs() < EPSILON
            && self.b.abs() < EPSILON
            && self.c.abs() < EPSILON
            && (self.d - 1.0).abs() < EPSILON
            && self.e.abs() < EPSILON
            && self.f.abs() < EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_quarter_turn_swaps_extents() {
        let t = Transform::rotate(std::f32::consts::FRAC_PI_2);
        let bbox = t.bounding_box(Rect {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 40.0,
        });
        assert!((bbox.width - 40.0).abs() < 0.001);
        assert!((bbox.height - 100.0).abs() < 0.001);
    }

    #[test]
    fn rotate_about_center_keeps_center_fixed() {
        let t = Transform::rotate_about(1.234, 50.0, 20.0);
        let center = t.apply(Point::new(50.0, 20.0));
        assert!((center.x - 50.0).abs() < 0.001);
        assert!((center.y - 20.0).abs() < 0.001);
    }

    #[test]
    fn composition_applies_inner_first() {
        let inner = Transform::translate(10.0, 0.0);
        let outer = Transform::rotate(std::f32::consts::FRAC_PI_2);
        let both = outer.then(inner);
        let p = both.apply(Point::new(0.0, 0.0));
        // Translate to (10, 0), then rotate 90° -> (0, 10).
        assert!(p.x.abs() < 0.001);
        assert!((p.y - 10.0).abs() < 0.001);
    }
}
