//! Line segment used by the frustum/segment intersection.

use nalgebra::{Point3, Vector3};

/// A line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment3 {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
}

impl Segment3 {
    pub fn new(start: Point3<f32>, end: Point3<f32>) -> Self {
        Self { start, end }
    }

    /// Vector from start to end.
    #[inline]
    pub fn direction(&self) -> Vector3<f32> {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.direction().norm()
    }

    /// Point at parameter `t` (0 = start, 1 = end).
    #[inline]
    pub fn point_at(&self, t: f32) -> Point3<f32> {
        self.start + self.direction() * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn point_at_interpolates() {
        let seg = Segment3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 3.0, 4.0));
        assert_relative_eq!(seg.length(), 5.0);
        assert_relative_eq!(seg.point_at(0.5).z, 2.0);
        assert_eq!(seg.point_at(1.0), seg.end);
    }
}
