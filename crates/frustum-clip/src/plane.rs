//! Plane representation and the segment/plane queries the clippers rely on.

use nalgebra::{Point3, Vector3};

use crate::config::{PLANE_EPSILON, SMALL_EPSILON};
use crate::{GeometryError, Result, SpaceTransform};

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is in front of the plane (positive side of normal)
    Front,
    /// Point is behind the plane (negative side of normal)
    Back,
    /// Point lies on the plane (within epsilon tolerance)
    OnPlane,
}

/// A plane in 3D space, represented as `normal · point = offset`.
///
/// The front (positive) side is the visible side: clipping keeps what lies
/// in front, and a frustum's back plane admits points in front of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane3D {
    normal: Vector3<f32>,
    offset: f32,
}

impl Plane3D {
    /// Creates a new plane from a normal vector and offset.
    /// The normal will be normalized automatically.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn new(normal: Vector3<f32>, offset: f32) -> Self {
        Self::try_new(normal, offset).expect("Plane normal cannot be zero")
    }

    /// Fallible version of [`Plane3D::new`].
    pub fn try_new(normal: Vector3<f32>, offset: f32) -> Result<Self> {
        let norm = normal.norm();
        if norm <= f32::EPSILON {
            return Err(GeometryError::DegeneratePlane);
        }
        Ok(Self {
            normal: normal / norm,
            offset: offset / norm,
        })
    }

    /// Creates a plane from a point on the plane and a normal vector.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn from_point_and_normal(point: Point3<f32>, normal: Vector3<f32>) -> Self {
        let norm = normal.norm();
        assert!(norm > f32::EPSILON, "Plane normal cannot be zero");
        let unit_normal = normal / norm;
        Self {
            normal: unit_normal,
            offset: unit_normal.dot(&point.coords),
        }
    }

    /// Creates a plane from three non-collinear points.
    /// The normal direction follows the right-hand rule: (b - a) × (c - a).
    ///
    /// # Panics
    /// Panics if the points are collinear (or nearly so).
    pub fn from_three_points(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self::from_point_and_normal(a, (b - a).cross(&(c - a)))
    }

    /// Returns the unit normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Returns the signed distance from the origin to the plane along the normal.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Signed distance of a position vector (a point relative to the
    /// coordinate origin). Positive in front.
    #[inline]
    pub fn distance_to(&self, v: &Vector3<f32>) -> f32 {
        self.normal.dot(v) - self.offset
    }

    /// Computes the signed distance from a point to the plane.
    #[inline]
    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.distance_to(&point.coords)
    }

    /// True if the position vector is on the visible (front or on-plane) side.
    #[inline]
    pub fn is_visible(&self, v: &Vector3<f32>) -> bool {
        self.distance_to(v) >= 0.0
    }

    /// Classifies which side of the plane a point lies on.
    /// Uses the default `PLANE_EPSILON` tolerance.
    #[inline]
    pub fn classify_point(&self, point: Point3<f32>) -> PlaneSide {
        self.classify_point_with_epsilon(point, PLANE_EPSILON)
    }

    /// Classifies which side of the plane a point lies on, with a custom epsilon.
    pub fn classify_point_with_epsilon(&self, point: Point3<f32>, epsilon: f32) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            PlaneSide::Front
        } else if dist < -epsilon {
            PlaneSide::Back
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Returns a new plane with the normal flipped (facing the opposite direction).
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }

    /// Projects a point onto the plane (finds the closest point on the plane).
    #[inline]
    pub fn project_point(&self, point: Point3<f32>) -> Point3<f32> {
        point - self.normal * self.signed_distance(point)
    }

    /// Computes the intersection of the segment `start → end` with the plane.
    ///
    /// Returns `Some((t, point))` with `t` the interpolation parameter from
    /// `start`, or `None` when the segment is parallel to the plane or the
    /// crossing lies outside the segment by more than `SMALL_EPSILON`.
    pub fn intersect_segment(
        &self,
        start: &Vector3<f32>,
        end: &Vector3<f32>,
    ) -> Option<(f32, Vector3<f32>)> {
        let direction = end - start;
        let denom = self.normal.dot(&direction);

        if denom.abs() < SMALL_EPSILON {
            return None;
        }

        let t = (self.offset - self.normal.dot(start)) / denom;
        if t < -SMALL_EPSILON || t > 1.0 + SMALL_EPSILON {
            return None;
        }

        Some((t, start + direction * t))
    }

    /// Returns this plane mapped into the target space of `transform`.
    pub fn transformed<T: SpaceTransform>(&self, transform: &T) -> Self {
        transform.transform_plane(self)
    }

    /// Maps this plane into the target space of `transform` in place.
    pub fn transform_by<T: SpaceTransform>(&mut self, transform: &T) {
        *self = transform.transform_plane(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_normalizes() {
        let plane = Plane3D::new(Vector3::new(0.0, 0.0, 2.0), 4.0);
        assert_relative_eq!(plane.normal().z, 1.0);
        assert_relative_eq!(plane.offset(), 2.0);
    }

    #[test]
    fn try_new_rejects_zero_normal() {
        assert_eq!(
            Plane3D::try_new(Vector3::zeros(), 1.0),
            Err(GeometryError::DegeneratePlane)
        );
    }

    #[test]
    fn classify_point_sides() {
        let plane = Plane3D::new(Vector3::new(0.0, 1.0, 0.0), 0.0);
        assert_eq!(plane.classify_point(Point3::new(0.0, 1.0, 0.0)), PlaneSide::Front);
        assert_eq!(plane.classify_point(Point3::new(0.0, -1.0, 0.0)), PlaneSide::Back);
        assert_eq!(plane.classify_point(Point3::new(3.0, 0.0, 0.0)), PlaneSide::OnPlane);
    }

    #[test]
    fn visible_includes_on_plane() {
        let plane = Plane3D::new(Vector3::x(), 0.0);
        assert!(plane.is_visible(&Vector3::new(0.0, 5.0, 5.0)));
        assert!(plane.is_visible(&Vector3::new(1.0, 0.0, 0.0)));
        assert!(!plane.is_visible(&Vector3::new(-0.1, 0.0, 0.0)));
    }

    #[test]
    fn intersect_segment_midpoint() {
        let plane = Plane3D::new(Vector3::x(), 0.0);
        let (t, point) = plane
            .intersect_segment(&Vector3::new(-1.0, 1.0, 1.0), &Vector3::new(1.0, 1.0, 1.0))
            .unwrap();
        assert_relative_eq!(t, 0.5);
        assert_relative_eq!(point.x, 0.0);
        assert_relative_eq!(point.y, 1.0);
    }

    #[test]
    fn intersect_segment_parallel_or_missing() {
        let plane = Plane3D::new(Vector3::x(), 0.0);
        assert!(plane
            .intersect_segment(&Vector3::new(1.0, 0.0, 0.0), &Vector3::new(1.0, 5.0, 0.0))
            .is_none());
        assert!(plane
            .intersect_segment(&Vector3::new(1.0, 0.0, 0.0), &Vector3::new(2.0, 0.0, 0.0))
            .is_none());
    }

    #[test]
    fn flipped_swaps_sides() {
        let plane = Plane3D::new(Vector3::z(), 5.0);
        let p = Point3::new(0.0, 0.0, 10.0);
        assert_eq!(plane.classify_point(p), PlaneSide::Front);
        assert_eq!(plane.flipped().classify_point(p), PlaneSide::Back);
    }

    #[test]
    fn project_point_lands_on_plane() {
        let plane = Plane3D::from_three_points(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        );
        let projected = plane.project_point(Point3::new(3.0, -2.0, 7.0));
        assert_relative_eq!(projected.z, 1.0, epsilon = 1e-6);
    }
}
