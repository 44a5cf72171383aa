//! Space transforms a frustum can be carried through.

use nalgebra::{Isometry3, Point3, Similarity3, Vector3};

use crate::Plane3D;

/// A mapping from some "other" space into "this" space.
///
/// [`Frustum::transform`](crate::Frustum::transform) moves the origin with
/// [`other_to_this`](SpaceTransform::other_to_this), the origin-relative
/// vertices with [`other_to_this_relative`](SpaceTransform::other_to_this_relative)
/// and the back plane with [`transform_plane`](SpaceTransform::transform_plane).
pub trait SpaceTransform {
    /// Maps a point, translation included.
    fn other_to_this(&self, point: &Point3<f32>) -> Point3<f32>;

    /// Maps a direction, ignoring translation.
    fn other_to_this_relative(&self, direction: &Vector3<f32>) -> Vector3<f32>;

    /// Maps a plane so that transformed points keep their signed side.
    fn transform_plane(&self, plane: &Plane3D) -> Plane3D;
}

impl SpaceTransform for Isometry3<f32> {
    fn other_to_this(&self, point: &Point3<f32>) -> Point3<f32> {
        self.transform_point(point)
    }

    fn other_to_this_relative(&self, direction: &Vector3<f32>) -> Vector3<f32> {
        self.transform_vector(direction)
    }

    fn transform_plane(&self, plane: &Plane3D) -> Plane3D {
        let normal = self.rotation * plane.normal();
        let offset = plane.offset() + normal.dot(&self.translation.vector);
        Plane3D::new(normal, offset)
    }
}

impl SpaceTransform for Similarity3<f32> {
    fn other_to_this(&self, point: &Point3<f32>) -> Point3<f32> {
        self.transform_point(point)
    }

    fn other_to_this_relative(&self, direction: &Vector3<f32>) -> Vector3<f32> {
        self.transform_vector(direction)
    }

    fn transform_plane(&self, plane: &Plane3D) -> Plane3D {
        let normal = self.isometry.rotation * plane.normal();
        let offset =
            plane.offset() * self.scaling() + normal.dot(&self.isometry.translation.vector);
        Plane3D::new(normal, offset)
    }
}
