//! Intersection of a frustum with other frusta, polygons and segments.

use nalgebra::{Point3, Vector3};

use super::{ring_edges, Frustum};
use crate::{GeometryError, Result, Segment3};

impl Frustum {
    /// Intersection of this frustum with `other`, which shares this
    /// frustum's origin. `None` when the result is empty.
    ///
    /// - empty `other`: `None`
    /// - infinite `other`: a copy of `self`
    /// - wide `other` capped only by a back plane: a copy of `self`
    ///   (the cap is not applied)
    /// - otherwise the intersection with `other`'s boundary polygon
    pub fn intersect(&self, other: &Frustum) -> Option<Frustum> {
        if other.is_empty() {
            return None;
        }
        if other.is_wide() {
            return Some(self.clone());
        }
        self.intersect_polygon(other.vertices())
    }

    /// Clips `polygon` (relative to this frustum's origin) against the side
    /// planes and back plane of this frustum. The result shares the origin
    /// and mirrored flag of `self`; `None` when nothing is left.
    pub fn intersect_polygon(&self, polygon: &[Vector3<f32>]) -> Option<Frustum> {
        if self.is_empty() || polygon.is_empty() {
            return None;
        }

        let mut result = Frustum::from_vertices(self.origin, polygon, None);
        result.set_mirrored(self.mirrored);
        if self.is_infinite() {
            return Some(result);
        }

        let boundary = self.vertices();
        for (prev, cur) in ring_edges(boundary.len()) {
            result.clip_to_plane(&boundary[prev], &boundary[cur]);
            if result.is_empty() {
                return None;
            }
        }

        if let Some(back_plane) = &self.back_plane {
            result.clip_poly_to_plane(back_plane);
            if result.is_empty() {
                return None;
            }
        }
        Some(result)
    }

    /// Clips `polygon` against the frustum whose side planes pass through
    /// `origin` and consecutive vertices of `frustum` (both vertex sets
    /// relative to `origin`). No back plane, not mirrored.
    pub fn intersect_polygon_with(
        origin: Point3<f32>,
        frustum: &[Vector3<f32>],
        polygon: &[Vector3<f32>],
    ) -> Result<Option<Frustum>> {
        if frustum.len() < 3 {
            return Err(GeometryError::TooFewVertices {
                count: frustum.len(),
            });
        }
        if polygon.len() < 3 {
            return Err(GeometryError::TooFewVertices {
                count: polygon.len(),
            });
        }

        let mut result = Frustum::from_vertices(origin, polygon, None);
        for (prev, cur) in ring_edges(frustum.len()) {
            result.clip_to_plane(&frustum[prev], &frustum[cur]);
            if result.is_empty() {
                return Ok(None);
            }
        }
        Ok(Some(result))
    }

    /// [`Frustum::intersect_polygon_with`] for a single triangle.
    pub fn intersect_triangle_with(
        origin: Point3<f32>,
        frustum: &[Vector3<f32>],
        v1: &Vector3<f32>,
        v2: &Vector3<f32>,
        v3: &Vector3<f32>,
    ) -> Result<Option<Frustum>> {
        Self::intersect_polygon_with(origin, frustum, &[*v1, *v2, *v3])
    }

    /// Clips `segment` (world coordinates) to the frustum.
    ///
    /// Returns `false` when no part of the segment is strictly inside; the
    /// segment is then left as it was. Otherwise the endpoints are moved to
    /// the part inside and `true` is returned. An infinite frustum accepts
    /// every segment unchanged, an empty one none.
    pub fn intersect_segment(&self, segment: &mut Segment3) -> bool {
        if self.is_infinite() {
            return true;
        }
        if self.is_empty() {
            return false;
        }

        let mut start = segment.start - self.origin;
        let mut end = segment.end - self.origin;

        if let Some(back_plane) = &self.back_plane {
            let ds = back_plane.distance_to(&start);
            let de = back_plane.distance_to(&end);
            if !clip_segment(&mut start, &mut end, ds, de) {
                return false;
            }
        }

        let boundary = self.vertices();
        for (prev, cur) in ring_edges(boundary.len()) {
            let normal = boundary[prev].cross(&boundary[cur]);
            let ds = -normal.dot(&start);
            let de = -normal.dot(&end);
            if !clip_segment(&mut start, &mut end, ds, de) {
                return false;
            }
        }

        segment.start = self.origin + start;
        segment.end = self.origin + end;
        true
    }
}

/// Keeps the part of `start → end` with positive distance. `false` if
/// neither endpoint is strictly inside.
fn clip_segment(start: &mut Vector3<f32>, end: &mut Vector3<f32>, ds: f32, de: f32) -> bool {
    match (ds > 0.0, de > 0.0) {
        (false, false) => false,
        (true, true) => true,
        (true, false) => {
            *end = *start + (*end - *start) * (ds / (ds - de));
            true
        }
        (false, true) => {
            *start = *start + (*end - *start) * (ds / (ds - de));
            true
        }
    }
}
