//! Polygon classification and point containment against a frustum's
//! angular extent. Everything here works on vertices relative to the
//! frustum origin.

use nalgebra::Vector3;
use smallvec::SmallVec;

use super::{ring_edges, Frustum};
use crate::config::EPSILON;
use crate::{GeometryError, Plane3D, Result};

/// How a polygon relates to a frustum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrustumClass {
    /// The polygon lies entirely outside the frustum.
    Outside = 0,
    /// The polygon lies entirely inside the frustum.
    Inside = 1,
    /// The polygon covers the whole frustum.
    Covered = 2,
    /// The polygon is partly inside.
    Partial = 3,
}

impl Frustum {
    /// Side-plane normals for a frustum boundary: `normals[i] = v[i] × v[i + 1]`,
    /// wrapping at the end. Feed the result to [`Frustum::batch_classify`].
    pub fn edge_normals(frustum: &[Vector3<f32>]) -> Vec<Vector3<f32>> {
        let n = frustum.len();
        (0..n).map(|i| frustum[i].cross(&frustum[(i + 1) % n])).collect()
    }

    /// Classifies `polygon` against the frustum spanned by `frustum`, both
    /// relative to a shared origin at `(0, 0, 0)`.
    ///
    /// # Errors
    /// [`GeometryError::TooFewVertices`] if either input has fewer than three
    /// vertices.
    pub fn classify(frustum: &[Vector3<f32>], polygon: &[Vector3<f32>]) -> Result<FrustumClass> {
        require_polygon(frustum)?;
        require_polygon(polygon)?;
        let n = frustum.len();
        let normals: SmallVec<[Vector3<f32>; 16]> =
            (0..n).map(|i| frustum[i].cross(&frustum[(i + 1) % n])).collect();
        Ok(classify_with(frustum, &normals, polygon))
    }

    /// [`Frustum::classify`] with side-plane normals precomputed by
    /// [`Frustum::edge_normals`].
    ///
    /// # Errors
    /// [`GeometryError::TooFewVertices`] for short inputs, and
    /// [`GeometryError::MismatchedArrayLengths`] if `normals` does not have
    /// one entry per frustum vertex.
    pub fn batch_classify(
        frustum: &[Vector3<f32>],
        normals: &[Vector3<f32>],
        polygon: &[Vector3<f32>],
    ) -> Result<FrustumClass> {
        require_polygon(frustum)?;
        require_polygon(polygon)?;
        if normals.len() != frustum.len() {
            return Err(GeometryError::MismatchedArrayLengths {
                expected: frustum.len(),
                actual: normals.len(),
            });
        }
        Ok(classify_with(frustum, normals, polygon))
    }

    /// Classifies `polygon` (relative to this frustum's origin) against this
    /// frustum's side planes. The back plane is not consulted.
    ///
    /// # Errors
    /// Same as [`Frustum::classify`]; a frustum without a boundary polygon
    /// reports [`GeometryError::TooFewVertices`].
    pub fn classify_polygon(&self, polygon: &[Vector3<f32>]) -> Result<FrustumClass> {
        Self::classify(self.vertices(), polygon)
    }

    /// Whether `point`, relative to the origin, is inside this frustum.
    /// Uses the back plane when there is one. An empty frustum contains
    /// nothing.
    ///
    /// Without a back plane this has the limitation described on
    /// [`Frustum::contains_point`].
    pub fn contains(&self, point: &Vector3<f32>) -> bool {
        if self.is_empty() {
            return false;
        }
        match &self.back_plane {
            Some(plane) => Self::contains_point_with_plane(self.vertices(), plane, point),
            None => Self::contains_point(self.vertices(), point),
        }
    }

    /// Whether `point` is on the inner side of every side plane of the
    /// frustum spanned by `frustum` (all relative to `(0, 0, 0)`). An empty
    /// vertex list contains every point.
    ///
    /// The side planes all pass through the origin, so this also accepts
    /// points mirrored through the origin behind a narrow frustum when they
    /// happen to fall on the inner side of each plane. Callers that need an
    /// exact answer in every direction should cap the frustum and use
    /// [`Frustum::contains_point_with_plane`].
    pub fn contains_point(frustum: &[Vector3<f32>], point: &Vector3<f32>) -> bool {
        ring_edges(frustum.len())
            .all(|(prev, cur)| frustum[prev].cross(&frustum[cur]).dot(point) <= 0.0)
    }

    /// [`Frustum::contains_point`] that first requires `point` to be on the
    /// visible side of `plane`.
    pub fn contains_point_with_plane(
        frustum: &[Vector3<f32>],
        plane: &Plane3D,
        point: &Vector3<f32>,
    ) -> bool {
        plane.is_visible(point) && Self::contains_point(frustum, point)
    }
}

fn require_polygon(vertices: &[Vector3<f32>]) -> Result<()> {
    if vertices.len() < 3 {
        return Err(GeometryError::TooFewVertices {
            count: vertices.len(),
        });
    }
    Ok(())
}

/// Shared classifier; `normals[i]` is the side normal of the frustum edge
/// `i → i + 1`.
fn classify_with(
    frustum: &[Vector3<f32>],
    normals: &[Vector3<f32>],
    polygon: &[Vector3<f32>],
) -> FrustumClass {
    let mut all_inside = true;
    let last = polygon.len() - 1;

    for (fvp, fv) in ring_edges(frustum.len()) {
        let v1 = &frustum[fvp];
        let v2 = &frustum[fv];
        let normal = normals[fvp];

        let mut prev_d = normal.dot(&polygon[last]);
        for (pvp, pv) in ring_edges(polygon.len()) {
            let d = normal.dot(&polygon[pv]);
            if d > 0.0 {
                all_inside = false;
            }

            // The edge crosses this side plane; partial if the crossing lies
            // between the side's two bounding rays.
            if (prev_d < 0.0 && d > 0.0) || (prev_d > 0.0 && d < 0.0) {
                let left = polygon[pvp].cross(v1).dot(&polygon[pv]) * prev_d;
                let right = v2.cross(&polygon[pvp]).dot(&polygon[pv]) * prev_d;
                if left >= 0.0 && right >= 0.0 {
                    return FrustumClass::Partial;
                }
            }
            prev_d = d;
        }
    }

    if all_inside {
        return FrustumClass::Inside;
    }

    // No edge crosses into the frustum, so either the polygon misses it or
    // wraps around it. One frustum vertex decides, unless it lies on one of
    // the polygon's own side planes.
    let mut test_point = 0;
    'points: while test_point < frustum.len() {
        for (pvp, pv) in ring_edges(polygon.len()) {
            let c = polygon[pvp].cross(&polygon[pv]).dot(&frustum[test_point]);
            if c >= EPSILON {
                return FrustumClass::Outside;
            }
            if c.abs() < EPSILON {
                test_point += 1;
                continue 'points;
            }
        }
        break;
    }

    FrustumClass::Covered
}
