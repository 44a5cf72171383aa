//! Clipping of a convex vertex ring against a single plane.
//!
//! Two flavours share the crossing search in [`find_cut`]:
//!
//! - boundary clips, where the ring is the frustum's angular boundary and the
//!   plane is a new side plane through the origin ([`Frustum::clip_to_plane`]
//!   and the provenance-tracking [`clip_edge_with_info`] / [`clip_plane_with_info`]);
//! - content clips, where the ring is an ordinary polygon cut against an
//!   arbitrary plane ([`Frustum::clip_poly_to_plane`]).
//!
//! Input rings are assumed convex, so the removed vertices form one
//! contiguous (cyclic) run.

use nalgebra::Vector3;
use smallvec::SmallVec;

use super::Frustum;
use crate::config::CLIP_RESERVE;
use crate::{ClipInfo, GeometryError, Plane3D, Result};

/// Scratch buffers stay inline for typical clip polygons.
type Scratch<T> = SmallVec<[T; 16]>;

/// Where a plane crosses a vertex ring.
#[derive(Debug, Clone, Copy)]
struct BoundaryCut {
    /// First index whose side differs from the last vertex.
    cw: usize,
    /// Predecessor of `cw` around the ring.
    cw_prev: usize,
    /// Last index before `n - 1` whose side differs from the last vertex.
    ccw: usize,
    /// The last vertex (and so the run outside `cw..=ccw`) is removed.
    last_removed: bool,
    /// Crossing on `cw → cw_prev`, at `r_cw` from `cw`.
    isect_cw: Vector3<f32>,
    r_cw: f32,
    /// Crossing on `ccw → ccw + 1`, at `r_ccw` from `ccw`.
    isect_ccw: Vector3<f32>,
    r_ccw: f32,
}

#[derive(Debug)]
enum Cut {
    /// Nothing is removed.
    Untouched,
    /// Everything is removed.
    Removed,
    Split(BoundaryCut),
}

/// Locates the crossings of a plane given by a signed `distance` function.
/// Vertices with a negative distance are removed; zero counts as kept.
fn find_cut<F>(vertices: &[Vector3<f32>], distance: F) -> Cut
where
    F: Fn(&Vector3<f32>) -> f32,
{
    let n = vertices.len();
    if n == 0 {
        return Cut::Untouched;
    }

    let dist: Scratch<f32> = vertices.iter().map(&distance).collect();
    let removed = |i: usize| dist[i] < 0.0;
    let last_removed = removed(n - 1);

    let Some(cw) = (0..n - 1).find(|&i| removed(i) != last_removed) else {
        return if last_removed {
            Cut::Removed
        } else {
            Cut::Untouched
        };
    };
    let ccw = (cw..n - 1)
        .rev()
        .find(|&i| removed(i) != last_removed)
        .unwrap_or(cw);
    let cw_prev = if cw == 0 { n - 1 } else { cw - 1 };

    // Endpoints straddle the plane, so the denominators are non-zero.
    let r_cw = dist[cw] / (dist[cw] - dist[cw_prev]);
    let r_ccw = dist[ccw] / (dist[ccw] - dist[ccw + 1]);

    Cut::Split(BoundaryCut {
        cw,
        cw_prev,
        ccw,
        last_removed,
        isect_cw: vertices[cw] + (vertices[cw_prev] - vertices[cw]) * r_cw,
        r_cw,
        isect_ccw: vertices[ccw] + (vertices[ccw + 1] - vertices[ccw]) * r_ccw,
        r_ccw,
    })
}

/// Rebuilds the ring with the removed run replaced by the two crossings.
fn splice_ring(vertices: &[Vector3<f32>], cut: &BoundaryCut) -> Scratch<Vector3<f32>> {
    let mut out = Scratch::with_capacity(vertices.len() + 2);
    if cut.last_removed {
        out.extend_from_slice(&vertices[cut.cw..=cut.ccw]);
        out.push(cut.isect_ccw);
        out.push(cut.isect_cw);
    } else {
        out.extend_from_slice(&vertices[..cut.cw]);
        out.push(cut.isect_cw);
        out.push(cut.isect_ccw);
        out.extend_from_slice(&vertices[cut.ccw + 1..]);
    }
    out
}

/// Same rebuild as [`splice_ring`], moving the elements of a caller-owned vector.
fn splice_vec<T>(items: &mut Vec<T>, cut: &BoundaryCut, at_cw: T, at_ccw: T) {
    if cut.last_removed {
        items.truncate(cut.ccw + 1);
        items.drain(..cut.cw);
        items.push(at_ccw);
        items.push(at_cw);
    } else {
        items.splice(cut.cw..=cut.ccw, [at_cw, at_ccw]);
    }
}

impl Frustum {
    /// Clips the frustum to the positive side of the plane through the
    /// origin, `v1` and `v2` (both relative to the origin), i.e. adds a side
    /// plane. The kept side is where `(v1 × v2) · p <= 0`, or
    /// `(v2 × v1) · p <= 0` for a mirrored frustum.
    ///
    /// A frustum without a boundary polygon is left unchanged.
    pub fn clip_to_plane(&mut self, v1: &Vector3<f32>, v2: &Vector3<f32>) {
        if self.num_vertices == 0 {
            return;
        }
        if self.num_vertices + CLIP_RESERVE > self.capacity() {
            self.extend_vertex_array(CLIP_RESERVE);
        }

        let normal = if self.mirrored {
            v2.cross(v1)
        } else {
            v1.cross(v2)
        };

        match find_cut(self.vertices(), |v| -normal.dot(v)) {
            Cut::Untouched => {}
            Cut::Removed => {
                tracing::trace!("frustum boundary entirely behind side plane");
                self.make_empty();
            }
            Cut::Split(cut) => {
                let clipped = splice_ring(self.vertices(), &cut);
                if clipped.len() < 3 {
                    self.make_empty();
                } else {
                    self.replace_vertices(&clipped);
                }
            }
        }
    }

    /// Clips the boundary polygon itself (not the frustum's angular extent)
    /// to the visible side of `plane`, given relative to the origin.
    ///
    /// Falls to the empty state when fewer than three vertices survive. A
    /// frustum without a boundary polygon is left unchanged.
    pub fn clip_poly_to_plane(&mut self, plane: &Plane3D) {
        let n = self.num_vertices;
        if n == 0 {
            return;
        }

        let vertices = self.vertices();
        let front: Scratch<bool> = vertices.iter().map(|v| plane.is_visible(v)).collect();
        let count_front = front.iter().filter(|&&f| f).count();

        if count_front == 0 {
            tracing::trace!("frustum polygon entirely behind plane");
            self.make_empty();
            return;
        }
        if count_front == n {
            return;
        }

        let mut clipped: Scratch<Vector3<f32>> = Scratch::with_capacity(n + 1);
        let mut prev = n - 1;
        for i in 0..n {
            match (front[prev], front[i]) {
                (false, true) => {
                    if let Some((_, point)) = plane.intersect_segment(&vertices[prev], &vertices[i]) {
                        clipped.push(point);
                    }
                    clipped.push(vertices[i]);
                }
                (true, false) => {
                    if let Some((_, point)) = plane.intersect_segment(&vertices[prev], &vertices[i]) {
                        clipped.push(point);
                    }
                }
                (true, true) => clipped.push(vertices[i]),
                (false, false) => {}
            }
            prev = i;
        }

        if clipped.len() < 3 {
            tracing::trace!(remaining = clipped.len(), "clipped polygon degenerate");
            self.make_empty();
            return;
        }
        self.replace_vertices(&clipped);
    }
}

/// Boundary clip of a raw vertex ring (relative to `(0, 0, 0)`) against the
/// plane through the origin, `v1` and `v2`, keeping `(v1 × v2) · p <= 0`.
///
/// `clip_info` runs parallel to `vertices` and is normally seeded with
/// [`ClipInfo::seed`]. Each inserted vertex gets an `OnEdge` record when both
/// endpoints of its edge are original, or an `Inside` record nesting copies of
/// both endpoints otherwise. When every vertex is removed both vectors are
/// cleared.
pub fn clip_edge_with_info(
    vertices: &mut Vec<Vector3<f32>>,
    clip_info: &mut Vec<ClipInfo>,
    v1: &Vector3<f32>,
    v2: &Vector3<f32>,
) -> Result<()> {
    let normal = v1.cross(v2);
    clip_with_info(vertices, clip_info, |v| -normal.dot(v))
}

/// Provenance-tracking clip of a raw vertex ring to the visible side of
/// `plane`. Same protocol as [`clip_edge_with_info`].
pub fn clip_plane_with_info(
    vertices: &mut Vec<Vector3<f32>>,
    clip_info: &mut Vec<ClipInfo>,
    plane: &Plane3D,
) -> Result<()> {
    clip_with_info(vertices, clip_info, |v| plane.distance_to(v))
}

fn clip_with_info<F>(
    vertices: &mut Vec<Vector3<f32>>,
    clip_info: &mut Vec<ClipInfo>,
    distance: F,
) -> Result<()>
where
    F: Fn(&Vector3<f32>) -> f32,
{
    if vertices.len() != clip_info.len() {
        return Err(GeometryError::MismatchedArrayLengths {
            expected: vertices.len(),
            actual: clip_info.len(),
        });
    }

    match find_cut(vertices, distance) {
        Cut::Untouched => {}
        Cut::Removed => {
            vertices.clear();
            clip_info.clear();
        }
        Cut::Split(cut) => {
            let info_cw = ClipInfo::between(&clip_info[cut.cw], &clip_info[cut.cw_prev], cut.r_cw);
            let info_ccw =
                ClipInfo::between(&clip_info[cut.ccw], &clip_info[cut.ccw + 1], cut.r_ccw);
            splice_vec(vertices, &cut, cut.isect_cw, cut.isect_ccw);
            splice_vec(clip_info, &cut, info_cw, info_ccw);
        }
    }
    Ok(())
}
