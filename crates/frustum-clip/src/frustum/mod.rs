//! General frustum: an apex (origin), a convex boundary polygon given
//! relative to that apex, and an optional back plane.
//!
//! The planes through the origin and each boundary edge form the sides of
//! the frustum. A frustum without a polygon is either empty or, when marked
//! wide, angularly unbounded (infinite if it also lacks a back plane).
//!
//! # Conventions
//!
//! - Boundary vertices and the back plane are relative to the origin.
//! - For consecutive boundary vertices `a → b` the side normal is `a × b`;
//!   a point `p` is inside that side when `(a × b) · p <= 0`.
//! - The back plane admits points on its front (positive) side.
//!
//! # Architecture
//!
//! - [`Frustum`]: owned state, construction and simple mutators (this module)
//! - `clip`: boundary and polygon clipping, plus the provenance-tracking clippers
//! - `intersect`: frustum/polygon/triangle/segment intersection
//! - `classify`: polygon classification and point containment

mod classify;
mod clip;
mod intersect;

pub use classify::FrustumClass;
pub use clip::{clip_edge_with_info, clip_plane_with_info};

use nalgebra::{Point3, Vector3};

use crate::config::VERTEX_ARRAY_GROWTH;
use crate::pool::{thread_allocate, thread_release, VertexArray};
use crate::{GeometryError, Plane3D, Result, SpaceTransform};

/// A general frustum. See the [module documentation](self) for conventions.
///
/// Vertex storage comes from the current thread's
/// [`VertexArrayPool`](crate::VertexArrayPool) and goes back to it on drop.
#[derive(Debug)]
pub struct Frustum {
    origin: Point3<f32>,
    /// Allocated slots; `vertices.len()` is the capacity.
    vertices: VertexArray,
    num_vertices: usize,
    back_plane: Option<Plane3D>,
    /// Only meaningful while there is no polygon.
    wide: bool,
    mirrored: bool,
}

impl Frustum {
    /// Creates an empty frustum at `origin`.
    pub fn new(origin: Point3<f32>) -> Self {
        Self {
            origin,
            vertices: VertexArray::empty(),
            num_vertices: 0,
            back_plane: None,
            wide: false,
            mirrored: false,
        }
    }

    /// Creates a frustum from a boundary polygon (relative to `origin`) and an
    /// optional back plane, both copied.
    ///
    /// An empty polygon gives an empty frustum.
    pub fn from_vertices(
        origin: Point3<f32>,
        vertices: &[Vector3<f32>],
        back_plane: Option<&Plane3D>,
    ) -> Self {
        let mut storage = thread_allocate(vertices.len());
        storage.copy_from_slice(vertices);
        Self {
            origin,
            vertices: storage,
            num_vertices: vertices.len(),
            back_plane: back_plane.cloned(),
            wide: false,
            mirrored: false,
        }
    }

    /// Creates a frustum with `count` zeroed boundary slots that the caller
    /// is expected to fill through [`Frustum::vertex_mut`].
    pub fn with_vertex_count(
        origin: Point3<f32>,
        count: usize,
        back_plane: Option<&Plane3D>,
    ) -> Self {
        let mut storage = thread_allocate(count);
        storage.fill(Vector3::zeros());
        Self {
            origin,
            vertices: storage,
            num_vertices: count,
            back_plane: back_plane.cloned(),
            wide: false,
            mirrored: false,
        }
    }

    /// Creates an infinite frustum at `origin`.
    pub fn infinite(origin: Point3<f32>) -> Self {
        let mut frustum = Self::new(origin);
        frustum.wide = true;
        frustum
    }

    #[inline]
    pub fn origin(&self) -> &Point3<f32> {
        &self.origin
    }

    #[inline]
    pub fn origin_mut(&mut self) -> &mut Point3<f32> {
        &mut self.origin
    }

    #[inline]
    pub fn set_origin(&mut self, origin: Point3<f32>) {
        self.origin = origin;
    }

    /// Marks the boundary polygon as wound in the opposite direction.
    #[inline]
    pub fn set_mirrored(&mut self, mirrored: bool) {
        self.mirrored = mirrored;
    }

    #[inline]
    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Replaces the back plane with a copy of `plane` (relative to the origin).
    pub fn set_back_plane(&mut self, plane: &Plane3D) {
        self.back_plane = Some(plane.clone());
    }

    #[inline]
    pub fn back_plane(&self) -> Option<&Plane3D> {
        self.back_plane.as_ref()
    }

    pub fn remove_back_plane(&mut self) {
        self.back_plane = None;
    }

    /// Appends a boundary vertex, growing storage by
    /// [`VERTEX_ARRAY_GROWTH`] slots when full.
    pub fn add_vertex(&mut self, v: Vector3<f32>) {
        if self.num_vertices >= self.capacity() {
            self.extend_vertex_array(VERTEX_ARRAY_GROWTH);
        }
        self.vertices[self.num_vertices] = v;
        self.num_vertices += 1;
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.num_vertices
    }

    /// Allocated vertex slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.vertices.len()
    }

    /// Boundary vertex `idx`.
    ///
    /// # Panics
    /// Panics if `idx` is out of range. See [`Frustum::try_vertex`].
    #[inline]
    pub fn vertex(&self, idx: usize) -> &Vector3<f32> {
        debug_assert!(idx < self.num_vertices, "vertex index out of range");
        &self.vertices()[idx]
    }

    /// Mutable boundary vertex `idx`.
    ///
    /// # Panics
    /// Panics if `idx` is out of range.
    #[inline]
    pub fn vertex_mut(&mut self, idx: usize) -> &mut Vector3<f32> {
        debug_assert!(idx < self.num_vertices, "vertex index out of range");
        let len = self.num_vertices;
        &mut self.vertices[..len][idx]
    }

    pub fn try_vertex(&self, idx: usize) -> Result<&Vector3<f32>> {
        self.vertices()
            .get(idx)
            .ok_or(GeometryError::IndexOutOfRange {
                index: idx,
                len: self.num_vertices,
            })
    }

    /// The boundary polygon, relative to the origin.
    #[inline]
    pub fn vertices(&self) -> &[Vector3<f32>] {
        &self.vertices[..self.num_vertices]
    }

    /// Carries the frustum through `transform`: the origin as a point, the
    /// boundary vertices as directions, and the back plane as a plane.
    pub fn transform<T: SpaceTransform>(&mut self, transform: &T) {
        self.origin = transform.other_to_this(&self.origin);
        let len = self.num_vertices;
        for v in &mut self.vertices[..len] {
            *v = transform.other_to_this_relative(v);
        }
        if let Some(plane) = &mut self.back_plane {
            plane.transform_by(transform);
        }
    }

    /// Drops polygon and back plane; the frustum sees everything.
    pub fn make_infinite(&mut self) {
        self.clear();
        self.wide = true;
    }

    /// Drops polygon and back plane; the frustum sees nothing.
    pub fn make_empty(&mut self) {
        self.clear();
        self.wide = false;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.wide && self.num_vertices == 0
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.wide && self.num_vertices == 0 && self.back_plane.is_none()
    }

    /// Infinitely wide, possibly capped by a back plane.
    #[inline]
    pub fn is_wide(&self) -> bool {
        self.wide && self.num_vertices == 0
    }

    fn clear(&mut self) {
        thread_release(std::mem::take(&mut self.vertices));
        self.num_vertices = 0;
        self.back_plane = None;
        self.wide = false;
        self.mirrored = false;
    }

    /// Grows storage by `additional` slots, keeping the current polygon.
    fn extend_vertex_array(&mut self, additional: usize) {
        let mut grown = thread_allocate(self.capacity() + additional);
        let len = self.num_vertices;
        grown[..len].copy_from_slice(&self.vertices[..len]);
        thread_release(std::mem::replace(&mut self.vertices, grown));
    }

    /// Overwrites the polygon, growing storage when it does not fit.
    fn replace_vertices(&mut self, polygon: &[Vector3<f32>]) {
        if polygon.len() > self.capacity() {
            self.extend_vertex_array(polygon.len() - self.capacity() + 2);
        }
        self.vertices[..polygon.len()].copy_from_slice(polygon);
        self.num_vertices = polygon.len();
    }
}

impl Clone for Frustum {
    fn clone(&self) -> Self {
        let mut storage = thread_allocate(self.capacity());
        let len = self.num_vertices;
        storage[..len].copy_from_slice(self.vertices());
        Self {
            origin: self.origin,
            vertices: storage,
            num_vertices: len,
            back_plane: self.back_plane.clone(),
            wide: self.wide,
            mirrored: self.mirrored,
        }
    }
}

impl Drop for Frustum {
    fn drop(&mut self) {
        thread_release(std::mem::take(&mut self.vertices));
    }
}

/// Index pairs `(previous, current)` around a ring of `n` vertices, starting
/// with `(n - 1, 0)`.
pub(crate) fn ring_edges(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).map(move |i| (if i == 0 { n - 1 } else { i - 1 }, i))
}
