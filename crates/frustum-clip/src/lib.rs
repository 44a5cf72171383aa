//! General frustum geometry for visibility work.
//!
//! A [`Frustum`] is an apex plus a convex boundary polygon (relative to the
//! apex) and an optional back plane. It can be clipped against planes and
//! intersected with polygons, frusta and segments, and polygons can be
//! classified against it. Vertex storage comes from a per-thread size-class
//! pool ([`VertexArrayPool`]) tuned for the short polygons clipping produces.
//!
//! The free functions [`clip_edge_with_info`] and [`clip_plane_with_info`]
//! clip raw vertex rings while recording, per output vertex, how it derives
//! from the input ([`ClipInfo`]).

pub mod config;
mod clip_info;
mod error;
mod frustum;
mod plane;
mod pool;
mod segment;
mod transform;

pub use clip_info::ClipInfo;
pub use config::{PoolConfig, EPSILON, PLANE_EPSILON, SMALL_EPSILON};
pub use error::{GeometryError, Result};
pub use frustum::{clip_edge_with_info, clip_plane_with_info, Frustum, FrustumClass};
pub use plane::{Plane3D, PlaneSide};
pub use pool::{with_thread_pool, PoolStats, SizeClass, VertexArray, VertexArrayPool, MAX_POOLED_LEN};
pub use segment::Segment3;
pub use transform::SpaceTransform;
