//! Tolerances and pool sizing shared by the clipping routines.

/// Points within this distance of a plane are classified as "on" the plane.
pub const PLANE_EPSILON: f32 = 1e-5;

/// Coincidence tolerance used when a frustum vertex is tested against the
/// side planes of a polygon while disambiguating outside from covered.
pub const EPSILON: f32 = 1e-3;

/// Tolerance for parallel segment/plane tests and for the interpolation
/// parameter slightly leaving `[0, 1]`.
pub const SMALL_EPSILON: f32 = 1e-6;

/// Number of slots added to a frustum's vertex storage when it runs full.
pub const VERTEX_ARRAY_GROWTH: usize = 10;

/// Free slots guaranteed before a boundary clip splices in its two new vertices.
pub const CLIP_RESERVE: usize = 3;

/// Block counts for the fixed size classes of [`VertexArrayPool`](crate::VertexArrayPool).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolConfig {
    /// Blocks of exactly 3 vertices, allocated up front.
    pub blocks_3: usize,
    /// Blocks of exactly 4 vertices, allocated up front.
    pub blocks_4: usize,
    /// Blocks of exactly 5 vertices, allocated up front.
    pub blocks_5: usize,
    /// Blocks of exactly 6 vertices, allocated up front.
    pub blocks_6: usize,
    /// Blocks of 10 vertices serving requests of 7 to 10. Allocated on first use.
    pub blocks_10: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            blocks_3: 400,
            blocks_4: 400,
            blocks_5: 100,
            blocks_6: 100,
            blocks_10: 100,
        }
    }
}

impl PoolConfig {
    /// Load block counts from `FRUSTUM_POOL_BLOCKS_{3,4,5,6,10}`.
    ///
    /// Missing or unparsable variables keep their default value.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            blocks_3: env_count("FRUSTUM_POOL_BLOCKS_3", defaults.blocks_3),
            blocks_4: env_count("FRUSTUM_POOL_BLOCKS_4", defaults.blocks_4),
            blocks_5: env_count("FRUSTUM_POOL_BLOCKS_5", defaults.blocks_5),
            blocks_6: env_count("FRUSTUM_POOL_BLOCKS_6", defaults.blocks_6),
            blocks_10: env_count("FRUSTUM_POOL_BLOCKS_10", defaults.blocks_10),
        }
    }

    /// A pool that keeps no blocks around; every request goes to the heap
    /// until blocks are freed back into it.
    pub fn unpooled() -> Self {
        Self {
            blocks_3: 0,
            blocks_4: 0,
            blocks_5: 0,
            blocks_6: 0,
            blocks_10: 0,
        }
    }
}

fn env_count(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
