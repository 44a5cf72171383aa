//! Size-class pool for the small vertex arrays backing frustum polygons.
//!
//! Clip polygons are overwhelmingly 3 to 10 vertices long. Arrays of exactly
//! 3, 4, 5 or 6 vertices come from dedicated free lists filled when the pool
//! is built; other lengths up to 10 share a class of 10-vertex blocks
//! created on first use.
//! Longer arrays bypass the pool and live on the heap.
//!
//! A pool is plain single-threaded state. Each thread lazily builds its own
//! (see [`with_thread_pool`]), which is what [`Frustum`](crate::Frustum)
//! storage draws from; separate pools can also be created and passed around
//! explicitly.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

use nalgebra::Vector3;

use crate::config::PoolConfig;
use crate::{GeometryError, Result};

type Block = Box<[Vector3<f32>]>;

/// Largest array length served from a pooled class.
pub const MAX_POOLED_LEN: usize = 10;

/// Size class an array length is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Three,
    Four,
    Five,
    Six,
    /// 1, 2 or 7 to 10 vertices, backed by 10-vertex blocks.
    UpToTen,
    /// More than 10 vertices, plain heap allocation.
    Heap,
}

impl SizeClass {
    /// Class for an array of `len` vertices; `None` for zero.
    pub fn for_len(len: usize) -> Option<Self> {
        match len {
            0 => None,
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            5 => Some(Self::Five),
            6 => Some(Self::Six),
            1 | 2 | 7..=MAX_POOLED_LEN => Some(Self::UpToTen),
            _ => Some(Self::Heap),
        }
    }

    /// Number of vertices in a block of this class (the requested length for heap arrays).
    fn block_len(self, requested: usize) -> usize {
        match self {
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::UpToTen => MAX_POOLED_LEN,
            Self::Heap => requested,
        }
    }

    fn fixed_index(self) -> Option<usize> {
        match self {
            Self::Three => Some(0),
            Self::Four => Some(1),
            Self::Five => Some(2),
            Self::Six => Some(3),
            Self::UpToTen | Self::Heap => None,
        }
    }
}

/// An array of vertices handed out by a [`VertexArrayPool`].
///
/// Dereferences to exactly the requested number of vertices. The backing
/// block may be longer (7 to 10 share 10-vertex blocks). Contents of a
/// freshly allocated array are unspecified and must be written before use.
#[derive(Debug, Default)]
pub struct VertexArray {
    block: Option<Block>,
    len: usize,
}

impl VertexArray {
    /// The null array. Holds no allocation.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size class the backing block belongs to.
    pub fn size_class(&self) -> Option<SizeClass> {
        SizeClass::for_len(self.len)
    }
}

impl Deref for VertexArray {
    type Target = [Vector3<f32>];

    fn deref(&self) -> &Self::Target {
        match &self.block {
            Some(block) => &block[..self.len],
            None => &[],
        }
    }
}

impl DerefMut for VertexArray {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match &mut self.block {
            Some(block) => &mut block[..self.len],
            None => &mut [],
        }
    }
}

/// Free block counts, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Free blocks in the 3, 4, 5 and 6 classes.
    pub free_fixed: [usize; 4],
    /// Free 10-vertex blocks, `None` until the class has been created.
    pub free_up_to_ten: Option<usize>,
}

/// Size-class allocator for vertex arrays.
#[derive(Debug)]
pub struct VertexArrayPool {
    config: PoolConfig,
    fixed: [Vec<Block>; 4],
    up_to_ten: Option<Vec<Block>>,
}

impl Default for VertexArrayPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl VertexArrayPool {
    /// Creates a pool, filling the 3/4/5/6 classes up front.
    pub fn new(config: PoolConfig) -> Self {
        let fixed = [
            prefill(3, config.blocks_3),
            prefill(4, config.blocks_4),
            prefill(5, config.blocks_5),
            prefill(6, config.blocks_6),
        ];
        Self {
            config,
            fixed,
            up_to_ten: None,
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Allocates an array of `len` vertices. `len == 0` yields the null array.
    pub fn allocate(&mut self, len: usize) -> VertexArray {
        let Some(class) = SizeClass::for_len(len) else {
            return VertexArray::empty();
        };

        let block = match class {
            SizeClass::Heap => {
                tracing::trace!(len, "vertex array above pooled sizes, using heap");
                new_block(len)
            }
            _ => {
                let block_len = class.block_len(len);
                match self.free_list(class).pop() {
                    Some(block) => block,
                    None => {
                        tracing::debug!(block_len, "vertex pool class exhausted, growing");
                        new_block(block_len)
                    }
                }
            }
        };

        VertexArray {
            block: Some(block),
            len,
        }
    }

    /// Returns an array that was allocated with length `len`.
    ///
    /// The length is checked against the array; a mismatch leaves the pool
    /// untouched and drops the array.
    pub fn free(&mut self, array: VertexArray, len: usize) -> Result<()> {
        if array.len() != len {
            return Err(GeometryError::MismatchedArrayLengths {
                expected: array.len(),
                actual: len,
            });
        }
        self.recycle(array);
        Ok(())
    }

    /// Puts the backing block of `array` back on its free list.
    pub fn recycle(&mut self, array: VertexArray) {
        let Some(block) = array.block else {
            return;
        };
        let class = match block.len() {
            3 => SizeClass::Three,
            4 => SizeClass::Four,
            5 => SizeClass::Five,
            6 => SizeClass::Six,
            MAX_POOLED_LEN => SizeClass::UpToTen,
            _ => return,
        };
        self.free_list(class).push(block);
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            free_fixed: [
                self.fixed[0].len(),
                self.fixed[1].len(),
                self.fixed[2].len(),
                self.fixed[3].len(),
            ],
            free_up_to_ten: self.up_to_ten.as_ref().map(Vec::len),
        }
    }

    fn free_list(&mut self, class: SizeClass) -> &mut Vec<Block> {
        if let Some(idx) = class.fixed_index() {
            return &mut self.fixed[idx];
        }
        let blocks = self.config.blocks_10;
        self.up_to_ten.get_or_insert_with(|| {
            tracing::debug!(blocks, "creating 7-10 vertex pool class");
            prefill(MAX_POOLED_LEN, blocks)
        })
    }
}

fn new_block(len: usize) -> Block {
    vec![Vector3::zeros(); len].into_boxed_slice()
}

fn prefill(block_len: usize, count: usize) -> Vec<Block> {
    (0..count).map(|_| new_block(block_len)).collect()
}

thread_local! {
    static THREAD_POOL: RefCell<VertexArrayPool> =
        RefCell::new(VertexArrayPool::new(PoolConfig::from_env()));
}

/// Runs `f` with the calling thread's pool.
///
/// # Panics
/// Panics if called re-entrantly from inside `f`.
pub fn with_thread_pool<R>(f: impl FnOnce(&mut VertexArrayPool) -> R) -> R {
    THREAD_POOL.with(|pool| f(&mut pool.borrow_mut()))
}

/// Allocates from the calling thread's pool.
pub(crate) fn thread_allocate(len: usize) -> VertexArray {
    if len == 0 {
        return VertexArray::empty();
    }
    with_thread_pool(|pool| pool.allocate(len))
}

/// Hands an array back to the calling thread's pool. During thread
/// teardown, or while the pool is borrowed, the block is simply dropped.
pub(crate) fn thread_release(array: VertexArray) {
    if array.block.is_none() {
        return;
    }
    let mut array = Some(array);
    let _ = THREAD_POOL.try_with(|pool| {
        if let Ok(mut pool) = pool.try_borrow_mut() {
            if let Some(array) = array.take() {
                pool.recycle(array);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_is_null() {
        let mut pool = VertexArrayPool::new(PoolConfig::unpooled());
        let array = pool.allocate(0);
        assert!(array.is_empty());
        assert!(array.block.is_none());
        assert!(pool.free(array, 0).is_ok());
    }

    #[test]
    fn round_trip_every_class() {
        let mut pool = VertexArrayPool::default();
        for n in [3, 4, 5, 6, 7, 10, 11, 50] {
            let mut array = pool.allocate(n);
            assert_eq!(array.len(), n);
            array[n - 1] = Vector3::new(1.0, 2.0, 3.0);
            pool.free(array, n).unwrap();

            let again = pool.allocate(n);
            assert_eq!(again.len(), n);
            pool.free(again, n).unwrap();
        }
    }

    #[test]
    fn fixed_classes_are_prefilled() {
        let pool = VertexArrayPool::default();
        let stats = pool.stats();
        assert_eq!(stats.free_fixed, [400, 400, 100, 100]);
        assert_eq!(stats.free_up_to_ten, None);
    }

    #[test]
    fn up_to_ten_class_is_lazy() {
        let mut pool = VertexArrayPool::default();
        let array = pool.allocate(8);
        assert_eq!(pool.stats().free_up_to_ten, Some(99));
        pool.free(array, 8).unwrap();
        assert_eq!(pool.stats().free_up_to_ten, Some(100));
    }

    #[test]
    fn blocks_are_reused() {
        let mut pool = VertexArrayPool::default();
        let array = pool.allocate(4);
        assert_eq!(pool.stats().free_fixed[1], 399);
        pool.free(array, 4).unwrap();
        assert_eq!(pool.stats().free_fixed[1], 400);
    }

    #[test]
    fn exhausted_class_falls_back_to_heap() {
        let mut pool = VertexArrayPool::new(PoolConfig::unpooled());
        let array = pool.allocate(3);
        assert_eq!(array.len(), 3);
        pool.free(array, 3).unwrap();
        assert_eq!(pool.stats().free_fixed[0], 1);
    }

    #[test]
    fn heap_arrays_are_not_pooled() {
        let mut pool = VertexArrayPool::new(PoolConfig::unpooled());
        let array = pool.allocate(11);
        pool.free(array, 11).unwrap();
        assert_eq!(pool.stats().free_fixed, [0, 0, 0, 0]);
        assert_eq!(pool.stats().free_up_to_ten, None);
    }

    #[test]
    fn free_with_wrong_length_is_rejected() {
        let mut pool = VertexArrayPool::default();
        let array = pool.allocate(5);
        assert_eq!(
            pool.free(array, 6),
            Err(GeometryError::MismatchedArrayLengths {
                expected: 5,
                actual: 6
            })
        );
        assert_eq!(pool.stats().free_fixed[2], 99);
    }

    #[test]
    fn size_classes() {
        assert_eq!(SizeClass::for_len(0), None);
        assert_eq!(SizeClass::for_len(1), Some(SizeClass::UpToTen));
        assert_eq!(SizeClass::for_len(3), Some(SizeClass::Three));
        assert_eq!(SizeClass::for_len(7), Some(SizeClass::UpToTen));
        assert_eq!(SizeClass::for_len(10), Some(SizeClass::UpToTen));
        assert_eq!(SizeClass::for_len(11), Some(SizeClass::Heap));
    }

    #[test]
    fn thread_pool_round_trip() {
        let array = thread_allocate(6);
        assert_eq!(array.len(), 6);
        thread_release(array);
        let stats = with_thread_pool(|pool| pool.stats());
        assert!(stats.free_fixed[3] > 0);
    }
}
