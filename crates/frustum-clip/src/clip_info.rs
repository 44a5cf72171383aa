//! Per-vertex provenance records produced by the provenance-tracking clippers.
//!
//! Each vertex of a clipped polygon carries a [`ClipInfo`] describing how it
//! was derived from the caller's original vertices, so attributes such as
//! texture coordinates can be interpolated afterwards without keeping the
//! original geometry around.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use crate::{GeometryError, Result};

/// How a clipped vertex relates to the original vertex set.
///
/// `Inside` owns its two children. Children are always built from records
/// that existed before the parent, so the tree can never contain a cycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClipInfo {
    /// The vertex is original vertex `idx`.
    Original { idx: usize },
    /// The vertex lies on the original edge `i1 → i2`, at fraction `r` from `i1`.
    OnEdge { i1: usize, i2: usize, r: f32 },
    /// The vertex lies between two earlier clip results, at fraction `r` from `ci1`.
    Inside {
        ci1: Box<ClipInfo>,
        ci2: Box<ClipInfo>,
        r: f32,
    },
}

impl Default for ClipInfo {
    fn default() -> Self {
        ClipInfo::Original { idx: 0 }
    }
}

impl ClipInfo {
    /// `Original(i)` for every `i` in `0..count`, the state the clippers expect
    /// on entry.
    pub fn seed(count: usize) -> Vec<ClipInfo> {
        (0..count).map(|idx| ClipInfo::Original { idx }).collect()
    }

    /// Record for a vertex interpolated between `a` and `b` at fraction `r` from `a`.
    ///
    /// Two original endpoints give an edge record; anything else nests deep
    /// copies of both endpoints.
    pub fn between(a: &ClipInfo, b: &ClipInfo, r: f32) -> ClipInfo {
        match (a, b) {
            (ClipInfo::Original { idx: i1 }, ClipInfo::Original { idx: i2 }) => ClipInfo::OnEdge {
                i1: *i1,
                i2: *i2,
                r,
            },
            _ => ClipInfo::Inside {
                ci1: Box::new(a.clone()),
                ci2: Box::new(b.clone()),
                r,
            },
        }
    }

    #[inline]
    pub fn is_original(&self) -> bool {
        matches!(self, ClipInfo::Original { .. })
    }

    /// Nesting depth: 0 for original and edge records.
    pub fn depth(&self) -> usize {
        match self {
            ClipInfo::Inside { ci1, ci2, .. } => 1 + ci1.depth().max(ci2.depth()),
            _ => 0,
        }
    }

    /// Drops any owned children and resets to `Original { idx: 0 }`.
    /// Original and edge records are left alone.
    pub fn clear(&mut self) {
        if let ClipInfo::Inside { .. } = self {
            *self = ClipInfo::default();
        }
    }

    /// Deep-copies `other` into `self`.
    pub fn copy_from(&mut self, other: &ClipInfo) {
        self.clone_from(other);
    }

    /// Moves the record out of `other`, leaving `Original { idx: 0 }` behind.
    /// Owned children change owner without being copied.
    pub fn take_from(&mut self, other: &mut ClipInfo) {
        *self = std::mem::take(other);
    }

    /// Resolves this record against one attribute per original vertex.
    ///
    /// ```
    /// use frustum_clip::ClipInfo;
    ///
    /// let uv = [0.0_f32, 10.0, 20.0];
    /// let info = ClipInfo::OnEdge { i1: 1, i2: 2, r: 0.25 };
    /// assert_eq!(info.interpolate(&uv).unwrap(), 12.5);
    /// ```
    pub fn interpolate<T>(&self, attributes: &[T]) -> Result<T>
    where
        T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
    {
        let fetch = |index: usize| {
            attributes
                .get(index)
                .copied()
                .ok_or(GeometryError::IndexOutOfRange {
                    index,
                    len: attributes.len(),
                })
        };

        match self {
            ClipInfo::Original { idx } => fetch(*idx),
            ClipInfo::OnEdge { i1, i2, r } => {
                let a = fetch(*i1)?;
                let b = fetch(*i2)?;
                Ok(a + (b - a) * *r)
            }
            ClipInfo::Inside { ci1, ci2, r } => {
                let a = ci1.interpolate(attributes)?;
                let b = ci2.interpolate(attributes)?;
                Ok(a + (b - a) * *r)
            }
        }
    }

    /// Indented multi-line rendering of the record tree.
    pub fn dump(&self, indent: usize) -> String {
        let mut out = String::new();
        self.dump_into(indent, &mut out);
        out
    }

    fn dump_into(&self, indent: usize, out: &mut String) {
        let pad = " ".repeat(indent);
        match self {
            ClipInfo::Original { idx } => {
                out.push_str(&format!("{pad} ORIGINAL idx={idx}\n"));
            }
            ClipInfo::OnEdge { i1, i2, r } => {
                out.push_str(&format!("{pad} ONEDGE i1={i1} i2={i2} r={r}\n"));
            }
            ClipInfo::Inside { ci1, ci2, r } => {
                out.push_str(&format!("{pad} INSIDE r={r}\n"));
                ci1.dump_into(indent + 2, out);
                ci2.dump_into(indent + 2, out);
            }
        }
    }
}

impl fmt::Display for ClipInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    fn nested() -> ClipInfo {
        ClipInfo::Inside {
            ci1: Box::new(ClipInfo::OnEdge { i1: 0, i2: 1, r: 0.5 }),
            ci2: Box::new(ClipInfo::Original { idx: 2 }),
            r: 0.5,
        }
    }

    #[test]
    fn default_is_original_zero() {
        assert_eq!(ClipInfo::default(), ClipInfo::Original { idx: 0 });
    }

    #[test]
    fn seed_indexes_each_vertex() {
        let seeded = ClipInfo::seed(3);
        assert_eq!(seeded[2], ClipInfo::Original { idx: 2 });
    }

    #[test]
    fn between_originals_is_on_edge() {
        let a = ClipInfo::Original { idx: 3 };
        let b = ClipInfo::Original { idx: 4 };
        assert_eq!(
            ClipInfo::between(&a, &b, 0.25),
            ClipInfo::OnEdge { i1: 3, i2: 4, r: 0.25 }
        );
    }

    #[test]
    fn between_composite_nests_copies() {
        let a = ClipInfo::OnEdge { i1: 0, i2: 1, r: 0.5 };
        let b = ClipInfo::Original { idx: 2 };
        let info = ClipInfo::between(&a, &b, 0.5);
        assert_eq!(info, nested());
        assert_eq!(info.depth(), 1);
    }

    #[test]
    fn clear_resets_inside_only() {
        let mut edge = ClipInfo::OnEdge { i1: 1, i2: 2, r: 0.3 };
        edge.clear();
        assert_eq!(edge, ClipInfo::OnEdge { i1: 1, i2: 2, r: 0.3 });

        let mut inside = nested();
        inside.clear();
        assert_eq!(inside, ClipInfo::Original { idx: 0 });
    }

    #[test]
    fn copy_is_deep() {
        let source = nested();
        let mut target = ClipInfo::default();
        target.copy_from(&source);
        assert_eq!(target, source);

        target.clear();
        assert_eq!(source.depth(), 1);
    }

    #[test]
    fn take_resets_source() {
        let mut source = nested();
        let mut target = ClipInfo::Original { idx: 9 };
        target.take_from(&mut source);
        assert_eq!(target, nested());
        assert_eq!(source, ClipInfo::Original { idx: 0 });
    }

    #[test]
    fn interpolate_nested() {
        let values = [0.0_f32, 2.0, 8.0];
        // ci1 resolves to 1.0, ci2 to 8.0, halfway is 4.5
        assert_relative_eq!(nested().interpolate(&values).unwrap(), 4.5);
    }

    #[test]
    fn interpolate_vectors() {
        let uvs = [Vector2::new(0.0_f32, 0.0), Vector2::new(1.0, 2.0)];
        let info = ClipInfo::OnEdge { i1: 0, i2: 1, r: 0.5 };
        let uv = info.interpolate(&uvs).unwrap();
        assert_relative_eq!(uv.x, 0.5);
        assert_relative_eq!(uv.y, 1.0);
    }

    #[test]
    fn interpolate_rejects_bad_index() {
        let info = ClipInfo::Original { idx: 5 };
        assert_eq!(
            info.interpolate(&[1.0_f32, 2.0]),
            Err(GeometryError::IndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn dump_indents_children() {
        let text = nested().dump(0);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(" INSIDE"));
        assert!(lines[1].starts_with("   ONEDGE i1=0 i2=1"));
        assert!(lines[2].starts_with("   ORIGINAL idx=2"));
    }
}
