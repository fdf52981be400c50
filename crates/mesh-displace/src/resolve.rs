//! Offset resolution.
//!
//! Each vertex's contributions reduce to one offset. The summed direction
//! is kept and its length is corrected so the vertex lands at the signed
//! distance from the plane of its first contribution:
//!
//! ```text
//! sum   = c_0 + c_1 + ... + c_n
//! cos θ = (sum · c_0) / (|sum| |c_0|)
//! h     = distance / cos θ
//! offset = normalize(sum) * |h|
//! ```
//!
//! When two selected faces meet at an angle, the shared vertex therefore
//! moves further than `distance`, keeping both displaced faces parallel to
//! their originals. As `θ` approaches 90° the offset grows without bound;
//! this is reported, not clamped.

use mesh_edit::VertexId;
use nalgebra::Vector3;

use crate::accumulate::ContributionMap;

/// The resolved offset of one vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedOffset {
    pub vertex: VertexId,
    pub offset: Vector3<f64>,
    /// Cosine between the summed direction and the first contribution.
    pub cos_angle: f64,
    /// Number of contributions that were combined.
    pub contributions: usize,
}

impl ResolvedOffset {
    /// True if the offset has no NaN or infinite component.
    pub fn is_finite(&self) -> bool {
        self.offset.iter().all(|c| c.is_finite())
    }

    /// True if the offset is non-finite or the angle correction is within
    /// `warn_cos` of diverging.
    pub fn is_unstable(&self, warn_cos: f64) -> bool {
        !self.is_finite() || !(self.cos_angle.abs() >= warn_cos)
    }
}

/// Reduce one vertex's contributions to an offset.
///
/// Returns the offset and the cosine used for the length correction. A
/// single contribution is returned as-is, so its length is exactly
/// `|distance|`. A zero-length sum or first contribution yields NaN.
///
/// # Panics
///
/// Panics if `contributions` is empty.
pub fn resolve_offset(contributions: &[Vector3<f64>], distance: f64) -> (Vector3<f64>, f64) {
    let first = contributions[0];
    if contributions.len() == 1 {
        return (first, 1.0);
    }

    let sum: Vector3<f64> = contributions.iter().sum();
    let cos_angle = sum.dot(&first) / (sum.norm() * first.norm());
    let h = distance / cos_angle;

    (sum.normalize() * h.abs(), cos_angle)
}

/// Resolve every vertex in the map, in the map's iteration order.
pub fn resolve_offsets(map: &ContributionMap, distance: f64) -> Vec<ResolvedOffset> {
    map.iter()
        .map(|(vertex, contributions)| {
            let (offset, cos_angle) = resolve_offset(contributions, distance);
            ResolvedOffset {
                vertex,
                offset,
                cos_angle,
                contributions: contributions.len(),
            }
        })
        .collect()
}
