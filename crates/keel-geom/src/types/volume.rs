// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use thiserror::Error;

use crate::math::Vec3;

/// Errors raised when invalid geometry is rejected at the volume boundary.
///
/// Validation happens at construction and on every mutator so that a
/// corrupt shape can never enter a tree, where it would silently break
/// every downstream containment, intersection, and balance computation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// A coordinate was NaN or infinite.
    #[error("coordinate is not finite")]
    NonFiniteCoordinate,
    /// A minimum extent exceeded the corresponding maximum extent.
    #[error("minimum extent exceeds maximum extent")]
    InvertedExtents,
    /// A sphere radius was negative.
    #[error("sphere radius is negative")]
    NegativeRadius,
}

/// Contract shared by the bounding shapes the broad-phase partitions.
///
/// All predicates are pure: they read geometry and return a verdict with
/// no side effects. Implementations must keep the hot-path predicates
/// (`contains`, `contains_point`, `intersects`) free of square roots.
pub trait BoundingVolume: Clone + PartialEq + core::fmt::Debug {
    /// Minimum extent per axis.
    fn min(&self) -> Vec3;

    /// Maximum extent per axis.
    fn max(&self) -> Vec3;

    /// Geometric center.
    fn center(&self) -> Vec3;

    /// Returns `true` when `other` lies entirely inside this volume
    /// (inclusive on boundaries).
    fn contains(&self, other: &Self) -> bool;

    /// Returns `true` when `point` lies inside this volume (inclusive).
    fn contains_point(&self, point: &Vec3) -> bool;

    /// Returns `true` when the two volumes overlap (inclusive on faces).
    fn intersects(&self, other: &Self) -> bool;

    /// The minimal volume of this shape kind enclosing both operands.
    fn merged(&self, other: &Self) -> Self;

    /// This volume enlarged by the fractional `ratio` about its center.
    ///
    /// Used for internal-node volumes so small movements of enclosed
    /// leaves do not force reinsertion.
    fn padded(&self, ratio: f32) -> Self;

    /// Interior measure (box volume, sphere volume) driving greedy
    /// sibling selection during insertion.
    fn measure(&self) -> f32;

    /// The degenerate zero-size volume at `point`, used to express point
    /// queries through the volume-query path.
    fn at_point(point: Vec3) -> Self;
}
