// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Keel spatial core: bounding volumes and the locking broad-phase BVH.
//!
//! This crate provides:
//! - Validated bounding-volume primitives ([`Aabb`], [`Sphere`]) behind the
//!   [`BoundingVolume`] contract.
//! - [`VolumeHandle`], the shared bounding volume a physics body owns and a
//!   single tree may exclusively claim.
//! - [`BvhTree`], a self-balancing bounding-volume hierarchy driven once per
//!   simulation tick by the collision solver.
//!
//! Design notes:
//! - Deterministic: no ambient RNG; identical operation sequences produce
//!   identical tree shapes, and the greedy sibling heuristic's tie-break is
//!   fixed (ties descend left).
//! - Float32 throughout; hot-path predicates never take a square root.
//! - Single-threaded by contract: one driver mutates the tree between
//!   queries and nothing here synchronizes. Rustdoc is treated as part of
//!   the contract; public items are documented.

pub mod broad;
pub mod math;
pub mod types;

pub use broad::bvh_tree::{BvhTree, TreeError, DEFAULT_PADDING};
pub use types::aabb::Aabb;
pub use types::handle::{TreeId, VolumeHandle};
pub use types::sphere::Sphere;
pub use types::volume::{BoundingVolume, GeometryError};
