// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Broad-phase spatial partitioning: the locking BVH and its node arena.
//!
//! Structural contract (holds whenever a public mutation returns):
//! - Every internal node is AVL-balanced: `|height(left) − height(right)| ≤ 1`.
//! - Every internal node's padded volume contains the live bounds of both
//!   children, so an unmoved leaf never triggers reinsertion.
//! - Nodes form a strict binary tree: internal nodes have exactly two
//!   children, leaves have none and hold exactly one element.
//!
//! Queries are explicit-stack depth-first traversals; recursion depth is
//! never a function of tree shape.

mod arena;

#[doc = "The self-balancing, exclusively-locking bounding-volume hierarchy."]
pub mod bvh_tree;
