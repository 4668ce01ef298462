// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bounding-volume types and the partition-claim protocol.
//!
//! Semantics notes:
//! - Intersection is inclusive on faces: touching volumes count as
//!   intersecting, avoiding pair churn on contact boundaries.
//! - Geometry is validated at construction and on every mutator; a volume
//!   holding NaN, an infinity, or a negative size cannot exist, so the
//!   broad-phase never has to re-check.
//! - Zero-size volumes are legal — point queries are expressed as
//!   degenerate volumes.

#[doc = "Axis-aligned bounding boxes (world space)."]
pub mod aabb;
#[doc = "Shared volume handles and the exclusive-claim protocol."]
pub mod handle;
#[doc = "Spherical bounding volumes."]
pub mod sphere;
#[doc = "The geometric contract and validation errors."]
pub mod volume;
