// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deterministic math helpers backing the bounding-volume types, plus the
//! seeded pseudo-random generator used by deterministic tests.
//!
//! Determinism notes:
//! - Float32 arithmetic only, written as explicit per-component operations
//!   so results round identically across platforms (no fused multiply-add).
//! - No ambient randomness: [`Prng`] is seeded explicitly and sequences are
//!   reproducible for matching seeds.

#[doc = "Seeded xoroshiro128+ pseudo-random numbers."]
pub mod prng;
#[doc = "Deterministic 3D vector."]
pub mod vec3;

pub use prng::Prng;
pub use vec3::Vec3;

/// Degeneracy threshold for float comparisons.
///
/// This is a policy value (not numeric precision): quantities at or below
/// `EPSILON` are treated as degenerate so downstream code can detect them
/// deterministically.
pub const EPSILON: f32 = 1e-6;
