// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::math::Vec3;
use crate::types::volume::{BoundingVolume, GeometryError};

/// Axis-aligned bounding box in world coordinates.
///
/// Invariants (enforced by every constructor and mutator):
/// - `min` components are less than or equal to `max` components.
/// - All components are finite. Zero-size boxes are legal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    /// Constructs an AABB from its minimum and maximum corners.
    ///
    /// # Errors
    /// Returns [`GeometryError::NonFiniteCoordinate`] if any component is
    /// NaN or infinite, and [`GeometryError::InvertedExtents`] if any
    /// component of `min` exceeds its counterpart in `max`.
    pub fn new(min: Vec3, max: Vec3) -> Result<Self, GeometryError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate);
        }
        let a = min.to_array();
        let b = max.to_array();
        if a[0] > b[0] || a[1] > b[1] || a[2] > b[2] {
            return Err(GeometryError::InvertedExtents);
        }
        Ok(Self { min, max })
    }

    /// Builds an AABB centered at `center` with half-extents `hx, hy, hz`.
    ///
    /// # Errors
    /// Rejects non-finite inputs and negative half-extents.
    pub fn from_center_half_extents(
        center: Vec3,
        hx: f32,
        hy: f32,
        hz: f32,
    ) -> Result<Self, GeometryError> {
        let he = Vec3::new(hx, hy, hz);
        Self::new(center.sub(&he), center.add(&he))
    }

    /// Grows the box just enough to contain `point`.
    ///
    /// # Errors
    /// Rejects a non-finite point before touching the box.
    pub fn encompass_point(&mut self, point: Vec3) -> Result<(), GeometryError> {
        if !point.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate);
        }
        self.min = self.min.min(&point);
        self.max = self.max.max(&point);
        Ok(())
    }

    /// Grows the box just enough to contain the box `[min, max]`.
    ///
    /// # Errors
    /// Rejects non-finite or inverted input extents before touching the box.
    pub fn encompass(&mut self, min: Vec3, max: Vec3) -> Result<(), GeometryError> {
        let other = Self::new(min, max)?;
        self.min = self.min.min(&other.min);
        self.max = self.max.max(&other.max);
        Ok(())
    }

    /// Translates the box so its center lands on `point`, preserving size.
    ///
    /// # Errors
    /// Rejects a non-finite point before touching the box.
    pub fn center_on(&mut self, point: Vec3) -> Result<(), GeometryError> {
        if !point.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate);
        }
        let half = self.max.sub(&self.min).scale(0.5);
        self.min = point.sub(&half);
        self.max = point.add(&half);
        Ok(())
    }
}

impl BoundingVolume for Aabb {
    fn min(&self) -> Vec3 {
        self.min
    }

    fn max(&self) -> Vec3 {
        self.max
    }

    fn center(&self) -> Vec3 {
        self.min.add(&self.max).scale(0.5)
    }

    fn contains(&self, other: &Self) -> bool {
        let a_min = self.min.to_array();
        let a_max = self.max.to_array();
        let b_min = other.min.to_array();
        let b_max = other.max.to_array();
        a_min[0] <= b_min[0]
            && a_min[1] <= b_min[1]
            && a_min[2] <= b_min[2]
            && b_max[0] <= a_max[0]
            && b_max[1] <= a_max[1]
            && b_max[2] <= a_max[2]
    }

    fn contains_point(&self, point: &Vec3) -> bool {
        let a_min = self.min.to_array();
        let a_max = self.max.to_array();
        let p = point.to_array();
        a_min[0] <= p[0]
            && p[0] <= a_max[0]
            && a_min[1] <= p[1]
            && p[1] <= a_max[1]
            && a_min[2] <= p[2]
            && p[2] <= a_max[2]
    }

    fn intersects(&self, other: &Self) -> bool {
        let a_min = self.min.to_array();
        let a_max = self.max.to_array();
        let b_min = other.min.to_array();
        let b_max = other.max.to_array();
        // Inclusive to treat touching faces as overlap for broad-phase pairing.
        !(a_max[0] < b_min[0]
            || a_min[0] > b_max[0]
            || a_max[1] < b_min[1]
            || a_min[1] > b_max[1]
            || a_max[2] < b_min[2]
            || a_min[2] > b_max[2])
    }

    fn merged(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(&other.min),
            max: self.max.max(&other.max),
        }
    }

    fn padded(&self, ratio: f32) -> Self {
        let pad = self.max.sub(&self.min).scale(0.5 * ratio);
        Self {
            min: self.min.sub(&pad),
            max: self.max.add(&pad),
        }
    }

    fn measure(&self) -> f32 {
        let d = self.max.sub(&self.min).to_array();
        d[0] * d[1] * d[2]
    }

    fn at_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }
}
