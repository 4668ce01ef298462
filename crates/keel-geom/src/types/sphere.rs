// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::math::{Vec3, EPSILON};
use crate::types::volume::{BoundingVolume, GeometryError};

/// Spherical bounding volume in world coordinates.
///
/// Invariants (enforced by every constructor and mutator):
/// - The center is finite and the radius is finite and non-negative.
///   Zero-radius spheres are legal.
///
/// Containment and intersection compare squared distances against
/// combined-radius thresholds, so the query path never takes a square
/// root; the square root is confined to [`merged`](BoundingVolume::merged)
/// and the `encompass` mutators, which only run while internal volumes are
/// recomputed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    /// Constructs a sphere from its center and radius.
    ///
    /// # Errors
    /// Returns [`GeometryError::NonFiniteCoordinate`] for NaN/infinite
    /// inputs and [`GeometryError::NegativeRadius`] for a negative radius.
    pub fn new(center: Vec3, radius: f32) -> Result<Self, GeometryError> {
        if !center.is_finite() || !radius.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate);
        }
        if radius < 0.0 {
            return Err(GeometryError::NegativeRadius);
        }
        Ok(Self { center, radius })
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Grows the radius just enough to contain `point`, keeping the center.
    ///
    /// # Errors
    /// Rejects a non-finite point before touching the sphere.
    pub fn encompass_point(&mut self, point: Vec3) -> Result<(), GeometryError> {
        if !point.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate);
        }
        let d2 = self.center.distance_squared(&point);
        if d2 > self.radius * self.radius {
            self.radius = d2.sqrt();
        }
        Ok(())
    }

    /// Grows the radius just enough to contain the box `[min, max]`,
    /// keeping the center.
    ///
    /// # Errors
    /// Rejects non-finite or inverted input extents before touching the
    /// sphere.
    pub fn encompass(&mut self, min: Vec3, max: Vec3) -> Result<(), GeometryError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate);
        }
        let a = min.to_array();
        let b = max.to_array();
        if a[0] > b[0] || a[1] > b[1] || a[2] > b[2] {
            return Err(GeometryError::InvertedExtents);
        }
        // Farthest corner of the box, measured per axis from the center.
        let c = self.center.to_array();
        let mut d2 = 0.0;
        for axis in 0..3 {
            let d = (c[axis] - a[axis]).abs().max((b[axis] - c[axis]).abs());
            d2 += d * d;
        }
        if d2 > self.radius * self.radius {
            self.radius = d2.sqrt();
        }
        Ok(())
    }

    /// Moves the center to `point`, preserving the radius.
    ///
    /// # Errors
    /// Rejects a non-finite point before touching the sphere.
    pub fn center_on(&mut self, point: Vec3) -> Result<(), GeometryError> {
        if !point.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate);
        }
        self.center = point;
        Ok(())
    }
}

impl BoundingVolume for Sphere {
    fn min(&self) -> Vec3 {
        self.center
            .sub(&Vec3::new(self.radius, self.radius, self.radius))
    }

    fn max(&self) -> Vec3 {
        self.center
            .add(&Vec3::new(self.radius, self.radius, self.radius))
    }

    fn center(&self) -> Vec3 {
        self.center
    }

    fn contains(&self, other: &Self) -> bool {
        // dist + r_other <= r_self, squared to stay sqrt-free; impossible
        // outright when the other sphere is larger.
        let slack = self.radius - other.radius;
        if slack < 0.0 {
            return false;
        }
        self.center.distance_squared(&other.center) <= slack * slack
    }

    fn contains_point(&self, point: &Vec3) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    fn intersects(&self, other: &Self) -> bool {
        // Inclusive to treat tangent spheres as overlap for broad-phase pairing.
        let reach = self.radius + other.radius;
        self.center.distance_squared(&other.center) <= reach * reach
    }

    fn merged(&self, other: &Self) -> Self {
        let d2 = self.center.distance_squared(&other.center);
        let slack = self.radius - other.radius;
        // One sphere already encloses the other.
        if d2 <= slack * slack {
            return if slack >= 0.0 { *self } else { *other };
        }
        let d = d2.sqrt();
        if d <= EPSILON {
            // Degenerate separation; keep the larger radius in place.
            return Self {
                center: self.center,
                radius: self.radius.max(other.radius),
            };
        }
        let radius = (d + self.radius + other.radius) * 0.5;
        let t = (radius - self.radius) / d;
        let center = self.center.add(&other.center.sub(&self.center).scale(t));
        Self { center, radius }
    }

    fn padded(&self, ratio: f32) -> Self {
        Self {
            center: self.center,
            radius: self.radius * (1.0 + ratio),
        }
    }

    fn measure(&self) -> f32 {
        (4.0 / 3.0) * core::f32::consts::PI * self.radius * self.radius * self.radius
    }

    fn at_point(point: Vec3) -> Self {
        Self {
            center: point,
            radius: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;

    fn sphere(x: f32, y: f32, z: f32, r: f32) -> Sphere {
        Sphere::new(Vec3::new(x, y, z), r).expect("valid sphere")
    }

    #[test]
    fn construction_rejects_bad_geometry() {
        assert_eq!(
            Sphere::new(Vec3::new(f32::NAN, 0.0, 0.0), 1.0),
            Err(GeometryError::NonFiniteCoordinate)
        );
        assert_eq!(
            Sphere::new(Vec3::ZERO, f32::INFINITY),
            Err(GeometryError::NonFiniteCoordinate)
        );
        assert_eq!(
            Sphere::new(Vec3::ZERO, -0.5),
            Err(GeometryError::NegativeRadius)
        );
        assert!(Sphere::new(Vec3::ZERO, 0.0).is_ok());
    }

    #[test]
    fn tangent_spheres_intersect() {
        let a = sphere(0.0, 0.0, 0.0, 1.0);
        let b = sphere(2.0, 0.0, 0.0, 1.0);
        assert!(a.intersects(&b));
        let c = sphere(2.1, 0.0, 0.0, 1.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn containment_requires_full_enclosure() {
        let outer = sphere(0.0, 0.0, 0.0, 2.0);
        let inner = sphere(0.5, 0.0, 0.0, 1.0);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        // Overlapping but protruding.
        let poking = sphere(1.5, 0.0, 0.0, 1.0);
        assert!(!outer.contains(&poking));
    }

    #[test]
    fn merged_encloses_both_operands() {
        let a = sphere(0.0, 0.0, 0.0, 1.0);
        let b = sphere(4.0, 0.0, 0.0, 1.0);
        let m = a.merged(&b);
        assert!(m.contains(&a));
        assert!(m.contains(&b));
        assert!((m.radius() - 3.0).abs() < 1e-5);
        assert!((m.center().to_array()[0] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn merged_with_enclosed_sphere_is_identity() {
        let big = sphere(0.0, 0.0, 0.0, 5.0);
        let small = sphere(1.0, 0.0, 0.0, 1.0);
        assert_eq!(big.merged(&small), big);
        assert_eq!(small.merged(&big), big);
    }

    #[test]
    fn encompass_point_grows_radius_only_when_needed() {
        let mut s = sphere(0.0, 0.0, 0.0, 2.0);
        s.encompass_point(Vec3::new(1.0, 0.0, 0.0))
            .expect("finite point");
        assert_eq!(s.radius(), 2.0);
        s.encompass_point(Vec3::new(0.0, 5.0, 0.0))
            .expect("finite point");
        assert_eq!(s.radius(), 5.0);
    }

    #[test]
    fn encompass_box_reaches_farthest_corner() {
        let mut s = sphere(0.0, 0.0, 0.0, 0.0);
        s.encompass(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(2.0, 1.0, 1.0))
            .expect("valid box");
        let expected = (4.0_f32 + 1.0 + 1.0).sqrt();
        assert!((s.radius() - expected).abs() < 1e-5);
    }

    #[test]
    fn point_sphere_is_degenerate() {
        let p = Sphere::at_point(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.radius(), 0.0);
        assert_eq!(p.measure(), 0.0);
        assert!(sphere(1.0, 2.0, 3.0, 0.5).contains(&p));
    }
}
