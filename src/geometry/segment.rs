// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Planar line and quadratic segments

use super::BoundingBox2;
use crate::utils::math::{cross2, orient2};
use nalgebra::Point2;
use std::cmp::Ordering;

/// Relative tolerance below which a quadratic segment is treated as straight
const STRAIGHT_TOLERANCE: f64 = 1e-12;

/// Straight segment from `p0` to `p1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub p0: Point2<f64>,
    pub p1: Point2<f64>,
}

impl LineSegment {
    pub fn new(p0: Point2<f64>, p1: Point2<f64>) -> Self {
        Self { p0, p1 }
    }

    /// Closed test: points on the segment's line count as left
    pub fn is_left(&self, p: &Point2<f64>) -> bool {
        orient2(&self.p0, &self.p1, p) >= 0.0
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points([&self.p0, &self.p1])
    }
}

/// Quadratic segment through `p0`, `mid` and `p1`, with `mid` on the curve at parameter 1/2
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticSegment {
    pub p0: Point2<f64>,
    pub p1: Point2<f64>,
    pub mid: Point2<f64>,
}

impl QuadraticSegment {
    pub fn new(p0: Point2<f64>, p1: Point2<f64>, mid: Point2<f64>) -> Self {
        Self { p0, p1, mid }
    }

    /// Bezier control point of the equivalent quadratic Bezier curve
    pub fn control(&self) -> Point2<f64> {
        Point2::from(2.0 * self.mid.coords - 0.5 * (self.p0.coords + self.p1.coords))
    }

    /// Point on the curve, `r` in [0, 1]
    pub fn point_at(&self, r: f64) -> Point2<f64> {
        let w0 = (2.0 * r - 1.0) * (r - 1.0);
        let w1 = r * (2.0 * r - 1.0);
        let wm = 4.0 * r * (1.0 - r);
        Point2::from(w0 * self.p0.coords + w1 * self.p1.coords + wm * self.mid.coords)
    }

    pub fn is_straight(&self) -> bool {
        let chord = self.p1 - self.p0;
        let offset = cross2(&chord, &(self.mid - self.p0));
        offset.abs() <= STRAIGHT_TOLERANCE * chord.norm_squared()
    }

    /// Bounds the curve itself, including any axis extremum between the endpoints
    pub fn bounding_box(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::from_points([&self.p0, &self.p1]);
        for axis in 0..2 {
            let (a, b, m) = (self.p0[axis], self.p1[axis], self.mid[axis]);
            let denom = 4.0 * (a + b - 2.0 * m);
            if denom == 0.0 {
                continue;
            }
            let r = (3.0 * a + b - 4.0 * m) / denom;
            if r > 0.0 && r < 1.0 {
                bbox.expand_to_include(&self.point_at(r));
            }
        }
        bbox
    }

    /// Signed area between the chord and the curve; positive when the curve bulges right
    /// of `p0 -> p1`, which enlarges a counter-clockwise polygon.
    pub fn enclosed_area(&self) -> f64 {
        -2.0 / 3.0 * cross2(&(self.p1 - self.p0), &(self.mid - self.p0))
    }

    /// Closed test: points on the curve count as left
    pub fn is_left(&self, p: &Point2<f64>) -> bool {
        // Classify against the lexicographically ordered segment so that two faces
        // traversing a shared edge in opposite directions agree exactly.
        if (self.p1.x, self.p1.y) < (self.p0.x, self.p0.y) {
            let reversed = QuadraticSegment::new(self.p1, self.p0, self.mid);
            return reversed.side(p) != Ordering::Greater;
        }
        self.side(p) != Ordering::Less
    }

    /// `Greater` left of the curve, `Less` right of it, `Equal` on it
    fn side(&self, p: &Point2<f64>) -> Ordering {
        let chord = orient2(&self.p0, &self.p1, p);
        let by_chord = chord.partial_cmp(&0.0).unwrap_or(Ordering::Equal);
        if self.is_straight() {
            return by_chord;
        }

        // Implicit form of the Bezier curve over the triangle (p0, control, p1):
        // f = u^2 - v is zero on the curve and negative between chord and curve.
        let c = self.control();
        let v0 = c - self.p0;
        let v1 = self.p1 - self.p0;
        let v2 = p - self.p0;
        let den = cross2(&v0, &v1);
        let bc = cross2(&v2, &v1) / den;
        let b1 = cross2(&v0, &v2) / den;
        let b0 = 1.0 - bc - b1;
        if !(b0 >= 0.0 && bc >= 0.0 && b1 >= 0.0) {
            return by_chord;
        }
        let u = 0.5 * bc + b1;
        let f = u * u - b1;
        if f > 0.0 {
            return by_chord;
        }
        if f == 0.0 {
            return Ordering::Equal;
        }

        // Between chord and curve: the side opposite the bulge
        if orient2(&self.p0, &self.p1, &c) > 0.0 {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn arc() -> QuadraticSegment {
        // Bulges to the right of (0,0) -> (2,0)
        QuadraticSegment::new(
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, -1.0),
        )
    }

    #[test]
    fn test_point_at_interpolates_nodes() {
        let q = arc();
        assert_eq!(q.point_at(0.0), q.p0);
        assert_eq!(q.point_at(1.0), q.p1);
        assert_relative_eq!(q.point_at(0.5), q.mid);
    }

    #[test]
    fn test_bounding_box_includes_extremum() {
        let q = QuadraticSegment::new(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.9, 0.5),
        );
        let bbox = q.bounding_box();
        assert_relative_eq!(bbox.max.x, 1.05625, epsilon = 1e-12);
        assert_relative_eq!(bbox.max.y, 1.0);
        assert_relative_eq!(bbox.min.x, 0.0);
    }

    #[test]
    fn test_is_left_bulging_right() {
        let q = arc();
        // Between chord and curve: left of the curve even though right of the chord
        assert!(q.is_left(&Point2::new(1.0, -0.5)));
        // On the curve counts as left
        assert!(q.is_left(&Point2::new(1.0, -1.0)));
        // Beyond the curve
        assert!(!q.is_left(&Point2::new(1.0, -1.1)));
        assert!(q.is_left(&Point2::new(1.0, 0.5)));
    }

    #[test]
    fn test_is_left_bulging_left() {
        let q = QuadraticSegment::new(
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, 1.0),
        );
        assert!(!q.is_left(&Point2::new(1.0, 0.5)));
        assert!(q.is_left(&Point2::new(1.0, 1.0)));
        assert!(q.is_left(&Point2::new(1.0, 1.5)));
        assert!(!q.is_left(&Point2::new(1.0, -0.5)));
    }

    #[test]
    fn test_reversed_curve_partitions_the_plane() {
        let q = QuadraticSegment::new(
            Point2::new(0.1, 0.2),
            Point2::new(1.7, 0.9),
            Point2::new(1.1, 0.1),
        );
        let r = QuadraticSegment::new(q.p1, q.p0, q.mid);
        for i in 0..=200 {
            let p = q.point_at(i as f64 / 200.0);
            for offset in [-1e-9, 0.0, 1e-9] {
                let p = Point2::new(p.x, p.y + offset);
                assert!(q.is_left(&p) || r.is_left(&p), "p = {p:?}");
            }
        }
        assert!(q.is_left(&Point2::new(0.9, 0.9)));
        assert!(!r.is_left(&Point2::new(0.9, 0.9)));
    }

    #[test]
    fn test_enclosed_area() {
        // Parabolic segment area is 2/3 of base times height
        assert_relative_eq!(arc().enclosed_area(), 2.0 / 3.0 * 2.0 * 1.0);
    }
}
