// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

use nalgebra::{Point2, Vector2};

/// Z component of the cross product of two planar vectors
pub fn cross2(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    difference_of_products(a.x, b.y, a.y, b.x)
}

/// `a * b - c * d` with the rounding error of `c * d` compensated through FMA
fn difference_of_products(a: f64, b: f64, c: f64, d: f64) -> f64 {
    let cd = c * d;
    let err = (-c).mul_add(d, cd);
    a.mul_add(b, -cd) + err
}

/// Orientation of `p` relative to the directed line `a -> b` (positive when `p` is to the left)
///
/// The endpoints are evaluated in lexicographic order, so `orient2(a, b, p)` is exactly
/// `-orient2(b, a, p)`. Two faces sharing an edge therefore never both reject a point on it.
pub fn orient2(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> f64 {
    if (b.x, b.y) < (a.x, a.y) {
        return -cross2(&(a - b), &(p - b));
    }
    cross2(&(b - a), &(p - a))
}

/// Check if two floats are approximately equal
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// True if the values are strictly increasing
pub fn is_strictly_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}
