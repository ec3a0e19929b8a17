// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Bounding box utilities

use nalgebra::{Point, SVector};

/// Axis-aligned bounding box in `D` dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox<const D: usize> {
    pub min: Point<f64, D>,
    pub max: Point<f64, D>,
}

pub type BoundingBox2 = BoundingBox<2>;
pub type BoundingBox3 = BoundingBox<3>;

impl<const D: usize> BoundingBox<D> {
    pub fn new(min: Point<f64, D>, max: Point<f64, D>) -> Self {
        Self { min, max }
    }

    /// An inverted box that any point expands
    pub fn empty() -> Self {
        Self {
            min: Point::from([f64::INFINITY; D]),
            max: Point::from([f64::NEG_INFINITY; D]),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point<f64, D>>) -> Self {
        let mut bbox = Self::empty();
        for point in points {
            bbox.expand_to_include(point);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        (0..D).any(|i| self.min[i] > self.max[i])
    }

    pub fn expand_to_include(&mut self, point: &Point<f64, D>) {
        for i in 0..D {
            self.min[i] = self.min[i].min(point[i]);
            self.max[i] = self.max[i].max(point[i]);
        }
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        for i in 0..D {
            out.min[i] = out.min[i].min(other.min[i]);
            out.max[i] = out.max[i].max(other.max[i]);
        }
        out
    }

    pub fn extents(&self) -> SVector<f64, D> {
        self.max - self.min
    }

    /// Closed containment test
    pub fn contains(&self, point: &Point<f64, D>) -> bool {
        (0..D).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }

    /// Check if two bounding boxes are approximately equal within tolerance
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (0..D).all(|i| {
            (self.min[i] - other.min[i]).abs() <= tolerance
                && (self.max[i] - other.max[i]).abs() <= tolerance
        })
    }
}

impl<const D: usize> Default for BoundingBox<D> {
    fn default() -> Self {
        Self::empty()
    }
}
