// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Morton ordering of point sets

use super::{encode_unit_2d, encode_unit_3d, MortonCode};
use crate::geometry::BoundingBox3;
use nalgebra::Point3;
use rayon::prelude::*;

/// Maps points of a set into the unit square or cube with one uniform scale
///
/// The scale is the reciprocal of the largest bounding-box extent, so the set keeps its
/// aspect ratio. Sets whose points all share one z coordinate are treated as planar and
/// encoded with 2D codes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitMapper {
    pub origin: Point3<f64>,
    pub scale: f64,
    pub planar: bool,
}

impl UnitMapper {
    pub fn new(points: &[Point3<f64>]) -> Self {
        if points.is_empty() {
            return Self {
                origin: Point3::origin(),
                scale: 1.0,
                planar: true,
            };
        }
        let bbox = BoundingBox3::from_points(points);
        let extents = bbox.extents();
        let planar = extents.z == 0.0;
        let largest = if planar {
            extents.x.max(extents.y)
        } else {
            extents.max()
        };
        Self {
            origin: bbox.min,
            scale: if largest > 0.0 { 1.0 / largest } else { 1.0 },
            planar,
        }
    }

    pub fn code<U: MortonCode>(&self, point: &Point3<f64>) -> U {
        let t = (point - self.origin) * self.scale;
        if self.planar {
            encode_unit_2d(t.x.min(1.0), t.y.min(1.0))
        } else {
            encode_unit_3d(t.x.min(1.0), t.y.min(1.0), t.z.min(1.0))
        }
    }
}

pub fn morton_codes<U: MortonCode>(points: &[Point3<f64>]) -> Vec<U> {
    let mapper = UnitMapper::new(points);
    points.iter().map(|p| mapper.code(p)).collect()
}

pub fn par_morton_codes<U: MortonCode>(points: &[Point3<f64>]) -> Vec<U> {
    let mapper = UnitMapper::new(points);
    points.par_iter().map(|p| mapper.code(p)).collect()
}

/// Indices of `points` in Morton order; position `i` of the result holds the old index of
/// the point that moves to `i`. Equal codes keep their input order.
pub fn sort_permutation<U: MortonCode>(points: &[Point3<f64>]) -> Vec<usize> {
    let codes = morton_codes::<U>(points);
    let mut perm: Vec<usize> = (0..points.len()).collect();
    perm.sort_by_key(|&i| codes[i]);
    perm
}

/// Parallel [`sort_permutation`]; always returns the same permutation as the serial form
pub fn par_sort_permutation<U: MortonCode>(points: &[Point3<f64>]) -> Vec<usize> {
    let codes = par_morton_codes::<U>(points);
    let mut perm: Vec<usize> = (0..points.len()).collect();
    perm.par_sort_by_key(|&i| codes[i]);
    perm
}

/// Old-to-new index map for a new-to-old permutation
pub fn invert_permutation(perm: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0; perm.len()];
    for (new, &old) in perm.iter().enumerate() {
        inverse[old] = new;
    }
    inverse
}
