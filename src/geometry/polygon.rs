// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Planar polygons of polynomial order `P` with `N` nodes
//!
//! Linear polygons (`P = 1`) list their corners counter-clockwise. Quadratic polygons
//! (`P = 2`) list the `N / 2` corners first, then one midside node per edge, where
//! midside node `i` sits on the edge from corner `i` to corner `i + 1`.

use super::{BoundingBox2, LineSegment, QuadraticSegment};
use crate::utils::math::cross2;
use nalgebra::Point2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polygon<const P: usize, const N: usize> {
    pub vertices: [Point2<f64>; N],
}

pub type Triangle = Polygon<1, 3>;
pub type Quadrilateral = Polygon<1, 4>;
pub type QuadraticTriangle = Polygon<2, 6>;
pub type QuadraticQuadrilateral = Polygon<2, 8>;

/// One boundary edge of a polygon
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edge {
    Line(LineSegment),
    Quadratic(QuadraticSegment),
}

impl Edge {
    pub fn is_left(&self, p: &Point2<f64>) -> bool {
        match self {
            Edge::Line(l) => l.is_left(p),
            Edge::Quadratic(q) => q.is_left(p),
        }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        match self {
            Edge::Line(l) => l.bounding_box(),
            Edge::Quadratic(q) => q.bounding_box(),
        }
    }
}

impl<const P: usize, const N: usize> Polygon<P, N> {
    pub fn new(vertices: [Point2<f64>; N]) -> Self {
        Self { vertices }
    }

    pub const fn num_edges() -> usize {
        N / P
    }

    pub fn edge(&self, i: usize) -> Edge {
        let m = Self::num_edges();
        let p0 = self.vertices[i];
        let p1 = self.vertices[(i + 1) % m];
        if P == 1 {
            Edge::Line(LineSegment::new(p0, p1))
        } else {
            Edge::Quadratic(QuadraticSegment::new(p0, p1, self.vertices[i + m]))
        }
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..Self::num_edges()).map(move |i| self.edge(i))
    }

    /// Signed area, positive for counter-clockwise polygons
    pub fn area(&self) -> f64 {
        let m = Self::num_edges();
        let origin = self.vertices[0];
        let mut twice_area = 0.0;
        for i in 1..m - 1 {
            twice_area += cross2(
                &(self.vertices[i] - origin),
                &(self.vertices[i + 1] - origin),
            );
        }
        let curved: f64 = self
            .edges()
            .map(|edge| match edge {
                Edge::Line(_) => 0.0,
                Edge::Quadratic(q) => q.enclosed_area(),
            })
            .sum();
        0.5 * twice_area + curved
    }

    /// Closed point-in-polygon test for counter-clockwise polygons
    pub fn contains(&self, p: &Point2<f64>) -> bool {
        self.edges().all(|edge| edge.is_left(p))
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        if P == 1 {
            return BoundingBox2::from_points(self.vertices.iter());
        }
        self.edges()
            .fold(BoundingBox2::empty(), |acc, edge| acc.union(&edge.bounding_box()))
    }
}

/// Reverse the orientation of a face's node list in place, keeping node 0 first
pub fn flip_nodes<T: Copy, const P: usize, const N: usize>(nodes: &mut [T; N]) {
    let m = N / P;
    nodes[1..m].reverse();
    if P == 2 {
        nodes[m..].reverse();
    }
}
