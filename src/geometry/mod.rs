// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - planar primitives and bounding boxes

mod bbox;
mod polygon;
mod segment;

pub use bbox::{BoundingBox, BoundingBox2, BoundingBox3};
pub use polygon::{
    flip_nodes, Edge, Polygon, QuadraticQuadrilateral, QuadraticTriangle, Quadrilateral, Triangle,
};
pub use segment::{LineSegment, QuadraticSegment};
