// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Soup comparison utilities for I/O equivalence testing

use crate::mesh::PolytopeSoup;
use serde::{Deserialize, Serialize};

/// Default relative tolerance for vertex position comparison
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Geometry comparison outcome; `code()` is 0 when identical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum GeometryDiff {
    Identical = 0,
    VertexCount = 1,
    VertexPosition = 2,
}

/// Topology comparison outcome; `code()` is 0 when identical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum TopologyDiff {
    Identical = 0,
    /// Element count or per-element type differs
    ElementTypes = 1,
    ConnectivityLength = 2,
    Connectivity = 3,
}

impl GeometryDiff {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TopologyDiff {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Result of soup comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoupComparison {
    pub geometry: GeometryDiff,
    pub topology: TopologyDiff,
    pub elset_names_match: bool,
    pub vertex_count_diff: i64,
    pub element_count_diff: i64,
    pub max_vertex_distance: f64,
    pub tolerance: f64,
    pub passed: bool,
}

impl PolytopeSoup {
    pub fn compare_geometry(&self, other: &PolytopeSoup) -> GeometryDiff {
        self.compare_geometry_with(other, DEFAULT_TOLERANCE)
    }

    /// Compare vertex positions; each pair must agree to `tolerance` relative to its
    /// magnitude (absolute below 1)
    pub fn compare_geometry_with(&self, other: &PolytopeSoup, tolerance: f64) -> GeometryDiff {
        if self.num_vertices() != other.num_vertices() {
            return GeometryDiff::VertexCount;
        }
        let mismatch = self.vertices().iter().zip(other.vertices()).any(|(a, b)| {
            let scale = a.coords.norm().max(b.coords.norm()).max(1.0);
            (a - b).norm() > tolerance * scale
        });
        if mismatch {
            GeometryDiff::VertexPosition
        } else {
            GeometryDiff::Identical
        }
    }

    pub fn compare_topology(&self, other: &PolytopeSoup) -> TopologyDiff {
        if self.num_elements() != other.num_elements()
            || self
                .elements()
                .iter()
                .zip(other.elements())
                .any(|(a, b)| a.element_type() != b.element_type())
        {
            return TopologyDiff::ElementTypes;
        }
        // Equal types imply equal lengths
        let len = |s: &PolytopeSoup| -> usize {
            s.elements().iter().map(|e| e.vertices().len()).sum()
        };
        if len(self) != len(other) {
            return TopologyDiff::ConnectivityLength;
        }
        if self.elements() != other.elements() {
            return TopologyDiff::Connectivity;
        }
        TopologyDiff::Identical
    }
}

/// Compare two soups for equivalence
pub fn compare_soups(a: &PolytopeSoup, b: &PolytopeSoup, tolerance: f64) -> SoupComparison {
    let geometry = a.compare_geometry_with(b, tolerance);
    let topology = a.compare_topology(b);
    let elset_names_match = a.elsets().map(|e| e.name).eq(b.elsets().map(|e| e.name));

    let max_vertex_distance = a
        .vertices()
        .iter()
        .zip(b.vertices())
        .map(|(p, q)| (p - q).norm())
        .fold(0.0, f64::max);

    let geometry_ok = geometry == GeometryDiff::Identical;
    let topology_ok = topology == TopologyDiff::Identical;
    SoupComparison {
        geometry,
        topology,
        elset_names_match,
        vertex_count_diff: a.num_vertices() as i64 - b.num_vertices() as i64,
        element_count_diff: a.num_elements() as i64 - b.num_elements() as i64,
        max_vertex_distance,
        tolerance,
        passed: geometry_ok && topology_ok && elset_names_match,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::ElementType;

    fn triangle() -> PolytopeSoup {
        let mut soup = PolytopeSoup::new();
        soup.add_vertex(0.0, 0.0, 0.0);
        soup.add_vertex(1.0, 0.0, 0.0);
        soup.add_vertex(0.0, 1.0, 0.0);
        soup.add_element(ElementType::Triangle, &[0, 1, 2]).unwrap();
        soup
    }

    #[test]
    fn test_compare_identical_soups() {
        let comparison = compare_soups(&triangle(), &triangle(), 1e-9);
        assert!(comparison.passed);
        assert_eq!(comparison.geometry.code(), 0);
        assert_eq!(comparison.topology.code(), 0);
    }

    #[test]
    fn test_geometry_codes() {
        let a = triangle();
        let mut b = triangle();
        b.add_vertex(5.0, 5.0, 0.0);
        assert_eq!(a.compare_geometry(&b).code(), 1);

        let mut c = PolytopeSoup::new();
        c.add_vertex(0.0, 0.0, 0.0);
        c.add_vertex(1.0, 0.0, 0.0);
        c.add_vertex(0.0, 1.5, 0.0);
        assert_eq!(a.compare_geometry(&c), GeometryDiff::VertexPosition);
        assert_eq!(a.compare_geometry_with(&c, 1.0), GeometryDiff::Identical);
    }

    #[test]
    fn test_topology_codes() {
        let a = triangle();
        let mut b = triangle();
        b.add_element(ElementType::Line, &[0, 1]).unwrap();
        assert_eq!(a.compare_topology(&b).code(), 1);

        let mut c = PolytopeSoup::new();
        c.add_element(ElementType::Triangle, &[0, 2, 1]).unwrap();
        assert_eq!(a.compare_topology(&c), TopologyDiff::Connectivity);
        assert_eq!(c.compare_topology(&c), TopologyDiff::Identical);

        let comparison = compare_soups(&a, &c, 1e-9);
        assert!(!comparison.passed);
        assert_eq!(comparison.vertex_count_diff, 3);
    }
}
